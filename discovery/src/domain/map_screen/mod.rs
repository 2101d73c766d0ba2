//! Map screen orchestration.
//!
//! The screen drives one [`DiscoverySession`] through surface creation,
//! store search and detail fan-out, then keeps the marker layer in step with
//! the category filter and the combined sale set. It moves through
//! `Uninitialized -> Loading -> {Ready, Degraded, Failed}`; a failed screen
//! renders the placeholder layout instead of a live surface.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::category::{CategoryFilter, SaleCategory};
use crate::domain::discovery_session::{DiscoverySession, Provenance};
use crate::domain::geo::Coordinates;
use crate::domain::marker_sync::{
    MarkerSync, PlaceholderMarker, SaleSelected, placeholder_layout,
};
use crate::domain::ports::{InitError, LocationError, MountTarget};
use crate::domain::sale::Sale;

mod list;
mod notice;
mod runtime;

pub use list::{ListDiscovery, ListDiscoveryConfig, discover_list};
pub use notice::{SampleCause, UserNotice};
pub use runtime::{ScreenRuntime, ScreenSleeper, TokioSleeper};

/// Limits and pacing for the map screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapScreenConfig {
    /// Search radius in metres.
    pub search_radius_meters: u32,
    /// Places looked up in detail.
    pub detail_limit: usize,
    /// Pause between detail lookups.
    pub detail_pause: Duration,
    /// Surface-creation retries after the first attempt.
    pub max_retries: u32,
    /// Pause before each surface-creation retry.
    pub retry_pause: Duration,
}

impl Default for MapScreenConfig {
    fn default() -> Self {
        Self {
            search_radius_meters: 15_000,
            detail_limit: 20,
            detail_pause: Duration::from_millis(150),
            max_retries: 3,
            retry_pause: Duration::from_secs(1),
        }
    }
}

/// Lifecycle phase of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenPhase {
    /// `load` has not been called.
    Uninitialized,
    /// Discovery is in progress.
    Loading,
    /// Live surface with provider results.
    Ready,
    /// Usable, but with fallback data or without store results.
    Degraded(UserNotice),
    /// No surface could be created.
    Failed(UserNotice),
}

/// State behind one map screen.
pub struct MapScreen {
    session: DiscoverySession,
    config: MapScreenConfig,
    runtime: ScreenRuntime,
    target: Option<MountTarget>,
    center_hint: Option<Coordinates>,
    user_sales: Vec<Sale>,
    discovered: Vec<Sale>,
    filter: CategoryFilter,
    markers: MarkerSync,
    selected: Arc<Mutex<Option<Sale>>>,
    on_select: SaleSelected,
    phase: ScreenPhase,
    status: String,
    status_history: Vec<String>,
}

impl MapScreen {
    /// Screen over `session` showing `user_sales` alongside discovered stores.
    pub fn new(
        session: DiscoverySession,
        config: MapScreenConfig,
        runtime: ScreenRuntime,
        user_sales: Vec<Sale>,
    ) -> Self {
        let selected = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&selected);
        let on_select: SaleSelected = Arc::new(move |sale: &Sale| {
            *sink.lock().unwrap_or_else(PoisonError::into_inner) = Some(sale.clone());
        });
        Self {
            session,
            config,
            runtime,
            target: None,
            center_hint: None,
            user_sales,
            discovered: Vec::new(),
            filter: CategoryFilter::all(),
            markers: MarkerSync::new(),
            selected,
            on_select,
            phase: ScreenPhase::Uninitialized,
            status: String::new(),
            status_history: Vec::new(),
        }
    }

    /// Mount on `target` and run discovery.
    pub async fn load(&mut self, target: MountTarget, center: Option<Coordinates>) -> &ScreenPhase {
        self.target = Some(target);
        self.center_hint = center;
        self.run().await;
        &self.phase
    }

    /// Re-run discovery on the last target.
    ///
    /// Does nothing before the first `load`.
    pub async fn retry(&mut self) -> &ScreenPhase {
        if self.target.is_some() {
            self.set_status("Retrying...");
            self.run().await;
        }
        &self.phase
    }

    async fn run(&mut self) {
        let Some(target) = self.target.clone() else {
            return;
        };
        self.phase = ScreenPhase::Loading;

        if !self.session.has_credential() {
            self.run_without_credential().await;
            return;
        }

        if let Err(notice) = self.mount(&target).await {
            self.set_status("Map initialization failed");
            warn!(notice = %notice, "map screen failed");
            self.phase = ScreenPhase::Failed(notice);
            return;
        }

        self.set_status("Searching for nearby stores...");
        let phase = match self.session.search_nearby(self.config.search_radius_meters).await {
            Ok(outcome) => {
                self.set_status(&format!("Found {} stores nearby", outcome.places.len()));
                let notice = list::notice_for(&outcome);
                self.discovered = list::normalize_places(
                    &self.session,
                    &outcome,
                    self.config.detail_limit,
                    self.config.detail_pause,
                    &self.runtime,
                )
                .await;
                self.set_status(&format!(
                    "Loaded {} stores successfully",
                    self.discovered.len()
                ));
                match (outcome.provenance, notice) {
                    (Provenance::Provider, _) | (_, None) => ScreenPhase::Ready,
                    (Provenance::Fallback(_), Some(notice)) => ScreenPhase::Degraded(notice),
                }
            }
            Err(error) => {
                warn!(code = error.code(), %error, "store search failed");
                self.discovered.clear();
                self.set_status("Store search failed - showing user sales only");
                ScreenPhase::Degraded(UserNotice::for_search_error(&error))
            }
        };
        self.phase = phase;
        self.sync_markers();
    }

    async fn run_without_credential(&mut self) {
        warn!("places credential not configured; using fallback data");
        self.set_status("Using fallback data...");
        match self.session.search_nearby(self.config.search_radius_meters).await {
            Ok(outcome) => {
                self.discovered = list::normalize_places(
                    &self.session,
                    &outcome,
                    self.config.detail_limit,
                    self.config.detail_pause,
                    &self.runtime,
                )
                .await;
            }
            Err(error) => {
                warn!(code = error.code(), %error, "fallback search failed");
                self.discovered.clear();
            }
        }
        self.phase = ScreenPhase::Degraded(UserNotice::MissingCredential);
    }

    async fn mount(&mut self, target: &MountTarget) -> Result<(), UserNotice> {
        self.set_status("Initializing Google Maps...");
        let mut retries = 0;
        loop {
            match self.session.initialize_surface(target, self.center_hint).await {
                Ok(()) => break,
                Err(InitError::TargetMissing { .. }) if retries < self.config.max_retries => {
                    retries += 1;
                    warn!(
                        target = target.as_str(),
                        attempt = retries + 1,
                        "map container missing; retrying"
                    );
                    self.runtime.sleeper.sleep(self.config.retry_pause).await;
                }
                Err(InitError::TargetMissing { .. }) => {
                    return Err(UserNotice::SurfaceUnavailable);
                }
                Err(InitError::SdkUnavailable { message }) => {
                    return Err(UserNotice::MapUnavailable { detail: message });
                }
            }
        }
        self.markers = MarkerSync::new();
        self.set_status("Loading map...");
        info!(target = target.as_str(), "map surface ready");
        Ok(())
    }

    fn sync_markers(&mut self) {
        let visible = self.filtered_sales();
        let Self {
            session,
            markers,
            on_select,
            ..
        } = self;
        session.with_surface(|surface| markers.reconcile(surface, &visible, on_select));
    }

    fn set_status(&mut self, status: &str) {
        info!(status, "map screen status");
        status.clone_into(&mut self.status);
        self.status_history.push(status.to_owned());
    }

    /// Current phase.
    pub fn phase(&self) -> &ScreenPhase {
        &self.phase
    }

    /// Latest status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Every status line shown so far, oldest first.
    pub fn status_history(&self) -> &[String] {
        &self.status_history
    }

    /// Banner for the current phase, if any.
    pub fn notice(&self) -> Option<&UserNotice> {
        match &self.phase {
            ScreenPhase::Degraded(notice) | ScreenPhase::Failed(notice) => Some(notice),
            ScreenPhase::Uninitialized | ScreenPhase::Loading | ScreenPhase::Ready => None,
        }
    }

    /// Underlying discovery session.
    pub fn session(&self) -> &DiscoverySession {
        &self.session
    }

    /// User posts followed by discovered stores.
    pub fn sales(&self) -> Vec<Sale> {
        self.user_sales
            .iter()
            .chain(&self.discovered)
            .cloned()
            .collect()
    }

    /// Sales whose category passes the filter.
    pub fn filtered_sales(&self) -> Vec<Sale> {
        self.user_sales
            .iter()
            .chain(&self.discovered)
            .filter(|sale| self.filter.is_enabled(sale.category))
            .cloned()
            .collect()
    }

    /// Replace the user-posted sales.
    pub fn set_user_sales(&mut self, sales: Vec<Sale>) {
        self.user_sales = sales;
        self.sync_markers();
    }

    /// Current category filter.
    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Replace the whole filter.
    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
        self.sync_markers();
    }

    /// Flip one category.
    pub fn toggle_category(&mut self, category: SaleCategory) {
        self.filter.toggle(category);
        self.sync_markers();
    }

    /// Show every category.
    pub fn select_all_categories(&mut self) {
        self.filter.select_all();
        self.sync_markers();
    }

    /// Hide every category.
    pub fn clear_categories(&mut self) {
        self.filter.clear_all();
        self.sync_markers();
    }

    /// Sale behind the last clicked marker.
    pub fn selected_sale(&self) -> Option<Sale> {
        self.selected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Dismiss the selected sale.
    pub fn clear_selection(&self) {
        *self.selected.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Non-interactive stand-in for the map, built from the filtered sales.
    pub fn placeholder_markers(&self) -> Vec<PlaceholderMarker> {
        placeholder_layout(&self.filtered_sales())
    }

    /// Recentre on the user.
    pub async fn recenter(&self) -> Result<Coordinates, LocationError> {
        self.session.recenter().await
    }

    /// Use a caller-supplied position as the user location.
    pub fn set_manual_location(&self, position: Coordinates) -> Result<(), LocationError> {
        self.session.set_manual_location(position)
    }
}
