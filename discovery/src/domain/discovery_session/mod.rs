//! Injectable discovery session owning the provider lifecycle.
//!
//! One session serves one screen. It loads provider resources at most once,
//! owns the map surface and its location marker, caches the last known user
//! position, and runs nearby searches with static fallback data.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::api_key::ApiKey;
use crate::domain::geo::{Coordinates, DEFAULT_CENTER};
use crate::domain::marker_sync::{LocationMarkerKind, location_marker_spec};
use crate::domain::normalizer::ThumbnailLinker;
use crate::domain::ports::{
    DEFAULT_ZOOM, DetailError, InitError, LoadError, LocationError, LocationSource, MapSurface,
    MapView, MarkerId, MountTarget, PlaceDetail, PlaceDetailsRequest, PlacesProvider,
    PositionOptions, RawPlace, SdkLoader, SearchError, SurfaceFactory, SurfaceOptions,
    USER_LOCATION_ZOOM,
};

mod fallback;
mod sdk_gate;
mod search;

pub use fallback::{FALLBACK_ID_PREFIX, fallback_detail, fallback_places, is_fallback_id};
pub use search::{
    ENOUGH_RESULTS, SEARCH_STRATEGIES, SearchStrategy, UNFILTERED_KEEP, filter_relevant,
    is_relevant,
};

use sdk_gate::SdkGate;

/// Time allowed for provider resources to signal completion.
pub const SDK_LOAD_TIMEOUT: Duration = Duration::from_secs(20);

/// Driven ports required by a session.
pub struct DiscoveryPorts {
    /// Provider resource loader.
    pub sdk_loader: Arc<dyn SdkLoader>,
    /// Places search and detail service.
    pub places: Arc<dyn PlacesProvider>,
    /// Device position source.
    pub location: Arc<dyn LocationSource>,
    /// Map surface factory.
    pub surfaces: Arc<dyn SurfaceFactory>,
}

impl DiscoveryPorts {
    /// Bundle the session ports.
    pub fn new(
        sdk_loader: Arc<dyn SdkLoader>,
        places: Arc<dyn PlacesProvider>,
        location: Arc<dyn LocationSource>,
        surfaces: Arc<dyn SurfaceFactory>,
    ) -> Self {
        Self {
            sdk_loader,
            places,
            location,
            surfaces,
        }
    }
}

/// Session settings derived from configuration.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Resolved provider credential; `None` routes discovery to fallback data.
    pub api_key: Option<ApiKey>,
    /// Photo thumbnail URL builder handed to the normaliser.
    pub thumbnails: ThumbnailLinker,
    /// Load timeout for provider resources.
    pub sdk_load_timeout: Duration,
}

impl SessionSettings {
    /// Settings with the standard load timeout.
    pub fn new(api_key: Option<ApiKey>, thumbnails: ThumbnailLinker) -> Self {
        Self {
            api_key,
            thumbnails,
            sdk_load_timeout: SDK_LOAD_TIMEOUT,
        }
    }
}

/// Where a search result set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Live provider results.
    Provider,
    /// Static catalogue, with the reason it was used.
    Fallback(FallbackReason),
}

/// Why the static catalogue replaced live results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No usable credential is configured.
    MissingCredential,
    /// Every strategy succeeded but found nothing.
    NoResults,
    /// Strategies failed and nothing was found.
    ProviderErrors,
}

/// Result of [`DiscoverySession::search_nearby`].
///
/// `places` is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Places to normalise, live or static.
    pub places: Vec<RawPlace>,
    /// Origin of `places`.
    pub provenance: Provenance,
    /// Strategy failures recorded along the way.
    pub strategy_errors: Vec<SearchError>,
}

impl SearchOutcome {
    fn fallback(centre: Coordinates, reason: FallbackReason, errors: Vec<SearchError>) -> Self {
        info!(?reason, "using static store catalogue");
        Self {
            places: fallback_places(centre),
            provenance: Provenance::Fallback(reason),
            strategy_errors: errors,
        }
    }

    /// Whether the static catalogue was used.
    pub fn is_fallback(&self) -> bool {
        matches!(self.provenance, Provenance::Fallback(_))
    }
}

#[derive(Default)]
struct SessionState {
    surface: Option<Box<dyn MapSurface>>,
    last_location: Option<Coordinates>,
    location_marker: Option<MarkerId>,
}

/// Provider lifecycle for one screen.
pub struct DiscoverySession {
    sdk: SdkGate,
    places: Arc<dyn PlacesProvider>,
    location: Arc<dyn LocationSource>,
    surfaces: Arc<dyn SurfaceFactory>,
    api_key: Option<ApiKey>,
    thumbnails: ThumbnailLinker,
    state: Mutex<SessionState>,
}

impl DiscoverySession {
    /// Build a session from its ports and settings.
    pub fn new(ports: DiscoveryPorts, settings: SessionSettings) -> Self {
        Self {
            sdk: SdkGate::new(ports.sdk_loader, settings.sdk_load_timeout),
            places: ports.places,
            location: ports.location,
            surfaces: ports.surfaces,
            api_key: settings.api_key,
            thumbnails: settings.thumbnails,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Whether a usable provider credential is configured.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Whether provider resources have loaded.
    pub fn is_loaded(&self) -> bool {
        self.sdk.is_loaded()
    }

    /// Thumbnail builder for normalising this session's results.
    pub fn thumbnails(&self) -> &ThumbnailLinker {
        &self.thumbnails
    }

    /// Load provider resources once per session.
    ///
    /// Concurrent callers share one in-flight attempt and its outcome. A
    /// failed attempt can be retried by calling again.
    pub async fn load_provider_sdk(&self) -> Result<(), LoadError> {
        self.sdk.load(self.api_key.as_ref()).await
    }

    /// Load resources, create the surface on `target`, then try to centre it
    /// on the user.
    ///
    /// A geolocation failure is not an error: the surface stays on the
    /// requested centre and shows the default-location marker.
    pub async fn initialize_surface(
        &self,
        target: &MountTarget,
        center: Option<Coordinates>,
    ) -> Result<(), InitError> {
        self.load_provider_sdk()
            .await
            .map_err(|error| InitError::sdk_unavailable(error.to_string()))?;

        let options = SurfaceOptions {
            center: center.unwrap_or(DEFAULT_CENTER),
            zoom: DEFAULT_ZOOM,
        };
        let surface = self.surfaces.create(target, &options).await?;
        {
            let mut state = self.lock_state();
            state.surface = Some(surface);
            state.location_marker = None;
        }
        info!(target = target.as_str(), "map surface created");

        if let Err(error) = self.acquire_user_location().await {
            warn!(code = error.code(), %error, "geolocation unavailable; keeping default centre");
            let mut state = self.lock_state();
            Self::place_location_marker(&mut state, options.center, LocationMarkerKind::Default);
        }
        Ok(())
    }

    /// Acquire the device position, high accuracy first.
    ///
    /// On success the position is cached, the surface is recentred and the
    /// live-location marker replaces any previous location marker.
    pub async fn acquire_user_location(&self) -> Result<Coordinates, LocationError> {
        let position = match self.request_position(&PositionOptions::HIGH_ACCURACY).await {
            Ok(position) => position,
            Err(error) => {
                debug!(code = error.code(), "high-accuracy position failed; retrying coarse");
                self.request_position(&PositionOptions::LOW_ACCURACY)
                    .await?
            }
        };
        self.adopt_location(position);
        Ok(position)
    }

    /// Use a caller-supplied position as the user location.
    pub fn set_manual_location(&self, position: Coordinates) -> Result<(), LocationError> {
        if !position.is_valid() {
            return Err(LocationError::position_unavailable());
        }
        info!(
            latitude = position.latitude,
            longitude = position.longitude,
            "manual location set"
        );
        self.adopt_location(position);
        Ok(())
    }

    /// Last known user position.
    pub fn last_location(&self) -> Option<Coordinates> {
        self.lock_state().last_location
    }

    /// Centre used for searches: last location, else the surface centre,
    /// else the default centre.
    pub fn current_centre(&self) -> Coordinates {
        let state = self.lock_state();
        state
            .last_location
            .or_else(|| state.surface.as_ref().map(|surface| surface.view().center))
            .unwrap_or(DEFAULT_CENTER)
    }

    /// Search for second-hand retail around the current centre.
    ///
    /// Never returns an empty set: missing credentials and empty or failed
    /// searches fall back to the static catalogue. The only error is a
    /// rejected credential, reported when every strategy was denied.
    pub async fn search_nearby(&self, radius_meters: u32) -> Result<SearchOutcome, SearchError> {
        let centre = self.current_centre();
        if self.api_key.is_none() {
            return Ok(SearchOutcome::fallback(
                centre,
                FallbackReason::MissingCredential,
                Vec::new(),
            ));
        }

        let run = search::run_strategies(self.places.as_ref(), centre, radius_meters).await;
        if !run.places.is_empty() {
            let places = filter_relevant(run.places);
            info!(count = places.len(), "nearby search completed");
            return Ok(SearchOutcome {
                places,
                provenance: Provenance::Provider,
                strategy_errors: run.errors,
            });
        }

        if let Some(denied) = Self::all_denied(&run.errors) {
            warn!(%denied, "every search strategy was denied");
            return Err(denied);
        }
        let reason = if run.errors.is_empty() {
            FallbackReason::NoResults
        } else {
            FallbackReason::ProviderErrors
        };
        Ok(SearchOutcome::fallback(centre, reason, run.errors))
    }

    fn all_denied(errors: &[SearchError]) -> Option<SearchError> {
        let all_denied = !errors.is_empty()
            && errors
                .iter()
                .all(|error| matches!(error, SearchError::PermissionDenied { .. }));
        if all_denied {
            errors.first().cloned()
        } else {
            None
        }
    }

    /// Details for one place.
    ///
    /// Catalogue ids are answered from static data without a provider call.
    pub async fn fetch_place_detail(&self, place_id: &str) -> Result<PlaceDetail, DetailError> {
        if is_fallback_id(place_id) {
            return Ok(fallback_detail(place_id));
        }
        let request = PlaceDetailsRequest::standard(place_id);
        self.places.place_details(&request).await.inspect_err(|error| {
            warn!(place_id, code = error.code(), %error, "place detail lookup failed");
        })
    }

    /// Recentre on the user.
    ///
    /// Uses the cached position when present, otherwise asks for a fresh
    /// one. When that fails the surface returns to the default centre with the
    /// default-location marker and the failure is reported.
    pub async fn recenter(&self) -> Result<Coordinates, LocationError> {
        {
            let mut state = self.lock_state();
            if let Some(position) = state.last_location {
                if let Some(surface) = state.surface.as_mut() {
                    surface.set_view(MapView {
                        center: position,
                        zoom: USER_LOCATION_ZOOM,
                    });
                }
                return Ok(position);
            }
        }

        match self.acquire_user_location().await {
            Ok(position) => Ok(position),
            Err(error) => {
                warn!(code = error.code(), %error, "recentre failed; using default centre");
                let mut state = self.lock_state();
                if let Some(surface) = state.surface.as_mut() {
                    surface.set_view(MapView {
                        center: DEFAULT_CENTER,
                        zoom: DEFAULT_ZOOM,
                    });
                }
                Self::place_location_marker(&mut state, DEFAULT_CENTER, LocationMarkerKind::Default);
                Err(error)
            }
        }
    }

    /// Run `f` against the live surface; `None` before the surface exists.
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut dyn MapSurface) -> R) -> Option<R> {
        let mut state = self.lock_state();
        let surface = state.surface.as_mut()?;
        Some(f(&mut **surface))
    }

    /// Whether the surface has been created.
    pub fn has_surface(&self) -> bool {
        self.lock_state().surface.is_some()
    }

    async fn request_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        match tokio::time::timeout(options.timeout, self.location.current_position(options)).await
        {
            Ok(result) => result,
            Err(_) => Err(LocationError::timeout()),
        }
    }

    fn adopt_location(&self, position: Coordinates) {
        let mut state = self.lock_state();
        state.last_location = Some(position);
        if let Some(surface) = state.surface.as_mut() {
            surface.set_view(MapView {
                center: position,
                zoom: USER_LOCATION_ZOOM,
            });
        }
        Self::place_location_marker(&mut state, position, LocationMarkerKind::Live);
    }

    fn place_location_marker(
        state: &mut SessionState,
        position: Coordinates,
        kind: LocationMarkerKind,
    ) {
        let SessionState {
            surface,
            location_marker,
            ..
        } = state;
        let Some(surface) = surface.as_mut() else {
            return;
        };
        if let Some(previous) = location_marker.take() {
            surface.remove_marker(previous);
        }
        *location_marker = Some(surface.add_marker(location_marker_spec(kind, position)));
        debug!(?kind, "location marker placed");
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
