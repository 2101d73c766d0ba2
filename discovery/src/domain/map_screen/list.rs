//! Surface-less discovery for list screens, plus the shared detail fan-out.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::discovery_session::{DiscoverySession, Provenance, SearchOutcome};
use crate::domain::normalizer::convert;
use crate::domain::ports::RawPlace;
use crate::domain::sale::Sale;

use super::notice::UserNotice;
use super::runtime::ScreenRuntime;

/// Limits for list discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDiscoveryConfig {
    /// Search radius in metres.
    pub search_radius_meters: u32,
    /// Places looked up in detail.
    pub detail_limit: usize,
    /// Pause between detail lookups.
    pub detail_pause: Duration,
}

impl Default for ListDiscoveryConfig {
    fn default() -> Self {
        Self {
            search_radius_meters: 12_000,
            detail_limit: 5,
            detail_pause: Duration::from_millis(300),
        }
    }
}

/// Stores found for a list screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ListDiscovery {
    /// Normalised store listings.
    pub sales: Vec<Sale>,
    /// Origin of the listings; `None` when the search failed outright.
    pub provenance: Option<Provenance>,
    /// Banner to show, if any.
    pub notice: Option<UserNotice>,
}

/// Discover nearby stores without a map surface.
///
/// Uses the cached user location, asking for one first when none is known.
/// A location failure only means the search runs around the default centre.
pub async fn discover_list(
    session: &DiscoverySession,
    config: &ListDiscoveryConfig,
    runtime: &ScreenRuntime,
) -> ListDiscovery {
    if session.last_location().is_none() {
        if let Err(error) = session.acquire_user_location().await {
            debug!(code = error.code(), "list discovery proceeding without a location");
        }
    }

    match session.search_nearby(config.search_radius_meters).await {
        Ok(outcome) => {
            let notice = notice_for(&outcome);
            let sales = normalize_places(
                session,
                &outcome,
                config.detail_limit,
                config.detail_pause,
                runtime,
            )
            .await;
            info!(count = sales.len(), "list discovery completed");
            ListDiscovery {
                sales,
                provenance: Some(outcome.provenance),
                notice,
            }
        }
        Err(error) => {
            warn!(code = error.code(), %error, "list discovery failed");
            ListDiscovery {
                sales: Vec::new(),
                provenance: None,
                notice: Some(UserNotice::for_search_error(&error)),
            }
        }
    }
}

pub(super) fn notice_for(outcome: &SearchOutcome) -> Option<UserNotice> {
    match outcome.provenance {
        Provenance::Provider => None,
        Provenance::Fallback(reason) => {
            Some(UserNotice::for_fallback(reason, &outcome.strategy_errors))
        }
    }
}

/// Convert up to `limit` places, looking each one up in detail.
///
/// Lookups run one at a time with `pause` between provider calls; catalogue
/// results are answered locally and skip the pause. A failed lookup keeps the
/// place with its basic fields.
pub(super) async fn normalize_places(
    session: &DiscoverySession,
    outcome: &SearchOutcome,
    limit: usize,
    pause: Duration,
    runtime: &ScreenRuntime,
) -> Vec<Sale> {
    let places: Vec<&RawPlace> = outcome.places.iter().take(limit).collect();
    let paced = !outcome.is_fallback();
    let mut sales = Vec::with_capacity(places.len());

    for (index, place) in places.iter().enumerate() {
        let now = runtime.clock.utc();
        let sale = match session.fetch_place_detail(&place.place_id).await {
            Ok(detail) => convert(place, Some(&detail), session.thumbnails(), now),
            Err(error) => {
                debug!(place = %place.name, code = error.code(), "using basic place fields");
                convert(place, None, session.thumbnails(), now)
            }
        };
        sales.push(sale);

        if paced && index + 1 < places.len() {
            runtime.sleeper.sleep(pause).await;
        }
    }
    sales
}
