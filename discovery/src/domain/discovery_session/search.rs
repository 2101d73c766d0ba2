//! Ordered nearby-search strategies, deduplication, and relevance filtering.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::domain::geo::Coordinates;
use crate::domain::ports::{NearbySearchRequest, PlacesProvider, RawPlace, SearchError};

/// Unique results after which remaining strategies are skipped.
pub const ENOUGH_RESULTS: usize = 20;

/// Results kept when nothing passes the relevance filter.
pub const UNFILTERED_KEEP: usize = 10;

const RELEVANT_NAME_TERMS: [&str; 12] = [
    "thrift",
    "goodwill",
    "salvation army",
    "consignment",
    "vintage",
    "antique",
    "second hand",
    "used",
    "savers",
    "value village",
    "crossroads",
    "buffalo exchange",
];
const RELEVANT_TYPES: [&str; 3] = ["clothing_store", "furniture_store", "home_goods_store"];

/// One nearby-search query shape, relative to the requested radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStrategy {
    /// Provider place type tag.
    pub place_type: &'static str,
    /// Optional free-text keyword.
    pub keyword: Option<&'static str>,
    /// Radius multiplier in tenths (`15` means 1.5x).
    pub radius_tenths: u32,
}

impl SearchStrategy {
    /// Build the concrete request around `centre`.
    pub fn request(&self, centre: Coordinates, radius_meters: u32) -> NearbySearchRequest {
        NearbySearchRequest {
            location: centre,
            radius_meters: radius_meters.saturating_mul(self.radius_tenths) / 10,
            place_type: self.place_type.to_owned(),
            keyword: self.keyword.map(str::to_owned),
        }
    }
}

/// Strategies in execution order.
pub const SEARCH_STRATEGIES: [SearchStrategy; 4] = [
    SearchStrategy {
        place_type: "store",
        keyword: Some("thrift consignment vintage antique second hand used clothing furniture"),
        radius_tenths: 10,
    },
    SearchStrategy {
        place_type: "clothing_store",
        keyword: None,
        radius_tenths: 10,
    },
    SearchStrategy {
        place_type: "furniture_store",
        keyword: None,
        radius_tenths: 10,
    },
    SearchStrategy {
        place_type: "establishment",
        keyword: Some("goodwill salvation army thrift savers"),
        radius_tenths: 15,
    },
];

/// Accumulated strategy results.
#[derive(Debug, Default)]
pub(super) struct StrategyRun {
    pub(super) places: Vec<RawPlace>,
    pub(super) errors: Vec<SearchError>,
}

/// Run the strategies strictly in order, deduplicating by place id.
///
/// Failures are recorded and never abort later strategies. The run stops
/// once [`ENOUGH_RESULTS`] unique places have accumulated.
pub(super) async fn run_strategies(
    provider: &dyn PlacesProvider,
    centre: Coordinates,
    radius_meters: u32,
) -> StrategyRun {
    let mut run = StrategyRun::default();
    let mut seen = HashSet::new();

    for (index, strategy) in SEARCH_STRATEGIES.iter().enumerate() {
        let request = strategy.request(centre, radius_meters);
        match provider.nearby_search(&request).await {
            Ok(batch) => {
                let found = batch.len();
                run.places.extend(
                    batch
                        .into_iter()
                        .filter(|place| seen.insert(place.place_id.clone())),
                );
                debug!(
                    strategy = index + 1,
                    place_type = strategy.place_type,
                    found,
                    unique_total = run.places.len(),
                    "search strategy completed"
                );
            }
            Err(error) => {
                warn!(
                    strategy = index + 1,
                    place_type = strategy.place_type,
                    code = error.code(),
                    %error,
                    "search strategy failed"
                );
                run.errors.push(error);
            }
        }

        if run.places.len() >= ENOUGH_RESULTS {
            info!(strategy = index + 1, "enough results; skipping remaining strategies");
            break;
        }
    }
    run
}

/// Whether a place looks like second-hand retail.
pub fn is_relevant(place: &RawPlace) -> bool {
    let name = place.name.to_lowercase();
    RELEVANT_NAME_TERMS.iter().any(|term| name.contains(term))
        || place
            .types
            .iter()
            .any(|tag| RELEVANT_TYPES.contains(&tag.as_str()))
}

/// Keep relevant places; when none qualify keep the first
/// [`UNFILTERED_KEEP`] results instead.
pub fn filter_relevant(places: Vec<RawPlace>) -> Vec<RawPlace> {
    if places.iter().any(is_relevant) {
        places.into_iter().filter(is_relevant).collect()
    } else {
        places.into_iter().take(UNFILTERED_KEEP).collect()
    }
}
