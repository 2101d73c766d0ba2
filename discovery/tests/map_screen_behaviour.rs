//! Behavioural tests for map and list discovery through the public API.
use std::sync::Arc;
use std::time::Duration;

use rstest::{fixture, rstest};
use thriftures::domain::normalizer::ThumbnailLinker;
use thriftures::domain::ports::{MountTarget, SearchError};
use thriftures::domain::{
    ApiKey, CategoryFilter, Coordinates, DiscoveryPorts, DiscoverySession, FallbackReason,
    ListDiscoveryConfig, MapScreen, MapScreenConfig, Provenance, SaleCategory, SampleCause,
    ScreenPhase, ScreenRuntime, ScreenSleeper, SessionSettings, UserNotice, discover_list,
};
use thriftures::outbound::InMemorySurfaceFactory;
use thriftures::test_support::{
    CountingSdkLoader, MutableClock, RecordingSleeper, ScriptedLocationSource,
    ScriptedPlacesProvider, reference_instant, sample_detail, sample_place,
};
use url::Url;

const MAP: &str = "map";

struct World {
    places: Arc<ScriptedPlacesProvider>,
    location: Arc<ScriptedLocationSource>,
    sleeper: Arc<RecordingSleeper>,
}

impl World {
    fn session(&self, key: Option<&str>) -> DiscoverySession {
        let api_key = ApiKey::resolve(key);
        let base = Url::parse("https://places.example.test/place/").expect("base url");
        DiscoverySession::new(
            DiscoveryPorts::new(
                Arc::new(CountingSdkLoader::succeeding()),
                self.places.clone(),
                self.location.clone(),
                Arc::new(InMemorySurfaceFactory::with_targets([MAP])),
            ),
            SessionSettings::new(
                api_key.clone(),
                ThumbnailLinker::new(&base, api_key).expect("linker"),
            ),
        )
    }

    fn runtime(&self) -> ScreenRuntime {
        ScreenRuntime {
            sleeper: Arc::clone(&self.sleeper) as Arc<dyn ScreenSleeper>,
            clock: Arc::new(MutableClock::new(reference_instant())),
        }
    }
}

fn world(places: ScriptedPlacesProvider, location: ScriptedLocationSource) -> World {
    World {
        places: Arc::new(places),
        location: Arc::new(location),
        sleeper: Arc::new(RecordingSleeper::default()),
    }
}

#[fixture]
fn mixed_neighbourhood() -> ScriptedPlacesProvider {
    let savers = sample_place("s1", "Savers Thrift Superstore", &["store"]);
    let closet = sample_place("c1", "Jane's Closet", &["clothing_store"]);
    let antiques = sample_place("a1", "Antique Alley", &["store"]);
    ScriptedPlacesProvider::with_searches(vec![Ok(vec![savers.clone(), closet, antiques])])
        .with_detail("s1", Ok(sample_detail(&savers)))
}

#[rstest]
#[tokio::test]
async fn a_located_user_sees_categorised_stores(mixed_neighbourhood: ScriptedPlacesProvider) {
    let here = Coordinates::new(37.78, -122.41);
    let world = world(
        mixed_neighbourhood,
        ScriptedLocationSource::new(vec![Ok(here)]),
    );
    let mut screen = MapScreen::new(
        world.session(Some("AIzaBehaviour")),
        MapScreenConfig::default(),
        world.runtime(),
        Vec::new(),
    );

    let phase = screen.load(MountTarget::new(MAP), None).await.clone();

    assert_eq!(phase, ScreenPhase::Ready);
    let categories: Vec<_> = screen
        .sales()
        .into_iter()
        .map(|sale| (sale.id, sale.category))
        .collect();
    assert_eq!(
        categories,
        [
            ("provider_s1".to_owned(), SaleCategory::ThriftStore),
            ("provider_c1".to_owned(), SaleCategory::ConsignmentShop),
            ("provider_a1".to_owned(), SaleCategory::Other),
        ]
    );
    assert!(
        world
            .places
            .search_requests()
            .iter()
            .all(|request| request.location == here),
        "searches centre on the located user"
    );
    let savers = screen.sales().into_iter().next().expect("savers listing");
    assert_eq!(savers.phone.as_deref(), Some("(415) 555-0199"));
    assert!(!savers.is_user_posted);
    assert!(savers.images.len() <= 3);
}

#[rstest]
#[tokio::test]
async fn filtering_limits_the_marker_layer(mixed_neighbourhood: ScriptedPlacesProvider) {
    let world = world(mixed_neighbourhood, ScriptedLocationSource::default());
    let mut screen = MapScreen::new(
        world.session(Some("AIzaBehaviour")),
        MapScreenConfig::default(),
        world.runtime(),
        Vec::new(),
    );
    screen.load(MountTarget::new(MAP), None).await;

    screen.set_filter(CategoryFilter::excluding([
        SaleCategory::ThriftStore,
        SaleCategory::Other,
    ]));

    let titles = screen
        .session()
        .with_surface(|surface| {
            surface
                .markers()
                .into_iter()
                .filter(|marker| marker.style.z_index == 50)
                .map(|marker| marker.title)
                .collect::<Vec<_>>()
        })
        .expect("surface exists");
    assert_eq!(titles, ["Jane's Closet"]);
}

#[tokio::test]
async fn an_unconfigured_app_still_lists_stores() {
    let world = world(
        ScriptedPlacesProvider::default(),
        ScriptedLocationSource::default(),
    );
    let mut screen = MapScreen::new(
        world.session(Some("your_google_maps_api_key_here")),
        MapScreenConfig::default(),
        world.runtime(),
        Vec::new(),
    );

    let phase = screen.load(MountTarget::new(MAP), None).await.clone();

    assert_eq!(phase, ScreenPhase::Degraded(UserNotice::MissingCredential));
    let titles: Vec<_> = screen.sales().into_iter().map(|sale| sale.title).collect();
    assert_eq!(
        titles,
        [
            "Goodwill Store",
            "Salvation Army Family Store",
            "Local Consignment Shop",
            "Vintage Finds",
            "Community Thrift Store",
            "Antique Mall",
        ]
    );
    assert_eq!(world.places.search_calls(), 0);
    assert_eq!(screen.placeholder_markers().len(), 6);
}

#[tokio::test]
async fn quota_exhaustion_is_explained_alongside_sample_stores() {
    let quota = || Err(SearchError::quota_exceeded("OVER_QUERY_LIMIT"));
    let world = world(
        ScriptedPlacesProvider::with_searches(vec![quota(), quota(), quota(), quota()]),
        ScriptedLocationSource::default(),
    );

    let found = discover_list(
        &world.session(Some("AIzaBehaviour")),
        &ListDiscoveryConfig::default(),
        &world.runtime(),
    )
    .await;

    assert_eq!(
        found.provenance,
        Some(Provenance::Fallback(FallbackReason::ProviderErrors))
    );
    assert_eq!(
        found.notice,
        Some(UserNotice::SampleStores {
            cause: SampleCause::QuotaExceeded
        })
    );
    assert_eq!(found.sales.len(), 5);
    assert!(world.sleeper.pauses().is_empty());
    assert_eq!(
        found
            .notice
            .map(|notice| notice.message())
            .as_deref(),
        Some(
            "Google Places API quota exceeded. \
             Showing sample nearby stores alongside user-posted sales."
        )
    );
}

#[tokio::test]
async fn list_discovery_asks_for_a_location_once() {
    let here = Coordinates::new(40.71, -74.0);
    let batch = (0..3)
        .map(|i| sample_place(&format!("v{i}"), &format!("Vintage {i}"), &["store"]))
        .collect();
    let world = world(
        ScriptedPlacesProvider::with_searches(vec![Ok(batch)]),
        ScriptedLocationSource::new(vec![Ok(here)]),
    );
    let session = world.session(Some("AIzaBehaviour"));

    discover_list(&session, &ListDiscoveryConfig::default(), &world.runtime()).await;
    discover_list(&session, &ListDiscoveryConfig::default(), &world.runtime()).await;

    assert_eq!(world.location.requests().len(), 1);
    assert_eq!(session.last_location(), Some(here));
    assert_eq!(
        world.sleeper.pauses(),
        vec![Duration::from_millis(300); 2]
    );
}
