//! Driven port for the places search and detail service.
//!
//! The domain owns both request shapes and the provider-native record shapes
//! so the discovery session and normaliser never see transport details.
//! Provider status codes are translated into [`SearchError`] and
//! [`DetailError`] by the adapter.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::geo::Coordinates;

/// Fields requested on every detail lookup.
pub const PLACE_DETAIL_FIELDS: [&str; 11] = [
    "place_id",
    "name",
    "formatted_address",
    "formatted_phone_number",
    "website",
    "opening_hours",
    "rating",
    "user_ratings_total",
    "photos",
    "geometry",
    "types",
];

/// One nearby-search query shape.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearchRequest {
    /// Search centre.
    pub location: Coordinates,
    /// Search radius in metres.
    pub radius_meters: u32,
    /// Provider place type tag (for example `clothing_store`).
    pub place_type: String,
    /// Optional free-text keyword.
    pub keyword: Option<String>,
}

/// Detail lookup for one place.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDetailsRequest {
    /// Provider place identifier.
    pub place_id: String,
    /// Requested field mask.
    pub fields: Vec<String>,
}

impl PlaceDetailsRequest {
    /// Build a request with the standard field mask.
    pub fn standard(place_id: impl Into<String>) -> Self {
        Self {
            place_id: place_id.into(),
            fields: PLACE_DETAIL_FIELDS.iter().map(|&f| f.to_owned()).collect(),
        }
    }
}

/// Photo handle returned by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacePhoto {
    /// Opaque photo reference.
    pub photo_reference: String,
    /// Original width in pixels.
    pub width: u32,
    /// Original height in pixels.
    pub height: u32,
}

/// Day-of-week and local time boundary of an opening period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodBoundary {
    /// Day of week, `0` = Sunday.
    pub day: u8,
    /// Local time formatted as `HHMM`.
    pub time: String,
}

/// One opening interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningPeriod {
    /// Opening boundary.
    pub open: PeriodBoundary,
    /// Closing boundary; absent for always-open places.
    pub close: Option<PeriodBoundary>,
}

/// Opening hours as reported by the provider.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OpeningHours {
    /// Provider-computed open flag at response time.
    pub open_now: Option<bool>,
    /// Human-readable weekly schedule, one entry per day.
    pub weekday_text: Vec<String>,
    /// Machine-readable weekly schedule.
    pub periods: Vec<OpeningPeriod>,
}

/// Nearby-search result.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPlace {
    /// Provider place identifier.
    pub place_id: String,
    /// Business name.
    pub name: String,
    /// Short neighbourhood address.
    pub vicinity: String,
    /// Place position.
    pub location: Coordinates,
    /// Average rating.
    pub rating: Option<f64>,
    /// Number of ratings.
    pub user_ratings_total: Option<u32>,
    /// Opening hours summary.
    pub opening_hours: Option<OpeningHours>,
    /// Photo handles.
    pub photos: Vec<PlacePhoto>,
    /// Provider type tags.
    pub types: Vec<String>,
}

/// Detail lookup result.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDetail {
    /// Provider place identifier.
    pub place_id: String,
    /// Business name.
    pub name: String,
    /// Full postal address.
    pub formatted_address: String,
    /// Local phone number.
    pub formatted_phone_number: Option<String>,
    /// Business website.
    pub website: Option<String>,
    /// Opening hours.
    pub opening_hours: Option<OpeningHours>,
    /// Minutes east of UTC for the place's local time.
    pub utc_offset_minutes: Option<i32>,
    /// Average rating.
    pub rating: Option<f64>,
    /// Number of ratings.
    pub user_ratings_total: Option<u32>,
    /// Photo handles.
    pub photos: Vec<PlacePhoto>,
    /// Place position.
    pub location: Coordinates,
    /// Provider type tags.
    pub types: Vec<String>,
}

define_port_error! {
    /// Errors surfaced by nearby search.
    pub enum SearchError {
        /// The provider quota is exhausted.
        QuotaExceeded { message: String } =>
            "places quota exceeded: {message}",
        /// The credential was rejected or lacks the Places permission.
        PermissionDenied { message: String } =>
            "places request denied: {message}",
        /// Any other failure, including transport errors.
        Unknown { message: String } =>
            "places search failed: {message}",
    }
}

define_port_error! {
    /// Errors surfaced by detail lookups.
    pub enum DetailError {
        /// The provider answered with a non-OK status.
        ProviderRejected { status: String } =>
            "place details request failed: {status}",
        /// The provider could not be reached.
        Unavailable { message: String } =>
            "place details unavailable: {message}",
    }
}

/// Port for the places search and detail service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Run one nearby-search query.
    ///
    /// `ZERO_RESULTS` is reported as `Ok(vec![])`, never as an error.
    async fn nearby_search(
        &self,
        request: &NearbySearchRequest,
    ) -> Result<Vec<RawPlace>, SearchError>;

    /// Look up details for one place.
    async fn place_details(
        &self,
        request: &PlaceDetailsRequest,
    ) -> Result<PlaceDetail, DetailError>;
}

/// Fixture implementation that finds nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixturePlacesProvider;

#[async_trait]
impl PlacesProvider for FixturePlacesProvider {
    async fn nearby_search(
        &self,
        _request: &NearbySearchRequest,
    ) -> Result<Vec<RawPlace>, SearchError> {
        Ok(Vec::new())
    }

    async fn place_details(
        &self,
        _request: &PlaceDetailsRequest,
    ) -> Result<PlaceDetail, DetailError> {
        Err(DetailError::provider_rejected("NOT_FOUND"))
    }
}
