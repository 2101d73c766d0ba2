//! DTOs for decoding Google Places web-service JSON.
//!
//! Responses decode into these transport shapes first, then map into the
//! domain records (`RawPlace`, `PlaceDetail`) in one pass.

use serde::Deserialize;

use crate::domain::geo::Coordinates;
use crate::domain::ports::{
    OpeningHours, OpeningPeriod, PeriodBoundary, PlaceDetail, PlacePhoto, RawPlace,
};

#[derive(Debug, Deserialize)]
pub(super) struct NearbyResponseDto {
    pub(super) status: String,
    #[serde(default)]
    pub(super) results: Vec<PlaceDto>,
    #[serde(default)]
    pub(super) error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DetailsResponseDto {
    pub(super) status: String,
    #[serde(default)]
    pub(super) result: Option<DetailDto>,
    #[serde(default)]
    pub(super) error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PlaceDto {
    place_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    vicinity: String,
    geometry: GeometryDto,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
    opening_hours: Option<OpeningHoursDto>,
    #[serde(default)]
    photos: Vec<PhotoDto>,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DetailDto {
    place_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    formatted_address: String,
    formatted_phone_number: Option<String>,
    website: Option<String>,
    opening_hours: Option<OpeningHoursDto>,
    utc_offset: Option<i32>,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
    #[serde(default)]
    photos: Vec<PhotoDto>,
    geometry: GeometryDto,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GeometryDto {
    location: LatLngDto,
}

#[derive(Debug, Deserialize)]
struct LatLngDto {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct PhotoDto {
    photo_reference: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
}

#[derive(Debug, Deserialize)]
struct OpeningHoursDto {
    open_now: Option<bool>,
    #[serde(default)]
    weekday_text: Vec<String>,
    #[serde(default)]
    periods: Vec<PeriodDto>,
}

#[derive(Debug, Deserialize)]
struct PeriodDto {
    open: BoundaryDto,
    close: Option<BoundaryDto>,
}

#[derive(Debug, Deserialize)]
struct BoundaryDto {
    day: u8,
    time: String,
}

impl NearbyResponseDto {
    pub(super) fn into_domain_places(self) -> Vec<RawPlace> {
        self.results.into_iter().map(PlaceDto::into_domain).collect()
    }
}

impl PlaceDto {
    fn into_domain(self) -> RawPlace {
        RawPlace {
            place_id: self.place_id,
            name: self.name,
            vicinity: self.vicinity,
            location: self.geometry.location.into(),
            rating: self.rating,
            user_ratings_total: self.user_ratings_total,
            opening_hours: self.opening_hours.map(Into::into),
            photos: self.photos.into_iter().map(Into::into).collect(),
            types: self.types,
        }
    }
}

impl DetailDto {
    pub(super) fn into_domain(self) -> PlaceDetail {
        PlaceDetail {
            place_id: self.place_id,
            name: self.name,
            formatted_address: self.formatted_address,
            formatted_phone_number: self.formatted_phone_number,
            website: self.website,
            opening_hours: self.opening_hours.map(Into::into),
            utc_offset_minutes: self.utc_offset,
            rating: self.rating,
            user_ratings_total: self.user_ratings_total,
            photos: self.photos.into_iter().map(Into::into).collect(),
            location: self.geometry.location.into(),
            types: self.types,
        }
    }
}

impl From<LatLngDto> for Coordinates {
    fn from(value: LatLngDto) -> Self {
        Coordinates::new(value.lat, value.lng)
    }
}

impl From<PhotoDto> for PlacePhoto {
    fn from(value: PhotoDto) -> Self {
        PlacePhoto {
            photo_reference: value.photo_reference,
            width: value.width,
            height: value.height,
        }
    }
}

impl From<OpeningHoursDto> for OpeningHours {
    fn from(value: OpeningHoursDto) -> Self {
        OpeningHours {
            open_now: value.open_now,
            weekday_text: value.weekday_text,
            periods: value
                .periods
                .into_iter()
                .map(|period| OpeningPeriod {
                    open: period.open.into(),
                    close: period.close.map(Into::into),
                })
                .collect(),
        }
    }
}

impl From<BoundaryDto> for PeriodBoundary {
    fn from(value: BoundaryDto) -> Self {
        PeriodBoundary {
            day: value.day,
            time: value.time,
        }
    }
}
