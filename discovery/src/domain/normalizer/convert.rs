//! Conversion of provider records into [`Sale`] values.

use chrono::{DateTime, Days, Utc};
use url::Url;

use super::classify::classify;
use super::describe::describe;
use crate::domain::api_key::ApiKey;
use crate::domain::ports::{PlaceDetail, PlacePhoto, RawPlace};
use crate::domain::sale::{PROVIDER_ID_PREFIX, Sale};

/// Maximum number of images kept on a provider listing.
pub const PROVIDER_IMAGE_LIMIT: usize = 3;

/// Thumbnail bounds requested for provider photos.
pub const THUMBNAIL_MAX_WIDTH: u32 = 600;
/// Thumbnail bounds requested for provider photos.
pub const THUMBNAIL_MAX_HEIGHT: u32 = 400;

const LISTING_WINDOW_DAYS: u64 = 365;
const FALLBACK_LIKES_RATING: f64 = 4.0;
const FALLBACK_COMMENT_COUNT: u32 = 50;
const FALLBACK_RATING: f64 = 4.5;
const HOURS_NOT_AVAILABLE: &str = "Hours not available";

/// Builds thumbnail URLs for provider photo references.
#[derive(Debug, Clone)]
pub struct ThumbnailLinker {
    photo_endpoint: Url,
    api_key: Option<ApiKey>,
}

impl ThumbnailLinker {
    /// Link photos through `places_base_url`'s `photo` endpoint.
    ///
    /// Returns `None` when the base URL cannot carry a path.
    pub fn new(places_base_url: &Url, api_key: Option<ApiKey>) -> Option<Self> {
        let photo_endpoint = places_base_url.join("photo").ok()?;
        Some(Self {
            photo_endpoint,
            api_key,
        })
    }

    /// Thumbnail URL for one photo.
    pub fn thumbnail(&self, photo: &PlacePhoto) -> String {
        let mut url = self.photo_endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("maxwidth", &THUMBNAIL_MAX_WIDTH.to_string())
                .append_pair("maxheight", &THUMBNAIL_MAX_HEIGHT.to_string())
                .append_pair("photo_reference", &photo.photo_reference);
            if let Some(key) = &self.api_key {
                query.append_pair("key", key.expose());
            }
        }
        url.into()
    }
}

/// Normalise a provider record (and optional detail) into a [`Sale`].
///
/// The listing window runs from today for one year; `now` supplies both the
/// window and `posted_at` so conversion stays deterministic under test.
pub fn convert(
    place: &RawPlace,
    detail: Option<&PlaceDetail>,
    linker: &ThumbnailLinker,
    now: DateTime<Utc>,
) -> Sale {
    let start_date = now.date_naive();
    let end_date = start_date
        .checked_add_days(Days::new(LISTING_WINDOW_DAYS))
        .unwrap_or(start_date);

    let photos = if place.photos.is_empty() {
        detail.map_or(&[][..], |d| d.photos.as_slice())
    } else {
        place.photos.as_slice()
    };
    let images = photos
        .iter()
        .take(PROVIDER_IMAGE_LIMIT)
        .map(|photo| linker.thumbnail(photo))
        .collect();

    let store_hours = detail
        .and_then(|d| d.opening_hours.as_ref())
        .map(|hours| hours.weekday_text.join(", "))
        .filter(|joined| !joined.is_empty())
        .unwrap_or_else(|| HOURS_NOT_AVAILABLE.to_owned());

    let address = detail
        .map(|d| d.formatted_address.clone())
        .filter(|formatted| !formatted.trim().is_empty())
        .unwrap_or_else(|| place.vicinity.clone());

    Sale {
        id: format!("{PROVIDER_ID_PREFIX}{}", place.place_id),
        title: place.name.clone(),
        description: describe(place, detail, now),
        category: classify(&place.name, &place.types),
        latitude: place.location.latitude,
        longitude: place.location.longitude,
        address,
        start_date,
        end_date,
        images,
        posted_by: place.name.clone(),
        posted_at: now,
        likes: likes_from_rating(place.rating),
        comments: place
            .user_ratings_total
            .filter(|&count| count > 0)
            .unwrap_or(FALLBACK_COMMENT_COUNT),
        is_user_posted: false,
        store_hours: Some(store_hours),
        phone: detail.and_then(|d| d.formatted_phone_number.clone()),
        website: detail.and_then(|d| d.website.clone()),
        rating: Some(
            place
                .rating
                .filter(|&rating| rating > 0.0)
                .unwrap_or(FALLBACK_RATING),
        ),
        is_neighborhood_sale: None,
        neighborhood_sale_name: None,
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "rating is clamped to 0..=5 so the product fits in u32"
)]
fn likes_from_rating(rating: Option<f64>) -> u32 {
    let rating = rating
        .filter(|value| value.is_finite() && *value > 0.0)
        .unwrap_or(FALLBACK_LIKES_RATING)
        .clamp(0.0, 5.0);
    (rating * 20.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use rstest::{fixture, rstest};

    use crate::domain::category::SaleCategory;
    use crate::domain::geo::Coordinates;
    use crate::domain::ports::OpeningHours;

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 18, 30, 0)
            .single()
            .expect("valid time")
    }

    #[fixture]
    fn linker() -> ThumbnailLinker {
        let base = Url::parse("https://maps.example.test/place/").expect("valid base");
        ThumbnailLinker::new(&base, ApiKey::resolve(Some("test-key"))).expect("linker")
    }

    fn photo(reference: &str) -> PlacePhoto {
        PlacePhoto {
            photo_reference: reference.to_owned(),
            width: 1200,
            height: 800,
        }
    }

    fn raw_place() -> RawPlace {
        RawPlace {
            place_id: "ChIJ123".to_owned(),
            name: "Mission Thrift".to_owned(),
            vicinity: "2000 Mission St".to_owned(),
            location: Coordinates::new(37.7635, -122.4194),
            rating: Some(4.3),
            user_ratings_total: Some(212),
            opening_hours: None,
            photos: (0..5).map(|i| photo(&format!("ref{i}"))).collect(),
            types: vec!["store".to_owned()],
        }
    }

    fn place_detail() -> PlaceDetail {
        PlaceDetail {
            place_id: "ChIJ123".to_owned(),
            name: "Mission Thrift".to_owned(),
            formatted_address: "2000 Mission St, San Francisco, CA".to_owned(),
            formatted_phone_number: Some("(415) 555-0100".to_owned()),
            website: Some("https://missionthrift.example".to_owned()),
            opening_hours: Some(OpeningHours {
                open_now: Some(true),
                weekday_text: vec![
                    "Monday: 9:00 AM – 6:00 PM".to_owned(),
                    "Tuesday: 9:00 AM – 6:00 PM".to_owned(),
                ],
                periods: Vec::new(),
            }),
            utc_offset_minutes: None,
            rating: Some(4.3),
            user_ratings_total: Some(212),
            photos: Vec::new(),
            location: Coordinates::new(37.7635, -122.4194),
            types: vec!["store".to_owned()],
        }
    }

    #[rstest]
    fn basic_conversion_marks_provider_listing(now: DateTime<Utc>, linker: ThumbnailLinker) {
        let sale = convert(&raw_place(), None, &linker, now);

        assert_eq!(sale.id, "provider_ChIJ123");
        assert!(!sale.is_user_posted);
        assert_eq!(sale.category, SaleCategory::ThriftStore);
        assert_eq!(sale.images.len(), PROVIDER_IMAGE_LIMIT);
        assert_eq!(sale.address, "2000 Mission St");
        assert_eq!(sale.store_hours.as_deref(), Some("Hours not available"));
        assert_eq!(sale.posted_by, "Mission Thrift");
        assert_eq!(sale.likes, 86);
        assert_eq!(sale.comments, 212);
        assert_eq!(sale.rating, Some(4.3));
        assert!(sale.phone.is_none());
    }

    #[rstest]
    fn listing_window_spans_one_year(now: DateTime<Utc>, linker: ThumbnailLinker) {
        let sale = convert(&raw_place(), None, &linker, now);
        assert_eq!(
            sale.start_date,
            NaiveDate::from_ymd_opt(2026, 3, 4).expect("date")
        );
        assert_eq!(
            sale.end_date,
            NaiveDate::from_ymd_opt(2027, 3, 4).expect("date")
        );
        assert_eq!(sale.posted_at, now);
    }

    #[rstest]
    fn detail_supplies_store_fields(now: DateTime<Utc>, linker: ThumbnailLinker) {
        let detail = place_detail();
        let sale = convert(&raw_place(), Some(&detail), &linker, now);

        assert_eq!(sale.address, "2000 Mission St, San Francisco, CA");
        assert_eq!(
            sale.store_hours.as_deref(),
            Some("Monday: 9:00 AM – 6:00 PM, Tuesday: 9:00 AM – 6:00 PM")
        );
        assert_eq!(sale.phone.as_deref(), Some("(415) 555-0100"));
        assert_eq!(sale.website.as_deref(), Some("https://missionthrift.example"));
        assert!(sale.description.contains("Currently open"));
    }

    #[rstest]
    fn missing_rating_and_reviews_use_defaults(now: DateTime<Utc>, linker: ThumbnailLinker) {
        let place = RawPlace {
            rating: None,
            user_ratings_total: None,
            photos: Vec::new(),
            ..raw_place()
        };
        let sale = convert(&place, None, &linker, now);

        assert_eq!(sale.likes, 80);
        assert_eq!(sale.comments, 50);
        assert_eq!(sale.rating, Some(4.5));
        assert!(sale.images.is_empty());
    }

    #[rstest]
    fn detail_photos_are_used_when_search_had_none(now: DateTime<Utc>, linker: ThumbnailLinker) {
        let place = RawPlace {
            photos: Vec::new(),
            ..raw_place()
        };
        let detail = PlaceDetail {
            photos: vec![photo("detail-ref")],
            ..place_detail()
        };
        let sale = convert(&place, Some(&detail), &linker, now);
        assert_eq!(sale.images.len(), 1);
        assert!(sale.images[0].contains("photo_reference=detail-ref"));
    }

    #[rstest]
    fn thumbnails_request_fixed_bounds(linker: ThumbnailLinker) {
        let url = linker.thumbnail(&photo("abc"));
        assert_eq!(
            url,
            "https://maps.example.test/place/photo?maxwidth=600&maxheight=400&photo_reference=abc&key=test-key"
        );
    }

    #[rstest]
    #[case(Some(5.0), 100)]
    #[case(Some(4.26), 85)]
    #[case(Some(0.0), 80)]
    #[case(None, 80)]
    fn likes_scale_with_rating(#[case] rating: Option<f64>, #[case] expected: u32) {
        assert_eq!(likes_from_rating(rating), expected);
    }
}
