//! Static store catalogue used when the provider cannot supply results.
//!
//! Search results are positioned around the current centre so the map always
//! shows something nearby; detail records keep fixed coordinates.

use crate::domain::geo::Coordinates;
use crate::domain::ports::{OpeningHours, PlaceDetail, RawPlace};

/// Prefix marking place ids served from the static catalogue.
pub const FALLBACK_ID_PREFIX: &str = "fallback_";

const NEAR_YOU: &str = "Near your location";

struct FallbackStore {
    place_id: &'static str,
    name: &'static str,
    offset: (f64, f64),
    rating: f64,
    reviews: u32,
    types: [&'static str; 2],
    phone: &'static str,
    website: Option<&'static str>,
    weekday_hours: &'static str,
    sunday_hours: &'static str,
    detail_location: Coordinates,
}

static STORES: [FallbackStore; 6] = [
    FallbackStore {
        place_id: "fallback_goodwill_1",
        name: "Goodwill Store",
        offset: (0.02, 0.02),
        rating: 4.2,
        reviews: 156,
        types: ["store", "clothing_store"],
        phone: "(555) 123-4567",
        website: Some("https://goodwill.org"),
        weekday_hours: "9:00 AM – 8:00 PM",
        sunday_hours: "10:00 AM – 6:00 PM",
        detail_location: Coordinates::new(37.7849, -122.4094),
    },
    FallbackStore {
        place_id: "fallback_salvation_army_1",
        name: "Salvation Army Family Store",
        offset: (-0.02, 0.02),
        rating: 4.0,
        reviews: 89,
        types: ["store", "home_goods_store"],
        phone: "(555) 234-5678",
        website: Some("https://salvationarmyusa.org"),
        weekday_hours: "9:00 AM – 7:00 PM",
        sunday_hours: "10:00 AM – 6:00 PM",
        detail_location: Coordinates::new(37.7649, -122.4194),
    },
    FallbackStore {
        place_id: "fallback_consignment_1",
        name: "Local Consignment Shop",
        offset: (0.02, -0.02),
        rating: 4.5,
        reviews: 234,
        types: ["clothing_store", "store"],
        phone: "(555) 345-6789",
        website: None,
        weekday_hours: "11:00 AM – 8:00 PM",
        sunday_hours: "11:00 AM – 8:00 PM",
        detail_location: Coordinates::new(37.7949, -122.3994),
    },
    FallbackStore {
        place_id: "fallback_vintage_1",
        name: "Vintage Finds",
        offset: (-0.02, -0.02),
        rating: 4.3,
        reviews: 67,
        types: ["clothing_store", "store"],
        phone: "(555) 456-7890",
        website: None,
        weekday_hours: "10:00 AM – 7:00 PM",
        sunday_hours: "12:00 PM – 6:00 PM",
        detail_location: Coordinates::new(37.7549, -122.4294),
    },
    FallbackStore {
        place_id: "fallback_thrift_2",
        name: "Community Thrift Store",
        offset: (0.03, 0.0),
        rating: 4.1,
        reviews: 123,
        types: ["store", "clothing_store"],
        phone: "(555) 567-8901",
        website: None,
        weekday_hours: "9:00 AM – 6:00 PM",
        sunday_hours: "11:00 AM – 5:00 PM",
        detail_location: Coordinates::new(37.7849, -122.4194),
    },
    FallbackStore {
        place_id: "fallback_antique_1",
        name: "Antique Mall",
        offset: (0.0, 0.03),
        rating: 4.4,
        reviews: 78,
        types: ["store", "furniture_store"],
        phone: "(555) 678-9012",
        website: None,
        weekday_hours: "10:00 AM – 6:00 PM",
        sunday_hours: "12:00 PM – 5:00 PM",
        detail_location: Coordinates::new(37.7749, -122.3894),
    },
];

impl FallbackStore {
    fn types(&self) -> Vec<String> {
        self.types.iter().map(|&tag| tag.to_owned()).collect()
    }

    fn place(&self, centre: Coordinates) -> RawPlace {
        let (delta_latitude, delta_longitude) = self.offset;
        RawPlace {
            place_id: self.place_id.to_owned(),
            name: self.name.to_owned(),
            vicinity: NEAR_YOU.to_owned(),
            location: centre.offset(delta_latitude, delta_longitude),
            rating: Some(self.rating),
            user_ratings_total: Some(self.reviews),
            opening_hours: None,
            photos: Vec::new(),
            types: self.types(),
        }
    }

    fn detail(&self) -> PlaceDetail {
        let mut weekday_text: Vec<String> = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
            .iter()
            .map(|day| format!("{day}: {}", self.weekday_hours))
            .collect();
        weekday_text.push(format!("Sun: {}", self.sunday_hours));

        PlaceDetail {
            place_id: self.place_id.to_owned(),
            name: self.name.to_owned(),
            formatted_address: NEAR_YOU.to_owned(),
            formatted_phone_number: Some(self.phone.to_owned()),
            website: self.website.map(str::to_owned),
            opening_hours: Some(OpeningHours {
                open_now: Some(true),
                weekday_text,
                periods: Vec::new(),
            }),
            utc_offset_minutes: None,
            rating: Some(self.rating),
            user_ratings_total: Some(self.reviews),
            photos: Vec::new(),
            location: self.detail_location,
            types: self.types(),
        }
    }
}

/// Whether `place_id` belongs to the static catalogue.
pub fn is_fallback_id(place_id: &str) -> bool {
    place_id.starts_with(FALLBACK_ID_PREFIX)
}

/// The six catalogue stores positioned around `centre`.
pub fn fallback_places(centre: Coordinates) -> Vec<RawPlace> {
    STORES.iter().map(|store| store.place(centre)).collect()
}

/// Static detail record for a catalogue id.
///
/// Unknown catalogue ids resolve to the first store so a stale id still
/// renders a complete record.
pub fn fallback_detail(place_id: &str) -> PlaceDetail {
    STORES
        .iter()
        .find(|store| store.place_id == place_id)
        .unwrap_or(&STORES[0])
        .detail()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::domain::geo::DEFAULT_CENTER;

    #[test]
    fn catalogue_lists_six_stores_in_order() {
        let ids: Vec<_> = fallback_places(DEFAULT_CENTER)
            .into_iter()
            .map(|place| place.place_id)
            .collect();
        assert_eq!(
            ids,
            [
                "fallback_goodwill_1",
                "fallback_salvation_army_1",
                "fallback_consignment_1",
                "fallback_vintage_1",
                "fallback_thrift_2",
                "fallback_antique_1",
            ]
        );
    }

    #[test]
    fn places_follow_the_centre() {
        let centre = Coordinates::new(40.0, -74.0);
        let places = fallback_places(centre);
        let goodwill = places.first().expect("goodwill present");
        assert!((goodwill.location.latitude - 40.02).abs() < 1e-9);
        assert!((goodwill.location.longitude - -73.98).abs() < 1e-9);
        let antique = places.last().expect("antique present");
        assert!((antique.location.latitude - 40.0).abs() < 1e-9);
        assert!((antique.location.longitude - -73.97).abs() < 1e-9);
    }

    #[test]
    fn vintage_detail_is_static() {
        let detail = fallback_detail("fallback_vintage_1");
        assert_eq!(detail.name, "Vintage Finds");
        assert_eq!(detail.rating, Some(4.3));
        assert_eq!(detail.user_ratings_total, Some(67));
        assert_eq!(detail.formatted_phone_number.as_deref(), Some("(555) 456-7890"));
        assert!(detail.website.is_none());
        let hours = detail.opening_hours.expect("hours present");
        assert_eq!(hours.weekday_text.len(), 7);
        assert_eq!(
            hours.weekday_text.last().map(String::as_str),
            Some("Sun: 12:00 PM – 6:00 PM")
        );
    }

    #[rstest]
    #[case("fallback_unknown_9")]
    #[case("fallback_")]
    fn unknown_ids_resolve_to_goodwill(#[case] place_id: &str) {
        let detail = fallback_detail(place_id);
        assert_eq!(detail.place_id, "fallback_goodwill_1");
        assert_eq!(detail.website.as_deref(), Some("https://goodwill.org"));
    }

    #[rstest]
    #[case("fallback_thrift_2", true)]
    #[case("ChIJN1t_tDeuEmsRUsoyG83frY4", false)]
    fn fallback_ids_are_recognised_by_prefix(#[case] place_id: &str, #[case] expected: bool) {
        assert_eq!(is_fallback_id(place_id), expected);
    }
}
