//! Reqwest-backed Google Places adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping, provider status translation, and JSON decoding into
//! domain records. Provider statuses never travel past this file.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::{DetailsResponseDto, NearbyResponseDto};
use crate::domain::api_key::ApiKey;
use crate::domain::ports::{
    DetailError, NearbySearchRequest, PlaceDetail, PlaceDetailsRequest, PlacesProvider, RawPlace,
    SearchError,
};

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";
const STATUS_OVER_QUERY_LIMIT: &str = "OVER_QUERY_LIMIT";
const STATUS_REQUEST_DENIED: &str = "REQUEST_DENIED";

/// Places provider that calls the Google Places web service.
pub struct GooglePlacesHttpProvider {
    client: Client,
    base_url: Url,
    api_key: ApiKey,
}

impl GooglePlacesHttpProvider {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// `base_url` must end with a slash so endpoint paths join beneath it.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, api_key: ApiKey, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn nearby_url(&self, request: &NearbySearchRequest) -> Result<Url, url::ParseError> {
        let mut url = self.base_url.join("nearbysearch/json")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair(
                    "location",
                    &format!(
                        "{},{}",
                        request.location.latitude, request.location.longitude
                    ),
                )
                .append_pair("radius", &request.radius_meters.to_string())
                .append_pair("type", &request.place_type);
            if let Some(keyword) = &request.keyword {
                query.append_pair("keyword", keyword);
            }
            query.append_pair("key", self.api_key.expose());
        }
        Ok(url)
    }

    fn details_url(&self, request: &PlaceDetailsRequest) -> Result<Url, url::ParseError> {
        let mut url = self.base_url.join("details/json")?;
        url.query_pairs_mut()
            .append_pair("place_id", &request.place_id)
            .append_pair("fields", &request.fields.join(","))
            .append_pair("key", self.api_key.expose());
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<(StatusCode, Vec<u8>), reqwest::Error> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok((status, body.to_vec()))
    }
}

#[async_trait]
impl PlacesProvider for GooglePlacesHttpProvider {
    async fn nearby_search(
        &self,
        request: &NearbySearchRequest,
    ) -> Result<Vec<RawPlace>, SearchError> {
        let url = self
            .nearby_url(request)
            .map_err(|error| SearchError::unknown(format!("invalid places URL: {error}")))?;
        let (status, body) = self.get(url).await.map_err(map_search_transport_error)?;
        if !status.is_success() {
            return Err(map_search_http_status(status, &body));
        }
        let places = parse_nearby(&body)?;
        debug!(
            place_type = request.place_type.as_str(),
            count = places.len(),
            "nearby search answered"
        );
        Ok(places)
    }

    async fn place_details(
        &self,
        request: &PlaceDetailsRequest,
    ) -> Result<PlaceDetail, DetailError> {
        let url = self
            .details_url(request)
            .map_err(|error| DetailError::unavailable(format!("invalid places URL: {error}")))?;
        let (status, body) = self.get(url).await.map_err(|error| {
            DetailError::unavailable(describe_transport_error(&error))
        })?;
        if !status.is_success() {
            return Err(DetailError::unavailable(status_message(status, &body)));
        }
        parse_details(&body)
    }
}

fn parse_nearby(body: &[u8]) -> Result<Vec<RawPlace>, SearchError> {
    let decoded: NearbyResponseDto = serde_json::from_slice(body).map_err(|error| {
        SearchError::unknown(format!("invalid places JSON payload: {error}"))
    })?;
    match decoded.status.as_str() {
        STATUS_OK => Ok(decoded.into_domain_places()),
        STATUS_ZERO_RESULTS => Ok(Vec::new()),
        _ => Err(map_search_status(
            &decoded.status,
            decoded.error_message.as_deref(),
        )),
    }
}

fn parse_details(body: &[u8]) -> Result<PlaceDetail, DetailError> {
    let decoded: DetailsResponseDto = serde_json::from_slice(body).map_err(|error| {
        DetailError::unavailable(format!("invalid place details JSON payload: {error}"))
    })?;
    if decoded.status != STATUS_OK {
        debug!(
            status = decoded.status.as_str(),
            error_message = decoded.error_message.as_deref().unwrap_or_default(),
            "place details rejected"
        );
        return Err(DetailError::provider_rejected(decoded.status));
    }
    decoded
        .result
        .map(|detail| detail.into_domain())
        .ok_or_else(|| DetailError::unavailable("place details response missing result"))
}

fn map_search_status(status: &str, error_message: Option<&str>) -> SearchError {
    let message = match error_message {
        Some(detail) if !detail.is_empty() => format!("{status}: {detail}"),
        _ => status.to_owned(),
    };
    match status {
        STATUS_OVER_QUERY_LIMIT => SearchError::quota_exceeded(message),
        STATUS_REQUEST_DENIED => SearchError::permission_denied(message),
        _ => SearchError::unknown(message),
    }
}

fn map_search_http_status(status: StatusCode, body: &[u8]) -> SearchError {
    let message = status_message(status, body);
    match status {
        StatusCode::TOO_MANY_REQUESTS => SearchError::quota_exceeded(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SearchError::permission_denied(message),
        _ => SearchError::unknown(message),
    }
}

fn map_search_transport_error(error: reqwest::Error) -> SearchError {
    SearchError::unknown(describe_transport_error(&error))
}

fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {error}")
    } else {
        error.to_string()
    }
}

fn status_message(status: StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network Places mapping helpers.

    use super::*;
    use crate::domain::geo::Coordinates;
    use rstest::rstest;

    fn provider() -> GooglePlacesHttpProvider {
        GooglePlacesHttpProvider::new(
            Url::parse("https://maps.example.test/maps/api/place/").expect("base url"),
            ApiKey::resolve(Some("AIzaUnit")).expect("usable key"),
            Duration::from_secs(5),
        )
        .expect("client builds")
    }

    #[test]
    fn nearby_url_carries_every_query_field() {
        let url = provider()
            .nearby_url(&NearbySearchRequest {
                location: Coordinates::new(37.7749, -122.4194),
                radius_meters: 15_000,
                place_type: "store".to_owned(),
                keyword: Some("thrift vintage".to_owned()),
            })
            .expect("url builds");

        assert_eq!(url.path(), "/maps/api/place/nearbysearch/json");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            [
                ("location".to_owned(), "37.7749,-122.4194".to_owned()),
                ("radius".to_owned(), "15000".to_owned()),
                ("type".to_owned(), "store".to_owned()),
                ("keyword".to_owned(), "thrift vintage".to_owned()),
                ("key".to_owned(), "AIzaUnit".to_owned()),
            ]
        );
    }

    #[test]
    fn details_url_joins_the_field_mask() {
        let url = provider()
            .details_url(&PlaceDetailsRequest::standard("ChIJ123"))
            .expect("url builds");

        assert_eq!(url.path(), "/maps/api/place/details/json");
        let fields = url
            .query_pairs()
            .find(|(name, _)| name == "fields")
            .map(|(_, value)| value.into_owned());
        assert_eq!(
            fields.as_deref(),
            Some(
                "place_id,name,formatted_address,formatted_phone_number,website,\
                 opening_hours,rating,user_ratings_total,photos,geometry,types"
            )
        );
    }

    #[test]
    fn decodes_nearby_results() {
        let body = r#"{
            "status": "OK",
            "results": [
                {
                    "place_id": "ChIJgoodwill",
                    "name": "Goodwill",
                    "vicinity": "1580 Mission St",
                    "geometry": { "location": { "lat": 37.771, "lng": -122.417 } },
                    "rating": 4.1,
                    "user_ratings_total": 812,
                    "opening_hours": { "open_now": true },
                    "photos": [ { "photo_reference": "ref-1", "width": 800, "height": 600 } ],
                    "types": ["store", "point_of_interest"]
                }
            ]
        }"#;

        let places = parse_nearby(body.as_bytes()).expect("JSON should decode");

        let place = places.first().expect("one place");
        assert_eq!(place.place_id, "ChIJgoodwill");
        assert_eq!(place.location, Coordinates::new(37.771, -122.417));
        assert_eq!(
            place.opening_hours.as_ref().and_then(|hours| hours.open_now),
            Some(true)
        );
        assert_eq!(
            place.photos.first().map(|photo| photo.photo_reference.as_str()),
            Some("ref-1")
        );
    }

    #[rstest]
    #[case::zero_results(r#"{"status":"ZERO_RESULTS","results":[]}"#, None)]
    #[case::quota(r#"{"status":"OVER_QUERY_LIMIT"}"#, Some("quota_exceeded"))]
    #[case::denied(
        r#"{"status":"REQUEST_DENIED","error_message":"The provided API key is invalid."}"#,
        Some("permission_denied")
    )]
    #[case::invalid(r#"{"status":"INVALID_REQUEST"}"#, Some("unknown"))]
    #[case::garbage("<html>oops</html>", Some("unknown"))]
    fn maps_provider_statuses(#[case] body: &str, #[case] expected: Option<&str>) {
        match (parse_nearby(body.as_bytes()), expected) {
            (Ok(places), None) => assert!(places.is_empty()),
            (Err(error), Some(code)) => assert_eq!(error.code(), code),
            (other, _) => panic!("unexpected outcome {other:?} for {body}"),
        }
    }

    #[test]
    fn denial_messages_keep_the_provider_explanation() {
        let error = map_search_status("REQUEST_DENIED", Some("API key expired"));
        assert_eq!(
            error,
            SearchError::permission_denied("REQUEST_DENIED: API key expired")
        );
    }

    #[rstest]
    #[case(StatusCode::TOO_MANY_REQUESTS, "quota_exceeded")]
    #[case(StatusCode::FORBIDDEN, "permission_denied")]
    #[case(StatusCode::BAD_GATEWAY, "unknown")]
    fn maps_http_statuses(#[case] status: StatusCode, #[case] expected: &str) {
        assert_eq!(map_search_http_status(status, b"").code(), expected);
    }

    #[test]
    fn decodes_details_with_periods() {
        let body = r#"{
            "status": "OK",
            "result": {
                "place_id": "ChIJvintage",
                "name": "Vintage Finds",
                "formatted_address": "12 Valencia St, San Francisco",
                "formatted_phone_number": "(415) 555-0101",
                "website": "https://vintage.example",
                "utc_offset": -420,
                "opening_hours": {
                    "open_now": false,
                    "weekday_text": ["Monday: 10:00 AM – 6:00 PM"],
                    "periods": [
                        { "open": { "day": 1, "time": "1000" }, "close": { "day": 1, "time": "1800" } }
                    ]
                },
                "geometry": { "location": { "lat": 37.76, "lng": -122.42 } },
                "types": ["clothing_store"]
            }
        }"#;

        let detail = parse_details(body.as_bytes()).expect("JSON should decode");

        assert_eq!(detail.utc_offset_minutes, Some(-420));
        let hours = detail.opening_hours.expect("hours");
        let period = hours.periods.first().expect("one period");
        assert_eq!((period.open.day, period.open.time.as_str()), (1, "1000"));
        assert!(detail.photos.is_empty());
    }

    #[test]
    fn rejected_details_carry_the_status() {
        let error = parse_details(br#"{"status":"NOT_FOUND"}"#).expect_err("rejected");
        assert_eq!(error, DetailError::provider_rejected("NOT_FOUND"));
    }

    #[test]
    fn previews_are_compacted_and_truncated() {
        let long = "word ".repeat(100);
        let preview = body_preview(long.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
        assert_eq!(status_message(StatusCode::BAD_GATEWAY, b"  "), "status 502");
    }
}
