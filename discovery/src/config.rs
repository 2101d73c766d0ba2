//! Discovery configuration loaded via OrthoConfig.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::api_key::ApiKey;
use crate::outbound::FixedLocationSource;

const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";
const DEFAULT_SDK_URL: &str = "https://maps.googleapis.com/maps/api/js";
const DEFAULT_SEARCH_RADIUS_METERS: u32 = 15_000;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 10;

fn default_user_sales_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("user_sales.json")
}

/// Configuration values controlling store discovery.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "THRIFTURES")]
pub struct DiscoverySettings {
    /// Google Maps credential; blanks and sample placeholders count as absent.
    pub google_maps_api_key: Option<String>,
    /// Places web-service base URL override.
    pub places_base_url: Option<String>,
    /// Maps bootstrap script URL override.
    pub sdk_url: Option<String>,
    /// Map-screen search radius override in metres.
    pub search_radius_meters: Option<u32>,
    /// Device latitude, when the host can supply one.
    pub latitude: Option<f64>,
    /// Device longitude, when the host can supply one.
    pub longitude: Option<f64>,
    /// Path to the JSON list of user-posted sales.
    pub user_sales_path: Option<PathBuf>,
    /// Per-request HTTP timeout override in seconds.
    pub request_timeout_seconds: Option<u64>,
}

impl DiscoverySettings {
    /// Resolved credential, if usable.
    pub fn api_key(&self) -> Option<ApiKey> {
        ApiKey::resolve(self.google_maps_api_key.as_deref())
    }

    /// Places base URL, normalised to end with a slash.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not a valid URL.
    pub fn places_base_url(&self) -> Result<Url, url::ParseError> {
        let raw = self
            .places_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PLACES_BASE_URL);
        if raw.ends_with('/') {
            Url::parse(raw)
        } else {
            Url::parse(&format!("{raw}/"))
        }
    }

    /// Bootstrap script URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not a valid URL.
    pub fn sdk_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.sdk_url.as_deref().unwrap_or(DEFAULT_SDK_URL))
    }

    /// Map-screen search radius in metres.
    pub fn search_radius_meters(&self) -> u32 {
        self.search_radius_meters
            .filter(|&radius| radius > 0)
            .unwrap_or(DEFAULT_SEARCH_RADIUS_METERS)
    }

    /// Location source for the configured coordinates.
    pub fn location_source(&self) -> FixedLocationSource {
        FixedLocationSource::from_parts(self.latitude, self.longitude)
    }

    /// User-posted sales file, falling back to the bundled fixture.
    pub fn user_sales_path(&self) -> PathBuf {
        self.user_sales_path
            .clone()
            .unwrap_or_else(default_user_sales_path)
    }

    /// Per-request HTTP timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_seconds
                .filter(|&seconds| seconds > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for discovery configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use crate::domain::geo::Coordinates;

    const VARS: [&str; 8] = [
        "THRIFTURES_GOOGLE_MAPS_API_KEY",
        "THRIFTURES_PLACES_BASE_URL",
        "THRIFTURES_SDK_URL",
        "THRIFTURES_SEARCH_RADIUS_METERS",
        "THRIFTURES_LATITUDE",
        "THRIFTURES_LONGITUDE",
        "THRIFTURES_USER_SALES_PATH",
        "THRIFTURES_REQUEST_TIMEOUT_SECONDS",
    ];

    fn load_from_empty_args() -> DiscoverySettings {
        DiscoverySettings::load_from_iter([OsString::from("thriftures")])
            .expect("config should load")
    }

    fn cleared_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|&name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| (*value).to_owned());
                (name, value)
            })
            .collect()
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(cleared_with(&[]));

        let settings = load_from_empty_args();
        assert!(settings.api_key().is_none());
        assert_eq!(
            settings.places_base_url().expect("default url").as_str(),
            DEFAULT_PLACES_BASE_URL
        );
        assert_eq!(
            settings.sdk_url().expect("default url").as_str(),
            DEFAULT_SDK_URL
        );
        assert_eq!(settings.search_radius_meters(), 15_000);
        assert_eq!(settings.location_source().position(), None);
        assert_eq!(settings.user_sales_path(), default_user_sales_path());
        assert_eq!(settings.request_timeout(), Duration::from_secs(10));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(cleared_with(&[
            ("THRIFTURES_GOOGLE_MAPS_API_KEY", "AIzaFromEnv"),
            ("THRIFTURES_PLACES_BASE_URL", "http://localhost:8089/place"),
            ("THRIFTURES_SEARCH_RADIUS_METERS", "8000"),
            ("THRIFTURES_LATITUDE", "47.61"),
            ("THRIFTURES_LONGITUDE", "-122.33"),
            ("THRIFTURES_USER_SALES_PATH", "/tmp/sales.json"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.api_key().map(|key| key.expose().to_owned()),
            Some("AIzaFromEnv".to_owned())
        );
        assert_eq!(
            settings.places_base_url().expect("override url").as_str(),
            "http://localhost:8089/place/"
        );
        assert_eq!(settings.search_radius_meters(), 8_000);
        assert_eq!(
            settings.location_source().position(),
            Some(Coordinates::new(47.61, -122.33))
        );
        assert_eq!(settings.user_sales_path(), PathBuf::from("/tmp/sales.json"));
    }

    #[rstest]
    #[case("your_google_maps_api_key_here")]
    #[case("your_actual_api_key_here")]
    #[case("   ")]
    fn placeholder_credentials_are_absent(#[case] raw: &str) {
        let _guard = lock_env(cleared_with(&[("THRIFTURES_GOOGLE_MAPS_API_KEY", raw)]));

        assert!(load_from_empty_args().api_key().is_none());
    }
}
