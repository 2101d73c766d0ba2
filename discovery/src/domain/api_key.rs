//! Provider credential handling.

use std::fmt;

use zeroize::Zeroizing;

/// Values shipped in sample `.env` files that must never reach the provider.
const PLACEHOLDER_KEYS: [&str; 2] = ["your_google_maps_api_key_here", "your_actual_api_key_here"];

/// Places provider API key.
///
/// ## Invariants
/// - Never blank and never one of the known sample placeholders.
/// - `Debug` output is redacted; the secret is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(Zeroizing<String>);

impl ApiKey {
    /// Resolve a configured credential, treating blanks and placeholders as
    /// absent.
    ///
    /// # Examples
    /// ```
    /// use thriftures::domain::ApiKey;
    ///
    /// assert!(ApiKey::resolve(Some("AIzaSyExample")).is_some());
    /// assert!(ApiKey::resolve(Some("  ")).is_none());
    /// assert!(ApiKey::resolve(Some("your_google_maps_api_key_here")).is_none());
    /// assert!(ApiKey::resolve(None).is_none());
    /// ```
    pub fn resolve(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() || PLACEHOLDER_KEYS.contains(&trimmed) {
            return None;
        }
        Some(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Expose the secret for request construction.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}
