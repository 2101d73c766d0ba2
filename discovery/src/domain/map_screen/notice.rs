//! User-visible notices for degraded or failed discovery.

use std::fmt;

use crate::domain::discovery_session::FallbackReason;
use crate::domain::ports::SearchError;

const USER_POSTS_ONLY: &str = "Showing user-posted sales only.";
const SAMPLE_STORES: &str = "Showing sample nearby stores alongside user-posted sales.";

/// Banner copy shown next to the map or list.
///
/// Search notices say what is still on screen: user posts alone after a
/// failed search, or the sample catalogue when discovery fell back to it.
/// Provider status text never reaches this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNotice {
    /// No usable credential; the static catalogue is shown.
    MissingCredential,
    /// The provider quota is exhausted and no stores are shown.
    QuotaExceeded,
    /// The credential was rejected and no stores are shown.
    AccessDenied,
    /// Any other search failure; no stores are shown.
    StoresUnavailable,
    /// Live results were unavailable; the sample catalogue is shown.
    SampleStores {
        /// Why live results were unavailable.
        cause: SampleCause,
    },
    /// The mount target never appeared.
    SurfaceUnavailable,
    /// Provider resources failed to load.
    MapUnavailable {
        /// Failure description from the loader.
        detail: String,
    },
}

/// Reason the sample catalogue replaced live results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleCause {
    /// At least one strategy hit the quota.
    QuotaExceeded,
    /// At least one strategy was denied.
    AccessDenied,
    /// Nothing usable came back.
    Unavailable,
}

impl UserNotice {
    /// Notice for a failed search, after which only user posts are shown.
    pub fn for_search_error(error: &SearchError) -> Self {
        match error {
            SearchError::QuotaExceeded { .. } => Self::QuotaExceeded,
            SearchError::PermissionDenied { .. } => Self::AccessDenied,
            SearchError::Unknown { .. } => Self::StoresUnavailable,
        }
    }

    /// Notice for a fallback result.
    ///
    /// Quota errors take precedence over denials, which take precedence over
    /// anything else.
    pub fn for_fallback(reason: FallbackReason, errors: &[SearchError]) -> Self {
        let cause = match reason {
            FallbackReason::MissingCredential => return Self::MissingCredential,
            FallbackReason::NoResults => SampleCause::Unavailable,
            FallbackReason::ProviderErrors => errors
                .iter()
                .map(SampleCause::for_error)
                .min_by_key(|cause| cause.precedence())
                .unwrap_or(SampleCause::Unavailable),
        };
        Self::SampleStores { cause }
    }

    /// Copy shown to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl SampleCause {
    fn for_error(error: &SearchError) -> Self {
        match error {
            SearchError::QuotaExceeded { .. } => Self::QuotaExceeded,
            SearchError::PermissionDenied { .. } => Self::AccessDenied,
            SearchError::Unknown { .. } => Self::Unavailable,
        }
    }

    fn precedence(self) -> u8 {
        match self {
            Self::QuotaExceeded => 0,
            Self::AccessDenied => 1,
            Self::Unavailable => 2,
        }
    }

    fn lead(self) -> &'static str {
        match self {
            Self::QuotaExceeded => "Google Places API quota exceeded.",
            Self::AccessDenied => {
                "Google Places API access denied. Please check API key permissions."
            }
            Self::Unavailable => "Unable to load live store data.",
        }
    }
}

impl fmt::Display for UserNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential => {
                f.write_str("Google Maps API key not configured. Showing all available sales.")
            }
            Self::QuotaExceeded => {
                write!(f, "{} {USER_POSTS_ONLY}", SampleCause::QuotaExceeded.lead())
            }
            Self::AccessDenied => {
                write!(f, "{} {USER_POSTS_ONLY}", SampleCause::AccessDenied.lead())
            }
            Self::StoresUnavailable => {
                write!(f, "Unable to load nearby stores. {USER_POSTS_ONLY}")
            }
            Self::SampleStores { cause } => write!(f, "{} {SAMPLE_STORES}", cause.lead()),
            Self::SurfaceUnavailable => {
                f.write_str("Unable to initialize map container. Using fallback mode.")
            }
            Self::MapUnavailable { detail } => f.write_str(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(SearchError::quota_exceeded("OVER_QUERY_LIMIT"), UserNotice::QuotaExceeded)]
    #[case(SearchError::permission_denied("REQUEST_DENIED"), UserNotice::AccessDenied)]
    #[case(SearchError::unknown("INVALID_REQUEST"), UserNotice::StoresUnavailable)]
    fn search_errors_map_to_notices(#[case] error: SearchError, #[case] expected: UserNotice) {
        assert_eq!(UserNotice::for_search_error(&error), expected);
    }

    #[test]
    fn quota_outranks_denial_in_fallback() {
        let errors = [
            SearchError::permission_denied("REQUEST_DENIED"),
            SearchError::unknown("timeout"),
            SearchError::quota_exceeded("OVER_QUERY_LIMIT"),
        ];
        assert_eq!(
            UserNotice::for_fallback(FallbackReason::ProviderErrors, &errors),
            UserNotice::SampleStores {
                cause: SampleCause::QuotaExceeded
            }
        );
    }

    #[test]
    fn denial_outranks_unknown_errors_in_fallback() {
        let errors = [
            SearchError::unknown("timeout"),
            SearchError::permission_denied("REQUEST_DENIED"),
        ];
        assert_eq!(
            UserNotice::for_fallback(FallbackReason::ProviderErrors, &errors),
            UserNotice::SampleStores {
                cause: SampleCause::AccessDenied
            }
        );
    }

    #[rstest]
    #[case(FallbackReason::MissingCredential, UserNotice::MissingCredential)]
    #[case(
        FallbackReason::NoResults,
        UserNotice::SampleStores { cause: SampleCause::Unavailable }
    )]
    #[case(
        FallbackReason::ProviderErrors,
        UserNotice::SampleStores { cause: SampleCause::Unavailable }
    )]
    fn fallback_reasons_without_errors(
        #[case] reason: FallbackReason,
        #[case] expected: UserNotice,
    ) {
        assert_eq!(UserNotice::for_fallback(reason, &[]), expected);
    }

    #[rstest]
    #[case(UserNotice::QuotaExceeded)]
    #[case(UserNotice::AccessDenied)]
    #[case(UserNotice::StoresUnavailable)]
    fn search_failure_copy_reassures_about_user_posts(#[case] notice: UserNotice) {
        let message = notice.message();
        assert!(
            message.ends_with("Showing user-posted sales only."),
            "no reassurance: {message}"
        );
    }

    #[rstest]
    #[case(SampleCause::QuotaExceeded, "Google Places API quota exceeded.")]
    #[case(
        SampleCause::AccessDenied,
        "Google Places API access denied. Please check API key permissions."
    )]
    #[case(SampleCause::Unavailable, "Unable to load live store data.")]
    fn sample_store_copy_mentions_the_catalogue(#[case] cause: SampleCause, #[case] lead: &str) {
        let message = UserNotice::SampleStores { cause }.message();
        assert!(message.starts_with(lead), "unexpected lead: {message}");
        assert!(message.ends_with("Showing sample nearby stores alongside user-posted sales."));
        assert!(!message.contains("user-posted sales only"));
    }

    #[test]
    fn map_failures_show_the_loader_detail() {
        assert_eq!(
            UserNotice::MapUnavailable {
                detail: "boom".to_owned()
            }
            .message(),
            "boom"
        );
    }
}
