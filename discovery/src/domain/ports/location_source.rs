//! Driven port for device geolocation.

use std::time::Duration;

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::geo::Coordinates;

/// Options for one position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// Request a GPS-grade fix.
    pub high_accuracy: bool,
    /// Time allowed for the fix.
    pub timeout: Duration,
    /// Oldest cached position that may be returned.
    pub maximum_age: Duration,
}

impl PositionOptions {
    /// First attempt: precise fix, short timeout, one-minute cache.
    pub const HIGH_ACCURACY: Self = Self {
        high_accuracy: true,
        timeout: Duration::from_secs(8),
        maximum_age: Duration::from_secs(60),
    };

    /// Second attempt: coarse fix, longer timeout, five-minute cache.
    pub const LOW_ACCURACY: Self = Self {
        high_accuracy: false,
        timeout: Duration::from_secs(10),
        maximum_age: Duration::from_secs(300),
    };
}

define_port_error! {
    /// Errors surfaced by geolocation.
    pub enum LocationError {
        /// The user or platform refused location access.
        PermissionDenied =>
            "Location access denied. Please enable location services and refresh the page.",
        /// No position could be determined.
        PositionUnavailable =>
            "Location information unavailable. Your device may not support GPS.",
        /// The position request timed out.
        Timeout =>
            "Location request timed out. Please try again.",
    }
}

/// Port returning the device position.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Request the current position.
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, LocationError>;
}

/// Fixture source with no position available.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureLocationSource;

#[async_trait]
impl LocationSource for FixtureLocationSource {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        Err(LocationError::position_unavailable())
    }
}
