//! Geographic primitives shared by the discovery services.

use serde::{Deserialize, Serialize};

/// Map centre used when no location hint or device position is available
/// (San Francisco).
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    latitude: 37.7749,
    longitude: -122.4194,
};

/// WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Construct a coordinate pair.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Return a copy shifted by the given degree deltas.
    pub fn offset(self, delta_latitude: f64, delta_longitude: f64) -> Self {
        Self::new(
            self.latitude + delta_latitude,
            self.longitude + delta_longitude,
        )
    }

    /// Whether both components are finite and inside WGS84 ranges.
    pub fn is_valid(self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}
