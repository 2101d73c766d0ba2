//! Location source answering with a configured position.

use async_trait::async_trait;

use crate::domain::geo::Coordinates;
use crate::domain::ports::{LocationError, LocationSource, PositionOptions};

/// Source that reports a fixed position, or none.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocationSource {
    position: Option<Coordinates>,
}

impl FixedLocationSource {
    /// Source built from optional configured coordinates.
    ///
    /// A position is only reported when both halves are present and valid.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Self {
        let position = latitude
            .zip(longitude)
            .map(|(lat, lng)| Coordinates::new(lat, lng))
            .filter(|position| position.is_valid());
        Self { position }
    }

    /// Configured position, if any.
    pub fn position(&self) -> Option<Coordinates> {
        self.position
    }
}

#[async_trait]
impl LocationSource for FixedLocationSource {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        self.position
            .ok_or_else(LocationError::position_unavailable)
    }
}
