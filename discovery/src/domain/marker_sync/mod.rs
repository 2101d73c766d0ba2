//! Reconciles the filtered sale set against the live marker layer.
//!
//! The controller tracks only the markers it created. Location markers
//! belong to the discovery session and are never touched here.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{MapSurface, MarkerId, MarkerSpec};
use crate::domain::sale::Sale;

mod placeholder;
mod styles;

pub use placeholder::{PLACEHOLDER_LIMIT, PlaceholderMarker, placeholder_layout};
pub use styles::{
    LocationMarkerKind, location_marker_spec, sale_marker_style, style_for,
};

/// Callback receiving the sale behind a clicked marker.
pub type SaleSelected = Arc<dyn Fn(&Sale) + Send + Sync>;

/// Sale marker bookkeeping for one surface.
#[derive(Debug, Default)]
pub struct MarkerSync {
    tracked: Vec<MarkerId>,
}

impl MarkerSync {
    /// Controller with no tracked markers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every tracked marker with one marker per sale.
    ///
    /// Clearing always precedes re-adding, so running twice with the same
    /// input leaves the same marker set. Returns the number of markers added.
    pub fn reconcile(
        &mut self,
        surface: &mut dyn MapSurface,
        sales: &[Sale],
        on_select: &SaleSelected,
    ) -> usize {
        let removed = self.clear(surface);
        self.tracked = sales
            .iter()
            .map(|sale| surface.add_marker(Self::spec_for(sale, on_select)))
            .collect();
        debug!(removed, added = self.tracked.len(), "sale markers reconciled");
        self.tracked.len()
    }

    /// Remove every tracked marker; returns how many were removed.
    pub fn clear(&mut self, surface: &mut dyn MapSurface) -> usize {
        self.tracked
            .drain(..)
            .filter(|&id| surface.remove_marker(id))
            .count()
    }

    /// Markers currently owned by the controller.
    pub fn tracked(&self) -> &[MarkerId] {
        &self.tracked
    }

    fn spec_for(sale: &Sale, on_select: &SaleSelected) -> MarkerSpec {
        let selected = sale.clone();
        let callback = Arc::clone(on_select);
        MarkerSpec {
            position: sale.coordinates(),
            title: sale.title.clone(),
            style: style_for(sale),
            on_click: Some(Arc::new(move || callback(&selected))),
        }
    }
}
