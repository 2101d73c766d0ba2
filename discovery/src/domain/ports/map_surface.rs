//! Driven port for the interactive map surface and its marker layer.
//!
//! The surface is a single mutable resource owned by one discovery session.
//! Only the marker sync controller and the session's location-marker logic
//! add or remove markers, and both always remove what they previously added.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::geo::Coordinates;

/// Zoom used when the surface is created.
pub const DEFAULT_ZOOM: u8 = 12;

/// Zoom used once the map is centred on the user.
pub const USER_LOCATION_ZOOM: u8 = 13;

/// Identifier of the element the surface is mounted into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MountTarget(String);

impl MountTarget {
    /// Wrap an element identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Element identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Options applied when a surface is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceOptions {
    /// Initial centre.
    pub center: Coordinates,
    /// Initial zoom level.
    pub zoom: u8,
}

/// Current camera of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    /// Centre of the viewport.
    pub center: Coordinates,
    /// Zoom level.
    pub zoom: u8,
}

/// Handle of a marker on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

/// Visual style of a circular marker glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    /// Fill colour as hex.
    pub fill_color: &'static str,
    /// Glyph radius.
    pub scale: u8,
    /// Stroke colour as hex.
    pub stroke_color: &'static str,
    /// Stroke width.
    pub stroke_weight: u8,
    /// Stacking priority; higher draws on top.
    pub z_index: u16,
}

/// Callback fired when a marker is clicked.
pub type ClickHandler = Arc<dyn Fn() + Send + Sync>;

/// Marker to add to a surface.
#[derive(Clone)]
pub struct MarkerSpec {
    /// Marker position.
    pub position: Coordinates,
    /// Hover title.
    pub title: String,
    /// Glyph style.
    pub style: MarkerStyle,
    /// Click callback.
    pub on_click: Option<ClickHandler>,
}

impl fmt::Debug for MarkerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerSpec")
            .field("position", &self.position)
            .field("title", &self.title)
            .field("style", &self.style)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

/// Snapshot of a marker currently on a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    /// Marker handle.
    pub id: MarkerId,
    /// Marker position.
    pub position: Coordinates,
    /// Hover title.
    pub title: String,
    /// Glyph style.
    pub style: MarkerStyle,
}

/// Live map surface.
pub trait MapSurface: Send {
    /// Move the camera.
    fn set_view(&mut self, view: MapView);

    /// Current camera.
    fn view(&self) -> MapView;

    /// Add a marker and return its handle.
    fn add_marker(&mut self, spec: MarkerSpec) -> MarkerId;

    /// Remove a marker; returns `false` when the handle is unknown.
    fn remove_marker(&mut self, id: MarkerId) -> bool;

    /// Markers currently on the surface.
    fn markers(&self) -> Vec<PlacedMarker>;

    /// Simulate a click; returns `false` when the marker is unknown.
    fn click(&self, id: MarkerId) -> bool;
}

define_port_error! {
    /// Errors surfaced while creating a surface.
    pub enum InitError {
        /// Provider resources are not available.
        SdkUnavailable { message: String } =>
            "map SDK unavailable: {message}",
        /// The mount target does not exist yet.
        TargetMissing { target: String } =>
            "map container `{target}` not found",
    }
}

/// Port constructing map surfaces.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SurfaceFactory: Send + Sync {
    /// Create a surface mounted on `target`.
    async fn create(
        &self,
        target: &MountTarget,
        options: &SurfaceOptions,
    ) -> Result<Box<dyn MapSurface>, InitError>;
}
