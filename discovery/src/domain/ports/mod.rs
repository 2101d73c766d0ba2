//! Driven ports for the discovery subsystem.

mod macros;
pub(crate) use macros::define_port_error;

mod location_source;
mod map_surface;
mod places_provider;
mod sdk_loader;

#[cfg(test)]
pub use location_source::MockLocationSource;
pub use location_source::{
    FixtureLocationSource, LocationError, LocationSource, PositionOptions,
};
#[cfg(test)]
pub use map_surface::MockSurfaceFactory;
pub use map_surface::{
    ClickHandler, DEFAULT_ZOOM, InitError, MapSurface, MapView, MarkerId, MarkerSpec,
    MarkerStyle, MountTarget, PlacedMarker, SurfaceFactory, SurfaceOptions, USER_LOCATION_ZOOM,
};
#[cfg(test)]
pub use places_provider::MockPlacesProvider;
pub use places_provider::{
    DetailError, FixturePlacesProvider, NearbySearchRequest, OpeningHours, OpeningPeriod,
    PLACE_DETAIL_FIELDS, PeriodBoundary, PlaceDetail, PlaceDetailsRequest, PlacePhoto,
    PlacesProvider, RawPlace, SearchError,
};
#[cfg(test)]
pub use sdk_loader::MockSdkLoader;
pub use sdk_loader::{CallbackName, FixtureSdkLoader, LoadError, SdkLoader};
