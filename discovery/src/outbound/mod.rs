//! Outbound adapters implementing the domain's driven ports.

pub mod google_places;
pub mod location;
pub mod surface;

pub use google_places::{GooglePlacesHttpProvider, HttpSdkLoader};
pub use location::FixedLocationSource;
pub use surface::{InMemorySurface, InMemorySurfaceFactory};
