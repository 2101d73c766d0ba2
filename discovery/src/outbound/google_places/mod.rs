//! Google Places outbound adapters.
//!
//! This module provides thin HTTP implementations of the `PlacesProvider`
//! and `SdkLoader` ports.

mod dto;
mod http_provider;
mod sdk_loader;

pub use http_provider::GooglePlacesHttpProvider;
pub use sdk_loader::HttpSdkLoader;
