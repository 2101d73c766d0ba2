//! Domain model, driven ports, and discovery services.
//!
//! Purpose: define the canonical `Sale` entity and the services that turn
//! provider data into sales and keep the map in sync with them. Nothing here
//! performs I/O directly; every external collaborator sits behind a port.
//!
//! Public surface:
//! - Sale, UserSaleDraft — canonical listing and user-post input.
//! - SaleCategory, CategoryFilter — closed category set, palette, toggles.
//! - ApiKey, Coordinates — credential and position primitives.
//! - DiscoverySession — provider lifecycle (load, surface, location, search).
//! - MarkerSync — marker layer reconciliation.
//! - MapScreen, discover_list — screen orchestration.

pub mod api_key;
pub mod category;
pub mod discovery_session;
pub mod geo;
pub mod map_screen;
pub mod marker_sync;
pub mod normalizer;
pub mod ports;
pub mod sale;

pub use self::api_key::ApiKey;
pub use self::category::{CategoryFilter, SaleCategory};
pub use self::discovery_session::{
    DiscoveryPorts, DiscoverySession, FallbackReason, Provenance, SearchOutcome, SessionSettings,
};
pub use self::geo::{Coordinates, DEFAULT_CENTER};
pub use self::map_screen::{
    ListDiscovery, ListDiscoveryConfig, MapScreen, MapScreenConfig, ScreenPhase, ScreenRuntime,
    SampleCause, ScreenSleeper, TokioSleeper, UserNotice, discover_list,
};
pub use self::marker_sync::{MarkerSync, SaleSelected};
pub use self::sale::{Sale, UserSaleDraft};
