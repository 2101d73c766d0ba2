//! Place discovery and map synchronisation for the Thriftures marketplace.
//!
//! The crate follows a hexagonal layout: [`domain`] owns the `Sale` model,
//! the driven ports and the discovery services, while [`outbound`] provides
//! the Google Places, location and map-surface adapters.

pub mod config;
pub mod domain;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
