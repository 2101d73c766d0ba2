//! Driven port for loading the provider's client resources.
//!
//! One call to [`SdkLoader::load`] is one underlying load attempt. The
//! discovery session wraps it with single-flight sharing and the load timeout,
//! so implementations stay simple.

use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use super::define_port_error;
use crate::domain::api_key::ApiKey;

/// Uniquely named completion signal for one load attempt.
///
/// Each attempt gets a fresh name so a late completion from an abandoned
/// attempt can never be mistaken for the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackName(String);

impl CallbackName {
    /// Generate a new unique callback name.
    ///
    /// # Examples
    /// ```
    /// use thriftures::domain::ports::CallbackName;
    ///
    /// let first = CallbackName::generate();
    /// let second = CallbackName::generate();
    /// assert_ne!(first, second);
    /// assert!(first.as_str().starts_with("initThriftures_"));
    /// ```
    pub fn generate() -> Self {
        Self(format!("initThriftures_{}", Uuid::new_v4().simple()))
    }

    /// Callback name as sent to the provider.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CallbackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

define_port_error! {
    /// Errors surfaced while loading provider resources.
    pub enum LoadError {
        /// No usable credential is configured.
        MissingCredential =>
            "Google Maps API key not configured",
        /// The resource failed to load or exceeded the load timeout.
        NetworkOrTimeout { message: String } =>
            "failed to load Google Maps resources: {message}",
    }
}

/// Port performing one provider resource load.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SdkLoader: Send + Sync {
    /// Load provider resources, resolving once `callback` has fired.
    async fn load(&self, key: &ApiKey, callback: &CallbackName) -> Result<(), LoadError>;
}

/// Fixture loader that succeeds immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSdkLoader;

#[async_trait]
impl SdkLoader for FixtureSdkLoader {
    async fn load(&self, _key: &ApiKey, _callback: &CallbackName) -> Result<(), LoadError> {
        Ok(())
    }
}
