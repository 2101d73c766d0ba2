//! HTTP loader for the Maps JavaScript bootstrap.
//!
//! Without a browser there is nothing to execute, so one load attempt fetches
//! the bootstrap script with the credential and callback name and treats a
//! successful, non-empty response as the completion signal.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use crate::domain::api_key::ApiKey;
use crate::domain::ports::{CallbackName, LoadError, SdkLoader};

/// Library set requested alongside the core map script.
const LIBRARIES: &str = "places";

/// Loader that fetches the bootstrap script over HTTP.
pub struct HttpSdkLoader {
    client: Client,
    script_url: Url,
}

impl HttpSdkLoader {
    /// Build a loader using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(script_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, script_url })
    }

    fn bootstrap_url(&self, key: &ApiKey, callback: &CallbackName) -> Url {
        let mut url = self.script_url.clone();
        url.query_pairs_mut()
            .append_pair("key", key.expose())
            .append_pair("libraries", LIBRARIES)
            .append_pair("callback", callback.as_str());
        url
    }
}

#[async_trait]
impl SdkLoader for HttpSdkLoader {
    async fn load(&self, key: &ApiKey, callback: &CallbackName) -> Result<(), LoadError> {
        debug!(%callback, "fetching map bootstrap");
        let response = self
            .client
            .get(self.bootstrap_url(key, callback))
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::network_or_timeout(format!(
                "status {}",
                status.as_u16()
            )));
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        if body.is_empty() {
            return Err(LoadError::network_or_timeout("empty bootstrap script"));
        }
        Ok(())
    }
}

fn map_transport_error(error: reqwest::Error) -> LoadError {
    if error.is_timeout() {
        LoadError::network_or_timeout(format!("request timed out: {error}"))
    } else {
        LoadError::network_or_timeout(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_url_names_the_callback() {
        let loader = HttpSdkLoader::new(
            Url::parse("https://maps.example.test/maps/api/js").expect("script url"),
            Duration::from_secs(5),
        )
        .expect("client builds");
        let key = ApiKey::resolve(Some("AIzaUnit")).expect("usable key");
        let callback = CallbackName::generate();

        let url = loader.bootstrap_url(&key, &callback);

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            [
                ("key".to_owned(), "AIzaUnit".to_owned()),
                ("libraries".to_owned(), "places".to_owned()),
                ("callback".to_owned(), callback.as_str().to_owned()),
            ]
        );
    }
}
