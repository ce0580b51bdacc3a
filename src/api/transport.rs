// SPDX-License-Identifier: MPL-2.0

use crate::api::ApiError;
use crate::config::APP_NAME;
use crate::runtime;
use std::fmt::Display;
use std::time::Duration;
use tracing::debug;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Ordered query parameters for an API method call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Display) -> Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Blocking access to the remote platform.
pub trait Transport {
    /// Call an API method and return the raw response body.
    fn call(&self, method: &str, params: &Params) -> Result<Vec<u8>, ApiError>;

    /// Fetch an arbitrary resource (media files).
    fn download(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}

/// HTTPS transport built on reqwest, driven through the shared runtime.
pub struct HttpTransport {
    client: reqwest::Client,
    host: String,
}

impl HttpTransport {
    pub fn new(host: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(format!("{}/{}", APP_NAME, env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network {
                url: host.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            host: host.to_string(),
        })
    }

    fn get(&self, url: Url, display_url: &str) -> Result<Vec<u8>, ApiError> {
        let network = |e: reqwest::Error| ApiError::Network {
            url: display_url.to_string(),
            message: e.to_string(),
        };

        runtime::block_on(async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(network)?
                .error_for_status()
                .map_err(network)?;
            let bytes = response.bytes().await.map_err(network)?;
            Ok::<_, ApiError>(bytes.to_vec())
        })
    }
}

impl Transport for HttpTransport {
    fn call(&self, method: &str, params: &Params) -> Result<Vec<u8>, ApiError> {
        // The query carries the access token, so errors only name the method URL
        let base = format!("https://{}/method/{}", self.host, method);
        let url = Url::parse_with_params(&base, params.iter()).map_err(|e| ApiError::Network {
            url: base.clone(),
            message: e.to_string(),
        })?;

        debug!("calling {}", base);
        self.get(url, &base)
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let parsed = Url::parse(url).map_err(|e| ApiError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        self.get(parsed, url)
    }
}
