//! HTTP client for registry communication.
//!
//! This module provides a thin, typed wrapper over the Docker Distribution v2
//! endpoints the inventory needs: catalog, tag list, manifest, manifest list
//! and config blob. Each call is a single GET. Nothing is retried, cached or
//! authenticated.

use crate::error::{RegistryError, Result};
use crate::manifest::{ConfigBlob, MEDIA_TYPE_MANIFEST_LIST_V2, MEDIA_TYPE_MANIFEST_V2, ManifestShape};
use reqwest::header::ACCEPT;
use reqwest::{Client as ReqwestClient, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;


/// Response from the catalog API endpoint.
#[derive(Debug, Deserialize)]
struct CatalogResponse {
    /// List of repository names
    #[serde(default)]
    repositories: Option<Vec<String>>,
}

/// Response from the tags list API endpoint.
#[derive(Debug, Deserialize)]
struct TagsResponse {
    /// List of tag names; `null` when every tag was deleted
    #[serde(default)]
    tags: Option<Vec<String>>,
}

/// Configuration for the HTTP client.
///
/// Passed by value into [`RegistryClient::with_config`]; there is no global
/// client state.
///
/// # Examples
///
/// ```
/// use libregls::client::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_timeout(60)
///     .with_accept_invalid_certs(false);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
    /// Skip TLS certificate verification (default: true)
    pub accept_invalid_certs: bool,
    /// Maximum idle connections per host (default: 10)
    pub max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            accept_invalid_certs: true,
            max_idle_per_host: 10,
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    ///
    /// ```
    /// use libregls::client::ClientConfig;
    ///
    /// let config = ClientConfig::new();
    /// assert_eq!(config.timeout_seconds, 30);
    /// assert!(config.accept_invalid_certs);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Enables or disables TLS certificate verification bypass.
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Sets the maximum idle connections per host.
    pub fn with_max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = max;
        self
    }
}

/// Typed client for one registry.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    /// The underlying HTTP client
    http_client: ReqwestClient,
    /// Base registry URL (e.g., "https://registry.example.com")
    registry_url: String,
    /// Timeout applied to every request, kept for error messages
    timeout_seconds: u64,
}

impl RegistryClient {
    /// Creates a new client for the specified registry URL with default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregls::client::RegistryClient;
    ///
    /// let client = RegistryClient::new("localhost:5000").unwrap();
    /// assert_eq!(client.registry_url(), "http://localhost:5000");
    /// ```
    pub fn new(registry_url: &str) -> Result<Self> {
        Self::with_config(registry_url, ClientConfig::default())
    }

    /// Creates a new client for the specified registry URL with custom configuration.
    pub fn with_config(registry_url: &str, config: ClientConfig) -> Result<Self> {
        let normalized_url = Self::normalize_url(registry_url)?;

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| RegistryError::transport_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            http_client,
            registry_url: normalized_url,
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Normalizes a registry URL by ensuring it has a scheme and removing trailing slashes.
    fn normalize_url(url: &str) -> Result<String> {
        let url = url.trim();

        if url.is_empty() {
            return Err(RegistryError::missing_argument("registry URL"));
        }

        let url = if !url.starts_with("http://") && !url.starts_with("https://") {
            format!("http://{}", url)
        } else {
            url.to_string()
        };

        Ok(url.trim_end_matches('/').to_string())
    }

    /// Returns the base registry URL.
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    /// Lists every repository in the catalog.
    ///
    /// Issues a single `GET /v2/_catalog`; pagination links are not followed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use libregls::client::RegistryClient;
    ///
    /// # async fn example() -> libregls::error::Result<()> {
    /// let client = RegistryClient::new("http://localhost:5000")?;
    /// for repo in client.list_repositories().await? {
    ///     println!("{}", repo);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_repositories(&self) -> Result<Vec<String>> {
        let url = format!("{}/v2/_catalog", self.registry_url);
        let catalog: CatalogResponse = self.get_json(&url, None, "catalog").await?;
        Ok(catalog.repositories.unwrap_or_default())
    }

    /// Lists the tags of one repository.
    pub async fn list_tags(&self, repository: &str) -> Result<Vec<String>> {
        let url = format!("{}/v2/{}/tags/list", self.registry_url, repository);
        let tags: TagsResponse = self.get_json(&url, None, "tags").await?;
        Ok(tags.tags.unwrap_or_default())
    }

    /// Fetches the single-platform manifest for a tag.
    pub async fn get_manifest(&self, repository: &str, tag: &str) -> Result<ManifestShape> {
        let bytes = self
            .get_bytes(
                &self.manifest_url(repository, tag),
                Some(MEDIA_TYPE_MANIFEST_V2),
            )
            .await?;
        ManifestShape::from_bytes(&bytes)
    }

    /// Fetches the manifest list for a tag.
    ///
    /// The registry may legally answer with a single manifest instead; the
    /// returned [`ManifestShape`] says which one arrived.
    pub async fn get_manifest_list(&self, repository: &str, tag: &str) -> Result<ManifestShape> {
        let bytes = self
            .get_bytes(
                &self.manifest_url(repository, tag),
                Some(MEDIA_TYPE_MANIFEST_LIST_V2),
            )
            .await?;
        ManifestShape::from_bytes(&bytes)
    }

    /// Fetches and decodes the config blob identified by `digest`.
    pub async fn get_config_blob(&self, repository: &str, digest: &str) -> Result<ConfigBlob> {
        let url = format!("{}/v2/{}/blobs/{}", self.registry_url, repository, digest);
        self.get_json(&url, None, "config blob").await
    }

    fn manifest_url(&self, repository: &str, tag: &str) -> String {
        format!("{}/v2/{}/manifests/{}", self.registry_url, repository, tag)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        accept: Option<&str>,
        what: &str,
    ) -> Result<T> {
        let bytes = self.get_bytes(url, accept).await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            RegistryError::decode_with_source(format!("Failed to parse {} response", what), e)
        })
    }

    async fn get_bytes(&self, url: &str, accept: Option<&str>) -> Result<Vec<u8>> {
        debug!(url, accept = ?accept, "GET");

        let mut request = self.http_client.get(url);
        if let Some(media_type) = accept {
            request = request.header(ACCEPT, media_type);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e, url))?;

        let response = Self::check_response_status(response).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.translate_reqwest_error(e, url))?;

        Ok(bytes.to_vec())
    }

    /// Translates a reqwest error into a RegistryError.
    fn translate_reqwest_error(&self, error: reqwest::Error, url: &str) -> RegistryError {
        if error.is_timeout() {
            RegistryError::timeout(url, self.timeout_seconds)
        } else if error.is_connect() {
            RegistryError::transport_with_source(
                format!("Failed to connect to registry at {}", self.registry_url),
                error,
            )
        } else if error.is_request() {
            RegistryError::transport_with_source(format!("Failed to send request to {}", url), error)
        } else {
            RegistryError::transport_with_source(
                format!("Network error communicating with {}", url),
                error,
            )
        }
    }

    /// Turns any non-2xx response into an `HttpStatus` error.
    async fn check_response_status(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("(unable to read response body)"));

        Err(RegistryError::http_status(
            status.as_u16(),
            url,
            body.trim().to_string(),
        ))
    }
}
