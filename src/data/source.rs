//! Remote restaurant data source
//!
//! Fetches the full restaurant collection from the listing endpoint with a
//! single GET and parses it into `Restaurant` records.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::Restaurant;

/// Port of the listing server. Change this to match your server.
pub const DEFAULT_PORT: u16 = 1337;

/// Host of the listing server
pub const DEFAULT_HOST: &str = "localhost";

/// Path of the listing resource
const RESTAURANTS_PATH: &str = "/restaurants";

/// Errors that can occur when fetching restaurants
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the listing endpoint lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Server host name or address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Overall request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout: None,
        }
    }
}

impl SourceConfig {
    /// Full URL of the restaurant collection
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, RESTAURANTS_PATH)
    }
}

/// Anything that can produce the full restaurant collection
pub trait RestaurantSource {
    /// Fetches every restaurant from the source
    fn fetch_restaurants(
        &self,
    ) -> impl Future<Output = Result<Vec<Restaurant>, SourceError>> + Send;
}

/// Client for the HTTP listing endpoint
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    endpoint: String,
}

impl HttpSource {
    /// Creates a client for the endpoint described by `config`
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint(),
        })
    }

    /// Creates a client sharing an existing HTTP client
    pub fn with_client(client: Client, config: &SourceConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint(),
        }
    }

    /// URL this client requests
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RestaurantSource for HttpSource {
    async fn fetch_restaurants(&self) -> Result<Vec<Restaurant>, SourceError> {
        debug!(endpoint = %self.endpoint, "Requesting restaurants");

        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let restaurants = parse_restaurants(&text)?;

        debug!(count = restaurants.len(), "Received restaurants");
        Ok(restaurants)
    }
}

/// Parses a response body into a restaurant collection
pub fn parse_restaurants(body: &str) -> Result<Vec<Restaurant>, SourceError> {
    Ok(serde_json::from_str(body)?)
}
