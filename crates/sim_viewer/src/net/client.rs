//! Simulation service client
//!
//! The viewer consumes three kinds of endpoint: initialize, one snapshot
//! fetch per category, and advance. [`SimulationService`] is the seam the
//! poller is written against; [`HttpSimulationClient`] is the HTTP/JSON
//! implementation.

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ServiceConfig;
use crate::scene::Category;
use crate::sync::snapshot::{AdvanceResponse, InitRequest, InitResponse, SnapshotResponse};

/// Failures talking to the simulation service
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    /// Connection, timeout or transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code
    #[error("{endpoint} returned {status}")]
    Status {
        /// Endpoint path
        endpoint: String,
        /// Status returned
        status: StatusCode,
    },

    /// Body that is not the expected JSON
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Operations the viewer needs from the simulation
#[allow(async_fn_in_trait)]
pub trait SimulationService {
    /// Start a simulation; the service answers with the area it actually uses
    async fn initialize(&self, request: &InitRequest) -> Result<InitResponse, ServiceError>;

    /// Current records for one category
    async fn fetch_snapshot(&self, category: Category) -> Result<SnapshotResponse, ServiceError>;

    /// Step the simulation once
    async fn advance(&self) -> Result<AdvanceResponse, ServiceError>;
}

/// HTTP/JSON simulation client
#[derive(Debug, Clone)]
pub struct HttpSimulationClient {
    client: Client,
    config: ServiceConfig,
}

impl HttpSimulationClient {
    /// Create a client for the service described by `config`
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Full URL for an endpoint path
    pub fn url(&self, endpoint: &str) -> String {
        join_url(&self.config.base_url, endpoint)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ServiceError> {
        let response = self.client.get(self.url(endpoint)).send().await?;
        parse_response(endpoint, response).await
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.client.post(self.url(endpoint)).json(body).send().await?;
        parse_response(endpoint, response).await
    }
}

impl SimulationService for HttpSimulationClient {
    async fn initialize(&self, request: &InitRequest) -> Result<InitResponse, ServiceError> {
        self.post_json(&self.config.endpoints.init, request).await
    }

    async fn fetch_snapshot(&self, category: Category) -> Result<SnapshotResponse, ServiceError> {
        self.get_json(self.config.endpoints.snapshot(category)).await
    }

    async fn advance(&self) -> Result<AdvanceResponse, ServiceError> {
        self.get_json(&self.config.endpoints.advance).await
    }
}

async fn parse_response<T: DeserializeOwned>(
    endpoint: &str,
    response: Response,
) -> Result<T, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ServiceError::Status {
            endpoint: endpoint.to_string(),
            status,
        });
    }
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Join a base URL and an endpoint path with exactly one slash between them
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
