// Supplier-facing client: token exchange, search submission and response processing.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::assembler::FlightSearchResponse;
use crate::processor::{FlightSearchProcessor, ProcessingError};
use crate::search_request::FlightSearchRequest;
use crate::supplier_request::{compose, DEFAULT_ITINERARY_REQUEST_TYPE};

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("API error: {status_code} - {message}")]
    ApiResponseError { status_code: u16, message: String },

    #[error("Invalid supplier response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Processing(#[from] ProcessingError),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub search_url: String,
    pub auth_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub pseudo_city_code: String,
    pub timeout_ms: u64,
    pub itinerary_request_type: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            search_url: String::new(),
            auth_url: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            pseudo_city_code: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            itinerary_request_type: DEFAULT_ITINERARY_REQUEST_TYPE.to_string(),
        }
    }
}

/// Anything that can answer a validated flight search.
#[async_trait]
pub trait FlightSearchService: Send + Sync + 'static {
    async fn search(&self, request: FlightSearchRequest) -> Result<FlightSearchResponse, ApiError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

pub struct SabreClient {
    http: reqwest::Client,
    config: ClientConfig,
    processor: FlightSearchProcessor,
}

impl SabreClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        if config.search_url.is_empty() || config.auth_url.is_empty() {
            return Err(ClientError::ConfigError(
                "search and auth urls must be set".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self {
            http,
            config,
            processor: FlightSearchProcessor::new(),
        })
    }

    /// Exchanges the client credentials for a short-lived bearer token.
    #[instrument(skip(self))]
    pub async fn fetch_token(&self) -> Result<String, ApiError> {
        let response = self
            .http
            .post(&self.config.auth_url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!(
                    "Basic {}",
                    basic_credentials(&self.config.client_id, &self.config.client_secret)
                ),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "token request rejected");
            return Err(ApiError::Authentication(format!("{} - {}", status.as_u16(), body)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Authentication(format!("invalid token response: {}", e)))?;
        debug!(expires_in = ?token.expires_in, "obtained access token");

        Ok(token.access_token)
    }

    /// Posts an already composed search and returns the raw supplier body.
    #[instrument(skip(self, request), fields(origin = %request.origin, destination = %request.destination))]
    pub async fn submit_search(&self, request: &FlightSearchRequest) -> Result<String, ApiError> {
        let token = self.fetch_token().await?;
        let payload = compose(
            request,
            &self.config.pseudo_city_code,
            &self.config.itinerary_request_type,
        );

        let response = self
            .http
            .post(&self.config.search_url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "supplier search failed");
            return Err(ApiError::ApiResponseError {
                status_code: status.as_u16(),
                message: body,
            });
        }

        Ok(body)
    }

    fn transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.config.timeout_ms)
        } else {
            ApiError::NetworkError(error.to_string())
        }
    }
}

#[async_trait]
impl FlightSearchService for SabreClient {
    async fn search(&self, request: FlightSearchRequest) -> Result<FlightSearchResponse, ApiError> {
        let body = self.submit_search(&request).await?;

        let result = self.processor.process(&body).map_err(|e| match e {
            ProcessingError::JsonParseError(msg) => ApiError::InvalidResponse(msg),
            other => ApiError::Processing(other),
        })?;

        info!(flights = result.total_flights, "flight search completed");
        Ok(result)
    }
}

// Sabre expects each half encoded separately, then the joined pair encoded again.
pub fn basic_credentials(client_id: &str, client_secret: &str) -> String {
    let joined = format!("{}:{}", STANDARD.encode(client_id), STANDARD.encode(client_secret));
    STANDARD.encode(joined)
}
