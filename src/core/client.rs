use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{ApiError, DatabricksError};
use crate::models::ApiConfig;

/// Version prefix of every REST endpoint
pub const API_PREFIX: &str = "api/2.0";

/// REST client bound to one workspace
pub struct ApiClient {
    client: Client,
    host: String,
    token: String,
    timeout_seconds: u64,
}

/// Response of endpoints that return `{}`
#[derive(Debug, Default, Deserialize)]
pub struct Empty {}

impl ApiClient {
    /// Create a client for `host`, authenticating with a bearer token
    pub fn new(
        host: impl Into<String>,
        token: impl Into<String>,
        timeout_seconds: u64,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(concat!("databricks-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            host: host.into().trim_end_matches('/').to_string(),
            token: token.into(),
            timeout_seconds,
        })
    }

    /// Create a client from a loaded configuration, failing on missing host or token
    pub fn from_config(config: &ApiConfig) -> Result<Self, DatabricksError> {
        let host = config.resolved_host()?;
        let token = config.resolved_token()?;
        Ok(Self::new(host, token, config.timeout_seconds)?)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Full URL of an endpoint such as `dbfs/read`
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}/{}", self.host, API_PREFIX, endpoint.trim_start_matches('/'))
    }

    /// GET an endpoint with query parameters
    pub async fn get<Q, T>(&self, endpoint: &str, query: &Q) -> Result<T, ApiError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint_url(endpoint);
        debug!("GET {}", url);
        let request = self.client.get(&url).query(query);
        self.send(request).await
    }

    /// POST a JSON body to an endpoint
    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint_url(endpoint);
        debug!("POST {}", url);
        let request = self.client.post(&url).json(body);
        self.send(request).await
    }

    /// Map a transport failure, reporting the configured timeout
    fn transport_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_connect() {
            ApiError::ConnectionRefused(format!(
                "Could not connect to {}. Is the host correct?",
                self.host
            ))
        } else if e.is_timeout() {
            ApiError::Timeout(self.timeout_seconds)
        } else {
            ApiError::from(e)
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            debug!("Request failed with {}: {}", status, body);
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
        serde_json::from_str(body).map_err(|e| {
            let excerpt: String = body.chars().take(200).collect();
            ApiError::ParseError(format!("{} - {}", e, excerpt))
        })
    }
}
