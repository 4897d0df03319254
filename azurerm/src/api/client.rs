use reqwest::header::{HeaderMap, AUTHORIZATION, LOCATION, RETRY_AFTER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tfplug::Context;
use url::Url;

use super::common::{CloudError, OperationStatus};
use super::error::ApiError;

pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";

const AZURE_ASYNC_OPERATION: &str = "azure-asyncoperation";

/// Azure Resource Manager API client
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    auth_header: String,
    retry_config: RetryConfig,
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub timeout_seconds: u64,
    /// Delay between long running operation polls when the service sends no Retry-After
    pub poll_interval_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            timeout_seconds: 30,
            poll_interval_ms: 10000,
        }
    }
}

/// Where to poll a long running operation
#[derive(Debug, Clone, PartialEq, Eq)]
enum PollTarget {
    AsyncOperation(String),
    Location(String),
}

impl Client {
    /// Create a new API client with default configuration
    pub fn new(endpoint: &str, access_token: &str) -> Result<Self, ApiError> {
        Self::with_config(endpoint, access_token, RetryConfig::default())
    }

    /// Create a new API client with custom retry configuration
    pub fn with_config(
        endpoint: &str,
        access_token: &str,
        retry_config: RetryConfig,
    ) -> Result<Self, ApiError> {
        let base_url = endpoint.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", endpoint, e)))?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(retry_config.timeout_seconds))
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                auth_header: format!("Bearer {}", access_token),
                retry_config,
            }),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.inner.base_url
    }

    /// Automation API operations
    pub fn automation(&self) -> super::automation::AutomationApi<'_> {
        super::automation::AutomationApi::new(self)
    }

    /// Search API operations
    pub fn search(&self) -> super::search::SearchApi<'_> {
        super::search::SearchApi::new(self)
    }

    /// Security Insights (Sentinel) API operations
    pub fn security_insights(&self) -> super::security_insights::SecurityInsightsApi<'_> {
        super::security_insights::SecurityInsightsApi::new(self)
    }

    /// Policy Insights API operations
    pub fn policy_insights(&self) -> super::policy_insights::PolicyInsightsApi<'_> {
        super::policy_insights::PolicyInsightsApi::new(self)
    }

    fn url(&self, path: &str, api_version: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!("{}{}", self.inner.base_url, path))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))?;
        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(url)
    }

    /// Execute a GET request with retry logic
    pub async fn get<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        path: &str,
        api_version: &str,
    ) -> Result<T, ApiError> {
        let url = self.url(path, api_version)?;
        let response = self
            .execute_with_retry(
                ctx,
                || {
                    tracing::debug!("GET request to: {}", url);
                    self.inner
                        .http_client
                        .get(url.clone())
                        .header(AUTHORIZATION, &self.inner.auth_header)
                        .send()
                },
                path,
            )
            .await?;
        self.parse_success_response(response).await
    }

    /// Execute a PUT request, waiting for the resource to be provisioned
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        ctx: &Context,
        path: &str,
        api_version: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path, api_version)?;
        let response = self
            .execute_with_retry(
                ctx,
                || {
                    tracing::debug!("PUT request to: {}", url);
                    self.inner
                        .http_client
                        .put(url.clone())
                        .header(AUTHORIZATION, &self.inner.auth_header)
                        .json(body)
                        .send()
                },
                path,
            )
            .await?;

        match poll_target(response.headers()) {
            Some(target) if response.status() != StatusCode::OK => {
                self.poll_until_done(ctx, target, path).await?;
                self.get(ctx, path, api_version).await
            }
            _ => self.parse_success_response(response).await,
        }
    }

    /// Execute a POST request. The response body is returned as is.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        ctx: &Context,
        path: &str,
        api_version: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path, api_version)?;
        let response = self
            .execute_with_retry(
                ctx,
                || {
                    tracing::debug!("POST request to: {}", url);
                    self.inner
                        .http_client
                        .post(url.clone())
                        .header(AUTHORIZATION, &self.inner.auth_header)
                        .json(body)
                        .send()
                },
                path,
            )
            .await?;
        self.parse_success_response(response).await
    }

    /// Execute a DELETE request, waiting for the deletion to finish.
    ///
    /// A resource that is already gone counts as deleted.
    pub async fn delete(&self, ctx: &Context, path: &str, api_version: &str) -> Result<(), ApiError> {
        let url = self.url(path, api_version)?;
        let result = self
            .execute_with_retry(
                ctx,
                || {
                    tracing::debug!("DELETE request to: {}", url);
                    self.inner
                        .http_client
                        .delete(url.clone())
                        .header(AUTHORIZATION, &self.inner.auth_header)
                        .send()
                },
                path,
            )
            .await;

        let response = match result {
            Ok(response) => response,
            Err(ApiError::NotFound(_)) => return Ok(()),
            Err(e) => return Err(e),
        };

        if response.status() == StatusCode::ACCEPTED {
            if let Some(target) = poll_target(response.headers()) {
                self.poll_until_done(ctx, target, path).await?;
            }
        }
        Ok(())
    }

    /// Polls a long running operation until it reaches a terminal state
    async fn poll_until_done(
        &self,
        ctx: &Context,
        target: PollTarget,
        path: &str,
    ) -> Result<(), ApiError> {
        let mut delay = Duration::from_millis(self.inner.retry_config.poll_interval_ms);

        loop {
            self.sleep(ctx, delay).await?;

            let poll_url = match &target {
                PollTarget::AsyncOperation(url) | PollTarget::Location(url) => url.clone(),
            };
            let response = self
                .execute_with_retry(
                    ctx,
                    || {
                        tracing::debug!("Polling long running operation for {}: {}", path, poll_url);
                        self.inner
                            .http_client
                            .get(&poll_url)
                            .header(AUTHORIZATION, &self.inner.auth_header)
                            .send()
                    },
                    path,
                )
                .await?;

            delay = retry_after(response.headers())
                .unwrap_or(Duration::from_millis(self.inner.retry_config.poll_interval_ms));

            if response.status() == StatusCode::ACCEPTED {
                continue;
            }

            let text = response.text().await?;
            if matches!(target, PollTarget::Location(_)) || text.trim().is_empty() {
                tracing::debug!("Long running operation for {} completed", path);
                return Ok(());
            }

            let status: OperationStatus = serde_json::from_str(&text)
                .map_err(|e| ApiError::ParseError(format!("Failed to parse operation status: {}", e)))?;

            if status.is_failed() {
                let message = status.error.map(|e| e.to_string()).unwrap_or_default();
                tracing::error!("Long running operation for {} failed: {}", path, message);
                return Err(ApiError::OperationFailed {
                    status: status.status.unwrap_or_default(),
                    message,
                });
            }
            if status.is_succeeded() {
                tracing::debug!("Long running operation for {} completed", path);
                return Ok(());
            }
        }
    }

    async fn sleep(&self, ctx: &Context, duration: Duration) -> Result<(), ApiError> {
        ctx.run(tokio::time::sleep(duration))
            .await
            .map_err(|_| ApiError::Cancelled)
    }

    /// Execute request with retry logic, returning the first successful response
    async fn execute_with_retry<F, Fut>(
        &self,
        ctx: &Context,
        request_fn: F,
        path: &str,
    ) -> Result<reqwest::Response, ApiError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let retry = &self.inner.retry_config;
        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= retry.max_retries {
            if attempt > 0 {
                let backoff = std::cmp::min(
                    retry.initial_backoff_ms * (2_u64.pow(attempt - 1)),
                    retry.max_backoff_ms,
                );
                tracing::debug!(
                    "Retrying request to {} after {}ms (attempt {})",
                    path,
                    backoff,
                    attempt
                );
                self.sleep(ctx, Duration::from_millis(backoff)).await?;
            }

            let sent = ctx
                .run(request_fn())
                .await
                .map_err(|_| ApiError::Cancelled)?;

            match sent {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response);
                    }

                    match status {
                        StatusCode::NOT_FOUND => return Err(ApiError::NotFound(path.to_string())),
                        StatusCode::UNAUTHORIZED => return Err(ApiError::AuthError),
                        StatusCode::TOO_MANY_REQUESTS => last_error = Some(ApiError::RateLimited),
                        s if s.is_server_error() => last_error = Some(ApiError::ServiceUnavailable),
                        _ => return Err(self.handle_error_response(response).await),
                    }
                }
                Err(e) => {
                    if e.is_timeout() {
                        last_error = Some(ApiError::Timeout(retry.timeout_seconds));
                    } else if e.is_connect() {
                        last_error = Some(ApiError::ServiceUnavailable);
                    } else {
                        return Err(ApiError::RequestError(e));
                    }
                }
            }

            attempt += 1;
        }

        Err(last_error.unwrap_or(ApiError::ServiceUnavailable))
    }

    /// Parse successful response
    async fn parse_success_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        tracing::debug!("API response body: {}", text);

        // empty bodies (204, some DELETEs) deserialize as null
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str::<T>(text).map_err(|e| {
            tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
            ApiError::ParseError(format!("Failed to parse response: {}", e))
        })
    }

    /// Handle error response
    async fn handle_error_response(&self, response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let details = serde_json::from_str::<CloudError>(&text)
            .ok()
            .map(|e| Box::new(e.error));
        let message = details
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or(text);

        tracing::error!("API error response (HTTP {}): {}", status, message);
        ApiError::ApiError {
            status,
            message,
            details,
        }
    }
}

fn poll_target(headers: &HeaderMap) -> Option<PollTarget> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    header(AZURE_ASYNC_OPERATION)
        .map(PollTarget::AsyncOperation)
        .or_else(|| header(LOCATION.as_str()).map(PollTarget::Location))
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
