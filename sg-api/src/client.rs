//! HTTP client for the backend REST API.
//!
//! Handles project headers, session transport via fallback cookies, timeout
//! management, optional retry with exponential backoff, and mapping error
//! responses onto `SgError`.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use sg_core::config::{AppConfig, BackendConfig};
use sg_core::constants;
use sg_core::error::{SgError, SgResult};
use sg_models::LocalStorage;

use crate::backend::Collection;
use crate::response::BackendError;

/// Retry configuration for HTTP requests.
///
/// Retrying is off unless `max_retries` is raised; multipart uploads are
/// never retried.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Base delay between retries (doubles each attempt).
    pub base_delay: Duration,
    /// Maximum delay cap.
    pub max_delay: Duration,
    /// HTTP status codes that trigger a retry.
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(4),
            retryable_statuses: vec![502, 503, 504],
        }
    }
}

/// HTTP client bound to one backend project.
#[derive(Clone)]
pub struct ApiClient {
    inner: Client,
    /// Sanitized endpoint including the version path, no trailing slash.
    endpoint: String,
    /// Project, database, collection and bucket ids.
    config: BackendConfig,
    /// Default request timeout.
    timeout: Duration,
    /// Extended timeout for uploads.
    extended_timeout: Duration,
    /// Custom headers from config.
    custom_headers: Vec<(String, String)>,
    /// Retry configuration.
    retry_config: RetryConfig,
    /// Current fallback cookie list, replayed on every request.
    fallback_cookies: Arc<RwLock<Option<String>>>,
    /// Where fallback cookies are persisted between runs.
    storage: Option<LocalStorage>,
}

impl ApiClient {
    /// Create a new ApiClient from backend configuration.
    pub fn new(config: &BackendConfig) -> SgResult<Self> {
        let endpoint = AppConfig::sanitize_endpoint(&config.endpoint);
        if endpoint.is_empty() {
            return Err(SgError::MissingConfig("backend.endpoint".into()));
        }
        Url::parse(&endpoint)
            .map_err(|e| SgError::Config(format!("invalid endpoint {endpoint}: {e}")))?;

        let mut builder = Client::builder()
            .timeout(Duration::from_millis(config.api_timeout_ms))
            .connect_timeout(Duration::from_secs(15))
            .pool_idle_timeout(Duration::from_secs(90))
            .cookie_store(true);

        if config.accept_self_signed_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let inner = builder
            .build()
            .map_err(|e| SgError::Http(format!("failed to build HTTP client: {e}")))?;

        let timeout = Duration::from_millis(config.api_timeout_ms);
        let extended_timeout = timeout * constants::EXTENDED_TIMEOUT_MULTIPLIER as u32;

        let mut custom_headers: Vec<(String, String)> = config
            .custom_headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        custom_headers.sort();

        let retry_config = RetryConfig {
            max_retries: config.max_retries,
            ..RetryConfig::default()
        };

        Ok(Self {
            inner,
            endpoint,
            config: config.clone(),
            timeout,
            extended_timeout,
            custom_headers,
            retry_config,
            fallback_cookies: Arc::new(RwLock::new(None)),
            storage: None,
        })
    }

    /// Persist session cookies in `storage`, resuming any session already there.
    pub fn with_storage(mut self, storage: LocalStorage) -> SgResult<Self> {
        let stored = storage.get(constants::COOKIE_FALLBACK_KEY)?;
        if stored.is_some() {
            debug!("resuming stored session cookies");
        }
        self.fallback_cookies = Arc::new(RwLock::new(stored));
        self.storage = Some(storage);
        Ok(self)
    }

    /// Set custom retry configuration.
    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// The sanitized API endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The project id sent with every request.
    pub fn project_id(&self) -> &str {
        &self.config.project_id
    }

    /// The database id documents live in.
    pub fn database_id(&self) -> &str {
        &self.config.database_id
    }

    /// The storage bucket id.
    pub fn storage_id(&self) -> &str {
        &self.config.storage_id
    }

    /// Resolve a collection to its configured id.
    pub fn collection_id(&self, collection: Collection) -> &str {
        match collection {
            Collection::Users => &self.config.user_collection_id,
            Collection::Posts => &self.config.post_collection_id,
            Collection::Saves => &self.config.saves_collection_id,
            Collection::Likes => &self.config.likes_collection_id,
        }
    }

    // --- Session cookies ---

    /// Current fallback cookie list, if any.
    pub async fn fallback_cookies(&self) -> Option<String> {
        self.fallback_cookies.read().await.clone()
    }

    /// Replace the fallback cookie list and persist it.
    pub async fn set_fallback_cookies(&self, value: &str) -> SgResult<()> {
        {
            let mut guard = self.fallback_cookies.write().await;
            *guard = Some(value.to_string());
        }
        if let Some(storage) = &self.storage {
            storage.set(constants::COOKIE_FALLBACK_KEY, value)?;
        }
        Ok(())
    }

    /// Forget the session locally by writing the empty-list marker.
    pub async fn clear_session(&self) -> SgResult<()> {
        debug!("clearing local session cookies");
        self.set_fallback_cookies(constants::EMPTY_COOKIE_FALLBACK).await
    }

    /// Store fallback cookies the backend sent with a response.
    async fn capture_session(&self, response: &Response) {
        let Some(value) = response
            .headers()
            .get(constants::FALLBACK_COOKIES_HEADER)
            .and_then(|v| v.to_str().ok())
        else {
            return;
        };
        if let Err(e) = self.set_fallback_cookies(value).await {
            warn!("failed to persist session cookies: {e}");
        }
    }

    // --- Request building ---

    /// Build the full URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    /// Build a URL that can be fetched without headers (image previews,
    /// avatars): the project id travels as a query parameter.
    pub fn public_url(&self, path: &str, params: &[(&str, String)]) -> SgResult<Url> {
        let mut url = Url::parse(&self.url(path))
            .map_err(|e| SgError::Internal(format!("invalid url for {path}: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("project", &self.config.project_id);
        }
        Ok(url)
    }

    /// Apply project, format, session and custom headers to a request builder.
    async fn apply_headers(&self, mut builder: RequestBuilder) -> RequestBuilder {
        builder = builder
            .header("X-Appwrite-Project", self.config.project_id.as_str())
            .header("X-Appwrite-Response-Format", constants::RESPONSE_FORMAT);

        if let Some(cookies) = self.fallback_cookies.read().await.as_deref() {
            builder = builder.header(constants::FALLBACK_COOKIES_HEADER, cookies);
        }

        for (key, value) in &self.custom_headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        builder
    }

    /// Internal: build a request for the given method, path, query, timeout, and optional JSON body.
    async fn build_request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        timeout: Duration,
        body: Option<&serde_json::Value>,
    ) -> RequestBuilder {
        let mut builder = self.inner.request(method, self.url(path)).timeout(timeout);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(b) = body {
            builder = builder.json(b);
        }
        self.apply_headers(builder).await
    }

    /// Execute a request, retrying transport failures and gateway errors
    /// when the retry policy allows.
    async fn request_with_retry(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&serde_json::Value>,
    ) -> SgResult<Response> {
        debug!("{} {}", method, path);

        let mut last_error: Option<SgError> = None;

        for attempt in 0..=self.retry_config.max_retries {
            if attempt > 0 {
                let delay = self.calculate_retry_delay(attempt - 1);
                warn!(
                    "retrying {} {} (attempt {}/{}) after {:.1}s",
                    method,
                    path,
                    attempt + 1,
                    self.retry_config.max_retries + 1,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
            }

            let builder = self
                .build_request(method.clone(), path, query, self.timeout, body)
                .await;

            match builder.send().await {
                Ok(response) => {
                    let status = response.status();

                    if self
                        .retry_config
                        .retryable_statuses
                        .contains(&status.as_u16())
                        && attempt < self.retry_config.max_retries
                    {
                        warn!("retryable status {} from {}", status.as_u16(), path);
                        last_error = Some(SgError::ServerError {
                            status: status.as_u16(),
                            code: String::new(),
                            message: format!("retryable status {status}"),
                        });
                        continue;
                    }

                    self.capture_session(&response).await;
                    return Self::check_status(response).await;
                }
                Err(e) => {
                    let is_retryable = e.is_timeout() || e.is_connect();
                    let err = Self::classify_error(e);

                    if is_retryable && attempt < self.retry_config.max_retries {
                        warn!("retryable error on {}: {}", path, err);
                        last_error = Some(err);
                        continue;
                    }

                    return Err(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| SgError::Http("max retries exceeded".into())))
    }

    /// Calculate retry delay with exponential backoff.
    fn calculate_retry_delay(&self, attempt: u32) -> Duration {
        let base_ms = self.retry_config.base_delay.as_millis() as u64;
        let delay_ms = base_ms.saturating_mul(1u64 << attempt.min(16));
        let max_ms = self.retry_config.max_delay.as_millis() as u64;
        Duration::from_millis(delay_ms.min(max_ms))
    }

    // --- Public HTTP methods ---

    /// GET with query parameters, parsing the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> SgResult<T> {
        let resp = self.request_with_retry(Method::GET, path, query, None).await?;
        Self::parse_json(resp).await
    }

    /// POST a JSON body, parsing the JSON response.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> SgResult<T> {
        let resp = self
            .request_with_retry(Method::POST, path, &[], Some(body))
            .await?;
        Self::parse_json(resp).await
    }

    /// PATCH a JSON body, parsing the JSON response.
    pub async fn patch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> SgResult<T> {
        let resp = self
            .request_with_retry(Method::PATCH, path, &[], Some(body))
            .await?;
        Self::parse_json(resp).await
    }

    /// DELETE; the backend answers 204 with no body.
    pub async fn delete(&self, path: &str) -> SgResult<()> {
        self.request_with_retry(Method::DELETE, path, &[], None)
            .await
            .map(|_| ())
    }

    /// POST a multipart form (file uploads). Never retried: forms cannot be cloned.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> SgResult<T> {
        debug!("POST (multipart) {}", path);

        let builder = self
            .inner
            .post(self.url(path))
            .multipart(form)
            .timeout(self.extended_timeout);
        let builder = self.apply_headers(builder).await;

        let response = builder.send().await.map_err(Self::classify_error)?;
        self.capture_session(&response).await;
        let response = Self::check_status(response).await?;
        Self::parse_json(response).await
    }

    // --- Response helpers ---

    /// Deserialize a JSON response body.
    pub async fn parse_json<T: DeserializeOwned>(response: Response) -> SgResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| SgError::Serialization(format!("failed to parse response: {e}")))
    }

    /// Check the HTTP status code and convert error bodies to SgError.
    async fn check_status(response: Response) -> SgResult<Response> {
        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_MODIFIED {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = BackendError::from_body(status.as_u16(), &body);
        debug!("backend error {}: {} ({})", status.as_u16(), err.message, err.error_type);
        Err(err.into_sg_error(status.as_u16()))
    }

    /// Classify a reqwest error into an SgError variant.
    fn classify_error(e: reqwest::Error) -> SgError {
        if e.is_timeout() {
            SgError::Timeout(e.to_string())
        } else if e.is_connect() {
            SgError::Http(format!("connection failed: {e}"))
        } else {
            SgError::Http(e.to_string())
        }
    }
}
