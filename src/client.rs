use crate::config::{CounterConfig, IncrementMethod};
use crate::errors::CounterError;
use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder,
    header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA},
};
use serde_json::Value;
use tracing::{debug, warn};

/// Remote service that owns the authoritative count.
#[async_trait]
pub trait CountingService: Send + Sync {
    /// Reads the current count without changing it.
    async fn read(&self) -> Result<Value, CounterError>;

    /// Bumps the count and returns the service's answer.
    async fn increment(&self) -> Result<Value, CounterError>;
}

pub struct HttpCounterClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    increment_method: IncrementMethod,
}

impl HttpCounterClient {
    pub fn new(config: &CounterConfig) -> Result<Self, CounterError> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|err| CounterError::config(format!("failed to build http client: {err}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            increment_method: config.increment_method,
        })
    }

    pub fn read_url(&self) -> &str {
        &self.base_url
    }

    pub fn increment_url(&self) -> String {
        format!("{}/up", self.base_url)
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Value, CounterError> {
        let request = match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        };

        debug!("counter request -> {url}");
        let response = request.send().await.map_err(|err| {
            warn!("counter request to {url} failed: {err}");
            CounterError::network(err)
        })?;

        let status = response.status();
        debug!("counter status {status}");
        if !status.is_success() {
            warn!("counter service answered {status} for {url}");
            return Err(CounterError::NetworkFailure(format!("{url} returned {status}")));
        }

        let bytes = response.bytes().await.map_err(CounterError::network)?;
        let body: Value = serde_json::from_slice(&bytes).map_err(|err| {
            warn!("counter response from {url} is not json: {err}");
            CounterError::MalformedResponse(err.to_string())
        })?;
        debug!("counter body {body}");
        if !body.is_object() {
            warn!("counter response from {url} is not an object: {body}");
            return Err(CounterError::MalformedResponse(format!("expected a json object, got {body}")));
        }
        Ok(body)
    }
}

#[async_trait]
impl CountingService for HttpCounterClient {
    async fn read(&self) -> Result<Value, CounterError> {
        let url = self.read_url();
        self.send(self.client.get(url), url).await
    }

    async fn increment(&self) -> Result<Value, CounterError> {
        let url = self.increment_url();
        let request = match self.increment_method {
            IncrementMethod::Get => self.client.get(&url),
            IncrementMethod::Post => self.client.post(&url),
        };
        self.send(request, &url).await
    }
}
