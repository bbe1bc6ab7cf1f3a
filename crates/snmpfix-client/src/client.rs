//! Main DNA Center API client implementation.

use crate::api::*;
use crate::config::PollConfig;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use snmpfix_core::{Result, SnmpFixError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Token endpoint
const AUTH_PATH: &str = "/dna/system/api/v1/auth/token";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Header carrying the session token
const TOKEN_HEADER: &str = "X-Auth-Token";

/// Authenticated DNA Center API client
#[derive(Clone)]
pub struct DnacClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    token: String,
    base_url: String,
    timeout: Duration,
    poll: PollConfig,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(rename = "Token")]
    token: String,
}

impl DnacClient {
    /// Create a builder for the controller at `base_url`
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> DnacClientBuilder {
        DnacClientBuilder::new(base_url)
    }

    /// Access network device inventory endpoints
    #[must_use]
    pub fn devices(&self) -> DevicesApi<'_> {
        DevicesApi::new(self)
    }

    /// Access configuration archive endpoints
    #[must_use]
    pub fn archive(&self) -> ArchiveApi<'_> {
        ArchiveApi::new(self)
    }

    /// Access task endpoints
    #[must_use]
    pub fn tasks(&self) -> TaskApi<'_> {
        TaskApi::new(self)
    }

    /// Access file endpoints
    #[must_use]
    pub fn files(&self) -> FileApi<'_> {
        FileApi::new(self)
    }

    /// Access template programmer endpoints
    #[must_use]
    pub fn templates(&self) -> TemplatesApi<'_> {
        TemplatesApi::new(self)
    }

    /// Polling settings for long-running jobs
    pub(crate) fn poll(&self) -> &PollConfig {
        &self.inner.poll
    }

    /// Perform a GET request
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_with_query(path, &[]).await
    }

    /// Perform a GET request with query parameters
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = self.build_url(path);
        debug!(url = %url, params = params.len(), "GET request");

        let response = self
            .inner
            .http
            .get(&url)
            .header(TOKEN_HEADER, &self.inner.token)
            .query(params)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        self.handle_response(response).await
    }

    /// Perform a GET request returning raw bytes
    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.build_url(path);
        debug!(url = %url, "GET (binary) request");

        let response = self
            .inner
            .http
            .get(&url)
            .header(TOKEN_HEADER, &self.inner.token)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if status.is_success() {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| self.transport_error(&e))?;
            Ok(bytes.to_vec())
        } else {
            handle_error(status.as_u16(), response).await
        }
    }

    /// Perform a POST request with JSON body
    pub(crate) async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        debug!(url = %url, "POST request");

        let response = self
            .inner
            .http
            .post(&url)
            .header(TOKEN_HEADER, &self.inner.token)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        self.handle_response(response).await
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    fn transport_error(&self, err: &reqwest::Error) -> SnmpFixError {
        transport_error(err, self.inner.timeout)
    }

    /// Handle an API response that returns JSON
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| self.transport_error(&e))?;
            serde_json::from_str(&body).map_err(SnmpFixError::Json)
        } else {
            handle_error(status.as_u16(), response).await
        }
    }
}

fn transport_error(err: &reqwest::Error, timeout: Duration) -> SnmpFixError {
    if err.is_timeout() {
        SnmpFixError::Timeout(timeout.as_secs())
    } else if err.is_connect() {
        SnmpFixError::Connection(err.to_string())
    } else {
        SnmpFixError::Http(err.to_string())
    }
}

/// Convert an error response to a `SnmpFixError`
async fn handle_error<T>(status: u16, response: reqwest::Response) -> Result<T> {
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or(body);

    match status {
        401 | 403 => Err(SnmpFixError::Unauthorized),
        404 => Err(SnmpFixError::NotFound { resource: message }),
        _ => {
            warn!(status, %message, "controller returned an error");
            Err(SnmpFixError::Api {
                code: status,
                message,
            })
        }
    }
}

/// Pull the most specific message out of a controller error body
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let candidates = [
        value.pointer("/response/detail"),
        value.pointer("/response/message"),
        value.get("message"),
        value.get("error"),
    ];
    let message = candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().map(String::from));
    message
}

/// Builder for configuring a [`DnacClient`]
pub struct DnacClientBuilder {
    base_url: String,
    username: String,
    password: String,
    timeout: Duration,
    user_agent: String,
    accept_invalid_certs: bool,
    poll: PollConfig,
}

impl DnacClientBuilder {
    /// Create a new builder for the controller at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: String::new(),
            password: String::new(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("snmpfix/{}", env!("CARGO_PKG_VERSION")),
            accept_invalid_certs: false,
            poll: PollConfig::default(),
        }
    }

    /// Set the login credentials
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Accept self-signed controller certificates
    #[must_use]
    pub const fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Set polling configuration for long-running jobs
    #[must_use]
    pub const fn poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Build the HTTP client and log in
    pub async fn connect(self) -> Result<DnacClient> {
        let parsed = Url::parse(&self.base_url)
            .map_err(|e| SnmpFixError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SnmpFixError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }
        if self.username.is_empty() {
            return Err(SnmpFixError::Config("controller username is not set".into()));
        }
        let base_url = self.base_url.trim_end_matches('/').to_string();

        let builder = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true);
        #[cfg(any(feature = "rustls", feature = "native-tls"))]
        let builder = builder.danger_accept_invalid_certs(self.accept_invalid_certs);
        let http = builder
            .build()
            .map_err(|e| SnmpFixError::Http(e.to_string()))?;

        info!(url = %base_url, user = %self.username, "authenticating to controller");
        let response = http
            .post(format!("{base_url}{AUTH_PATH}"))
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| transport_error(&e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return handle_error(status.as_u16(), response).await;
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SnmpFixError::Http(e.to_string()))?;

        Ok(DnacClient {
            inner: Arc::new(ClientInner {
                http,
                token: token.token,
                base_url,
                timeout: self.timeout,
                poll: self.poll,
            }),
        })
    }
}
