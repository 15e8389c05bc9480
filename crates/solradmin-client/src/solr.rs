use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use solradmin_core::config::HttpConfig;
use solradmin_core::error::AppError;
use solradmin_core::models::CoreConnection;
use solradmin_core::traits::CoreClient;
use tokio::time::sleep;
use tracing::debug;

/// Error body Solr sends alongside non-success statuses.
///
/// Solr reference: <https://solr.apache.org/guide/solr/latest/configuration-guide/requesthandlers-searchcomponents.html>
///
/// ```json
/// {
///     "responseHeader": {"status": 400, "QTime": 1},
///     "error": {"msg": "undefined field siteHash", "code": 400}
/// }
/// ```
#[derive(Deserialize, Debug)]
struct SolrErrorResponse {
    error: SolrErrorDetail,
}

#[derive(Deserialize, Debug)]
struct SolrErrorDetail {
    msg: Option<String>,
    #[allow(dead_code)]
    code: Option<u16>,
}

/// Builds the HTTP client shared by all core clients.
///
/// # Errors
///
/// Returns `AppError::Transport` if the HTTP client cannot be built.
pub fn build_http_client(config: &HttpConfig) -> Result<Client, AppError> {
    Client::builder()
        .user_agent("solradmin/0.1")
        .timeout(config.timeout)
        .build()
        .map_err(|e| AppError::Transport(e.to_string()))
}

/// HTTP client for the administrative API of one Solr core.
///
/// # Examples
///
/// ```no_run
/// use solradmin_client::SolrCoreClient;
/// use solradmin_core::{CoreClient, CoreConnection, HttpConfig};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let connection = CoreConnection::new("core_en", Url::parse("http://localhost:8983/solr/")?);
/// let client = SolrCoreClient::new(&connection, &HttpConfig::default())?;
/// let status = client.reload_core().await?;
/// println!("reload answered HTTP {}", status);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SolrCoreClient {
    client: Client,
    base_url: Url,
    core_name: String,
    config: HttpConfig,
}

impl SolrCoreClient {
    /// Creates a client with its own connection pool.
    pub fn new(connection: &CoreConnection, config: &HttpConfig) -> Result<Self, AppError> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(client, connection, config))
    }

    /// Creates a client on top of an existing connection pool.
    pub fn with_client(client: Client, connection: &CoreConnection, config: &HttpConfig) -> Self {
        Self {
            client,
            base_url: connection.base_url.clone(),
            core_name: connection.core_name.clone(),
            config: config.clone(),
        }
    }

    fn core_url(&self, path: &str) -> Result<Url, AppError> {
        let mut url = self
            .base_url
            .join(&format!("{}/{}", self.core_name, path))
            .map_err(|e| AppError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut().append_pair("wt", "json");
        Ok(url)
    }

    fn update_url(&self) -> Result<Url, AppError> {
        self.core_url("update")
    }

    fn commit_url(
        &self,
        soft_commit: bool,
        wait_searcher: bool,
        wait_flush: bool,
    ) -> Result<Url, AppError> {
        let mut url = self.update_url()?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("commit", "true")
                .append_pair("softCommit", bool_param(soft_commit))
                .append_pair("waitSearcher", bool_param(wait_searcher));
            if wait_flush {
                pairs.append_pair("waitFlush", "true");
            }
        }
        Ok(url)
    }

    fn reload_url(&self) -> Result<Url, AppError> {
        let mut url = self
            .base_url
            .join("admin/cores")
            .map_err(|e| AppError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("action", "RELOAD")
            .append_pair("core", &self.core_name)
            .append_pair("wt", "json");
        Ok(url)
    }

    /// Sends a request, retrying transient failures with linear backoff.
    ///
    /// Retries on:
    /// - Connection errors
    /// - Timeouts
    /// - Server errors (5xx)
    ///
    /// The final response is returned whatever its status; only transport
    /// failures become errors.
    async fn send_with_retry<F>(&self, build: F) -> Result<Response, AppError>
    where
        F: Fn() -> RequestBuilder,
    {
        let attempts = self.config.max_retries.max(1);
        let mut last_error = AppError::Generic("No attempts made".to_string());

        for attempt in 1..=attempts {
            match build().send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_server_error() && attempt < attempts {
                        debug!(
                            "Core {} answered HTTP {}, retrying ({}/{})",
                            self.core_name,
                            status.as_u16(),
                            attempt,
                            attempts
                        );
                        sleep(self.config.retry_base_delay * attempt).await;
                        continue;
                    }
                    return Ok(resp);
                }
                Err(e) => {
                    last_error = if e.is_timeout() {
                        AppError::Timeout(self.config.timeout.as_secs())
                    } else if e.is_connect() {
                        AppError::Transport(format!("Connection failed: {}", e))
                    } else {
                        AppError::Transport(e.to_string())
                    };

                    if attempt < attempts && last_error.is_retryable() {
                        debug!(
                            "Request to core {} failed, retrying ({}/{}): {}",
                            self.core_name, attempt, attempts, last_error
                        );
                        sleep(self.config.retry_base_delay * attempt).await;
                        continue;
                    }
                    return Err(last_error);
                }
            }
        }

        Err(last_error)
    }
}

fn bool_param(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Maps a non-success response to `AppError::Protocol`, using Solr's error
/// message when the body carries one.
async fn ensure_success(resp: Response) -> Result<(), AppError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = resp.text().await.unwrap_or_default();
    Err(protocol_error(status, &body))
}

fn protocol_error(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<SolrErrorResponse>(body)
        .ok()
        .and_then(|r| r.error.msg)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });
    AppError::Protocol {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl CoreClient for SolrCoreClient {
    fn core_name(&self) -> &str {
        &self.core_name
    }

    async fn delete_by_query(&self, query: &str) -> Result<(), AppError> {
        let url = self.update_url()?;
        let body = json!({ "delete": { "query": query } });
        debug!("Deleting by query '{}' on core {}", query, self.core_name);
        let resp = self
            .send_with_retry(|| self.client.post(url.clone()).json(&body))
            .await?;
        ensure_success(resp).await
    }

    async fn commit(
        &self,
        soft_commit: bool,
        wait_searcher: bool,
        wait_flush: bool,
    ) -> Result<(), AppError> {
        let url = self.commit_url(soft_commit, wait_searcher, wait_flush)?;
        debug!("Committing core {}", self.core_name);
        let resp = self
            .send_with_retry(|| self.client.post(url.clone()))
            .await?;
        ensure_success(resp).await
    }

    async fn reload_core(&self) -> Result<u16, AppError> {
        let url = self.reload_url()?;
        debug!("Reloading core {}", self.core_name);
        let resp = self
            .send_with_retry(|| self.client.get(url.clone()))
            .await?;
        Ok(resp.status().as_u16())
    }

    async fn ping(&self) -> bool {
        let Ok(url) = self.core_url("admin/ping") else {
            return false;
        };
        match self.client.get(url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("Ping of core {} failed: {}", self.core_name, e);
                false
            }
        }
    }
}
