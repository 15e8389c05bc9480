use thiserror::Error;

/// Application-wide error types.
///
/// This enum represents every error that can occur while administering Solr
/// cores and the index queue. It uses the `thiserror` crate for ergonomic error
/// handling and automatic conversion from underlying library errors.
///
/// # Error Kinds
///
/// - Transport-kind: [`AppError::Transport`] and [`AppError::Timeout`], a core
///   could not be reached.
/// - Protocol-kind: [`AppError::Protocol`], a core answered with a non-success status.
/// - Store-kind: [`AppError::Store`], the index queue could not be modified.
///
/// # Error Conversion
///
/// - `sqlx::Error` → `AppError::Store`
/// - `serde_json::Error` → `AppError::Serialization`
///
/// # Examples
///
/// ```no_run
/// use solradmin_core::error::AppError;
///
/// fn example() -> Result<(), AppError> {
///     Err(AppError::Generic("Something went wrong".to_string()))
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Network or connection error while reaching a core.
    ///
    /// This error occurs when a request fails due to connectivity issues,
    /// DNS resolution failures, or the Solr server being unreachable.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request timeout.
    ///
    /// This error occurs when a request takes longer than the configured timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// A core answered with a non-success HTTP status.
    #[error("Solr returned HTTP {status}: {message}")]
    Protocol { status: u16, message: String },

    /// Index queue operation failed.
    ///
    /// This error wraps all errors from SQLx database operations, including
    /// connection failures, query errors, and constraint violations.
    #[error("Queue store error: {0}")]
    Store(#[from] sqlx::Error),

    /// The requested site is not configured.
    #[error("Site not found: {0}")]
    SiteNotFound(String),

    /// URL parsing failed.
    ///
    /// This error occurs when a configured Solr base URL cannot be parsed or
    /// cannot be joined with a core path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The sites configuration file is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic application error for cases not covered by specific variants.
    ///
    /// Use this sparingly - prefer creating specific error variants
    /// for better error handling and debugging.
    #[error("Error: {0}")]
    Generic(String),
}

impl AppError {
    /// Returns a user-friendly error message suitable for CLI output.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Store(e) => {
                if e.to_string().contains("connection") {
                    "Cannot connect to the queue database. Is PostgreSQL running?\n   Check DATABASE_URL.".to_string()
                } else {
                    format!("Queue store error: {}", e)
                }
            }
            AppError::Transport(msg) => {
                format!(
                    "Cannot reach Solr: {}\n   Check that the server is running and the base URL is correct.",
                    msg
                )
            }
            AppError::Timeout(secs) => {
                format!(
                    "Request timed out after {} seconds.\n   The Solr server may be overloaded. Try again later.",
                    secs
                )
            }
            AppError::Protocol { status, message } => match status {
                401 | 403 => format!(
                    "Solr rejected the request (HTTP {}). Check credentials.",
                    status
                ),
                404 => format!("Solr core not found (HTTP 404): {}", message),
                _ => format!("Solr returned HTTP {}: {}", status, message),
            },
            AppError::SiteNotFound(id) => {
                format!(
                    "Unknown site: {}\n   Run `solradmin sites` to list configured sites.",
                    id
                )
            }
            AppError::Config(msg) => {
                format!("Configuration error: {}\n   Check your sites.toml file.", msg)
            }
            _ => self.to_string(),
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// # Examples
    ///
    /// ```
    /// use solradmin_core::error::AppError;
    ///
    /// // Transport errors are retryable
    /// let err = AppError::Transport("connection reset".to_string());
    /// assert!(err.is_retryable());
    ///
    /// // Server-side failures are retryable
    /// let err = AppError::Protocol { status: 503, message: "unavailable".to_string() };
    /// assert!(err.is_retryable());
    ///
    /// // Missing cores are NOT retryable
    /// let err = AppError::Protocol { status: 404, message: "no core".to_string() };
    /// assert!(!err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Transport(_) | AppError::Timeout(_) => true,
            AppError::Protocol { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
