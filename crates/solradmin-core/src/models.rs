//! Domain types shared by the registry, the queue store and the service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use url::Url;

/// A site whose documents live in one or more Solr cores.
///
/// Sites are loaded from configuration and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Site {
    /// Stable identifier, also the queue partition key.
    pub id: String,
    /// Human-readable label used in messages.
    pub label: String,
    /// Value of the `siteHash` field on every document of this site.
    pub site_hash: String,
}

impl Site {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        site_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            site_hash: site_hash.into(),
        }
    }

    /// Derives a site hash from the site's domain and a global salt.
    ///
    /// The hash is the lowercase hex SHA-256 of `domain` followed by `salt`.
    ///
    /// # Examples
    ///
    /// ```
    /// use solradmin_core::Site;
    ///
    /// let hash = Site::derive_site_hash("www.example.org", "secret");
    /// assert_eq!(hash.len(), 64);
    /// assert_eq!(hash, Site::derive_site_hash("www.example.org", "secret"));
    /// ```
    pub fn derive_site_hash(domain: &str, salt: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(domain.as_bytes());
        hasher.update(salt.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Solr query that matches every document of this site.
    pub fn delete_query(&self) -> String {
        format!("siteHash:{}", self.site_hash)
    }
}

/// Address of one physical Solr core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConnection {
    pub core_name: String,
    /// Solr root, e.g. `http://localhost:8983/solr/`.
    pub base_url: Url,
}

impl CoreConnection {
    pub fn new(core_name: impl Into<String>, base_url: Url) -> Self {
        Self {
            core_name: core_name.into(),
            base_url,
        }
    }
}

/// A pending or failed indexing task.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct QueueItem {
    pub id: i64,
    pub site_id: String,
    pub item_type: String,
    pub item_uid: i64,
    pub changed_at: DateTime<Utc>,
    pub indexed_at: Option<DateTime<Utc>>,
    pub errors: Option<String>,
}

impl QueueItem {
    /// Returns true if the last indexing attempt recorded an error.
    pub fn has_failed(&self) -> bool {
        self.errors.as_deref().is_some_and(|e| !e.is_empty())
    }
}

/// The per-core maintenance operations that produce an [`OperationReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    EmptyIndex,
    ReloadConfiguration,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::EmptyIndex => "empty-index",
            Operation::ReloadConfiguration => "reload-configuration",
        }
    }
}

/// Final state of one operation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Succeeded,
    PartiallyFailed,
    Failed,
}

/// Outcome of an operation on a single core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    pub core_name: String,
    pub success: bool,
    pub error: Option<String>,
}

impl OperationResult {
    /// Creates a successful result.
    pub fn success(core_name: impl Into<String>) -> Self {
        Self {
            core_name: core_name.into(),
            success: true,
            error: None,
        }
    }

    /// Creates a failed result.
    pub fn failure(core_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            core_name: core_name.into(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Aggregated outcome of one operation across a site's cores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationReport {
    pub operation: Operation,
    pub site_id: String,
    /// Per-core results in registry order.
    pub results: Vec<OperationResult>,
    /// Cores left unattempted after a short-circuit.
    pub skipped: Vec<String>,
}

impl OperationReport {
    /// Creates an empty report.
    pub fn new(operation: Operation, site_id: impl Into<String>) -> Self {
        Self {
            operation,
            site_id: site_id.into(),
            results: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Adds a core result.
    pub fn add(&mut self, result: OperationResult) {
        self.results.push(result);
    }

    /// True iff every core result succeeded. An empty report is a success.
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }

    /// Cores on which the operation succeeded, in registry order.
    pub fn affected_cores(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.success)
            .map(|r| r.core_name.as_str())
            .collect()
    }

    /// Failed core results, in registry order.
    pub fn failures(&self) -> impl Iterator<Item = &OperationResult> {
        self.results.iter().filter(|r| !r.success)
    }

    /// The first core that failed, if any.
    pub fn failed_core(&self) -> Option<&OperationResult> {
        self.failures().next()
    }

    /// Returns the count of successful cores.
    pub fn successful_count(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Returns the count of failed cores.
    pub fn failed_count(&self) -> usize {
        self.results.len() - self.successful_count()
    }

    /// Classifies the run.
    ///
    /// Only `empty-index` can end partially failed; the other operations
    /// either succeed on every core or fail.
    pub fn status(&self) -> OperationStatus {
        if self.is_success() {
            OperationStatus::Succeeded
        } else if self.operation == Operation::EmptyIndex && self.successful_count() > 0 {
            OperationStatus::PartiallyFailed
        } else {
            OperationStatus::Failed
        }
    }
}

/// Reachability of one core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoreStatus {
    pub core_name: String,
    pub reachable: bool,
}

/// Landing view of a site's maintenance state.
#[derive(Debug, Clone, Serialize)]
pub struct SiteOverview {
    pub site: Site,
    /// Configured cores in registry order.
    pub cores: Vec<CoreStatus>,
    pub queue_items: u64,
}

impl SiteOverview {
    /// Maintenance is only possible when the site has at least one core.
    pub fn can_proceed(&self) -> bool {
        !self.cores.is_empty()
    }
}
