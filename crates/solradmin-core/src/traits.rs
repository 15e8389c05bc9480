//! Collaborator interfaces consumed by [`AdministrationService`](crate::AdministrationService).

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::Site;

/// Administrative access to a single Solr core.
///
/// Implementations report transport failures as [`AppError::Transport`] or
/// [`AppError::Timeout`] and non-success responses as [`AppError::Protocol`].
#[async_trait]
pub trait CoreClient: Send + Sync {
    /// Name of the core this client talks to.
    fn core_name(&self) -> &str;

    /// Deletes every document matching `query`.
    async fn delete_by_query(&self, query: &str) -> Result<(), AppError>;

    /// Issues a commit.
    async fn commit(
        &self,
        soft_commit: bool,
        wait_searcher: bool,
        wait_flush: bool,
    ) -> Result<(), AppError>;

    /// Asks Solr to reload the core and returns the HTTP status of that call.
    ///
    /// A non-200 status is a value here, not an error.
    async fn reload_core(&self) -> Result<u16, AppError>;

    /// Returns true if the core answers its ping handler.
    async fn ping(&self) -> bool;
}

/// Durable backlog of items awaiting (re-)indexing.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Removes every queue item of `site` in one atomic operation and returns
    /// how many were removed.
    async fn delete_items_by_site(&self, site: &Site) -> Result<u64, AppError>;

    /// Counts the queue items of `site`.
    async fn count_items_by_site(&self, site: &Site) -> Result<u64, AppError>;
}
