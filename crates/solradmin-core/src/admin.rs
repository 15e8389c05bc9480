//! Index and queue maintenance across a site's Solr cores.
//!
//! Per-core failures are collected into an [`OperationReport`] rather than
//! raised. Only the queue store path returns an error to the caller.

use std::sync::Arc;

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::config::AdminConfig;
use crate::error::AppError;
use crate::models::{
    CoreStatus, Operation, OperationReport, OperationResult, Site, SiteOverview,
};
use crate::registry::ConnectionRegistry;
use crate::traits::{CoreClient, QueueStore};

/// HTTP status Solr returns for a successful core reload.
const RELOAD_OK: u16 = 200;

/// Orchestrates the maintenance operations of a site.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use solradmin_core::{AdminConfig, AdministrationService, Site, StaticConnectionRegistry};
/// # use solradmin_core::{AppError, QueueStore};
/// # struct NoQueue;
/// # #[async_trait::async_trait]
/// # impl QueueStore for NoQueue {
/// #     async fn delete_items_by_site(&self, _: &Site) -> Result<u64, AppError> { Ok(0) }
/// #     async fn count_items_by_site(&self, _: &Site) -> Result<u64, AppError> { Ok(0) }
/// # }
///
/// # async fn example() {
/// let service = AdministrationService::new(
///     Arc::new(StaticConnectionRegistry::new()),
///     Arc::new(NoQueue),
///     AdminConfig::default(),
/// );
/// let site = Site::new("example", "Example", "abc123");
/// let report = service.empty_index(&site).await;
/// assert!(report.is_success());
/// # }
/// ```
#[derive(Clone)]
pub struct AdministrationService {
    registry: Arc<dyn ConnectionRegistry>,
    queue: Arc<dyn QueueStore>,
    config: AdminConfig,
}

impl AdministrationService {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        queue: Arc<dyn QueueStore>,
        config: AdminConfig,
    ) -> Self {
        Self {
            registry,
            queue,
            config,
        }
    }

    /// Deletes every document of `site` from each of its cores and commits.
    ///
    /// A failing core is recorded and the remaining cores are still processed.
    /// Cores may be processed concurrently; results are always reported in
    /// registry order.
    pub async fn empty_index(&self, site: &Site) -> OperationReport {
        let mut report = OperationReport::new(Operation::EmptyIndex, &site.id);
        let connections = self.registry.connections_for_site(site);

        if connections.is_empty() {
            info!("Site {} has no cores, nothing to empty", site.id);
            return report;
        }

        info!(
            "Emptying index of site {} on {} core(s)",
            site.id,
            connections.len()
        );

        let query = site.delete_query();
        let query = query.as_str();
        let results: Vec<OperationResult> = stream::iter(connections)
            .map(|core| async move { empty_core(core.as_ref(), query).await })
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        for result in results {
            report.add(result);
        }

        info!(
            "Empty index for site {}: {} succeeded, {} failed",
            site.id,
            report.successful_count(),
            report.failed_count()
        );
        report
    }

    /// Removes every queue item of `site`.
    ///
    /// # Errors
    ///
    /// Any store error is returned unchanged.
    pub async fn clear_queue(&self, site: &Site) -> Result<u64, AppError> {
        info!("Clearing index queue of site {}", site.id);
        let removed = self.queue.delete_items_by_site(site).await?;
        info!("Removed {} queue item(s) for site {}", removed, site.id);
        Ok(removed)
    }

    /// Reloads each core of `site` in registry order.
    ///
    /// Stops at the first core that does not answer HTTP 200; later cores are
    /// listed as skipped.
    pub async fn reload_configuration(&self, site: &Site) -> OperationReport {
        let mut report = OperationReport::new(Operation::ReloadConfiguration, &site.id);
        let connections = self.registry.connections_for_site(site);

        for (idx, core) in connections.iter().enumerate() {
            let name = core.core_name();
            let failure = match core.reload_core().await {
                Ok(RELOAD_OK) => None,
                Ok(status) => Some(format!("HTTP {}", status)),
                Err(e) => Some(e.to_string()),
            };

            match failure {
                None => {
                    info!("Reloaded core {}", name);
                    report.add(OperationResult::success(name));
                }
                Some(detail) => {
                    warn!("Failed to reload core {}: {}", name, detail);
                    report.add(OperationResult::failure(name, detail));
                    report.skipped = connections[idx + 1..]
                        .iter()
                        .map(|c| c.core_name().to_string())
                        .collect();
                    break;
                }
            }
        }

        report
    }

    /// Summarizes the site's cores and queue.
    ///
    /// # Errors
    ///
    /// Returns the store error if the queue cannot be counted.
    pub async fn overview(&self, site: &Site) -> Result<SiteOverview, AppError> {
        let connections = self.registry.connections_for_site(site);
        let cores = join_all(connections.iter().map(|core| async move {
            CoreStatus {
                core_name: core.core_name().to_string(),
                reachable: core.ping().await,
            }
        }))
        .await;

        let queue_items = self.queue.count_items_by_site(site).await?;

        Ok(SiteOverview {
            site: site.clone(),
            cores,
            queue_items,
        })
    }
}

async fn empty_core(core: &dyn CoreClient, query: &str) -> OperationResult {
    let name = core.core_name();
    match delete_and_commit(core, query).await {
        Ok(()) => {
            info!("Emptied core {}", name);
            OperationResult::success(name)
        }
        Err(e) => {
            warn!("Failed to empty core {}: {}", name, e);
            OperationResult::failure(name, e.to_string())
        }
    }
}

async fn delete_and_commit(core: &dyn CoreClient, query: &str) -> Result<(), AppError> {
    core.delete_by_query(query).await?;
    core.commit(false, false, false).await
}
