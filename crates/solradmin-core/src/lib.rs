//! solradmin Core - Domain types, error handling, configuration and
//! maintenance orchestration for Solr-backed sites.

pub mod admin;
pub mod config;
pub mod error;
pub mod messages;
pub mod models;
pub mod registry;
pub mod traits;

pub use admin::AdministrationService;
pub use config::{
    default_config_path, load_sites_config, AdminConfig, DbConfig, HttpConfig, SitesConfig,
};
pub use error::AppError;
pub use messages::{MessageCatalog, Notice, Severity};
pub use models::{
    CoreConnection, CoreStatus, Operation, OperationReport, OperationResult, OperationStatus,
    QueueItem, Site, SiteOverview,
};
pub use registry::{ConnectionRegistry, StaticConnectionRegistry};
pub use traits::{CoreClient, QueueStore};
