//! Resolution of a site's core connections.

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::Site;
use crate::traits::CoreClient;

/// Resolves the cores serving a site.
pub trait ConnectionRegistry: Send + Sync {
    /// Returns the site's core clients in registration order.
    ///
    /// A site without cores yields an empty list, which is not a failure.
    fn connections_for_site(&self, site: &Site) -> Vec<Arc<dyn CoreClient>>;
}

/// Registry populated once at startup.
#[derive(Default, Clone)]
pub struct StaticConnectionRegistry {
    sites: HashMap<String, Vec<Arc<dyn CoreClient>>>,
}

impl StaticConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a core to a site. Cores are resolved in the order they were registered.
    pub fn register(&mut self, site_id: impl Into<String>, client: Arc<dyn CoreClient>) {
        self.sites.entry(site_id.into()).or_default().push(client);
    }

    /// Makes a site known without any cores.
    pub fn register_site(&mut self, site_id: impl Into<String>) {
        self.sites.entry(site_id.into()).or_default();
    }

    /// Number of known sites.
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }
}

impl ConnectionRegistry for StaticConnectionRegistry {
    fn connections_for_site(&self, site: &Site) -> Vec<Arc<dyn CoreClient>> {
        self.sites.get(&site.id).cloned().unwrap_or_default()
    }
}
