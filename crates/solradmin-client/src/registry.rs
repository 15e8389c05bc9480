//! Builds a [`StaticConnectionRegistry`] of live Solr clients from the sites file.

use std::sync::Arc;

use solradmin_core::config::SitesConfig;
use solradmin_core::error::AppError;
use solradmin_core::registry::StaticConnectionRegistry;
use tracing::debug;

use crate::solr::{build_http_client, SolrCoreClient};

/// Creates one [`SolrCoreClient`] per configured core, all sharing a single
/// HTTP connection pool. Cores keep the order of the configuration file.
///
/// # Errors
///
/// Returns `AppError::InvalidUrl` if a core's base URL cannot be parsed, or
/// `AppError::Transport` if the HTTP client cannot be built.
pub fn registry_from_config(config: &SitesConfig) -> Result<StaticConnectionRegistry, AppError> {
    let http = config.http_config();
    let client = build_http_client(&http)?;
    let mut registry = StaticConnectionRegistry::new();

    for site in &config.sites {
        registry.register_site(site.id.clone());
        for connection in config.connections(&site.id)? {
            debug!(
                "Registering core {} ({}) for site {}",
                connection.core_name, connection.base_url, site.id
            );
            let core = SolrCoreClient::with_client(client.clone(), &connection, &http);
            registry.register(site.id.clone(), Arc::new(core));
        }
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solradmin_core::registry::ConnectionRegistry;

    #[test]
    fn test_registry_from_config() {
        let config = SitesConfig::from_toml(
            r#"
solr_url = "http://localhost:8983/solr/"

[[sites]]
id = "example"
site_hash = "abc"
cores = [{ name = "core_en" }, { name = "core_de" }]

[[sites]]
id = "empty"
site_hash = "def"
"#,
        )
        .unwrap();

        let registry = registry_from_config(&config).unwrap();
        assert_eq!(registry.site_count(), 2);

        let example = config.site("example").unwrap();
        let names: Vec<String> = registry
            .connections_for_site(&example)
            .iter()
            .map(|c| c.core_name().to_string())
            .collect();
        assert_eq!(names, vec!["core_en", "core_de"]);

        let empty = config.site("empty").unwrap();
        assert!(registry.connections_for_site(&empty).is_empty());
    }

    #[test]
    fn test_registry_rejects_bad_url() {
        let config = SitesConfig::from_toml(
            r#"
[[sites]]
id = "example"
site_hash = "abc"
cores = [{ name = "core_en", base_url = "::not a url::" }]
"#,
        )
        .unwrap();

        assert!(matches!(
            registry_from_config(&config),
            Err(AppError::InvalidUrl(_))
        ));
    }
}
