//! Configuration types for solradmin components.
//!
//! Sites and their cores are read from a TOML file:
//!
//! ```toml
//! site_hash_salt = "change-me"
//! solr_url = "http://localhost:8983/solr/"
//!
//! [http]
//! timeout_secs = 10
//!
//! [admin]
//! concurrency = 2
//!
//! [[sites]]
//! id = "example"
//! label = "Example Site"
//! domain = "www.example.org"
//! cores = [{ name = "core_en" }, { name = "core_de" }]
//!
//! [messages]
//! index_emptied_all = "Index geleert: {cores}"
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::AppError;
use crate::models::{CoreConnection, Site};

/// Database connection pool configuration.
pub struct DbConfig {
    pub max_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self { max_connections: 5 }
    }
}

/// HTTP client configuration for Solr calls.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_base_delay: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

/// Maintenance orchestration configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Upper bound on cores emptied in parallel.
    pub concurrency: usize,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}

/// Returns the default location of the sites file,
/// `<config dir>/solradmin/sites.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("solradmin").join("sites.toml"))
}

/// Reads and validates a sites file.
///
/// # Errors
///
/// Returns `AppError::Config` if the file cannot be read, is not valid TOML,
/// or fails validation.
pub fn load_sites_config(path: &Path) -> Result<SitesConfig, AppError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    let config = SitesConfig::from_toml(&raw)?;
    tracing::debug!(
        "Loaded {} site(s) from {}",
        config.sites.len(),
        path.display()
    );
    Ok(config)
}

/// Contents of the sites file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SitesConfig {
    /// Salt mixed into derived site hashes.
    #[serde(default)]
    pub site_hash_salt: String,
    /// Default Solr root for cores without their own `base_url`.
    #[serde(default)]
    pub solr_url: Option<String>,
    #[serde(default)]
    pub http: HttpSection,
    #[serde(default)]
    pub admin: AdminSection,
    #[serde(default)]
    pub sites: Vec<SiteEntry>,
    /// Message template overrides, keyed like the built-in catalog.
    #[serde(default)]
    pub messages: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpSection {
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub retry_base_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminSection {
    pub concurrency: Option<usize>,
}

/// One `[[sites]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteEntry {
    pub id: String,
    pub label: Option<String>,
    pub domain: Option<String>,
    pub site_hash: Option<String>,
    #[serde(default)]
    pub cores: Vec<CoreEntry>,
}

/// One core of a site.
#[derive(Debug, Clone, Deserialize)]
pub struct CoreEntry {
    pub name: String,
    pub base_url: Option<String>,
}

impl SitesConfig {
    /// Parses and validates a sites file from a string.
    pub fn from_toml(raw: &str) -> Result<Self, AppError> {
        let config: SitesConfig =
            toml::from_str(raw).map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        let mut seen = HashSet::new();
        for entry in &self.sites {
            if !seen.insert(entry.id.as_str()) {
                return Err(AppError::Config(format!("duplicate site id '{}'", entry.id)));
            }
            if entry.site_hash.is_none() && entry.domain.is_none() {
                return Err(AppError::Config(format!(
                    "site '{}' needs either site_hash or domain",
                    entry.id
                )));
            }
            for core in &entry.cores {
                if core.base_url.is_none() && self.solr_url.is_none() {
                    return Err(AppError::Config(format!(
                        "core '{}' of site '{}' has no base_url and no global solr_url is set",
                        core.name, entry.id
                    )));
                }
            }
        }
        if self.admin.concurrency == Some(0) {
            return Err(AppError::Config("admin.concurrency must be at least 1".to_string()));
        }
        Ok(())
    }

    fn entry(&self, id: &str) -> Result<&SiteEntry, AppError> {
        self.sites
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::SiteNotFound(id.to_string()))
    }

    /// Resolves a configured site.
    pub fn site(&self, id: &str) -> Result<Site, AppError> {
        let entry = self.entry(id)?;
        Ok(self.build_site(entry))
    }

    /// All configured sites, in file order.
    pub fn all_sites(&self) -> Vec<Site> {
        self.sites.iter().map(|e| self.build_site(e)).collect()
    }

    fn build_site(&self, entry: &SiteEntry) -> Site {
        let site_hash = match (&entry.site_hash, &entry.domain) {
            (Some(hash), _) => hash.clone(),
            (None, Some(domain)) => Site::derive_site_hash(domain, &self.site_hash_salt),
            // validate() rejects entries with neither
            (None, None) => String::new(),
        };
        Site::new(
            entry.id.clone(),
            entry.label.clone().unwrap_or_else(|| entry.id.clone()),
            site_hash,
        )
    }

    /// Core connections of a site, in file order.
    pub fn connections(&self, id: &str) -> Result<Vec<CoreConnection>, AppError> {
        let entry = self.entry(id)?;
        entry
            .cores
            .iter()
            .map(|core| {
                let raw = core
                    .base_url
                    .as_deref()
                    .or(self.solr_url.as_deref())
                    .ok_or_else(|| {
                        AppError::Config(format!("core '{}' has no base_url", core.name))
                    })?;
                Ok(CoreConnection::new(core.name.clone(), parse_base_url(raw)?))
            })
            .collect()
    }

    /// HTTP settings with file overrides applied on top of the defaults.
    pub fn http_config(&self) -> HttpConfig {
        let defaults = HttpConfig::default();
        HttpConfig {
            timeout: self
                .http
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            max_retries: self.http.max_retries.unwrap_or(defaults.max_retries),
            retry_base_delay: self
                .http
                .retry_base_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_base_delay),
        }
    }

    /// Admin settings with file overrides applied on top of the defaults.
    pub fn admin_config(&self) -> AdminConfig {
        let defaults = AdminConfig::default();
        AdminConfig {
            concurrency: self.admin.concurrency.unwrap_or(defaults.concurrency),
        }
    }
}

/// Parses a Solr root URL, forcing a trailing slash so core paths join below it.
fn parse_base_url(raw: &str) -> Result<Url, AppError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized).map_err(|e| AppError::InvalidUrl(format!("{}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
site_hash_salt = "salt"
solr_url = "http://localhost:8983/solr"

[http]
timeout_secs = 5

[admin]
concurrency = 2

[[sites]]
id = "example"
label = "Example Site"
domain = "www.example.org"
cores = [{ name = "core_en" }, { name = "core_de", base_url = "http://solr-de:8983/solr/" }]

[[sites]]
id = "empty"
site_hash = "fixed"

[messages]
index_emptied_all = "Done: {cores}"
"#;

    #[test]
    fn test_db_config_defaults() {
        let config = DbConfig::default();
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_http_config_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_base_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_admin_config_defaults() {
        assert_eq!(AdminConfig::default().concurrency, 4);
    }

    #[test]
    fn test_parse_sample() {
        let config = SitesConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.sites.len(), 2);

        let site = config.site("example").unwrap();
        assert_eq!(site.label, "Example Site");
        assert_eq!(site.site_hash, Site::derive_site_hash("www.example.org", "salt"));

        let empty = config.site("empty").unwrap();
        assert_eq!(empty.label, "empty");
        assert_eq!(empty.site_hash, "fixed");

        assert_eq!(config.messages["index_emptied_all"], "Done: {cores}");
    }

    #[test]
    fn test_connections_keep_file_order() {
        let config = SitesConfig::from_toml(SAMPLE).unwrap();
        let conns = config.connections("example").unwrap();
        let names: Vec<_> = conns.iter().map(|c| c.core_name.as_str()).collect();
        assert_eq!(names, vec!["core_en", "core_de"]);
        assert_eq!(conns[0].base_url.as_str(), "http://localhost:8983/solr/");
        assert_eq!(conns[1].base_url.as_str(), "http://solr-de:8983/solr/");

        assert!(config.connections("empty").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_site() {
        let config = SitesConfig::from_toml(SAMPLE).unwrap();
        assert!(matches!(config.site("nope"), Err(AppError::SiteNotFound(_))));
        assert!(matches!(config.connections("nope"), Err(AppError::SiteNotFound(_))));
    }

    #[test]
    fn test_overrides_applied() {
        let config = SitesConfig::from_toml(SAMPLE).unwrap();
        let http = config.http_config();
        assert_eq!(http.timeout, Duration::from_secs(5));
        assert_eq!(http.max_retries, 3);
        assert_eq!(config.admin_config().concurrency, 2);
    }

    #[test]
    fn test_duplicate_site_rejected() {
        let raw = r#"
[[sites]]
id = "a"
site_hash = "x"

[[sites]]
id = "a"
site_hash = "y"
"#;
        let err = SitesConfig::from_toml(raw).unwrap_err();
        assert!(err.to_string().contains("duplicate site id"));
    }

    #[test]
    fn test_site_without_hash_or_domain_rejected() {
        let raw = r#"
[[sites]]
id = "a"
"#;
        assert!(matches!(SitesConfig::from_toml(raw), Err(AppError::Config(_))));
    }

    #[test]
    fn test_core_without_url_rejected() {
        let raw = r#"
[[sites]]
id = "a"
site_hash = "x"
cores = [{ name = "core_en" }]
"#;
        assert!(matches!(SitesConfig::from_toml(raw), Err(AppError::Config(_))));
    }

    #[test]
    fn test_invalid_base_url() {
        let raw = r#"
[[sites]]
id = "a"
site_hash = "x"
cores = [{ name = "core_en", base_url = "not a url" }]
"#;
        let config = SitesConfig::from_toml(raw).unwrap();
        assert!(matches!(config.connections("a"), Err(AppError::InvalidUrl(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = load_sites_config(file.path()).unwrap();
        assert_eq!(config.all_sites().len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_sites_config(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
