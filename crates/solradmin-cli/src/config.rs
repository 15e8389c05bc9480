use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "solradmin")]
#[command(author, version, about = "Index and queue maintenance for Solr-backed sites")]
#[command(after_help = "Examples:
  solradmin sites
  solradmin status --site example
  solradmin empty-index --site example
  solradmin clear-queue --site example
  solradmin reload-configuration --site example --json")]
pub struct Config {
    /// PostgreSQL database connection URL (index queue)
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// Path to the sites.toml configuration file
    #[arg(short, long, env = "SOLRADMIN_CONFIG", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Print the outcome as JSON instead of a message
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Delete every document of a site from all of its cores
    EmptyIndex {
        /// Site identifier from sites.toml
        #[arg(short, long)]
        site: String,
    },
    /// Remove every pending or failed index queue item of a site
    ClearQueue {
        /// Site identifier from sites.toml
        #[arg(short, long)]
        site: String,
    },
    /// Reload the configuration of every core of a site
    ReloadConfiguration {
        /// Site identifier from sites.toml
        #[arg(short, long)]
        site: String,
    },
    /// Show a site's cores and queue size
    Status {
        /// Site identifier from sites.toml
        #[arg(short, long)]
        site: String,
    },
    /// List a site's index queue items
    #[command(after_help = "Example: solradmin queue --site example --limit 50")]
    Queue {
        /// Site identifier from sites.toml
        #[arg(short, long)]
        site: String,
        /// Maximum number of items to list
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// List configured sites
    Sites,
}

impl Command {
    /// The site a command operates on, if any.
    pub fn site(&self) -> Option<&str> {
        match self {
            Command::EmptyIndex { site }
            | Command::ClearQueue { site }
            | Command::ReloadConfiguration { site }
            | Command::Status { site }
            | Command::Queue { site, .. } => Some(site.as_str()),
            Command::Sites => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut full = vec!["solradmin", "--database-url", "postgresql://localhost/test"];
        full.extend_from_slice(args);
        Config::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_parse_empty_index() {
        let config = parse(&["empty-index", "--site", "example"]);
        assert_eq!(
            config.command,
            Command::EmptyIndex {
                site: "example".to_string()
            }
        );
        assert!(!config.json);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let config = parse(&[
            "reload-configuration",
            "-s",
            "example",
            "--json",
            "--config",
            "/tmp/sites.toml",
        ]);
        assert!(config.json);
        assert_eq!(config.config, Some(PathBuf::from("/tmp/sites.toml")));
        assert_eq!(config.command.site(), Some("example"));
    }

    #[test]
    fn test_parse_queue_default_limit() {
        let config = parse(&["queue", "--site", "example"]);
        assert_eq!(
            config.command,
            Command::Queue {
                site: "example".to_string(),
                limit: 20
            }
        );
    }

    #[test]
    fn test_site_is_required() {
        let result = Config::try_parse_from([
            "solradmin",
            "--database-url",
            "postgresql://localhost/test",
            "clear-queue",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_sites_has_no_site() {
        assert_eq!(parse(&["sites"]).command.site(), None);
    }

    #[test]
    fn test_database_url_is_optional() {
        let config = Config::try_parse_from(["solradmin", "sites", "--json"]).unwrap();
        assert_eq!(config.command, Command::Sites);
        assert!(config.json);
    }

    #[test]
    fn test_database_url_after_subcommand() {
        let config = Config::try_parse_from([
            "solradmin",
            "clear-queue",
            "--site",
            "example",
            "--database-url",
            "postgresql://localhost/test",
        ])
        .unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgresql://localhost/test")
        );
        assert_eq!(config.command.site(), Some("example"));
    }
}
