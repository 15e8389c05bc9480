use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use solradmin_cli::output::{format_notice, format_overview, format_queue_items, format_sites};
use solradmin_cli::{Command, Config};
use solradmin_client::registry_from_config;
use solradmin_core::{
    default_config_path, load_sites_config, AdministrationService, AppError, DbConfig,
    MessageCatalog, Notice, Site, SitesConfig,
};
use solradmin_db::QueueRepository;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file
    dotenv().ok();

    // Setup logging (stderr to keep stdout clean for --json)
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    // Parse command line arguments
    let config = Config::parse();

    match run(config).await {
        Ok(true) => Ok(ExitCode::SUCCESS),
        Ok(false) => Ok(ExitCode::FAILURE),
        Err(e) => {
            match e.downcast_ref::<AppError>() {
                Some(app_error) => eprintln!("Error: {}", app_error.user_message()),
                None => eprintln!("Error: {:#}", e),
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes one command. Returns whether the operation succeeded.
async fn run(config: Config) -> anyhow::Result<bool> {
    let config_path = config
        .config
        .clone()
        .or_else(default_config_path)
        .context("Cannot determine the sites.toml location; pass --config")?;
    let sites = load_sites_config(&config_path)?;
    let catalog = MessageCatalog::with_overrides(&sites.messages);

    let site = match config.command.site() {
        Some(id) => sites.site(id)?,
        None => return list_sites(&sites, config.json),
    };

    // The queue database is only contacted by commands that need it.
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for this command; pass --database-url")?;
    let pool = PgPoolOptions::new()
        .max_connections(DbConfig::default().max_connections)
        .connect_lazy(database_url)
        .context("Invalid DATABASE_URL")?;
    let repo = QueueRepository::new(pool);

    let registry = registry_from_config(&sites)?;
    let service = AdministrationService::new(
        Arc::new(registry),
        Arc::new(repo.clone()),
        sites.admin_config(),
    );

    match config.command {
        Command::EmptyIndex { .. } => empty_index(&service, &catalog, &site, config.json).await,
        Command::ClearQueue { .. } => clear_queue(&service, &catalog, &site, config.json).await,
        Command::ReloadConfiguration { .. } => {
            reload_configuration(&service, &catalog, &site, config.json).await
        }
        Command::Status { .. } => status(&service, &catalog, &site, config.json).await,
        Command::Queue { limit, .. } => list_queue(&repo, &site, limit, config.json).await,
        Command::Sites => list_sites(&sites, config.json),
    }
}

/// Empty the index of a site on all of its cores
async fn empty_index(
    service: &AdministrationService,
    catalog: &MessageCatalog,
    site: &Site,
    json: bool,
) -> anyhow::Result<bool> {
    info!("Emptying index for site: {}", site.id);
    let report = service.empty_index(site).await;
    let notice = catalog.report_notice(site, &report);

    if json {
        print_json(&json!({
            "notice": notice,
            "status": report.status(),
            "affected_cores": report.affected_cores(),
            "report": report,
        }))?;
    } else {
        print_notice(&notice);
    }

    Ok(report.is_success())
}

/// Clear the index queue of a site
async fn clear_queue(
    service: &AdministrationService,
    catalog: &MessageCatalog,
    site: &Site,
    json: bool,
) -> anyhow::Result<bool> {
    info!("Clearing index queue for site: {}", site.id);
    match service.clear_queue(site).await {
        Ok(removed) => {
            let notice = catalog.queue_cleared_notice(site, removed);
            if json {
                print_json(&json!({ "notice": notice, "removed": removed }))?;
            } else {
                print_notice(&notice);
            }
            Ok(true)
        }
        Err(e) => {
            error!("Clearing index queue for site {} failed: {}", site.id, e);
            let notice = catalog.queue_error_notice(site, &e);
            if json {
                print_json(&json!({ "notice": notice }))?;
            } else {
                print_notice(&notice);
            }
            Ok(false)
        }
    }
}

/// Reload the configuration of every core of a site
async fn reload_configuration(
    service: &AdministrationService,
    catalog: &MessageCatalog,
    site: &Site,
    json: bool,
) -> anyhow::Result<bool> {
    info!("Reloading core configuration for site: {}", site.id);
    let report = service.reload_configuration(site).await;
    let notice = catalog.report_notice(site, &report);

    if json {
        print_json(&json!({
            "notice": notice,
            "status": report.status(),
            "affected_cores": report.affected_cores(),
            "report": report,
        }))?;
    } else {
        print_notice(&notice);
    }

    Ok(report.is_success())
}

/// Show the maintenance overview of a site
async fn status(
    service: &AdministrationService,
    catalog: &MessageCatalog,
    site: &Site,
    json: bool,
) -> anyhow::Result<bool> {
    let overview = service.overview(site).await?;

    if json {
        print_json(&json!({
            "overview": overview,
            "can_proceed": overview.can_proceed(),
        }))?;
    } else {
        println!("\n{}\n", format_overview(&overview));
        if !overview.can_proceed() {
            print_notice(&catalog.can_not_proceed_notice(site));
        }
    }

    // A site without cores is a reportable state, not a failure.
    Ok(true)
}

/// List the index queue items of a site
async fn list_queue(
    repo: &QueueRepository,
    site: &Site,
    limit: usize,
    json: bool,
) -> anyhow::Result<bool> {
    let items = repo.list_items_by_site(site, limit).await?;
    let failed = repo.count_failed_by_site(site).await?;

    if json {
        print_json(&json!({ "items": items, "failed": failed }))?;
    } else if items.is_empty() {
        println!("Index queue for site \"{}\" is empty.", site.label);
    } else {
        println!("{}", format_queue_items(&items));
        println!("\n{} item(s) shown, {} failed in total.", items.len(), failed);
    }

    Ok(true)
}

/// List configured sites
fn list_sites(sites: &SitesConfig, json: bool) -> anyhow::Result<bool> {
    let all = sites.all_sites();
    if json {
        print_json(&serde_json::to_value(&all)?)?;
    } else if all.is_empty() {
        eprintln!("No sites configured.");
    } else {
        println!("{}", format_sites(&all));
    }
    Ok(true)
}

fn print_notice(notice: &Notice) {
    println!("{}", format_notice(notice));
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
