use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use shelfscout_catalog::{
    AggregationService, DisconnectedInventory, LocalInventory, RemoteCatalogClient,
    RequestTracker, SqliteInventory,
};
use shelfscout_core::{AppConfig, CandidateBook, DEFAULT_PAGE_COUNT, Database, NewLocalRecord};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "shelfscout",
    about = "Find books for your reading list across Open Library and your own shelf",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format (for scripts).
    /// Also enabled by setting SHELFSCOUT_JSON=1.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog and your library.
    Search { query: String },

    /// Read queries from stdin, one per line, and print results for the latest one.
    Watch,

    /// Add a book to your library.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        pages: Option<u32>,
        #[arg(long)]
        cover: Option<String>,
    },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Check that the catalog and the local library are reachable.
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective config as TOML.
    Show,
    /// Print the config file path.
    Path,
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let start = Instant::now();
    let cli = Cli::parse();
    let json_output = cli.json || std::env::var("SHELFSCOUT_JSON").as_deref() == Ok("1");

    let mut config = AppConfig::load()?;
    if let Ok(lib_path) = std::env::var("SHELFSCOUT_LIBRARY_PATH") {
        config.set_library_path(lib_path.into());
    }

    match cli.command {
        Commands::Search { query } => {
            let service = build_service(&config)?;
            let results = service.search(&query).await;
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "items": results, "total": results.len(), "query": query },
                    "meta": { "duration_ms": dur }
                }))?;
            } else {
                print_candidates(&query, &results);
            }
        }

        Commands::Watch => {
            let service = Arc::new(build_service(&config)?);
            watch(service, config.search.debounce_ms, json_output).await?;
        }

        Commands::Add {
            title,
            author,
            pages,
            cover,
        } => {
            let db = open_db(&config)?;
            let record = db.insert_record(&NewLocalRecord {
                title,
                author,
                page_count: pages.unwrap_or(DEFAULT_PAGE_COUNT),
                cover_url: cover.unwrap_or_else(|| config.catalog.placeholder_cover_url.clone()),
            })?;
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": record,
                    "meta": { "duration_ms": dur }
                }))?;
            } else {
                println!("Added #{}: {} — {}", record.id, record.title, record.author);
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => print!("{}", toml::to_string_pretty(&config)?),
            ConfigAction::Path => println!("{}", AppConfig::config_path().display()),
        },

        Commands::Doctor => doctor(&config, json_output).await?,
    }

    Ok(())
}

fn build_service(config: &AppConfig) -> Result<AggregationService> {
    let catalog = Arc::new(RemoteCatalogClient::from_config(&config.catalog)?);
    Ok(AggregationService::from_config(
        catalog,
        open_inventory(config),
        config,
    ))
}

/// A library that cannot be opened degrades to an inventory whose searches fail.
fn open_inventory(config: &AppConfig) -> Arc<dyn LocalInventory> {
    match open_db(config) {
        Ok(db) => Arc::new(SqliteInventory::new(Arc::new(db))),
        Err(e) => {
            warn!(error = %e, "local library unavailable");
            Arc::new(DisconnectedInventory::new(e.to_string()))
        }
    }
}

fn open_db(config: &AppConfig) -> Result<Database> {
    let db_path = config.database_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(Database::open(&db_path)?)
}

async fn watch(service: Arc<AggregationService>, debounce_ms: u64, json_output: bool) -> Result<()> {
    let tracker = Arc::new(RequestTracker::new());
    let debounce = Duration::from_millis(debounce_ms);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last = None;

    while let Some(line) = lines.next_line().await? {
        let ticket = tracker.begin();
        let tracker = Arc::clone(&tracker);
        let service = Arc::clone(&service);

        last = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if !tracker.is_current(ticket) {
                return;
            }
            if let Some(results) = tracker.complete(ticket, service.search(&line)).await {
                if json_output {
                    let printed = print_json(&serde_json::json!({
                        "status": "ok",
                        "data": { "items": results, "total": results.len(), "query": line },
                        "meta": { "request_id": ticket.id() }
                    }));
                    if let Err(e) = printed {
                        warn!(request_id = ticket.id(), error = %e, "failed to write results");
                    }
                } else {
                    print_candidates(&line, &results);
                }
            }
        }));
    }

    if let Some(handle) = last {
        handle.await?;
    }
    Ok(())
}

async fn doctor(config: &AppConfig, json_output: bool) -> Result<()> {
    let catalog = RemoteCatalogClient::from_config(&config.catalog)?;
    let status = catalog.health_check().await;

    let db_path = config.database_path();
    let library = if db_path.exists() {
        Database::open_read_only(&db_path)
            .and_then(|db| db.count_records())
            .map_err(|e| e.to_string())
    } else {
        Err("not created yet".to_string())
    };

    if json_output {
        print_json(&serde_json::json!({
            "status": "ok",
            "data": {
                "catalog": {
                    "url": config.catalog.base_url,
                    "available": status.available,
                    "latency_ms": status.latency_ms,
                    "error": status.error_kind,
                    "checked_at": status.last_checked.to_rfc3339(),
                },
                "library": {
                    "path": db_path,
                    "available": library.is_ok(),
                    "records": library.as_ref().ok(),
                    "error": library.as_ref().err(),
                }
            }
        }))?;
        return Ok(());
    }

    match (status.available, status.error_kind) {
        (true, _) => println!(
            "catalog  ok     {} ({} ms)",
            config.catalog.base_url,
            status.latency_ms.unwrap_or_default()
        ),
        (false, kind) => println!(
            "catalog  FAIL   {} ({})",
            config.catalog.base_url,
            kind.unwrap_or("unknown")
        ),
    }
    match library {
        Ok(count) => println!("library  ok     {} ({count} records)", db_path.display()),
        Err(e) => println!("library  FAIL   {} ({e})", db_path.display()),
    }
    Ok(())
}

fn print_candidates(query: &str, results: &[CandidateBook]) {
    if results.is_empty() {
        println!("No results for: {query}");
        return;
    }
    println!("Found {} results:", results.len());
    for book in results {
        let marker = if book.can_add() { "new" } else { "owned" };
        println!(
            "  [{marker:<5}] {title:<40}  {author:<25}  {pages} pp",
            title = book.title,
            author = book.author,
            pages = book.page_count,
        );
    }
}

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}
