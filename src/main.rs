//! Schemascope - Live Exploration Dashboard for RDF Schema Graphs
//!
//! Main entry point for the Schemascope CLI.

use clap::{Parser, Subcommand};
use schemascope::cache::SnapshotStore;
use schemascope::config::SchemascopeConfig;
use schemascope::refresher::{Refresher, RefresherConfig};
use schemascope::schema::{SchemaSnapshot, SnapshotSource};
use schemascope::server::DashboardServer;
use schemascope::sparql::{SchemaSource, SparqlClient};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

/// Schemascope - explore an RDF schema graph from its SPARQL endpoint
#[derive(Parser, Debug)]
#[command(name = "schemascope")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.config/schemascope/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SPARQL endpoint URL (overrides config)
    #[arg(long, env = "SCHEMASCOPE_ENDPOINT")]
    endpoint: Option<String>,

    /// Use cached data only (don't fetch updates)
    #[arg(long)]
    cached: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the dashboard server with background refresh
    Serve {
        /// Listen port
        #[arg(short, long, env = "SCHEMASCOPE_PORT")]
        port: Option<u16>,

        /// Refresh interval in seconds
        #[arg(long)]
        interval: Option<u64>,

        /// Row limit for the schema queries
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Fetch the schema once and print counts
    Fetch {
        /// Row limit for the schema queries
        #[arg(short, long)]
        limit: Option<usize>,

        /// Write the fetched snapshot JSON to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print statistics from the persisted or bundled fallback snapshot
    Stats,

    /// Delete the persisted cache file
    ClearCache,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> schemascope::Result<()> {
    schemascope::logging::init()?;

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SchemascopeConfig::load(path)?,
        None => SchemascopeConfig::load_default()?,
    };
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }

    match cli.command {
        Commands::Serve {
            port,
            interval,
            limit,
        } => {
            if let Some(port) = port {
                config.listen_port = port;
            }
            if let Some(interval) = interval {
                config.refresh_interval_secs = interval;
            }
            if let Some(limit) = limit {
                config.query_limit = limit;
            }
            serve(config, cli.cached).await
        }
        Commands::Fetch { limit, output } => {
            if let Some(limit) = limit {
                config.query_limit = limit;
            }
            fetch_once(config, output).await
        }
        Commands::Stats => print_stats(config),
        Commands::ClearCache => clear_cache(config),
    }
}

/// Run the dashboard server and the background refresher until ctrl-c
async fn serve(config: SchemascopeConfig, cached_only: bool) -> schemascope::Result<()> {
    let store = Arc::new(SnapshotStore::new(config.cache_file.clone()));
    store.bootstrap();

    let client = SparqlClient::new(&config.endpoint, config.request_timeout())?;
    let refresher = Refresher::new(
        client,
        store.clone(),
        RefresherConfig::default()
            .with_interval(config.refresh_interval())
            .with_query_limit(config.query_limit),
    );
    let handle = refresher.handle();

    // With --cached the refresher never runs; the dashboard serves whatever
    // the fallback chain produced and "refresh now" reports not queued.
    let refresher_task = if cached_only {
        tracing::info!("Cached mode, background refresh disabled");
        drop(refresher);
        None
    } else {
        Some(tokio::spawn(refresher.run()))
    };

    let addr = format!("0.0.0.0:{}", config.listen_port);
    let server = DashboardServer::new(store, handle.clone());

    println!("Schemascope dashboard on http://localhost:{}", config.listen_port);

    tokio::select! {
        result = server.run(&addr) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received ctrl-c, shutting down");
        }
    }

    if let Some(task) = refresher_task {
        handle.shutdown().await;
        let _ = task.await;
    }

    Ok(())
}

/// One-shot fetch, mirroring what a single refresh cycle sees
async fn fetch_once(config: SchemascopeConfig, output: Option<PathBuf>) -> schemascope::Result<()> {
    let client = SparqlClient::new(&config.endpoint, config.request_timeout())?;

    let classes = client.fetch_classes(config.query_limit).await?;
    let predicates = client.fetch_predicates(config.query_limit).await?;
    let snapshot = SchemaSnapshot::from_elements(classes, predicates, SnapshotSource::Live);

    println!(
        "Fetched {} classes and {} predicates from {}",
        snapshot.stats.total_classes, snapshot.stats.total_predicates, config.endpoint
    );
    println!(
        "Domain specific: {} classes, {} predicates, {} namespaces",
        snapshot.stats.domain_classes,
        snapshot.stats.domain_predicates,
        snapshot.namespaces.all.len()
    );

    if let Some(path) = output {
        std::fs::write(&path, serde_json::to_string_pretty(&snapshot)?)?;
        println!("Snapshot written to {}", path.display());
    }

    Ok(())
}

/// Print stats for the snapshot a fresh process would start with
fn print_stats(config: SchemascopeConfig) -> schemascope::Result<()> {
    let store = SnapshotStore::new(config.cache_file.clone());
    let snapshot = store.load_fallback().unwrap_or_else(|_| SchemaSnapshot::empty());

    println!("Snapshot source:   {:?}", snapshot.source);
    println!(
        "Fetched at:        {}",
        snapshot
            .fetched_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "never".to_string())
    );
    println!("Classes:           {}", snapshot.stats.total_classes);
    println!("Predicates:        {}", snapshot.stats.total_predicates);
    println!("Domain classes:    {}", snapshot.stats.domain_classes);
    println!("Domain predicates: {}", snapshot.stats.domain_predicates);
    println!("Namespaces:        {}", snapshot.namespaces.all.len());

    Ok(())
}

fn clear_cache(config: SchemascopeConfig) -> schemascope::Result<()> {
    if config.cache_file.exists() {
        std::fs::remove_file(&config.cache_file)?;
        println!("Removed {}", config.cache_file.display());
    } else {
        println!("No cache file at {}", config.cache_file.display());
    }
    Ok(())
}
