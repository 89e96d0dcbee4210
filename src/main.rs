use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use supplymap::config::{load_config, AppConfig, LoggingConfig};
use supplymap::error::SupplyMapResult;
use supplymap::query::{SupplyChainEngine, DEFAULT_DEPTH};
use supplymap::server::run_http_server;
use supplymap::store::{load_snapshot, standard_snapshot, InMemoryGraphStore};

/// SupplyMap: supply chain traversal and disruption impact analysis
#[derive(Parser)]
#[command(name = "supplymap")]
#[command(
    about = "Explore upstream supply chains and the blast radius of supplier failures and port closures."
)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true, env = "SUPPLYMAP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve,
    /// Print the upstream supply chain of a company
    SupplyChain {
        /// Company id
        #[arg(long)]
        company: String,
        /// Number of supplier tiers (1-4)
        #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
        depth: usize,
    },
    /// Print the impact of a disruption
    Impact {
        /// supplier_failure or port_closure
        #[arg(short, long)]
        scenario: String,
        /// Supplier id or port id, matching the scenario
        #[arg(short, long)]
        target: String,
    },
    /// List selectable entities
    List {
        #[arg(value_enum)]
        kind: ListKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ListKind {
    Companies,
    Suppliers,
    Ports,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config.logging);

    if let Err(e) = run(cli.command, config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: AppConfig) -> SupplyMapResult<()> {
    let engine = build_engine(&config)?;

    match command {
        Commands::Serve => run_http_server(&config.server, engine).await,
        Commands::SupplyChain { company, depth } => {
            print_json(&engine.get_supply_chain(&company, depth).await?)
        }
        Commands::Impact { scenario, target } => {
            print_json(&engine.get_impact(&scenario, &target).await?)
        }
        Commands::List { kind } => {
            let entries = match kind {
                ListKind::Companies => engine.list_companies().await?,
                ListKind::Suppliers => engine.list_suppliers().await?,
                ListKind::Ports => engine.list_ports().await?,
            };
            print_json(&entries)
        }
    }
}

fn build_engine(config: &AppConfig) -> SupplyMapResult<SupplyChainEngine> {
    let snapshot = match &config.graph.seed_path {
        Some(path) => {
            info!(path = %path.display(), "loading graph snapshot");
            load_snapshot(path)?
        }
        None => {
            info!("no seed_path configured, using the standard dataset");
            standard_snapshot()
        }
    };
    let store = InMemoryGraphStore::from_snapshot(snapshot)?;
    Ok(SupplyChainEngine::new(Arc::new(store)))
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json<T: Serialize>(value: &T) -> SupplyMapResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
