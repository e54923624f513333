use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use relayer_config::{Config, ConfigLoader};
use relayer_types::{Order, TransactionHash};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod factory;

#[derive(Parser)]
#[command(name = "order-relayer")]
#[command(about = "Limit order relayer", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[arg(short, long, value_name = "FILE", default_value = "config/relayer.toml")]
	config: PathBuf,

	#[arg(long, env = "RELAYER_LOG_LEVEL", default_value = "info")]
	log_level: String,
}

#[derive(Subcommand)]
enum Commands {
	/// Validate the configuration file
	Validate,
	/// Try to fill every order of a JSON file once
	Execute {
		/// JSON array of order snapshots
		#[arg(long, value_name = "FILE")]
		orders: PathBuf,
	},
}

/// Per-order line of the execution report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExecutionReport {
	order_id: String,
	tx_hash: Option<TransactionHash>,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_tracing(&cli.log_level)?;

	match &cli.command {
		Commands::Validate => validate_config(&cli).await,
		Commands::Execute { orders } => execute_orders(&cli, orders).await,
	}
}

async fn load_config(cli: &Cli) -> Result<Config> {
	info!("Loading configuration from: {:?}", cli.config);

	ConfigLoader::new()
		.with_file(&cli.config)
		.load()
		.await
		.context("Failed to load configuration")
}

async fn validate_config(cli: &Cli) -> Result<()> {
	let config = load_config(cli).await?;
	let network = config.active_network()?;

	info!("Configuration is valid");
	info!("Relayer name: {}", config.relayer.name);
	info!("Network: {} ({})", config.relayer.network, network.rpc_url);
	info!(
		"Handler: {} ({})",
		config.relayer.handler,
		config.handler_address()?
	);
	info!("Simulation: {:?}", config.execution.simulation);

	Ok(())
}

async fn execute_orders(cli: &Cli, orders_path: &Path) -> Result<()> {
	let config = load_config(cli).await?;
	let orders = load_orders(orders_path).await?;
	let executor = factory::build_executor(&config)?;

	info!(
		relayer = %config.relayer.name,
		orders = orders.len(),
		"Executing orders"
	);

	tokio::select! {
		results = executor.execute_all(&orders) => {
			let filled = results.iter().filter(|(_, hash)| hash.is_some()).count();
			info!(filled, total = results.len(), "Execution finished");

			let report: Vec<ExecutionReport> = results
				.into_iter()
				.map(|(order_id, tx_hash)| ExecutionReport { order_id, tx_hash })
				.collect();
			println!("{}", serde_json::to_string_pretty(&report)?);
		}
		_ = shutdown_signal() => {
			warn!("Shutdown signal received, abandoning pending orders");
		}
	}

	Ok(())
}

async fn load_orders(path: &Path) -> Result<Vec<Order>> {
	let content = tokio::fs::read_to_string(path)
		.await
		.with_context(|| format!("Failed to read orders from {:?}", path))?;

	serde_json::from_str(&content).context("Failed to parse orders")
}

fn setup_tracing(log_level: &str) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer())
		.init();

	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = signal::ctrl_c().await {
			warn!(error = %e, "Failed to listen for Ctrl+C");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			}
			Err(e) => {
				warn!(error = %e, "Failed to install signal handler");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
