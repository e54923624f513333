//! Configuration validation utility
//!
//! Usage: cargo run --bin validate-config config/relayer.toml

use std::env;
use std::process;

use relayer_config::ConfigLoader;

#[tokio::main]
async fn main() {
	let args: Vec<String> = env::args().collect();

	if args.len() != 2 {
		eprintln!("Usage: {} <config-file>", args[0]);
		process::exit(1);
	}

	let config_path = &args[1];

	println!("Validating configuration file: {}", config_path);

	match ConfigLoader::new().with_file(config_path).load().await {
		Ok(config) => {
			println!("✅ Configuration is valid!");
			println!("Relayer name: {}", config.relayer.name);
			println!("Network: {}", config.relayer.network);
			println!("Networks configured: {}", config.networks.len());
			println!("Handler: {}", config.relayer.handler);
			println!("Simulation mode: {:?}", config.execution.simulation);
		}
		Err(e) => {
			eprintln!("❌ Configuration validation failed:");
			eprintln!("{}", e);
			process::exit(1);
		}
	}
}
