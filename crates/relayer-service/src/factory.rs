//! Builds the concrete collaborators of the executor from configuration.

use anyhow::{Context, Result};
use relayer_config::Config;
use relayer_core::{ExecutorBuilder, OrderExecutor};
use relayer_delivery::AlloySettlement;
use relayer_pricing::HttpGasOracle;
use relayer_routing::HttpRoutingOracle;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub fn build_executor(config: &Config) -> Result<OrderExecutor> {
	let network = config
		.active_network()
		.context("Failed to resolve active network")?;

	let routing = HttpRoutingOracle::new(
		config.routing.url.clone(),
		Duration::from_millis(config.routing.timeout_ms),
	)
	.context("Failed to create routing oracle")?;

	let settlement = AlloySettlement::new(
		&network.rpc_url,
		config.relayer.network,
		&config.relayer.private_key,
		network.settlement_core,
		network.native_sentinel,
	)
	.context("Failed to create settlement client")?;

	let mut builder = ExecutorBuilder::new(config.clone())
		.with_routing_oracle(Arc::new(routing))
		.with_settlement(Arc::new(settlement));

	match &config.gas.oracle_url {
		Some(url) => {
			let oracle = HttpGasOracle::new(
				url.clone(),
				config.gas.oracle_field.clone(),
				config.gas.oracle_unit.decimals(),
				Duration::from_millis(config.gas.timeout_ms),
			)
			.context("Failed to create gas oracle")?;
			builder = builder.with_gas_oracle(Arc::new(oracle));
		}
		None => info!("No gas station configured, using the node's gas price"),
	}

	builder.build().context("Failed to build executor")
}
