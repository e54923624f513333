//! Assembles an [`OrderExecutor`] from configuration and collaborators.

use crate::{CoreError, ExecutorSettings, OrderExecutor};
use relayer_config::Config;
use relayer_delivery::SettlementInterface;
use relayer_pricing::{FeePolicy, GasOracleInterface, GasPolicy};
use relayer_routing::{RouteFinder, RoutingOracleInterface};
use relayer_storage::SkipCache;
use std::sync::Arc;
use std::time::Duration;

// Builder wiring the pipeline's collaborators together
pub struct ExecutorBuilder {
	config: Config,
	routing_oracle: Option<Arc<dyn RoutingOracleInterface>>,
	gas_oracle: Option<Arc<dyn GasOracleInterface>>,
	settlement: Option<Arc<dyn SettlementInterface>>,
	skip_cache: Option<Arc<SkipCache>>,
}

impl ExecutorBuilder {
	pub fn new(config: Config) -> Self {
		Self {
			config,
			routing_oracle: None,
			gas_oracle: None,
			settlement: None,
			skip_cache: None,
		}
	}

	pub fn with_routing_oracle(mut self, oracle: Arc<dyn RoutingOracleInterface>) -> Self {
		self.routing_oracle = Some(oracle);
		self
	}

	/// Optional. Without a gas station the node's price is always used.
	pub fn with_gas_oracle(mut self, oracle: Arc<dyn GasOracleInterface>) -> Self {
		self.gas_oracle = Some(oracle);
		self
	}

	pub fn with_settlement(mut self, settlement: Arc<dyn SettlementInterface>) -> Self {
		self.settlement = Some(settlement);
		self
	}

	/// Optional. Defaults to an in-memory cache with the configured TTL.
	pub fn with_skip_cache(mut self, skip_cache: Arc<SkipCache>) -> Self {
		self.skip_cache = Some(skip_cache);
		self
	}

	pub fn build(self) -> Result<OrderExecutor, CoreError> {
		let network = self
			.config
			.active_network()
			.map_err(|e| CoreError::Config(e.to_string()))?;
		let handler = self
			.config
			.handler_address()
			.map_err(|e| CoreError::Config(e.to_string()))?;

		let settings = ExecutorSettings {
			handler,
			wrapped_native: network.wrapped_native,
			native_sentinel: network.native_sentinel,
			simulation: self.config.execution.simulation,
			gas_limit_margin: self.config.execution.gas_limit_margin,
			call_timeout: self.config.execution.call_timeout(),
		};

		let oracle = self
			.routing_oracle
			.ok_or_else(|| CoreError::Config("Routing oracle not provided".into()))?;
		let routes = RouteFinder::new(oracle)
			.with_max_pools(self.config.routing.max_pools)
			.with_max_hops(self.config.routing.max_hops)
			.with_timeout(
				Duration::from_millis(self.config.routing.timeout_ms).min(settings.call_timeout),
			);

		let gas = GasPolicy::new(
			self.gas_oracle,
			FeePolicy::new(self.config.gas.base_fee, self.config.gas.markup_bps),
		);

		let settlement = self
			.settlement
			.ok_or_else(|| CoreError::Config("Settlement not provided".into()))?;

		let skip = match self.skip_cache {
			Some(skip) => skip,
			None => Arc::new(SkipCache::in_memory().with_ttl(self.config.execution.skip_ttl())),
		};

		Ok(OrderExecutor::new(settings, routes, gas, settlement, skip))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::{address, Address, Bytes, U256};
	use async_trait::async_trait;
	use relayer_config::{ConfigLoader, SimulationMode};
	use relayer_delivery::SettlementError;
	use relayer_routing::RoutingError;
	use relayer_types::{
		ExecutionParams, GasSettings, Order, Pool, Route, RouteRequest, TransactionHash,
	};

	const CONFIG: &str = r#"
[relayer]
name = "builder-test"
network = 4
private_key = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d"

[networks.4]
rpc_url = "http://localhost:8545"
settlement_core = "0xd412054cca18a61278ced6f674a526a6940ebd84"
wrapped_native = "0xc778417e063141139fce010982780140aa0cd5ab"

[networks.4.handlers]
balancer = "0xc5e07fef737ba98521d915c75d42600a1b744cc4"

[routing]
url = "http://localhost:3000"

[execution]
simulation = "trusted"
gas_limit_margin = 60000
"#;

	struct NoOracle;

	#[async_trait]
	impl RoutingOracleInterface for NoOracle {
		async fn pools_for_pair(&self, _: Address, _: Address) -> Result<Vec<Pool>, RoutingError> {
			Ok(Vec::new())
		}

		async fn best_route(&self, _: &[Pool], _: &RouteRequest) -> Result<Route, RoutingError> {
			Ok(Route::default())
		}

		fn expected_output(&self, _: &Route) -> Result<U256, RoutingError> {
			Ok(U256::ZERO)
		}
	}

	struct NoSettlement;

	#[async_trait]
	impl SettlementInterface for NoSettlement {
		fn relayer_address(&self) -> Address {
			Address::ZERO
		}

		async fn estimate_gas(&self, _: &ExecutionParams) -> Result<u64, SettlementError> {
			Err(SettlementError::Rpc("unused".into()))
		}

		async fn simulate(&self, _: &ExecutionParams, _: GasSettings) -> Result<(), SettlementError> {
			Err(SettlementError::Rpc("unused".into()))
		}

		async fn submit(
			&self,
			_: &ExecutionParams,
			_: GasSettings,
		) -> Result<TransactionHash, SettlementError> {
			Err(SettlementError::Rpc("unused".into()))
		}

		async fn order_is_open(&self, _: &Order, _: &Bytes) -> Result<bool, SettlementError> {
			Ok(false)
		}

		async fn suggested_gas_price(&self) -> Result<U256, SettlementError> {
			Ok(U256::ZERO)
		}
	}

	#[test]
	fn test_build_from_config() {
		let config = ConfigLoader::new().parse(CONFIG).unwrap();
		let executor = ExecutorBuilder::new(config)
			.with_routing_oracle(Arc::new(NoOracle))
			.with_settlement(Arc::new(NoSettlement))
			.build()
			.unwrap();

		let settings = executor.settings();
		assert_eq!(
			settings.handler,
			address!("c5e07fef737ba98521d915c75d42600a1b744cc4")
		);
		assert_eq!(
			settings.wrapped_native,
			address!("c778417e063141139fce010982780140aa0cd5ab")
		);
		assert_eq!(settings.simulation, SimulationMode::Trusted);
		assert_eq!(settings.gas_limit_margin, 60_000);
	}

	#[test]
	fn test_build_requires_collaborators() {
		let config = ConfigLoader::new().parse(CONFIG).unwrap();
		let result = ExecutorBuilder::new(config)
			.with_settlement(Arc::new(NoSettlement))
			.build();
		assert!(matches!(result, Err(CoreError::Config(_))));
	}

	#[test]
	fn test_build_rejects_unknown_handler() {
		let mut config = ConfigLoader::new().parse(CONFIG).unwrap();
		config.relayer.handler = "uniswap".to_string();
		let result = ExecutorBuilder::new(config)
			.with_routing_oracle(Arc::new(NoOracle))
			.with_settlement(Arc::new(NoSettlement))
			.build();
		assert!(matches!(result, Err(CoreError::Config(_))));
	}
}
