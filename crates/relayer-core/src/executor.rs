//! The fill-or-skip pipeline for a single order.

use crate::ExecutionError;
use alloy::primitives::{Address, U256};
use futures::future::join_all;
use relayer_config::SimulationMode;
use relayer_delivery::SettlementInterface;
use relayer_order::build_params;
use relayer_pricing::GasPolicy;
use relayer_routing::RouteFinder;
use relayer_storage::SkipCache;
use relayer_types::{ExecutionParams, GasSettings, Order, TransactionHash};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Network and policy settings the pipeline runs with.
#[derive(Debug, Clone)]
pub struct ExecutorSettings {
	/// Liquidity handler the settlement core swaps through.
	pub handler: Address,
	/// Wrapped native token, the routing hub.
	pub wrapped_native: Address,
	/// Address the settlement core uses for the native asset.
	pub native_sentinel: Address,
	pub simulation: SimulationMode,
	/// Gas added to the estimate to form the gas limit.
	pub gas_limit_margin: u64,
	/// Bound on every node call.
	pub call_timeout: Duration,
}

/// Result of routing both legs of an order.
struct Routing {
	pool_a: Address,
	pool_b: Address,
	expected_output: U256,
}

/// Executes orders against the settlement core.
pub struct OrderExecutor {
	settings: ExecutorSettings,
	routes: RouteFinder,
	gas: GasPolicy,
	settlement: Arc<dyn SettlementInterface>,
	skip: Arc<SkipCache>,
}

impl OrderExecutor {
	pub fn new(
		settings: ExecutorSettings,
		routes: RouteFinder,
		gas: GasPolicy,
		settlement: Arc<dyn SettlementInterface>,
		skip: Arc<SkipCache>,
	) -> Self {
		Self {
			settings,
			routes,
			gas,
			settlement,
			skip,
		}
	}

	pub fn settings(&self) -> &ExecutorSettings {
		&self.settings
	}

	pub fn skip_cache(&self) -> &Arc<SkipCache> {
		&self.skip
	}

	/// Tries to fill `order`. Returns the submitted transaction hash, or
	/// `None` when the order was skipped, lost a race or failed.
	pub async fn execute(&self, order: &Order) -> Option<TransactionHash> {
		match self.try_execute(order).await {
			Ok(outcome) => outcome,
			Err(e) if e.is_permanent() => {
				info!(
					order_id = %order.id,
					created_tx_hash = %order.created_tx_hash,
					error = %e,
					"Order is unfillable, skipping from now on"
				);
				if let Err(e) = self.skip.mark(&order.id).await {
					warn!(order_id = %order.id, error = %e, "Failed to mark order");
				}
				None
			}
			Err(e) => {
				warn!(
					order_id = %order.id,
					created_tx_hash = %order.created_tx_hash,
					error = %e,
					"Error executing order"
				);
				None
			}
		}
	}

	/// Runs [`execute`](Self::execute) for every order concurrently.
	pub async fn execute_all(&self, orders: &[Order]) -> Vec<(String, Option<TransactionHash>)> {
		join_all(
			orders
				.iter()
				.map(|order| async move { (order.id.clone(), self.execute(order).await) }),
		)
		.await
	}

	async fn try_execute(&self, order: &Order) -> Result<Option<TransactionHash>, ExecutionError> {
		if self.skip.is_marked(&order.id).await? {
			debug!(order_id = %order.id, "Order is in the skip cache");
			return Ok(None);
		}

		// Tokens were parsed against the default sentinel
		let order = &order.with_native_sentinel(self.settings.native_sentinel);
		if order.witness.is_zero() {
			warn!(order_id = %order.id, "Order has a zero witness");
		}

		let token_in = order.input_token.routing_address(self.settings.wrapped_native);
		let token_out = order.output_token.routing_address(self.settings.wrapped_native);
		if token_in == token_out {
			return Err(ExecutionError::DegeneratePair { token: token_in });
		}

		let routing = self.route(order, token_in, token_out).await?;
		self.log_expected_output(order, routing.expected_output);

		let relayer = self.settlement.relayer_address();

		// First pass with the fee floor, only to learn the gas cost.
		let params = self.params(order, relayer, &routing, self.gas.base_fee());
		let estimated_gas = self
			.bounded("estimate_gas", self.settlement.estimate_gas(&params))
			.await?;

		let gas_price = self
			.bounded(
				"gas_price",
				self.gas.gas_price(|| self.settlement.suggested_gas_price()),
			)
			.await?;
		let fee = self
			.gas
			.fee(gas_price.saturating_mul(U256::from(estimated_gas)));

		let params = self.params(order, relayer, &routing, fee);
		let gas = GasSettings {
			gas_limit: estimated_gas.saturating_add(self.settings.gas_limit_margin),
			gas_price,
		};
		debug!(
			order_id = %order.id,
			estimated_gas,
			%gas_price,
			%fee,
			"Priced fill"
		);

		self.simulate(&params, gas).await?;

		// The order may have been filled or cancelled while simulating.
		let open = self
			.bounded(
				"exist_order",
				self.settlement.order_is_open(order, &params.data),
			)
			.await?;
		if !open {
			debug!(order_id = %order.id, "Order is no longer open");
			return Ok(None);
		}

		let tx_hash = self
			.bounded("submit", self.settlement.submit(&params, gas))
			.await?;
		info!(
			order_id = %order.id,
			%tx_hash,
			"Filled {} order, executedTxHash: {}",
			order.created_tx_hash,
			tx_hash
		);

		Ok(Some(tx_hash))
	}

	/// Token to token orders take two legs through the wrapped native hub.
	async fn route(
		&self,
		order: &Order,
		token_in: Address,
		token_out: Address,
	) -> Result<Routing, ExecutionError> {
		let hub = self.settings.wrapped_native;

		if order.is_token_to_token() {
			let first = self.routes.quote(token_in, hub, order.input_amount).await?;
			let second = self
				.routes
				.quote(hub, token_out, first.expected_output)
				.await?;

			return Ok(Routing {
				pool_a: first.pool,
				pool_b: second.pool,
				expected_output: second.expected_output,
			});
		}

		let quote = self
			.routes
			.quote(token_in, token_out, order.input_amount)
			.await?;
		Ok(Routing {
			pool_a: quote.pool,
			pool_b: quote.pool,
			expected_output: quote.expected_output,
		})
	}

	// The settlement core enforces min_return on-chain, so this only logs.
	fn log_expected_output(&self, order: &Order, expected_output: U256) {
		let ratio_bps = if order.min_return.is_zero() {
			None
		} else {
			Some(expected_output.saturating_mul(U256::from(10_000u64)) / order.min_return)
		};
		info!(
			order_id = %order.id,
			%expected_output,
			min_return = %order.min_return,
			ratio_bps = ?ratio_bps,
			"Expected output"
		);
	}

	fn params(
		&self,
		order: &Order,
		relayer: Address,
		routing: &Routing,
		fee: U256,
	) -> ExecutionParams {
		build_params(
			order,
			self.settings.handler,
			relayer,
			routing.pool_a,
			routing.pool_b,
			fee,
			self.settings.native_sentinel,
		)
	}

	async fn simulate(
		&self,
		params: &ExecutionParams,
		gas: GasSettings,
	) -> Result<(), ExecutionError> {
		match self.settings.simulation {
			SimulationMode::Trusted => {
				self.bounded("simulate", self.settlement.simulate(params, gas))
					.await
			}
			SimulationMode::DualCheck => {
				// Public nodes may accept a reverting eth_call; a second
				// estimation catches those reverts.
				tokio::try_join!(
					self.bounded("simulate", self.settlement.simulate(params, gas)),
					self.bounded("estimate_gas", self.settlement.estimate_gas(params)),
				)?;
				Ok(())
			}
		}
	}

	async fn bounded<T, E, F>(&self, step: &'static str, call: F) -> Result<T, ExecutionError>
	where
		F: Future<Output = Result<T, E>>,
		ExecutionError: From<E>,
	{
		tokio::time::timeout(self.settings.call_timeout, call)
			.await
			.map_err(|_| ExecutionError::Timeout(step))?
			.map_err(ExecutionError::from)
	}
}
