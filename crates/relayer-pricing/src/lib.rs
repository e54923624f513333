//! Fee and gas policy for the order relayer.
//!
//! The relayer charges a fee that is baked into the settlement calldata. It is
//! derived from the total gas cost of the fill, with a configured floor that
//! also serves as the placeholder fee for the first gas estimation. Gas prices
//! come from an external gas station when one is configured, with the node's
//! own suggestion as the fallback.

use alloy::primitives::U256;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Re-export implementations
pub mod implementations {
	pub mod http;
}

pub use implementations::http::HttpGasOracle;

const BPS_DENOMINATOR: u64 = 10_000;

/// Errors raised while querying a gas price source.
#[derive(Debug, Error)]
pub enum GasOracleError {
	#[error("HTTP error: {0}")]
	Http(String),
	#[error("Invalid gas station response: {0}")]
	InvalidResponse(String),
}

/// Interface of an external gas price suggestion source.
#[async_trait]
pub trait GasOracleInterface: Send + Sync {
	/// Suggested gas price in wei. Zero means unavailable.
	async fn suggested_gas_price(&self) -> U256;
}

/// Maps gas cost to the relayer's fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeePolicy {
	base_fee: U256,
	markup_bps: u32,
}

impl FeePolicy {
	pub fn new(base_fee: U256, markup_bps: u32) -> Self {
		Self {
			base_fee,
			markup_bps,
		}
	}

	/// Fee floor, used as the fee of the first gas estimation.
	pub fn base_fee(&self) -> U256 {
		self.base_fee
	}

	/// Fee for a fill costing `gas_cost` wei. Never decreases as the cost grows.
	pub fn fee(&self, gas_cost: U256) -> U256 {
		let factor = U256::from(BPS_DENOMINATOR + u64::from(self.markup_bps));
		let marked_up = gas_cost.saturating_mul(factor) / U256::from(BPS_DENOMINATOR);
		marked_up.max(self.base_fee)
	}
}

/// Gas price source plus fee policy, as used by the execution pipeline.
#[derive(Clone)]
pub struct GasPolicy {
	oracle: Option<Arc<dyn GasOracleInterface>>,
	fees: FeePolicy,
}

impl GasPolicy {
	pub fn new(oracle: Option<Arc<dyn GasOracleInterface>>, fees: FeePolicy) -> Self {
		Self { oracle, fees }
	}

	pub fn base_fee(&self) -> U256 {
		self.fees.base_fee()
	}

	pub fn fee(&self, gas_cost: U256) -> U256 {
		self.fees.fee(gas_cost)
	}

	/// Gas price to bid. Uses the gas station when it reports a non-zero
	/// price and otherwise awaits `fallback`, which is only polled in that
	/// case.
	pub async fn gas_price<F, Fut, E>(&self, fallback: F) -> Result<U256, E>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<U256, E>>,
	{
		if let Some(oracle) = &self.oracle {
			let price = oracle.suggested_gas_price().await;
			if !price.is_zero() {
				return Ok(price);
			}
			debug!("Gas station price unavailable, using node price");
		}

		fallback().await
	}
}
