//! Settlement core access for the order relayer.
//!
//! Covers everything the execution pipeline needs from the chain node: gas
//! estimation and read-only simulation of `executeOrder`, the order existence
//! check, the node's suggested gas price and the signed submission itself.

use alloy::primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use relayer_types::{ExecutionParams, GasSettings, Order, TransactionHash};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod alloy;
}

pub use implementations::alloy::AlloySettlement;

/// Errors that can occur while talking to the settlement core.
#[derive(Debug, Error)]
pub enum SettlementError {
	/// Invalid key, URL or address at construction.
	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),
	/// Gas estimation failed, usually because the call would revert.
	#[error("Gas estimation failed: {0}")]
	Estimation(String),
	/// The read-only call reverted.
	#[error("Simulation reverted: {0}")]
	Simulation(String),
	/// The transaction could not be sent.
	#[error("Submission failed: {0}")]
	Submission(String),
	/// Any other node error.
	#[error("RPC error: {0}")]
	Rpc(String),
}

/// Interface to the chain node and settlement core contract.
#[async_trait]
pub trait SettlementInterface: Send + Sync {
	/// Account that signs and pays for fills.
	fn relayer_address(&self) -> Address;

	/// Estimates gas for `executeOrder` with these parameters.
	async fn estimate_gas(&self, params: &ExecutionParams) -> Result<u64, SettlementError>;

	/// Read-only call of `executeOrder` with the final gas settings.
	async fn simulate(
		&self,
		params: &ExecutionParams,
		gas: GasSettings,
	) -> Result<(), SettlementError>;

	/// Signs and sends `executeOrder`.
	async fn submit(
		&self,
		params: &ExecutionParams,
		gas: GasSettings,
	) -> Result<TransactionHash, SettlementError>;

	/// Whether the order is still open in the settlement core. `data` is the
	/// encoded output payload of the order.
	async fn order_is_open(&self, order: &Order, data: &Bytes) -> Result<bool, SettlementError>;

	/// Node's suggested gas price in wei.
	async fn suggested_gas_price(&self) -> Result<U256, SettlementError>;
}
