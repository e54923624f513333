//! Order execution pipeline of the relayer.
//!
//! [`OrderExecutor`] takes one order snapshot and decides whether to fill it.
//! A fill routes the order through the liquidity oracle, prices the relayer's
//! fee from a gas estimate, simulates the settlement call, re-checks that the
//! order is still open and submits exactly one transaction. Every failure is
//! classified once at the top: permanent routing facts are remembered in the
//! skip cache, everything else is logged and left to the next poll.

use relayer_delivery::SettlementError;
use relayer_routing::RoutingError;
use relayer_storage::StorageError;
use thiserror::Error;

pub mod builder;
pub mod executor;

pub use builder::ExecutorBuilder;
pub use executor::{ExecutorSettings, OrderExecutor};

/// Errors raised while assembling the executor.
#[derive(Debug, Error)]
pub enum CoreError {
	#[error("Configuration error: {0}")]
	Config(String),
}

/// Failure of one pipeline run. Never leaves [`OrderExecutor::execute`].
#[derive(Debug, Error)]
pub enum ExecutionError {
	#[error(transparent)]
	Routing(#[from] RoutingError),
	#[error(transparent)]
	Settlement(#[from] SettlementError),
	#[error(transparent)]
	Storage(#[from] StorageError),
	#[error("{0} timed out")]
	Timeout(&'static str),
	/// Both sides of the order route to the same token.
	#[error("Order sells and buys the same token {token}")]
	DegeneratePair { token: alloy::primitives::Address },
}

impl ExecutionError {
	/// Whether retrying the order on a later poll cannot succeed.
	pub fn is_permanent(&self) -> bool {
		match self {
			ExecutionError::Routing(e) => e.is_permanent(),
			ExecutionError::DegeneratePair { .. } => true,
			_ => false,
		}
	}
}
