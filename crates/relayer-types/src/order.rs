//! Order snapshot and settlement call parameters.

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::TokenId;

/// Point-in-time snapshot of an order from the registry.
///
/// The defining fields never change once observed. Only the order's existence
/// (open vs. filled/cancelled) changes, and it must be re-checked on-chain
/// right before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Registry identifier, unique per order.
	pub id: String,
	/// Account that authorized the order.
	pub owner: Address,
	/// Settlement module that validates the order.
	pub module: Address,
	/// Witness address that, with the other fields, keys the order in the
	/// settlement core. Required: with a wrong witness the on-chain existence
	/// check never finds the order.
	pub witness: Address,
	pub input_token: TokenId,
	pub output_token: TokenId,
	/// Exact amount to sell.
	pub input_amount: U256,
	/// Minimum acceptable output.
	pub min_return: U256,
	/// Owner's pre-authorization, passed through untouched.
	pub signature: Bytes,
	/// Hash of the order's creation transaction. Only used in logs.
	#[serde(default)]
	pub created_tx_hash: String,
}

impl Order {
	/// Whether neither side of the pair is the native asset.
	pub fn is_token_to_token(&self) -> bool {
		!self.input_token.is_native() && !self.output_token.is_native()
	}

	/// Copy of the order with both tokens resolved for a network whose
	/// settlement core denotes the native asset with `native_sentinel`.
	pub fn with_native_sentinel(&self, native_sentinel: Address) -> Order {
		Order {
			input_token: self.input_token.with_native_sentinel(native_sentinel),
			output_token: self.output_token.with_native_sentinel(native_sentinel),
			..self.clone()
		}
	}
}

/// Arguments of the settlement core's `executeOrder` entry point.
///
/// Field order matches the contract signature:
/// `(module, inputToken, owner, data, signature, auxData)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionParams {
	pub module: Address,
	pub input_token: Address,
	pub owner: Address,
	/// `abi.encode(outputToken, minReturn)`.
	pub data: Bytes,
	pub signature: Bytes,
	/// `abi.encode(handler, relayer, fee, poolA, poolB)`.
	pub aux_data: Bytes,
}

/// Gas parameters shared by the simulation and the real submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasSettings {
	pub gas_limit: u64,
	pub gas_price: U256,
}
