//! Execution parameter building for the settlement core.
//!
//! The settlement core fills a limit order through `executeOrder`, which
//! takes the order's defining fields plus two ABI-encoded payloads: the
//! output side of the order and the execution context chosen by the relayer
//! (handler, fee recipient, fee and pools). Everything here is pure: the same
//! inputs always produce byte-identical calldata.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::{SolCall, SolValue};
use relayer_types::{ExecutionParams, Order};
use thiserror::Error;

sol! {
	/// Entry points of the settlement core used by the relayer.
	interface ISettlementCore {
		function executeOrder(
			address module,
			address inputToken,
			address owner,
			bytes data,
			bytes signature,
			bytes auxData
		) external;

		function existOrder(
			address module,
			address inputToken,
			address owner,
			address witness,
			bytes data
		) external view returns (bool);
	}
}

/// Errors that can occur while decoding settlement core results.
#[derive(Debug, Error)]
pub enum OrderError {
	#[error("Failed to decode {call} result: {reason}")]
	Decode { call: &'static str, reason: String },
}

/// Encodes the output side of an order: `abi.encode(outputToken, minReturn)`.
pub fn encode_order_data(order: &Order, native_sentinel: Address) -> Bytes {
	(order.output_token.encode(native_sentinel), order.min_return)
		.abi_encode_params()
		.into()
}

/// Builds the arguments of `executeOrder` for one fill attempt.
///
/// `pool_a` and `pool_b` are the same pool when a single routing leg was
/// used.
pub fn build_params(
	order: &Order,
	handler: Address,
	relayer: Address,
	pool_a: Address,
	pool_b: Address,
	fee: U256,
	native_sentinel: Address,
) -> ExecutionParams {
	let aux_data = (handler, relayer, fee, pool_a, pool_b).abi_encode_params();

	ExecutionParams {
		module: order.module,
		input_token: order.input_token.encode(native_sentinel),
		owner: order.owner,
		data: encode_order_data(order, native_sentinel),
		signature: order.signature.clone(),
		aux_data: aux_data.into(),
	}
}

/// Calldata encoding for settlement core calls.
pub trait SettlementCall {
	/// Encodes the full `executeOrder(...)` call.
	fn calldata(&self) -> Bytes;
}

impl SettlementCall for ExecutionParams {
	fn calldata(&self) -> Bytes {
		ISettlementCore::executeOrderCall {
			module: self.module,
			inputToken: self.input_token,
			owner: self.owner,
			data: self.data.clone(),
			signature: self.signature.clone(),
			auxData: self.aux_data.clone(),
		}
		.abi_encode()
		.into()
	}
}

/// Encodes the `existOrder(...)` query for an order.
pub fn exist_order_calldata(order: &Order, data: &Bytes, native_sentinel: Address) -> Bytes {
	ISettlementCore::existOrderCall {
		module: order.module,
		inputToken: order.input_token.encode(native_sentinel),
		owner: order.owner,
		witness: order.witness,
		data: data.clone(),
	}
	.abi_encode()
	.into()
}

/// Decodes the boolean returned by `existOrder`.
pub fn decode_exist_order(output: &[u8]) -> Result<bool, OrderError> {
	ISettlementCore::existOrderCall::abi_decode_returns(output).map_err(|e| OrderError::Decode {
		call: "existOrder",
		reason: e.to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::address;
	use relayer_types::{TokenId, NATIVE_TOKEN_SENTINEL};

	const DAI: Address = address!("6b175474e89094c44da98b954eedeac495271d0f");
	const HANDLER: Address = address!("c5e07fef737ba98521d915c75d42600a1b744cc4");
	const RELAYER: Address = address!("90f79bf6eb2c4f870365e785982e1f101e93b906");

	fn order() -> Order {
		Order {
			id: "0xorder".to_string(),
			owner: address!("1111111111111111111111111111111111111111"),
			module: address!("2222222222222222222222222222222222222222"),
			witness: address!("3333333333333333333333333333333333333333"),
			input_token: TokenId::Fungible(DAI),
			output_token: TokenId::Native,
			input_amount: U256::from(100),
			min_return: U256::from(90),
			signature: Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]),
			created_tx_hash: "0xfeed".to_string(),
		}
	}

	fn params(fee: u64) -> ExecutionParams {
		let pool = Address::with_last_byte(9);
		build_params(
			&order(),
			HANDLER,
			RELAYER,
			pool,
			pool,
			U256::from(fee),
			NATIVE_TOKEN_SENTINEL,
		)
	}

	#[test]
	fn test_build_params_is_deterministic() {
		let first = params(1_000);
		let second = params(1_000);

		assert_eq!(first, second);
		assert_eq!(first.calldata(), second.calldata());
	}

	#[test]
	fn test_fee_changes_only_aux_data() {
		let base = params(1_000);
		let real = params(2_500);

		assert_eq!(base.data, real.data);
		assert_ne!(base.aux_data, real.aux_data);
	}

	#[test]
	fn test_payload_layout() {
		let params = params(1_000);
		assert_eq!(params.module, order().module);
		assert_eq!(params.input_token, DAI);
		assert_eq!(params.owner, order().owner);
		assert_eq!(params.signature, order().signature);

		let (output_token, min_return) =
			<(Address, U256)>::abi_decode_params(&params.data).unwrap();
		assert_eq!(output_token, NATIVE_TOKEN_SENTINEL);
		assert_eq!(min_return, U256::from(90));

		let (handler, relayer, fee, pool_a, pool_b) =
			<(Address, Address, U256, Address, Address)>::abi_decode_params(&params.aux_data)
				.unwrap();
		assert_eq!(handler, HANDLER);
		assert_eq!(relayer, RELAYER);
		assert_eq!(fee, U256::from(1_000));
		assert_eq!(pool_a, pool_b);
		assert_eq!(params.aux_data.len(), 5 * 32);
	}

	#[test]
	fn test_execute_order_selector() {
		let calldata = params(1_000).calldata();
		assert_eq!(&calldata[..4], ISettlementCore::executeOrderCall::SELECTOR.as_slice());
		assert_eq!(
			hex::encode(ISettlementCore::executeOrderCall::SELECTOR),
			hex::encode(&alloy::primitives::keccak256(
				"executeOrder(address,address,address,bytes,bytes,bytes)"
			)[..4])
		);
	}

	#[test]
	fn test_exist_order_round_trip() {
		let order = order();
		let data = encode_order_data(&order, NATIVE_TOKEN_SENTINEL);
		let calldata = exist_order_calldata(&order, &data, NATIVE_TOKEN_SENTINEL);
		assert_eq!(&calldata[..4], ISettlementCore::existOrderCall::SELECTOR.as_slice());

		let mut word = [0u8; 32];
		word[31] = 1;
		assert!(decode_exist_order(&word).unwrap());
		assert!(!decode_exist_order(&[0u8; 32]).unwrap());
		assert!(decode_exist_order(&[]).is_err());
	}
}
