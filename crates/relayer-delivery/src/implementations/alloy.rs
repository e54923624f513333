//! Alloy-backed settlement core client.
//!
//! Uses an HTTP provider with a local private-key wallet. Nonce and chain id
//! are filled by the provider; gas limit and price are always set explicitly
//! so the simulation and the submission use the same values.

use crate::{SettlementError, SettlementInterface};
use alloy::network::{Ethereum, EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use relayer_order::{decode_exist_order, exist_order_calldata, SettlementCall};
use relayer_types::{ChainId, ExecutionParams, GasSettings, Order, TransactionHash};
use tracing::{debug, info};

/// Settlement core client signing with a local key.
pub struct AlloySettlement {
	provider: Box<dyn Provider<Ethereum>>,
	/// Settlement core contract.
	core: Address,
	relayer: Address,
	native_sentinel: Address,
}

impl AlloySettlement {
	pub fn new(
		rpc_url: &str,
		chain_id: ChainId,
		private_key: &str,
		core: Address,
		native_sentinel: Address,
	) -> Result<Self, SettlementError> {
		let signer = private_key
			.parse::<PrivateKeySigner>()
			.map_err(|e| SettlementError::InvalidConfig(format!("Invalid private key: {}", e)))?;
		let relayer = signer.address();
		debug!(%relayer, chain_id, "Wallet configured");

		let url = rpc_url
			.parse()
			.map_err(|e| SettlementError::InvalidConfig(format!("Invalid RPC URL: {}", e)))?;

		let provider = ProviderBuilder::new()
			.with_chain_id(chain_id)
			.wallet(EthereumWallet::from(signer))
			.connect_http(url);

		Ok(Self {
			provider: Box::new(provider),
			core,
			relayer,
			native_sentinel,
		})
	}

	fn request(&self, params: &ExecutionParams, gas: Option<GasSettings>) -> TransactionRequest {
		let request = TransactionRequest::default()
			.with_from(self.relayer)
			.with_to(self.core)
			.with_input(params.calldata());

		match gas {
			Some(gas) => request
				.with_gas_limit(gas.gas_limit)
				.with_gas_price(gas.gas_price.saturating_to::<u128>()),
			None => request,
		}
	}
}

#[async_trait]
impl SettlementInterface for AlloySettlement {
	fn relayer_address(&self) -> Address {
		self.relayer
	}

	async fn estimate_gas(&self, params: &ExecutionParams) -> Result<u64, SettlementError> {
		self.provider
			.estimate_gas(self.request(params, None))
			.await
			.map_err(|e| SettlementError::Estimation(e.to_string()))
	}

	async fn simulate(
		&self,
		params: &ExecutionParams,
		gas: GasSettings,
	) -> Result<(), SettlementError> {
		self.provider
			.call(self.request(params, Some(gas)))
			.await
			.map_err(|e| SettlementError::Simulation(e.to_string()))?;
		Ok(())
	}

	async fn submit(
		&self,
		params: &ExecutionParams,
		gas: GasSettings,
	) -> Result<TransactionHash, SettlementError> {
		let pending = self
			.provider
			.send_transaction(self.request(params, Some(gas)))
			.await
			.map_err(|e| SettlementError::Submission(e.to_string()))?;

		let tx_hash = TransactionHash(*pending.tx_hash());
		info!(%tx_hash, gas_limit = gas.gas_limit, "Submitted transaction");
		Ok(tx_hash)
	}

	async fn order_is_open(&self, order: &Order, data: &Bytes) -> Result<bool, SettlementError> {
		let request = TransactionRequest::default().with_to(self.core).with_input(
			exist_order_calldata(order, data, self.native_sentinel),
		);

		let output = self
			.provider
			.call(request)
			.await
			.map_err(|e| SettlementError::Rpc(format!("existOrder call failed: {}", e)))?;

		decode_exist_order(&output).map_err(|e| SettlementError::Rpc(e.to_string()))
	}

	async fn suggested_gas_price(&self) -> Result<U256, SettlementError> {
		let price = self
			.provider
			.get_gas_price()
			.await
			.map_err(|e| SettlementError::Rpc(format!("Failed to get gas price: {}", e)))?;
		Ok(U256::from(price))
	}
}
