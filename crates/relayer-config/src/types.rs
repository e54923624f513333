//! Configuration types for the relayer.

use crate::serde_helpers::{
	deserialize_amount, deserialize_chain_id_map, serialize_amount, serialize_chain_id_map,
};
use alloy::primitives::{Address, U256};
use relayer_types::{ChainId, NATIVE_TOKEN_SENTINEL};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Complete relayer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Relayer identity and credentials
	pub relayer: RelayerSettings,
	/// Per-network contract addresses, keyed by chain id
	#[serde(
		deserialize_with = "deserialize_chain_id_map",
		serialize_with = "serialize_chain_id_map"
	)]
	pub networks: HashMap<ChainId, NetworkConfig>,
	/// Routing oracle settings
	pub routing: RoutingConfig,
	/// Gas price oracle and fee policy
	#[serde(default)]
	pub gas: GasConfig,
	/// Pipeline settings
	#[serde(default)]
	pub execution: ExecutionConfig,
}

/// Relayer identity and credentials
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayerSettings {
	/// Relayer name, used in logs
	pub name: String,
	/// Network the relayer executes on
	pub network: ChainId,
	/// Hex-encoded signing key
	pub private_key: String,
	/// Liquidity handler to execute through (key into the network's handlers)
	#[serde(default = "default_handler")]
	pub handler: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

/// Contract addresses for one network
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	/// JSON-RPC endpoint
	pub rpc_url: String,
	/// Settlement core contract (`executeOrder` / `existOrder`)
	pub settlement_core: Address,
	/// Wrapped native token, used as the routing hub
	pub wrapped_native: Address,
	/// Address orders use to denote the native asset
	#[serde(default = "default_native_sentinel")]
	pub native_sentinel: Address,
	/// Liquidity handler contracts by name
	#[serde(default)]
	pub handlers: HashMap<String, Address>,
}

/// Routing oracle settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoutingConfig {
	/// Base URL of the routing service
	pub url: String,
	/// Candidate pools passed to route selection
	#[serde(default = "default_max_pools")]
	pub max_pools: usize,
	/// Pools a single leg may split across
	#[serde(default = "default_max_hops")]
	pub max_hops: usize,
	#[serde(default = "default_http_timeout_ms")]
	pub timeout_ms: u64,
}

/// Unit of the price published by the gas station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GasPriceUnit {
	Wei,
	#[default]
	Gwei,
	/// Tenths of gwei, as published by the legacy ethgasstation API
	GweiX10,
}

impl GasPriceUnit {
	/// Decimal places between the published unit and wei.
	pub fn decimals(&self) -> u8 {
		match self {
			GasPriceUnit::Wei => 0,
			GasPriceUnit::Gwei => 9,
			GasPriceUnit::GweiX10 => 8,
		}
	}
}

/// Gas price oracle and fee policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GasConfig {
	/// Gas station endpoint. Without it the node's suggested price is used.
	pub oracle_url: Option<String>,
	/// JSON field holding the price to bid
	#[serde(default = "default_oracle_field")]
	pub oracle_field: String,
	#[serde(default)]
	pub oracle_unit: GasPriceUnit,
	/// Fee floor, also used for the first gas estimation
	#[serde(
		default = "default_base_fee",
		deserialize_with = "deserialize_amount",
		serialize_with = "serialize_amount"
	)]
	pub base_fee: U256,
	/// Markup over the gas cost, in basis points
	#[serde(default)]
	pub markup_bps: u32,
	#[serde(default = "default_http_timeout_ms")]
	pub timeout_ms: u64,
}

/// How the pre-flight simulation is run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SimulationMode {
	/// The node reliably reports reverts on `eth_call`: simulate only.
	Trusted,
	/// Public node: simulate and re-estimate gas concurrently, abort if
	/// either fails.
	#[default]
	DualCheck,
}

/// Pipeline settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecutionConfig {
	#[serde(default)]
	pub simulation: SimulationMode,
	/// Gas added on top of the estimate for the gas limit
	#[serde(default = "default_gas_limit_margin")]
	pub gas_limit_margin: u64,
	/// Timeout applied to every oracle and node call
	#[serde(default = "default_call_timeout_secs")]
	pub call_timeout_secs: u64,
	/// Expiry of skip entries. Unset keeps them for the process lifetime.
	#[serde(default)]
	pub skip_ttl_secs: Option<u64>,
}

impl ExecutionConfig {
	pub fn call_timeout(&self) -> Duration {
		Duration::from_secs(self.call_timeout_secs)
	}

	pub fn skip_ttl(&self) -> Option<Duration> {
		self.skip_ttl_secs.map(Duration::from_secs)
	}
}

impl Default for GasConfig {
	fn default() -> Self {
		Self {
			oracle_url: None,
			oracle_field: default_oracle_field(),
			oracle_unit: GasPriceUnit::default(),
			base_fee: default_base_fee(),
			markup_bps: 0,
			timeout_ms: default_http_timeout_ms(),
		}
	}
}

impl Default for ExecutionConfig {
	fn default() -> Self {
		Self {
			simulation: SimulationMode::default(),
			gas_limit_margin: default_gas_limit_margin(),
			call_timeout_secs: default_call_timeout_secs(),
			skip_ttl_secs: None,
		}
	}
}

fn default_handler() -> String {
	"balancer".to_string()
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_native_sentinel() -> Address {
	NATIVE_TOKEN_SENTINEL
}

fn default_max_pools() -> usize {
	20
}

fn default_max_hops() -> usize {
	1
}

fn default_http_timeout_ms() -> u64 {
	10_000
}

fn default_oracle_field() -> String {
	"fast".to_string()
}

fn default_base_fee() -> U256 {
	// 0.001 native units
	U256::from(1_000_000_000_000_000u64)
}

fn default_gas_limit_margin() -> u64 {
	50_000
}

fn default_call_timeout_secs() -> u64 {
	30
}
