//! Configuration loading for the order relayer.
//!
//! Configuration is read from a TOML file, `${VAR}` references are replaced
//! with environment variables, a few settings can be overridden from the
//! environment, and the result is validated before it is handed to the
//! relayer.

use alloy::primitives::Address;
use regex::Regex;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub mod serde_helpers;
pub mod types;

pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

impl Config {
	/// Contract addresses of the network the relayer executes on.
	pub fn active_network(&self) -> Result<&NetworkConfig, ConfigError> {
		self.networks.get(&self.relayer.network).ok_or_else(|| {
			ConfigError::ValidationError(format!(
				"Network {} is not configured",
				self.relayer.network
			))
		})
	}

	/// Address of the configured liquidity handler on the active network.
	pub fn handler_address(&self) -> Result<Address, ConfigError> {
		let network = self.active_network()?;
		network
			.handlers
			.get(&self.relayer.handler)
			.copied()
			.ok_or_else(|| {
				ConfigError::ValidationError(format!(
					"Handler '{}' is not configured for network {}",
					self.relayer.handler, self.relayer.network
				))
			})
	}
}

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
	file_path: Option<String>,
	env_prefix: String,
}

impl Default for ConfigLoader {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "RELAYER_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_string_lossy().to_string());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	pub async fn load(&self) -> Result<Config, ConfigError> {
		let file_path = self.file_path.as_ref().ok_or_else(|| {
			ConfigError::FileNotFound("No configuration file specified".to_string())
		})?;

		if !Path::new(file_path).exists() {
			return Err(ConfigError::FileNotFound(file_path.clone()));
		}

		let content = tokio::fs::read_to_string(file_path).await?;
		let mut config = self.parse(&content)?;

		self.apply_env_overrides(&mut config)?;
		validate_config(&config)?;

		Ok(config)
	}

	/// Parses configuration text after substituting environment variables.
	pub fn parse(&self, content: &str) -> Result<Config, ConfigError> {
		let substituted = substitute_env_vars(content)?;

		toml::from_str(&substituted).map_err(|e| ConfigError::ParseError(e.to_string()))
	}

	fn apply_env_overrides(&self, config: &mut Config) -> Result<(), ConfigError> {
		if let Ok(log_level) = env::var(format!("{}LOG_LEVEL", self.env_prefix)) {
			debug!("Overriding log level from environment");
			config.relayer.log_level = log_level;
		}

		if let Ok(network) = env::var(format!("{}NETWORK", self.env_prefix)) {
			config.relayer.network = network
				.parse()
				.map_err(|e| ConfigError::ValidationError(format!("Invalid network: {}", e)))?;
		}

		if let Ok(mode) = env::var(format!("{}SIMULATION_MODE", self.env_prefix)) {
			config.execution.simulation = match mode.to_ascii_lowercase().as_str() {
				"trusted" => SimulationMode::Trusted,
				"dual_check" => SimulationMode::DualCheck,
				other => {
					return Err(ConfigError::ValidationError(format!(
						"Invalid simulation mode: {}",
						other
					)))
				}
			};
		}

		Ok(())
	}
}

fn substitute_env_vars(content: &str) -> Result<String, ConfigError> {
	let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::ParseError(e.to_string()))?;
	let mut result = content.to_string();

	for cap in re.captures_iter(content) {
		let full_match = &cap[0];
		let var_name = &cap[1];

		let env_value =
			env::var(var_name).map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

		result = result.replace(full_match, &env_value);
	}

	Ok(result)
}

/// Checks the invariants the relayer relies on at construction time.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
	let key = config.relayer.private_key.as_str();
	let key = key.strip_prefix("0x").unwrap_or(key);
	if key.len() != 64 || !key.chars().all(|c| c.is_ascii_hexdigit()) {
		return Err(ConfigError::ValidationError(
			"Private key must be 64 hex characters (32 bytes)".to_string(),
		));
	}

	let network = config.active_network()?;
	if !network.rpc_url.starts_with("http://") && !network.rpc_url.starts_with("https://") {
		return Err(ConfigError::ValidationError(
			"RPC URL must start with http:// or https://".to_string(),
		));
	}
	if network.wrapped_native.is_zero() || network.settlement_core.is_zero() {
		return Err(ConfigError::ValidationError(format!(
			"Network {} is missing contract addresses",
			config.relayer.network
		)));
	}
	config.handler_address()?;

	if config.routing.max_pools == 0 || config.routing.max_hops == 0 {
		return Err(ConfigError::ValidationError(
			"routing.max_pools and routing.max_hops must be positive".to_string(),
		));
	}

	if config.execution.gas_limit_margin == 0 {
		return Err(ConfigError::ValidationError(
			"execution.gas_limit_margin must be positive".to_string(),
		));
	}

	if config.execution.call_timeout_secs == 0 {
		return Err(ConfigError::ValidationError(
			"execution.call_timeout_secs must be positive".to_string(),
		));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::{address, U256};
	use std::io::Write;

	const KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

	fn sample_toml(key: &str) -> String {
		format!(
			r#"
[relayer]
name = "test-relayer"
network = 4
private_key = "{key}"

[networks.4]
rpc_url = "http://localhost:8545"
settlement_core = "0xd412054cca18a61278ced6f674a526a6940ebd84"
wrapped_native = "0xc778417e063141139fce010982780140aa0cd5ab"

[networks.4.handlers]
balancer = "0xc5e07fef737ba98521d915c75d42600a1b744cc4"

[routing]
url = "http://localhost:3000"

[gas]
oracle_url = "http://localhost:4000/gas"
base_fee = "2000000000000000"
markup_bps = 1000

[execution]
simulation = "trusted"
skip_ttl_secs = 3600
"#
		)
	}

	#[test]
	fn test_toml_parsing() {
		let config = ConfigLoader::new().parse(&sample_toml(KEY)).unwrap();

		assert_eq!(config.relayer.name, "test-relayer");
		assert_eq!(config.relayer.handler, "balancer");
		assert_eq!(config.routing.max_pools, 20);
		assert_eq!(config.routing.max_hops, 1);
		assert_eq!(config.gas.base_fee, U256::from(2_000_000_000_000_000u64));
		assert_eq!(config.gas.oracle_field, "fast");
		assert_eq!(config.execution.simulation, SimulationMode::Trusted);
		assert_eq!(config.execution.gas_limit_margin, 50_000);
		assert_eq!(config.execution.skip_ttl_secs, Some(3600));

		let network = config.active_network().unwrap();
		assert_eq!(network.native_sentinel, relayer_types::NATIVE_TOKEN_SENTINEL);
		assert_eq!(
			config.handler_address().unwrap(),
			address!("c5e07fef737ba98521d915c75d42600a1b744cc4")
		);
		validate_config(&config).unwrap();
	}

	#[test]
	fn test_env_substitution() {
		env::set_var("RELAYER_TEST_SUBST_KEY", KEY);
		let config = ConfigLoader::new()
			.parse(&sample_toml("${RELAYER_TEST_SUBST_KEY}"))
			.unwrap();
		assert_eq!(config.relayer.private_key, KEY);
	}

	#[test]
	fn test_missing_env_var() {
		let result = ConfigLoader::new().parse(&sample_toml("${RELAYER_TEST_DOES_NOT_EXIST}"));
		assert!(matches!(result, Err(ConfigError::EnvVarNotFound(_))));
	}

	#[test]
	fn test_validation_rejects_unknown_handler() {
		let mut config = ConfigLoader::new().parse(&sample_toml(KEY)).unwrap();
		config.relayer.handler = "kyber".to_string();
		assert!(matches!(
			validate_config(&config),
			Err(ConfigError::ValidationError(_))
		));
	}

	#[test]
	fn test_validation_rejects_bad_key() {
		let config = ConfigLoader::new().parse(&sample_toml("0x1234")).unwrap();
		assert!(validate_config(&config).is_err());
	}

	#[test]
	fn test_validation_rejects_unconfigured_network() {
		let mut config = ConfigLoader::new().parse(&sample_toml(KEY)).unwrap();
		config.relayer.network = 56;
		assert!(validate_config(&config).is_err());
	}

	#[tokio::test]
	async fn test_load_from_file_with_overrides() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(sample_toml(KEY).as_bytes()).unwrap();

		env::set_var("RELAYER_FILETEST_SIMULATION_MODE", "dual_check");
		let config = ConfigLoader::new()
			.with_file(file.path())
			.with_env_prefix("RELAYER_FILETEST_")
			.load()
			.await
			.unwrap();

		assert_eq!(config.execution.simulation, SimulationMode::DualCheck);
	}

	#[tokio::test]
	async fn test_load_missing_file() {
		let result = ConfigLoader::new()
			.with_file("/nonexistent/relayer.toml")
			.load()
			.await;
		assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
	}
}
