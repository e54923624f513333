//! Gas station client.
//!
//! Reads one field of a gas station JSON document, e.g. `{"fast": 35.5}`,
//! and converts it to wei. Any failure is reported as a zero price so the
//! caller falls back to the node.

use crate::{GasOracleError, GasOracleInterface};
use alloy::primitives::{utils::parse_units, U256};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Gas price oracle reached over HTTP.
pub struct HttpGasOracle {
	client: reqwest::Client,
	url: String,
	field: String,
	/// Decimal places between the published unit and wei.
	decimals: u8,
}

impl HttpGasOracle {
	pub fn new(
		url: impl Into<String>,
		field: impl Into<String>,
		decimals: u8,
		timeout: Duration,
	) -> Result<Self, GasOracleError> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| GasOracleError::Http(format!("Failed to create HTTP client: {}", e)))?;

		Ok(Self {
			client,
			url: url.into(),
			field: field.into(),
			decimals,
		})
	}

	/// Fetches and converts the configured field.
	pub async fn fetch(&self) -> Result<U256, GasOracleError> {
		let response = self
			.client
			.get(&self.url)
			.send()
			.await
			.map_err(|e| GasOracleError::Http(format!("HTTP request failed: {}", e)))?;

		if !response.status().is_success() {
			return Err(GasOracleError::Http(format!(
				"HTTP request failed with status: {}",
				response.status()
			)));
		}

		let body: Value = response
			.json()
			.await
			.map_err(|e| GasOracleError::InvalidResponse(e.to_string()))?;

		self.price_from(&body)
	}

	fn price_from(&self, body: &Value) -> Result<U256, GasOracleError> {
		let raw = match body.get(&self.field) {
			Some(Value::Number(n)) => n.to_string(),
			Some(Value::String(s)) => s.trim().to_string(),
			Some(other) => {
				return Err(GasOracleError::InvalidResponse(format!(
					"Field '{}' is not numeric: {}",
					self.field, other
				)))
			}
			None => {
				return Err(GasOracleError::InvalidResponse(format!(
					"Field '{}' missing",
					self.field
				)))
			}
		};

		if raw.starts_with('-') {
			return Err(GasOracleError::InvalidResponse(format!(
				"Negative gas price: {}",
				raw
			)));
		}

		parse_units(&raw, self.decimals)
			.map(|units| units.get_absolute())
			.map_err(|e| GasOracleError::InvalidResponse(format!("{}: {}", raw, e)))
	}
}

#[async_trait]
impl GasOracleInterface for HttpGasOracle {
	async fn suggested_gas_price(&self) -> U256 {
		match self.fetch().await {
			Ok(price) => {
				debug!(%price, "Gas station price");
				price
			}
			Err(e) => {
				warn!(error = %e, "Gas station unavailable");
				U256::ZERO
			}
		}
	}
}
