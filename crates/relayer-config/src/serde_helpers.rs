//! Serde helpers for configuration deserialization

use alloy::primitives::U256;
use relayer_types::ChainId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::str::FromStr;

/// Custom deserializer for HashMap<ChainId, T> that handles string keys
///
/// TOML table keys are always strings, so `[networks.1]` arrives as `"1"`.
pub fn deserialize_chain_id_map<'de, D, T>(
	deserializer: D,
) -> Result<HashMap<ChainId, T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	let map = HashMap::<String, T>::deserialize(deserializer)?;

	map.into_iter()
		.map(|(k, v)| {
			k.parse::<ChainId>()
				.map(|id| (id, v))
				.map_err(|_| serde::de::Error::custom(format!("Invalid chain ID: {}", k)))
		})
		.collect()
}

/// Custom serializer for HashMap<ChainId, T> that converts ChainId to string keys
pub fn serialize_chain_id_map<S, T>(
	map: &HashMap<ChainId, T>,
	serializer: S,
) -> Result<S::Ok, S::Error>
where
	S: Serializer,
	T: Serialize,
{
	let string_map: HashMap<String, &T> = map.iter().map(|(k, v)| (k.to_string(), v)).collect();

	string_map.serialize(serializer)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
	Integer(u64),
	Text(String),
}

/// Deserializes a token amount written either as a TOML integer or as a
/// decimal / `0x` hex string (for values that do not fit in an i64).
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
	D: Deserializer<'de>,
{
	match AmountRepr::deserialize(deserializer)? {
		AmountRepr::Integer(value) => Ok(U256::from(value)),
		AmountRepr::Text(text) => U256::from_str(text.trim())
			.map_err(|e| serde::de::Error::custom(format!("Invalid amount '{}': {}", text, e))),
	}
}

/// Serializes an amount as a decimal string.
pub fn serialize_amount<S>(amount: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(&amount.to_string())
}
