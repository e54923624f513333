//! Token identity.
//!
//! The registry encodes the chain's native asset with a sentinel address.
//! Inside the relayer the native asset is a separate variant so it can never
//! be compared against an ERC-20 address by accident. The sentinel only shows
//! up again when an order is serialized or ABI-encoded.
//!
//! Deserialization recognizes [`NATIVE_TOKEN_SENTINEL`]. Networks configured
//! with another sentinel re-resolve tokens with
//! [`TokenId::with_native_sentinel`] before using them.

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Address the registry uses to denote the native asset.
pub const NATIVE_TOKEN_SENTINEL: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

/// Identity of one side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Address", into = "Address")]
pub enum TokenId {
	/// The chain's native asset (not an ERC-20 contract).
	Native,
	/// An ERC-20 token contract.
	Fungible(Address),
}

impl TokenId {
	pub fn is_native(&self) -> bool {
		matches!(self, TokenId::Native)
	}

	/// Address used when talking to the routing oracle.
	///
	/// The oracle only indexes ERC-20 pairs, so the native asset is routed
	/// through its wrapped representation.
	pub fn routing_address(&self, wrapped_native: Address) -> Address {
		match self {
			TokenId::Native => wrapped_native,
			TokenId::Fungible(address) => *address,
		}
	}

	/// Reads `address` as a token on a network using `native_sentinel`.
	pub fn resolve(address: Address, native_sentinel: Address) -> Self {
		if address == native_sentinel {
			TokenId::Native
		} else {
			TokenId::Fungible(address)
		}
	}

	/// Re-resolves a token parsed against [`NATIVE_TOKEN_SENTINEL`] for a
	/// network using `native_sentinel`. The raw address is preserved, so this
	/// is the identity when both sentinels match.
	pub fn with_native_sentinel(self, native_sentinel: Address) -> Self {
		Self::resolve(self.encode(NATIVE_TOKEN_SENTINEL), native_sentinel)
	}

	/// Address written into settlement calldata.
	pub fn encode(&self, native_sentinel: Address) -> Address {
		match self {
			TokenId::Native => native_sentinel,
			TokenId::Fungible(address) => *address,
		}
	}
}

impl From<Address> for TokenId {
	fn from(address: Address) -> Self {
		TokenId::resolve(address, NATIVE_TOKEN_SENTINEL)
	}
}

impl From<TokenId> for Address {
	fn from(token: TokenId) -> Self {
		token.encode(NATIVE_TOKEN_SENTINEL)
	}
}

impl fmt::Display for TokenId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TokenId::Native => write!(f, "native"),
			TokenId::Fungible(address) => write!(f, "{}", address),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const WETH: Address = address!("c778417e063141139fce010982780140aa0cd5ab");
	const DAI: Address = address!("6b175474e89094c44da98b954eedeac495271d0f");

	#[test]
	fn test_sentinel_maps_to_native() {
		assert_eq!(TokenId::from(NATIVE_TOKEN_SENTINEL), TokenId::Native);
		assert_eq!(TokenId::from(DAI), TokenId::Fungible(DAI));
	}

	#[test]
	fn test_other_network_sentinel() {
		// Network whose settlement core denotes the native asset with 0x0
		let parsed = TokenId::from(Address::ZERO);
		assert_eq!(parsed, TokenId::Fungible(Address::ZERO));
		assert_eq!(parsed.with_native_sentinel(Address::ZERO), TokenId::Native);

		// The default sentinel is an ordinary address there
		assert_eq!(
			TokenId::Native.with_native_sentinel(Address::ZERO),
			TokenId::Fungible(NATIVE_TOKEN_SENTINEL)
		);
		assert_eq!(
			TokenId::Fungible(DAI).with_native_sentinel(Address::ZERO),
			TokenId::Fungible(DAI)
		);
		assert_eq!(
			TokenId::Native.with_native_sentinel(NATIVE_TOKEN_SENTINEL),
			TokenId::Native
		);
	}

	#[test]
	fn test_routing_address_uses_wrapped_native() {
		assert_eq!(TokenId::Native.routing_address(WETH), WETH);
		assert_eq!(TokenId::Fungible(DAI).routing_address(WETH), DAI);
	}

	#[test]
	fn test_json_uses_sentinel() {
		let json = serde_json::to_string(&TokenId::Native).unwrap();
		assert_eq!(
			json.to_lowercase(),
			"\"0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee\""
		);

		let token: TokenId =
			serde_json::from_str("\"0x6B175474E89094C44Da98b954EedeAC495271d0F\"").unwrap();
		assert_eq!(token, TokenId::Fungible(DAI));
	}
}
