//! Routing types exchanged with the liquidity-discovery oracle.
//!
//! Routes are recomputed on every attempt and never persisted.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A liquidity pool indexed by the routing oracle for a token pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
	/// Pool contract address.
	pub address: Address,
	pub token_in: Address,
	pub token_out: Address,
	/// Oracle-specific pool state (balances, weights, swap fee).
	#[serde(default)]
	pub metadata: serde_json::Value,
}

/// Swap direction requested from the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapKind {
	#[serde(rename = "swapExactIn")]
	ExactIn,
	#[serde(rename = "swapExactOut")]
	ExactOut,
}

/// Parameters for the oracle's route selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
	pub kind: SwapKind,
	pub amount: U256,
	/// Maximum number of pools the route may split across.
	pub max_hops: usize,
	pub slippage_floor: U256,
}

impl RouteRequest {
	/// Exact-input request through the single best pool.
	pub fn exact_in(amount: U256) -> Self {
		Self {
			kind: SwapKind::ExactIn,
			amount,
			max_hops: 1,
			slippage_floor: U256::ZERO,
		}
	}
}

/// One swap of a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swap {
	/// Pool to trade against. The oracle may leave it out for a malformed
	/// result.
	pub pool: Option<Address>,
	pub amount_in: U256,
	pub amount_out: U256,
}

/// Route selected by the oracle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
	pub swaps: Vec<Swap>,
}

impl Route {
	/// Pool of the first swap, if the oracle returned a usable one.
	pub fn first_pool(&self) -> Option<Address> {
		self.swaps
			.first()
			.and_then(|swap| swap.pool)
			.filter(|pool| !pool.is_zero())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::address;

	#[test]
	fn test_first_pool() {
		let pool = address!("1111111111111111111111111111111111111111");
		let route = Route {
			swaps: vec![Swap {
				pool: Some(pool),
				amount_in: U256::from(100),
				amount_out: U256::from(95),
			}],
		};
		assert_eq!(route.first_pool(), Some(pool));

		assert_eq!(Route::default().first_pool(), None);

		let zero = Route {
			swaps: vec![Swap {
				pool: Some(Address::ZERO),
				amount_in: U256::from(1),
				amount_out: U256::from(1),
			}],
		};
		assert_eq!(zero.first_pool(), None);
	}

	#[test]
	fn test_swap_kind_wire_name() {
		let json = serde_json::to_string(&SwapKind::ExactIn).unwrap();
		assert_eq!(json, "\"swapExactIn\"");
	}
}
