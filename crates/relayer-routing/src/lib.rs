//! Routing oracle adapter.
//!
//! The liquidity-discovery oracle is a black box that lists pools for a token
//! pair, selects a route over a set of pools and reports the route's output.
//! [`RouteFinder`] wraps it for the execution pipeline: it caps the candidate
//! pool set, asks for an exact-input route through the single best pool and
//! turns the result into a [`Quote`]. Failures come back as a tagged
//! [`RoutingError`] so callers can tell permanent routing facts from
//! transient trouble.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use relayer_types::{Pool, Route, RouteRequest};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Re-export implementations
pub mod implementations {
	pub mod http;
}

pub use implementations::http::HttpRoutingOracle;

/// Errors returned by the routing oracle adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
	/// The oracle knows no pool for the pair.
	#[error("There are no pools with selected tokens {token_in} -> {token_out}")]
	NoRoute { token_in: Address, token_out: Address },
	/// The oracle returned a route without a usable pool.
	#[error("Route for {token_in} -> {token_out} has no pool")]
	MalformedPool { token_in: Address, token_out: Address },
	/// Network, timeout or oracle-side failure.
	#[error("Routing oracle error: {0}")]
	Transient(String),
}

impl RoutingError {
	/// Whether the failure is a slow-changing market fact rather than a
	/// hiccup worth retrying on the next poll.
	pub fn is_permanent(&self) -> bool {
		matches!(
			self,
			RoutingError::NoRoute { .. } | RoutingError::MalformedPool { .. }
		)
	}
}

/// Interface of the liquidity-discovery oracle.
#[async_trait]
pub trait RoutingOracleInterface: Send + Sync {
	/// Lists candidate pools for a pair, best first by the oracle's ordering.
	async fn pools_for_pair(
		&self,
		token_in: Address,
		token_out: Address,
	) -> Result<Vec<Pool>, RoutingError>;

	/// Selects a route over the given pools.
	async fn best_route(&self, pools: &[Pool], request: &RouteRequest)
		-> Result<Route, RoutingError>;

	/// Aggregate output of a route.
	fn expected_output(&self, route: &Route) -> Result<U256, RoutingError>;
}

/// Best pool and expected output for one routing leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
	pub pool: Address,
	pub expected_output: U256,
}

/// Pipeline-facing wrapper around a routing oracle.
#[derive(Clone)]
pub struct RouteFinder {
	oracle: Arc<dyn RoutingOracleInterface>,
	max_pools: usize,
	max_hops: usize,
	call_timeout: Option<Duration>,
}

impl RouteFinder {
	pub fn new(oracle: Arc<dyn RoutingOracleInterface>) -> Self {
		Self {
			oracle,
			max_pools: 20,
			max_hops: 1,
			call_timeout: None,
		}
	}

	/// Caps the candidate pool set to bound route-selection cost.
	pub fn with_max_pools(mut self, max_pools: usize) -> Self {
		self.max_pools = max_pools;
		self
	}

	pub fn with_max_hops(mut self, max_hops: usize) -> Self {
		self.max_hops = max_hops;
		self
	}

	/// Bounds every oracle call. A timeout is reported as transient.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.call_timeout = Some(timeout);
		self
	}

	/// Quotes an exact-input swap of `amount` from `token_in` to `token_out`.
	pub async fn quote(
		&self,
		token_in: Address,
		token_out: Address,
		amount: U256,
	) -> Result<Quote, RoutingError> {
		let mut pools = self
			.bounded("pools", self.oracle.pools_for_pair(token_in, token_out))
			.await?;
		if pools.is_empty() {
			return Err(RoutingError::NoRoute {
				token_in,
				token_out,
			});
		}
		pools.truncate(self.max_pools);

		let request = RouteRequest {
			max_hops: self.max_hops,
			..RouteRequest::exact_in(amount)
		};
		let route = self
			.bounded("route", self.oracle.best_route(&pools, &request))
			.await?;

		let pool = route.first_pool().ok_or(RoutingError::MalformedPool {
			token_in,
			token_out,
		})?;
		let expected_output = self.oracle.expected_output(&route)?;

		debug!(
			%token_in,
			%token_out,
			%amount,
			%pool,
			%expected_output,
			candidates = pools.len(),
			"Quoted routing leg"
		);

		Ok(Quote {
			pool,
			expected_output,
		})
	}

	async fn bounded<T, F>(&self, step: &str, call: F) -> Result<T, RoutingError>
	where
		F: Future<Output = Result<T, RoutingError>>,
	{
		match self.call_timeout {
			Some(timeout) => tokio::time::timeout(timeout, call).await.map_err(|_| {
				RoutingError::Transient(format!(
					"{} call timed out after {}ms",
					step,
					timeout.as_millis()
				))
			})?,
			None => call.await,
		}
	}
}
