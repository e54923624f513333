//! HTTP client for an external smart-order-router service.
//!
//! Pools are listed with `GET {url}/pools?tokenIn=..&tokenOut=..` and a route
//! is selected with `POST {url}/route`. Route selection itself happens on the
//! service side; this client only moves the data.

use crate::{RoutingError, RoutingOracleInterface};
use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use relayer_types::{Pool, Route, RouteRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Response of the pools endpoint.
#[derive(Debug, Deserialize)]
struct PoolsResponse {
	pools: Vec<Pool>,
}

/// Body of the route endpoint.
#[derive(Debug, Serialize)]
struct RouteQuery<'a> {
	pools: &'a [Pool],
	#[serde(flatten)]
	request: &'a RouteRequest,
}

/// Routing oracle reached over HTTP.
pub struct HttpRoutingOracle {
	client: reqwest::Client,
	base_url: String,
}

impl HttpRoutingOracle {
	pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RoutingError> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| {
				RoutingError::Transient(format!("Failed to create HTTP client: {}", e))
			})?;

		Ok(Self {
			client,
			base_url: base_url.into().trim_end_matches('/').to_string(),
		})
	}

	fn endpoint(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path)
	}

	async fn read_json<T: serde::de::DeserializeOwned>(
		response: reqwest::Response,
	) -> Result<T, RoutingError> {
		if !response.status().is_success() {
			return Err(RoutingError::Transient(format!(
				"HTTP request failed with status: {}",
				response.status()
			)));
		}

		response.json().await.map_err(|e| {
			RoutingError::Transient(format!("Failed to parse JSON response: {}", e))
		})
	}
}

#[async_trait]
impl RoutingOracleInterface for HttpRoutingOracle {
	async fn pools_for_pair(
		&self,
		token_in: Address,
		token_out: Address,
	) -> Result<Vec<Pool>, RoutingError> {
		let response = self
			.client
			.get(self.endpoint("pools"))
			.query(&[
				("tokenIn", token_in.to_string()),
				("tokenOut", token_out.to_string()),
			])
			.send()
			.await
			.map_err(|e| RoutingError::Transient(format!("HTTP request failed: {}", e)))?;

		let body: PoolsResponse = Self::read_json(response).await?;
		debug!(%token_in, %token_out, pools = body.pools.len(), "Fetched pools");
		Ok(body.pools)
	}

	async fn best_route(
		&self,
		pools: &[Pool],
		request: &RouteRequest,
	) -> Result<Route, RoutingError> {
		let response = self
			.client
			.post(self.endpoint("route"))
			.json(&RouteQuery { pools, request })
			.send()
			.await
			.map_err(|e| RoutingError::Transient(format!("HTTP request failed: {}", e)))?;

		Self::read_json(response).await
	}

	fn expected_output(&self, route: &Route) -> Result<U256, RoutingError> {
		route_output(route)
	}
}

/// Sums the output of every swap in a route.
pub fn route_output(route: &Route) -> Result<U256, RoutingError> {
	route.swaps.iter().try_fold(U256::ZERO, |total, swap| {
		total
			.checked_add(swap.amount_out)
			.ok_or_else(|| RoutingError::Transient("Route output overflows".to_string()))
	})
}
