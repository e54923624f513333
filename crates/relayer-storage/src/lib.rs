//! Skip cache for the order relayer.
//!
//! Remembers orders that were found structurally unfillable (no liquidity
//! path, malformed oracle result, degenerate pair) so the relayer stops
//! paying routing and gas-estimation costs for them. The store is injected
//! into the pipeline at construction, so tests can hand each case a fresh
//! one and inspect it afterwards.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::debug;

/// Re-export implementations
pub mod implementations {
	pub mod memory;
}

pub use implementations::memory::MemorySkipStore;

/// Errors that can occur during skip store operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
}

/// Trait defining the low-level interface for skip store backends.
///
/// Inserting the same id twice is harmless; the later expiry wins.
#[async_trait]
pub trait SkipStoreInterface: Send + Sync {
	/// Records an order id, optionally expiring at `expires_at`.
	async fn insert(&self, order_id: &str, expires_at: Option<Instant>)
		-> Result<(), StorageError>;

	/// Checks whether an unexpired entry exists for the order id.
	async fn contains(&self, order_id: &str) -> Result<bool, StorageError>;

	/// Forgets an order id.
	async fn remove(&self, order_id: &str) -> Result<(), StorageError>;

	/// Number of live entries.
	async fn len(&self) -> Result<usize, StorageError>;
}

/// Skip cache service used by the execution pipeline.
pub struct SkipCache {
	/// The underlying storage backend implementation.
	backend: Box<dyn SkipStoreInterface>,
	/// Lifetime of new entries. `None` keeps them until restart.
	ttl: Option<Duration>,
}

impl SkipCache {
	/// Creates a skip cache whose entries live for the process lifetime.
	pub fn new(backend: Box<dyn SkipStoreInterface>) -> Self {
		Self { backend, ttl: None }
	}

	/// In-memory skip cache.
	pub fn in_memory() -> Self {
		Self::new(Box::new(MemorySkipStore::new()))
	}

	pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
		self.ttl = ttl;
		self
	}

	/// Marks an order as known unfillable.
	pub async fn mark(&self, order_id: &str) -> Result<(), StorageError> {
		let expires_at = self.ttl.map(|ttl| Instant::now() + ttl);
		debug!(order_id, ?expires_at, "Marking order as unfillable");
		self.backend.insert(order_id, expires_at).await
	}

	pub async fn is_marked(&self, order_id: &str) -> Result<bool, StorageError> {
		self.backend.contains(order_id).await
	}

	pub async fn unmark(&self, order_id: &str) -> Result<(), StorageError> {
		self.backend.remove(order_id).await
	}

	pub async fn len(&self) -> Result<usize, StorageError> {
		self.backend.len().await
	}
}
