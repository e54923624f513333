//! In-memory skip store.

use crate::{StorageError, SkipStoreInterface};
use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;

/// DashMap-backed skip store, cleared on restart.
#[derive(Debug, Default)]
pub struct MemorySkipStore {
	entries: DashMap<String, Option<Instant>>,
}

impl MemorySkipStore {
	pub fn new() -> Self {
		Self::default()
	}

	fn is_live(expires_at: &Option<Instant>, now: Instant) -> bool {
		expires_at.map_or(true, |at| at > now)
	}
}

#[async_trait]
impl SkipStoreInterface for MemorySkipStore {
	async fn insert(
		&self,
		order_id: &str,
		expires_at: Option<Instant>,
	) -> Result<(), StorageError> {
		self.entries.insert(order_id.to_string(), expires_at);
		Ok(())
	}

	async fn contains(&self, order_id: &str) -> Result<bool, StorageError> {
		let now = Instant::now();
		let live = match self.entries.get(order_id) {
			Some(entry) => Self::is_live(entry.value(), now),
			None => return Ok(false),
		};

		if !live {
			self.entries
				.remove_if(order_id, |_, expires_at| !Self::is_live(expires_at, now));
		}

		Ok(live)
	}

	async fn remove(&self, order_id: &str) -> Result<(), StorageError> {
		self.entries.remove(order_id);
		Ok(())
	}

	async fn len(&self) -> Result<usize, StorageError> {
		let now = Instant::now();
		self.entries
			.retain(|_, expires_at| Self::is_live(expires_at, now));
		Ok(self.entries.len())
	}
}
