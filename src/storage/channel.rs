//! Host persistence channel
//!
//! The host environment persists snap state through a single whole-state
//! primitive: fetch the last stored blob, or replace it outright. There are no
//! partial-key reads or writes, no version tokens, and no compare-and-swap;
//! [`StateChannel`] models exactly that surface and nothing more.
//!
//! [`MemoryChannel`] is the in-process implementation used by tests and local
//! development. Clones share one slot, which is how a test points two store
//! instances at the same "host".

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::StoreResult;
use crate::storage::codec::StateBlob;

/// Whole-state persistence primitive offered by the host
///
/// Implementations map their transport failures to
/// [`StoreError::HostUnavailable`](crate::error::StoreError::HostUnavailable);
/// the store layer never retries on their behalf.
pub trait StateChannel: Send + Sync {
    /// Returns the last stored blob, or `None` if the host has never been
    /// written to
    fn get(&self) -> impl std::future::Future<Output = StoreResult<Option<StateBlob>>> + Send;

    /// Unconditionally replaces the stored blob
    fn set(&self, blob: StateBlob) -> impl std::future::Future<Output = StoreResult<()>> + Send;
}

/// In-memory host channel
///
/// Cloning yields another handle to the same slot, mirroring how every snap
/// invocation sees the host's one persisted state.
///
/// # Examples
///
/// ```
/// use caligo_snap::storage::{MemoryChannel, StateChannel};
///
/// # tokio_test::block_on(async {
/// let channel = MemoryChannel::new();
/// assert!(channel.get().await.unwrap().is_none());
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryChannel {
    slot: Arc<RwLock<Option<StateBlob>>>,
}

impl MemoryChannel {
    /// Creates a channel whose slot has never been written
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the currently stored blob without going through the
    /// channel contract; test helper
    pub async fn snapshot(&self) -> Option<StateBlob> {
        self.slot.read().await.clone()
    }
}

impl StateChannel for MemoryChannel {
    async fn get(&self) -> StoreResult<Option<StateBlob>> {
        Ok(self.slot.read().await.clone())
    }

    async fn set(&self, blob: StateBlob) -> StoreResult<()> {
        *self.slot.write().await = Some(blob);
        Ok(())
    }
}
