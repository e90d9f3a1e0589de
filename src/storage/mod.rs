//! Persisted typed key-value storage
//!
//! The host environment persists snap state as a single opaque blob behind a
//! whole-state get/replace primitive. This module bridges that primitive to a
//! typed, ordered key-value contract:
//!
//! - [`KvStore`] - the asynchronous store contract callers program against
//! - [`TypedCache`] - the in-memory ordered map of tagged values
//! - [`StateBlob`] and the [`codec`] - the durable wire form and its codec
//! - [`StateChannel`] - the host's whole-state persistence primitive
//! - [`HostKvStore`] - the persistence adapter: one lazy host read per
//!   generation, full-state flush after every write
//! - [`MemoryKvStore`] - the same contract kept entirely in process memory
//! - [`MemoryChannel`] - in-process host stand-in for tests and local runs
//!
//! Durability model: the blob held by the host is the only durable artifact.
//! Every cache is rebuilt from it, and every successful write has replaced it
//! in full before the call returns.
//!
//! # Examples
//!
//! ```
//! use caligo_snap::storage::{HostKvStore, KvStore, MemoryChannel};
//!
//! # tokio_test::block_on(async {
//! let channel = MemoryChannel::new();
//! let store = HostKvStore::new(channel.clone());
//!
//! store.put_string("spend_key", "0xabc").await.unwrap();
//! store.put_number("sync_height", 1024.0).await.unwrap();
//!
//! // A second instance over the same channel sees the flushed state.
//! let other = HostKvStore::new(channel);
//! assert_eq!(other.get_number("sync_height").await.unwrap(), Some(1024.0));
//! # });
//! ```

// Store contract and value model
pub mod adapter;
pub mod cache;
pub mod value;

// Wire form and host boundary
pub mod channel;
pub mod codec;

// Store implementations
pub mod host_store;
pub mod memory_store;

mod cell;

// Re-export main types for convenience
pub use adapter::KvStore;
pub use cache::TypedCache;
pub use channel::{MemoryChannel, StateChannel};
pub use codec::{EncodedValue, StateBlob};
pub use host_store::HostKvStore;
pub use memory_store::MemoryKvStore;
pub use value::{StoredValue, ValueKind};
