//! # Caligo Snap
//!
//! A pure Rust implementation of the Caligo wallet snap core, providing
//! persisted typed key-value storage over a host state channel and the RPC
//! surface dapps use to store keys and request signatures.
//!
//! ## Features
//!
//! - **Storage Module**: Ordered typed cache, dump codec, lazy loading, and
//!   key-value stores persisted through a whole-state host channel
//! - **RPC Module**: Request envelope parsing, confirmation dialog content,
//!   and dispatch to the store, the host dialog, and the protocol SDK signer
//!
//! ## Example
//!
//! ```rust
//! use caligo_snap::storage::{KvStore, MemoryKvStore};
//!
//! tokio_test::block_on(async {
//!     let store = MemoryKvStore::new();
//!     store.put_number("nonce", 1.0).await.unwrap();
//!     assert_eq!(store.get_number("nonce").await.unwrap(), Some(1.0));
//! });
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export core error types
pub use error::{Error, Result};

// Core modules
pub mod error;
pub mod rpc;
pub mod storage;

// Utility modules
mod utils;

// Re-export commonly used types
pub mod prelude {
    //! Common types and traits for convenient importing

    pub use crate::error::{Error, Result, RpcError, StoreError};
    pub use crate::rpc::{
        ConfirmDialog, DialogContent, OperationSigner, RpcRequest, RpcResponse, RpcRouter,
    };
    pub use crate::storage::{
        HostKvStore, KvStore, MemoryChannel, MemoryKvStore, StateChannel, StoredValue, ValueKind,
    };
}

// Version information
/// The version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
