//! RPC surface of the snap
//!
//! Requests arrive from the host runtime as JSON envelopes carrying a
//! `method` string and a `params` object. Handling is split into three
//! layers:
//!
//! - [`types`] parses the envelope into a typed [`RpcRequest`]
//! - [`display`] renders the confirmation dialog content signing methods
//!   must show before anything is signed
//! - [`router`] dispatches requests to the persisted store, the host's
//!   confirmation dialog, and the protocol SDK signer
//!
//! # Example
//!
//! Parsing an envelope and inspecting the routed request:
//!
//! ```
//! use caligo_snap::rpc::RpcRequest;
//!
//! let request = RpcRequest::from_json(
//!     r#"{
//!         "method": "caligo_setSpendKey",
//!         "params": { "spendKey": "0xabc", "eoaAddress": "0xdef" }
//!     }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(request.method(), "caligo_setSpendKey");
//! ```

// Envelope and parameter types
pub mod types;

// Confirmation dialog content
pub mod display;

// Request dispatch
pub mod router;

pub use display::{DialogContent, Erc20Config};
pub use router::{ConfirmDialog, OperationSigner, RpcRouter, SPEND_KEY, SPEND_KEY_EOA};
pub use types::{
    ActionMetadata, Asset, CanonAddress, ConfidentialPaymentMetadata, OperationMetadata,
    OperationMetadataItem, RegistryEntry, RpcRequest, RpcResponse, SetSpendKeyParams,
    SignCanonAddrRegistryEntryParams, SignOperationParams,
};
