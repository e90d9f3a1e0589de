//! Error types for the Caligo snap library
//!
//! This module provides a unified error handling system using `thiserror` for
//! all components of the snap: the persisted store and the RPC layer.

use thiserror::Error;

use crate::storage::ValueKind;

/// The main error type for the Caligo snap library
#[derive(Error, Debug)]
pub enum Error {
    /// Persisted store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// RPC dispatch errors
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// Other errors
    #[error("Other error: {message}")]
    Other {
        /// Description of the failure
        message: String,
    },
}

/// Store-specific error types
///
/// Host round-trip failures, decode failures, and type-mismatch reads are all
/// fatal for the operation that hit them. The store never retries on its own;
/// retry policy belongs to the caller, which knows the host's fault model.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The round trip to the host persistence channel failed or timed out
    #[error("Host persistence channel unavailable: {reason}")]
    HostUnavailable {
        /// Cause reported by the channel
        reason: String,
    },

    /// A fetched state blob could not be decoded
    #[error("Malformed state blob: {reason}")]
    MalformedBlob {
        /// Decode failure detail
        reason: String,
    },

    /// A key's stored type tag does not match the accessor used to read it
    #[error("Type mismatch for key '{key}': stored {stored}, requested {requested}")]
    TypeMismatch {
        /// Key whose value was read
        key: String,
        /// Tag the value was stored with
        stored: ValueKind,
        /// Tag implied by the accessor
        requested: ValueKind,
    },
}

/// RPC-specific error types
#[derive(Error, Debug)]
pub enum RpcError {
    /// The request named a method this snap does not implement
    #[error("Method not found: {method}")]
    UnknownMethod {
        /// Method string from the envelope
        method: String,
    },

    /// The request envelope or params did not deserialize
    #[error("Invalid request: {reason}")]
    InvalidRequest {
        /// Deserialization failure detail
        reason: String,
    },

    /// The user declined the confirmation dialog
    #[error("User rejected request: {method}")]
    UserRejected {
        /// Method the dialog was shown for
        method: String,
    },

    /// No dialog content exists for this operation metadata item
    #[error("Snap display not supported for: {item}")]
    UnsupportedDisplay {
        /// Metadata item type with no rendering
        item: String,
    },

    /// The external signing SDK failed
    #[error("SDK failure: {reason}")]
    Sdk {
        /// Failure reported by the SDK
        reason: String,
    },
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience type alias for Store Results
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Convenience type alias for RPC Results
pub type RpcResult<T> = std::result::Result<T, RpcError>;
