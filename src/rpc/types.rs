//! RPC request and response types
//!
//! The host runtime hands the snap a JSON-RPC style envelope: a `method`
//! string plus a `params` object. [`RpcRequest`] is that envelope after
//! routing; parsing distinguishes an unknown method from malformed params so
//! the two fail with different errors.
//!
//! Parsing is shape-only. Semantic validation of parameter contents (hex
//! formats, address checksums) is not performed here or anywhere else in the
//! snap; parameters flow to the store and the SDK as given.

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RpcError, RpcResult};

/// A dispatched request, tagged by the envelope's `method` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum RpcRequest {
    /// Store the user's spend key and its controlling EOA address
    #[serde(rename = "caligo_setSpendKey")]
    SetSpendKey(SetSpendKeyParams),

    /// Sign a canonical-address registry entry after user confirmation
    #[serde(rename = "caligo_signCanonAddrRegistryEntry")]
    SignCanonAddrRegistryEntry(SignCanonAddrRegistryEntryParams),

    /// Sign a prepared operation after user confirmation
    #[serde(rename = "caligo_signOperation")]
    SignOperation(SignOperationParams),

    /// Drop all persisted snap state
    #[serde(rename = "caligo_clearDb")]
    ClearDb,
}

impl RpcRequest {
    /// Method strings this snap answers
    pub const KNOWN_METHODS: &'static [&'static str] = &[
        "caligo_setSpendKey",
        "caligo_signCanonAddrRegistryEntry",
        "caligo_signOperation",
        "caligo_clearDb",
    ];

    /// Returns the wire method name of this request
    pub fn method(&self) -> &'static str {
        match self {
            RpcRequest::SetSpendKey(_) => "caligo_setSpendKey",
            RpcRequest::SignCanonAddrRegistryEntry(_) => "caligo_signCanonAddrRegistryEntry",
            RpcRequest::SignOperation(_) => "caligo_signOperation",
            RpcRequest::ClearDb => "caligo_clearDb",
        }
    }

    /// Parses a raw envelope value
    ///
    /// An unrecognized method is [`RpcError::UnknownMethod`]; a recognized
    /// method whose params do not deserialize is [`RpcError::InvalidRequest`].
    pub fn from_value(envelope: Value) -> RpcResult<Self> {
        let method = envelope
            .get("method")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::InvalidRequest {
                reason: "missing method field".to_string(),
            })?;
        if !Self::KNOWN_METHODS.contains(&method) {
            return Err(RpcError::UnknownMethod {
                method: method.to_string(),
            });
        }
        serde_json::from_value(envelope).map_err(|e| RpcError::InvalidRequest {
            reason: e.to_string(),
        })
    }

    /// Parses a raw envelope from its JSON text
    pub fn from_json(body: &str) -> RpcResult<Self> {
        let envelope: Value =
            serde_json::from_str(body).map_err(|e| RpcError::InvalidRequest {
                reason: e.to_string(),
            })?;
        Self::from_value(envelope)
    }
}

/// Parameters of `caligo_setSpendKey`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSpendKeyParams {
    /// Spend key material as supplied by the dapp; stored opaquely
    pub spend_key: String,
    /// EOA address that controls the spend key
    pub eoa_address: String,
}

/// Parameters of `caligo_signCanonAddrRegistryEntry`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignCanonAddrRegistryEntryParams {
    /// Entry to be signed
    pub entry: RegistryEntry,
    /// Chain the registry contract lives on
    pub chain_id: u64,
    /// Registry contract address
    pub registry_address: String,
}

/// A canonical-address registry entry presented for signing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    /// EOA that owns the canonical address
    pub eth_address: String,
    /// Compressed canonical address; a field element, carried as a decimal
    /// string on the wire
    #[serde(with = "crate::utils::bigint_string")]
    pub compressed_canon_addr: BigInt,
    /// Registration nonce for this canonical address
    pub per_canon_addr_nonce: u64,
}

/// Parameters of `caligo_signOperation`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignOperationParams {
    /// Prepared operation produced by the protocol SDK; the snap passes it
    /// through without inspecting it
    pub op: Value,
    /// Display metadata describing what the operation does
    pub metadata: OperationMetadata,
}

/// Display metadata attached to an operation signing request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationMetadata {
    /// One entry per user-visible action or payment
    pub items: Vec<OperationMetadataItem>,
}

/// One metadata item, discriminated by its `type` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OperationMetadataItem {
    /// A named dapp action
    #[serde(rename = "Action")]
    Action(ActionMetadata),

    /// A confidential payment to a canonical address
    #[serde(rename = "ConfidentialPayment")]
    ConfidentialPayment(ConfidentialPaymentMetadata),
}

/// Action metadata, discriminated by its `actionType` field
///
/// The discriminator strings are fixed wire values shared with the dapp SDK,
/// spaces included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "actionType")]
pub enum ActionMetadata {
    /// ERC-20 transfer out of the user's account
    #[serde(rename = "Transfer", rename_all = "camelCase")]
    Transfer {
        /// Destination address
        recipient_address: String,
        /// Token contract address
        erc20_address: String,
        /// Amount in the token's base units
        #[serde(with = "crate::utils::bigint_string")]
        amount: BigInt,
    },

    /// Native ETH transfer
    #[serde(rename = "Transfer ETH", rename_all = "camelCase")]
    TransferEth {
        /// Destination address
        recipient_address: String,
        /// Amount in wei
        #[serde(with = "crate::utils::bigint_string")]
        amount: BigInt,
    },

    /// Wrap WETH into wstETH
    #[serde(rename = "Weth To Wsteth", rename_all = "camelCase")]
    WethToWsteth {
        /// Amount in wei
        #[serde(with = "crate::utils::bigint_string")]
        amount: BigInt,
    },

    /// Uniswap V3 token swap
    #[serde(rename = "UniswapV3 Swap", rename_all = "camelCase")]
    UniswapV3Swap {
        /// Token being sold
        token_in: String,
        /// Amount sold, in `token_in` base units
        #[serde(with = "crate::utils::bigint_string")]
        in_amount: BigInt,
        /// Token being bought
        token_out: String,
    },
}

/// Confidential payment metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidentialPaymentMetadata {
    /// Recipient's canonical address
    pub recipient: CanonAddress,
    /// Asset being paid
    pub asset: Asset,
    /// Amount in the asset's base units
    #[serde(with = "crate::utils::bigint_string")]
    pub amount: BigInt,
}

/// A canonical address as a curve point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonAddress {
    /// X coordinate, carried as a decimal string on the wire
    #[serde(with = "crate::utils::bigint_string")]
    pub x: BigInt,
    /// Y coordinate, carried as a decimal string on the wire
    #[serde(with = "crate::utils::bigint_string")]
    pub y: BigInt,
}

/// An asset reference in payment metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Asset class discriminant as defined by the protocol SDK: 0 for ERC-20,
    /// 1 for ERC-721, 2 for ERC-1155
    pub asset_type: u8,
    /// Asset contract address
    pub asset_addr: String,
    /// Token id within the contract, zero for fungible assets
    #[serde(with = "crate::utils::bigint_string")]
    pub id: BigInt,
}

/// Result payload of a dispatched request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RpcResponse {
    /// The method has no return value
    Null,
    /// A signature string
    Signature(String),
    /// A structured payload, e.g. a signed operation
    Json(Value),
}
