//! Confirmation dialog content
//!
//! Signing methods must show the user what they are approving before the
//! signer runs. This module renders request parameters into [`DialogContent`]
//! values: a heading plus markdown message lines, one dialog per operation
//! metadata item. The host is responsible for actually displaying them.
//!
//! Every message line is flattened to a single line. Request parameters are
//! otherwise interpolated as given, so a dapp can only ever mislabel its own
//! dialog, not smuggle extra lines into it.

use std::collections::BTreeMap;

use num_bigint::{BigInt, Sign};

use crate::error::{RpcError, RpcResult};
use crate::rpc::types::{ActionMetadata, OperationMetadata, OperationMetadataItem, RegistryEntry};

/// Decimals used when rendering base-unit token amounts
const UNIT_DECIMALS: usize = 18;

/// Heading and markdown message lines of one confirmation dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogContent {
    /// Dialog heading
    pub heading: String,
    /// Markdown lines shown under the heading
    pub messages: Vec<String>,
}

/// A configured ERC-20 token, keyed by ticker in the router's token table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Erc20Config {
    /// Token contract address
    pub address: String,
}

/// Content for confirming a canonical-address registry entry signature
pub fn sign_registry_entry_content(
    entry: &RegistryEntry,
    chain_id: u64,
    registry_address: &str,
) -> DialogContent {
    DialogContent {
        heading: "Confirm signature to register canonical address".to_string(),
        messages: sanitize(vec![
            format!("Ethereum Address: {}", entry.eth_address),
            format!(
                "Caligo Canonical Address Nonce: {}",
                entry.per_canon_addr_nonce
            ),
            format!("Chain id: {chain_id}"),
            format!("Registry address: {registry_address}"),
        ]),
    }
}

/// Content for confirming an operation signature, one dialog per metadata item
///
/// Fails with [`RpcError::UnsupportedDisplay`] if any item has no dialog
/// rendering, so an operation is never partially confirmed.
pub fn sign_operation_content(
    metadata: &OperationMetadata,
    erc20s: &BTreeMap<String, Erc20Config>,
) -> RpcResult<Vec<DialogContent>> {
    metadata
        .items
        .iter()
        .map(|item| item_content(item, erc20s))
        .collect()
}

fn item_content(
    item: &OperationMetadataItem,
    erc20s: &BTreeMap<String, Erc20Config>,
) -> RpcResult<DialogContent> {
    let action = match item {
        OperationMetadataItem::Action(action) => action,
        OperationMetadataItem::ConfidentialPayment(_) => {
            return Err(RpcError::UnsupportedDisplay {
                item: "ConfidentialPayment".to_string(),
            })
        }
    };

    let content = match action {
        ActionMetadata::Transfer {
            recipient_address,
            erc20_address,
            amount,
        } => {
            let ticker = ticker_by_address(erc20s, erc20_address)
                .unwrap_or_else(|| unrecognized_asset(erc20_address));
            DialogContent {
                heading: "Confirm transfer from your Caligo account".to_string(),
                messages: vec![
                    "Action: Transfer".to_string(),
                    format!("Amount: **{}**", format_units(amount)),
                    format!("Asset Token: **{ticker}**"),
                    format!("Recipient Address: {recipient_address}"),
                ],
            }
        }
        ActionMetadata::TransferEth {
            recipient_address,
            amount,
        } => DialogContent {
            heading: "Confirm transfer from your Caligo account".to_string(),
            messages: vec![
                format!("Action: Send **{} ETH**", format_units(amount)),
                format!("Recipient Address: {recipient_address}"),
            ],
        },
        // Valid metadata, but no dialog rendering exists for it yet
        ActionMetadata::WethToWsteth { .. } => {
            return Err(RpcError::UnsupportedDisplay {
                item: "Weth To Wsteth".to_string(),
            })
        }
        ActionMetadata::UniswapV3Swap {
            token_in,
            in_amount,
            token_out,
        } => {
            let in_ticker = ticker_by_address(erc20s, token_in);
            let out_ticker = ticker_by_address(erc20s, token_out);
            DialogContent {
                heading: "Confirm token swap".to_string(),
                messages: match (in_ticker, out_ticker) {
                    (Some(tin), Some(tout)) => vec![format!(
                        "Action: Swap **{} {tin}** for **{tout}**",
                        format_units(in_amount)
                    )],
                    (in_ticker, out_ticker) => vec![
                        "Action: Swap".to_string(),
                        format!("Amount: **{}**", format_units(in_amount)),
                        format!(
                            "From token: **{}**",
                            in_ticker.unwrap_or_else(|| unrecognized_asset(token_in))
                        ),
                        format!(
                            "To token: **{}**",
                            out_ticker.unwrap_or_else(|| unrecognized_asset(token_out))
                        ),
                    ],
                },
            }
        }
    };

    Ok(DialogContent {
        heading: content.heading,
        messages: sanitize(content.messages),
    })
}

/// Marks an asset address the router has no ticker entry for
fn unrecognized_asset(asset: &str) -> String {
    format!("{asset} _(Unrecognized asset)_")
}

/// Resolves a token address to its configured ticker, case-insensitively
fn ticker_by_address(
    erc20s: &BTreeMap<String, Erc20Config>,
    address: &str,
) -> Option<String> {
    let needle = address.to_lowercase();
    erc20s.iter().find_map(|(ticker, config)| {
        (config.address.to_lowercase() == needle).then(|| ticker.to_uppercase())
    })
}

/// Renders a base-unit amount as a decimal token amount
///
/// Matches the conventional 18-decimal rendering: trailing fraction zeros are
/// trimmed but at least one fraction digit always remains, so whole amounts
/// read "1.0" rather than "1".
fn format_units(amount: &BigInt) -> String {
    let scale = BigInt::from(10_u64.pow(UNIT_DECIMALS as u32));
    let magnitude = BigInt::from(amount.magnitude().clone());
    let int_part = &magnitude / &scale;
    let frac_part = &magnitude % &scale;

    let digits = frac_part.to_string();
    let mut frac = String::with_capacity(UNIT_DECIMALS);
    frac.push_str(&"0".repeat(UNIT_DECIMALS - digits.len()));
    frac.push_str(&digits);
    let trimmed = frac.trim_end_matches('0');
    let frac = if trimmed.is_empty() { "0" } else { trimmed };

    let sign = if amount.sign() == Sign::Minus { "-" } else { "" };
    format!("{sign}{int_part}.{frac}")
}

/// Dialog text is single-line; embedded line breaks are stripped
fn sanitize(messages: Vec<String>) -> Vec<String> {
    messages
        .into_iter()
        .map(|message| message.replace(['\r', '\n'], ""))
        .collect()
}
