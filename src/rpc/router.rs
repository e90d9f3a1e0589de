//! RPC dispatch
//!
//! [`RpcRouter`] wires the three capabilities a request may touch: the
//! persisted key-value store, the host's confirmation dialog, and the
//! protocol SDK that performs the actual signing. The dialog and the signer
//! are trait seams so tests can observe and script them; production embeds
//! the host bindings behind the same traits.
//!
//! Signing methods never reach the signer without an approved dialog. A
//! refusal is surfaced as [`RpcError::UserRejected`] and the signer is not
//! called at all.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Result, RpcError};
use crate::rpc::display::{self, DialogContent, Erc20Config};
use crate::rpc::types::{RegistryEntry, RpcRequest, RpcResponse};
use crate::storage::{KvStore, StoredValue};

/// Store key holding the user's spend key
pub const SPEND_KEY: &str = "spend_key";

/// Store key holding the EOA address bound to the spend key
pub const SPEND_KEY_EOA: &str = "spend_key_eoa";

/// Host confirmation dialog shown before sensitive actions
pub trait ConfirmDialog: Send + Sync {
    /// Shows `content` to the user; `true` means approved
    fn confirm(
        &self,
        origin: &str,
        content: &DialogContent,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;
}

/// Protocol SDK that produces signatures over prepared payloads
pub trait OperationSigner: Send + Sync {
    /// Signs a prepared operation; the payload is opaque to the caller
    fn sign_operation(
        &self,
        op: Value,
    ) -> impl std::future::Future<Output = Result<Value>> + Send;

    /// Signs a canonical-address registry entry
    fn sign_registry_entry(
        &self,
        entry: &RegistryEntry,
        chain_id: u64,
        registry_address: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Routes parsed requests to the store, the dialog, and the signer
#[derive(Debug)]
pub struct RpcRouter<K, U, S> {
    store: K,
    dialog: U,
    signer: S,
    erc20s: BTreeMap<String, Erc20Config>,
}

impl<K, U, S> RpcRouter<K, U, S>
where
    K: KvStore,
    U: ConfirmDialog,
    S: OperationSigner,
{
    /// Creates a router with an empty token table
    pub fn new(store: K, dialog: U, signer: S) -> Self {
        Self {
            store,
            dialog,
            signer,
            erc20s: BTreeMap::new(),
        }
    }

    /// Replaces the token table used to label amounts in dialogs
    pub fn with_erc20s(mut self, erc20s: BTreeMap<String, Erc20Config>) -> Self {
        self.erc20s = erc20s;
        self
    }

    /// Parses and dispatches a raw request envelope
    pub async fn handle_json(&self, origin: &str, envelope: Value) -> Result<RpcResponse> {
        let request = RpcRequest::from_value(envelope)?;
        self.handle(origin, request).await
    }

    /// Dispatches a parsed request
    pub async fn handle(&self, origin: &str, request: RpcRequest) -> Result<RpcResponse> {
        let method = request.method();
        debug!(origin, method, "dispatching request");

        match request {
            RpcRequest::SetSpendKey(params) => {
                self.store
                    .put_many(vec![
                        (SPEND_KEY.to_string(), StoredValue::from(params.spend_key)),
                        (
                            SPEND_KEY_EOA.to_string(),
                            StoredValue::from(params.eoa_address),
                        ),
                    ])
                    .await?;
                info!("spend key stored");
                Ok(RpcResponse::Null)
            }
            RpcRequest::SignCanonAddrRegistryEntry(params) => {
                let content = display::sign_registry_entry_content(
                    &params.entry,
                    params.chain_id,
                    &params.registry_address,
                );
                self.confirm_or_reject(origin, method, &content).await?;
                let signature = self
                    .signer
                    .sign_registry_entry(&params.entry, params.chain_id, &params.registry_address)
                    .await?;
                Ok(RpcResponse::Signature(signature))
            }
            RpcRequest::SignOperation(params) => {
                let contents = display::sign_operation_content(&params.metadata, &self.erc20s)?;
                for content in &contents {
                    self.confirm_or_reject(origin, method, content).await?;
                }
                let signed = self.signer.sign_operation(params.op).await?;
                Ok(RpcResponse::Json(signed))
            }
            RpcRequest::ClearDb => {
                self.store.clear().await?;
                info!("persisted state cleared");
                Ok(RpcResponse::Null)
            }
        }
    }

    async fn confirm_or_reject(
        &self,
        origin: &str,
        method: &str,
        content: &DialogContent,
    ) -> Result<()> {
        if self.dialog.confirm(origin, content).await? {
            Ok(())
        } else {
            debug!(origin, method, "user rejected confirmation dialog");
            Err(RpcError::UserRejected {
                method: method.to_string(),
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::error::Error;
    use crate::rpc::types::{
        ActionMetadata, OperationMetadata, OperationMetadataItem, SetSpendKeyParams,
        SignCanonAddrRegistryEntryParams, SignOperationParams,
    };
    use crate::storage::MemoryKvStore;

    #[derive(Clone)]
    struct ScriptedDialog {
        approve: bool,
        seen: Arc<Mutex<Vec<DialogContent>>>,
    }

    impl ScriptedDialog {
        fn approving() -> Self {
            Self {
                approve: true,
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn refusing() -> Self {
            Self {
                approve: false,
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn seen(&self) -> Vec<DialogContent> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl ConfirmDialog for ScriptedDialog {
        async fn confirm(&self, _origin: &str, content: &DialogContent) -> Result<bool> {
            self.seen.lock().unwrap().push(content.clone());
            Ok(self.approve)
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSigner {
        calls: Arc<AtomicUsize>,
    }

    impl RecordingSigner {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl OperationSigner for RecordingSigner {
        async fn sign_operation(&self, op: Value) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({ "op": op, "proof": "stub-proof" }))
        }

        async fn sign_registry_entry(
            &self,
            entry: &RegistryEntry,
            chain_id: u64,
            registry_address: &str,
        ) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!(
                "sig:{}:{chain_id}:{registry_address}",
                entry.eth_address
            ))
        }
    }

    fn router(
        dialog: ScriptedDialog,
        signer: RecordingSigner,
    ) -> (
        RpcRouter<MemoryKvStore, ScriptedDialog, RecordingSigner>,
        MemoryKvStore,
    ) {
        let store = MemoryKvStore::new();
        let handle = store.clone();
        (RpcRouter::new(store, dialog, signer), handle)
    }

    fn transfer_eth_metadata() -> OperationMetadata {
        OperationMetadata {
            items: vec![OperationMetadataItem::Action(ActionMetadata::TransferEth {
                recipient_address: "0x9999".to_string(),
                amount: "1000000000000000000".parse().unwrap(),
            })],
        }
    }

    #[tokio::test]
    async fn test_set_spend_key_stores_both_keys() {
        let (router, store) = router(ScriptedDialog::approving(), RecordingSigner::default());
        let response = router
            .handle(
                "https://app.example",
                RpcRequest::SetSpendKey(SetSpendKeyParams {
                    spend_key: "0xsecret".to_string(),
                    eoa_address: "0xe0a".to_string(),
                }),
            )
            .await
            .unwrap();

        assert_eq!(response, RpcResponse::Null);
        assert_eq!(
            store.get_string(SPEND_KEY).await.unwrap(),
            Some("0xsecret".to_string())
        );
        assert_eq!(
            store.get_string(SPEND_KEY_EOA).await.unwrap(),
            Some("0xe0a".to_string())
        );
    }

    #[tokio::test]
    async fn test_clear_db_empties_store() {
        let (router, store) = router(ScriptedDialog::approving(), RecordingSigner::default());
        store.put_string("leftover", "value").await.unwrap();

        let response = router
            .handle("https://app.example", RpcRequest::ClearDb)
            .await
            .unwrap();

        assert_eq!(response, RpcResponse::Null);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_registry_entry_signature_flow() {
        let dialog = ScriptedDialog::approving();
        let signer = RecordingSigner::default();
        let (router, _store) = router(dialog.clone(), signer.clone());

        let response = router
            .handle(
                "https://app.example",
                RpcRequest::SignCanonAddrRegistryEntry(SignCanonAddrRegistryEntryParams {
                    entry: RegistryEntry {
                        eth_address: "0x1111".to_string(),
                        compressed_canon_addr: "42".parse().unwrap(),
                        per_canon_addr_nonce: 0,
                    },
                    chain_id: 1,
                    registry_address: "0x2222".to_string(),
                }),
            )
            .await
            .unwrap();

        assert_eq!(
            response,
            RpcResponse::Signature("sig:0x1111:1:0x2222".to_string())
        );
        let seen = dialog.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0].heading,
            "Confirm signature to register canonical address"
        );
        assert_eq!(signer.calls(), 1);
    }

    #[tokio::test]
    async fn test_operation_signing_confirms_each_item() {
        let dialog = ScriptedDialog::approving();
        let signer = RecordingSigner::default();
        let (router, _store) = router(dialog.clone(), signer.clone());

        let metadata = OperationMetadata {
            items: vec![
                OperationMetadataItem::Action(ActionMetadata::TransferEth {
                    recipient_address: "0x9999".to_string(),
                    amount: "1000000000000000000".parse().unwrap(),
                }),
                OperationMetadataItem::Action(ActionMetadata::Transfer {
                    recipient_address: "0x7777".to_string(),
                    erc20_address: "0x6B175474E89094C44Da98b954EedeAC495271d0F".to_string(),
                    amount: "500000000000000000".parse().unwrap(),
                }),
            ],
        };
        let response = router
            .handle(
                "https://app.example",
                RpcRequest::SignOperation(SignOperationParams {
                    op: json!({ "joinSplits": [] }),
                    metadata,
                }),
            )
            .await
            .unwrap();

        match response {
            RpcResponse::Json(signed) => {
                assert_eq!(signed["proof"], "stub-proof");
                assert_eq!(signed["op"]["joinSplits"], json!([]));
            }
            other => panic!("unexpected response: {other:?}"),
        }
        assert_eq!(dialog.seen().len(), 2);
        assert_eq!(signer.calls(), 1);
    }

    #[tokio::test]
    async fn test_configured_ticker_labels_transfer_dialog() {
        let dialog = ScriptedDialog::approving();
        let signer = RecordingSigner::default();
        let mut erc20s = BTreeMap::new();
        erc20s.insert(
            "dai".to_string(),
            Erc20Config {
                address: "0x6B175474E89094C44Da98b954EedeAC495271d0F".to_string(),
            },
        );
        let router = RpcRouter::new(MemoryKvStore::new(), dialog.clone(), signer.clone())
            .with_erc20s(erc20s);

        let metadata = OperationMetadata {
            items: vec![OperationMetadataItem::Action(ActionMetadata::Transfer {
                recipient_address: "0x9999".to_string(),
                erc20_address: "0x6b175474e89094c44da98b954eedeac495271d0f".to_string(),
                amount: "1500000000000000000".parse().unwrap(),
            })],
        };
        router
            .handle(
                "https://app.example",
                RpcRequest::SignOperation(SignOperationParams {
                    op: json!({}),
                    metadata,
                }),
            )
            .await
            .unwrap();

        let seen = dialog.seen();
        assert_eq!(seen.len(), 1);
        assert!(seen[0]
            .messages
            .contains(&"Asset Token: **DAI**".to_string()));
        assert_eq!(signer.calls(), 1);
    }

    #[tokio::test]
    async fn test_rejection_skips_signer() {
        let dialog = ScriptedDialog::refusing();
        let signer = RecordingSigner::default();
        let (router, _store) = router(dialog.clone(), signer.clone());

        let err = router
            .handle(
                "https://app.example",
                RpcRequest::SignOperation(SignOperationParams {
                    op: json!({}),
                    metadata: transfer_eth_metadata(),
                }),
            )
            .await
            .unwrap_err();

        match err {
            Error::Rpc(RpcError::UserRejected { method }) => {
                assert_eq!(method, "caligo_signOperation");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(signer.calls(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_metadata_aborts_before_any_dialog() {
        let dialog = ScriptedDialog::approving();
        let signer = RecordingSigner::default();
        let (router, _store) = router(dialog.clone(), signer.clone());

        let metadata = OperationMetadata {
            items: vec![
                OperationMetadataItem::Action(ActionMetadata::TransferEth {
                    recipient_address: "0x9999".to_string(),
                    amount: "1".parse().unwrap(),
                }),
                OperationMetadataItem::Action(ActionMetadata::WethToWsteth {
                    amount: "1".parse().unwrap(),
                }),
            ],
        };
        let err = router
            .handle(
                "https://app.example",
                RpcRequest::SignOperation(SignOperationParams {
                    op: json!({}),
                    metadata,
                }),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Rpc(RpcError::UnsupportedDisplay { .. })
        ));
        assert!(dialog.seen().is_empty());
        assert_eq!(signer.calls(), 0);
    }

    #[tokio::test]
    async fn test_handle_json_end_to_end() {
        let (router, store) = router(ScriptedDialog::approving(), RecordingSigner::default());

        let response = router
            .handle_json(
                "https://app.example",
                json!({
                    "method": "caligo_setSpendKey",
                    "params": { "spendKey": "0xabc", "eoaAddress": "0xdef" }
                }),
            )
            .await
            .unwrap();

        assert_eq!(response, RpcResponse::Null);
        assert_eq!(
            store.get_string(SPEND_KEY).await.unwrap(),
            Some("0xabc".to_string())
        );
    }

    #[tokio::test]
    async fn test_handle_json_rejects_unknown_method() {
        let (router, _store) = router(ScriptedDialog::approving(), RecordingSigner::default());

        let err = router
            .handle_json("https://app.example", json!({ "method": "eth_accounts" }))
            .await
            .unwrap_err();

        match err {
            Error::Rpc(RpcError::UnknownMethod { method }) => assert_eq!(method, "eth_accounts"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
