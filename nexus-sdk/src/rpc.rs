//! The transport seam between SDK operations and the chain.
//!
//! [`ChainClient`] abstracts the two RPC capabilities every operation
//! needs: submitting a move call and reading an object back. The live
//! implementation, [`JsonRpcClient`], talks to a node over HTTP JSON-RPC;
//! integration tests and the simulation demo provide in-process
//! implementations instead.

use crate::args::{CallArg, MoveCall, ObjectId};
use crate::config::NetworkConfig;
use crate::error::TransportError;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Outcome reported by the chain for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    Success,
    /// The transaction was accepted but its effects report a failure.
    Failure { error: String },
}

impl ExecutionStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionStatus::Success)
    }
}

/// A single event emitted by a transaction, payload still undecoded.
#[derive(Debug, Clone)]
pub struct RawEvent {
    /// Fully-qualified event type, e.g. `0x..::cluster::ClusterCreated`.
    pub event_type: String,
    /// The `parsedJson` payload string. Despite the name this is not
    /// guaranteed to be valid JSON; see [`crate::events`].
    pub payload: String,
}

/// Effects and events of one submitted transaction.
#[derive(Debug, Clone)]
pub struct TransactionResponse {
    pub digest: String,
    pub status: ExecutionStatus,
    pub events: Vec<RawEvent>,
    /// Objects created by the transaction, in effects order.
    pub created: Vec<ObjectId>,
}

/// Content of an on-chain object, as fetched for polling.
#[derive(Debug, Clone, Default)]
pub struct ObjectContent {
    pub fields: Map<String, Value>,
}

impl ObjectContent {
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// A trait abstracting the chain RPC surface used by the SDK.
///
/// This allows [`crate::client::NexusClient`] to run against the live
/// [`JsonRpcClient`] as well as in-process mock chains in tests.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Submits a move call with the given gas budget and blocks until the
    /// network reports its effects.
    async fn execute_move_call(
        &self,
        call: &MoveCall,
        gas_budget: u64,
    ) -> Result<TransactionResponse, TransportError>;

    /// Fetches the current content of an on-chain object.
    async fn get_object_content(&self, id: &ObjectId)
        -> Result<ObjectContent, TransportError>;
}

/// Signs serialized transaction bytes produced by the node.
///
/// The SDK never holds key material. Implementations live with the caller:
/// a keystore service, a hardware wallet, a remote signing daemon.
pub trait TransactionSigner: Send + Sync {
    /// The address paying for and signing transactions.
    fn address(&self) -> &str;

    /// Returns the serialized signature for `tx_bytes`.
    fn sign(&self, tx_bytes: &[u8]) -> anyhow::Result<Vec<u8>>;
}

/// A live [`ChainClient`] over the node's HTTP JSON-RPC endpoint.
///
/// Submission is a two-step flow: `unsafe_moveCall` asks the node to build
/// the transaction bytes for the call descriptor, the configured
/// [`TransactionSigner`] signs them, and `sui_executeTransactionBlock`
/// submits and waits for local execution. There is no client-side timeout
/// beyond what the HTTP transport enforces.
pub struct JsonRpcClient {
    http: reqwest::Client,
    rpc_url: String,
    faucet_url: Option<String>,
    signer: Arc<dyn TransactionSigner>,
}

impl JsonRpcClient {
    pub fn new(network: &NetworkConfig, signer: Arc<dyn TransactionSigner>) -> Self {
        Self {
            http: reqwest::Client::new(),
            rpc_url: network.rpc_url.clone(),
            faucet_url: network.faucet_url.clone(),
            signer,
        }
    }

    async fn rpc(&self, method: &str, params: Value) -> Result<Value, TransportError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        debug!(method, "rpc request");
        let response: Value = self
            .http
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if let Some(err) = response.get("error") {
            return Err(TransportError::Rpc {
                code: err.get("code").and_then(Value::as_i64).unwrap_or(0),
                message: err
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown rpc error")
                    .to_string(),
            });
        }
        response
            .get("result")
            .cloned()
            .ok_or_else(|| TransportError::MalformedResponse("missing `result` field".into()))
    }

    /// Requests gas for the signer address from the configured faucet.
    /// Local development networks only.
    pub async fn request_faucet(&self) -> Result<(), TransportError> {
        let url = self
            .faucet_url
            .as_deref()
            .ok_or_else(|| TransportError::Faucet("no faucet url configured".into()))?;
        let body = json!({ "FixedAmountRequest": { "recipient": self.signer.address() } });
        let response = self.http.post(url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(TransportError::Faucet(format!(
                "faucet returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ChainClient for JsonRpcClient {
    async fn execute_move_call(
        &self,
        call: &MoveCall,
        gas_budget: u64,
    ) -> Result<TransactionResponse, TransportError> {
        let args: Vec<Value> = call.args.iter().map(CallArg::to_json).collect();
        let build = self
            .rpc(
                "unsafe_moveCall",
                json!([
                    self.signer.address(),
                    call.package.as_str(),
                    call.module,
                    call.function,
                    [], // type arguments: unused by the Nexus entry points
                    args,
                    Value::Null, // let the node pick a gas object
                    gas_budget.to_string(),
                ]),
            )
            .await?;

        let tx_b64 = build
            .get("txBytes")
            .and_then(Value::as_str)
            .ok_or_else(|| TransportError::MalformedResponse("missing `txBytes`".into()))?;
        let tx_bytes = BASE64
            .decode(tx_b64)
            .map_err(|e| TransportError::MalformedResponse(format!("txBytes not base64: {e}")))?;
        let signature = self
            .signer
            .sign(&tx_bytes)
            .map_err(|e| TransportError::Signer(e.to_string()))?;

        let result = self
            .rpc(
                "sui_executeTransactionBlock",
                json!([
                    tx_b64,
                    [BASE64.encode(signature)],
                    { "showEffects": true, "showEvents": true },
                    "WaitForLocalExecution",
                ]),
            )
            .await?;

        parse_transaction_response(&result)
    }

    async fn get_object_content(
        &self,
        id: &ObjectId,
    ) -> Result<ObjectContent, TransportError> {
        let result = self
            .rpc(
                "sui_getObject",
                json!([id.as_str(), { "showContent": true }]),
            )
            .await?;
        let fields = result
            .get("data")
            .and_then(|d| d.get("content"))
            .and_then(|c| c.get("fields"))
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| {
                TransportError::MalformedResponse(format!("object {id} has no content fields"))
            })?;
        Ok(ObjectContent { fields })
    }
}

/// Maps a `sui_executeTransactionBlock` result into a [`TransactionResponse`].
fn parse_transaction_response(result: &Value) -> Result<TransactionResponse, TransportError> {
    let digest = result
        .get("digest")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let effects = result
        .get("effects")
        .ok_or_else(|| TransportError::MalformedResponse("missing `effects`".into()))?;
    let status_obj = effects.get("status");
    let status = match status_obj
        .and_then(|s| s.get("status"))
        .and_then(Value::as_str)
    {
        Some("success") => ExecutionStatus::Success,
        Some(_) => ExecutionStatus::Failure {
            error: status_obj
                .and_then(|s| s.get("error"))
                .and_then(Value::as_str)
                .unwrap_or("unspecified chain error")
                .to_string(),
        },
        None => {
            return Err(TransportError::MalformedResponse(
                "missing execution status".into(),
            ))
        }
    };

    let created = effects
        .get("created")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    item.get("reference")
                        .and_then(|r| r.get("objectId"))
                        .and_then(Value::as_str)
                        .map(ObjectId::from)
                })
                .collect()
        })
        .unwrap_or_default();

    let events = result
        .get("events")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| RawEvent {
                    event_type: item
                        .get("type")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    // Some nodes return the payload as structured JSON
                    // rather than a string; re-serialize so the decoder
                    // sees one input shape.
                    payload: match item.get("parsedJson") {
                        Some(Value::String(s)) => s.clone(),
                        Some(other) => other.to_string(),
                        None => String::new(),
                    },
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(TransactionResponse {
        digest,
        status,
        events,
        created,
    })
}
