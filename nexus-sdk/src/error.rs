use crate::args::ObjectId;
use crate::events::DecodeError;
use crate::plan::PlanError;
use std::time::Duration;
use thiserror::Error;

/// Failures raised by the transport layer, before or while the chain
/// evaluates a call.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The node answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The node answered, but not in the shape the SDK expects.
    #[error("malformed rpc response: {0}")]
    MalformedResponse(String),

    #[error("signer rejected the transaction: {0}")]
    Signer(String),

    #[error("faucet request failed: {0}")]
    Faucet(String),
}

/// The error taxonomy shared by every SDK operation.
///
/// Callers branch on variants instead of checking sentinel return values:
/// transport failures, chain-reported execution failures, and event decode
/// failures are distinct cases carrying the underlying message.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The transaction was accepted but its effects report a failure. The
    /// message is the chain-supplied error text.
    #[error("transaction failed on chain: {0}")]
    Execution(String),

    #[error("event payload decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// The expected transaction emitted no event to decode.
    #[error("transaction `{0}` emitted no event")]
    MissingEvent(String),

    /// A decoded event or polled object lacks a required field.
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),

    #[error("invalid cluster plan: {0}")]
    Plan(#[from] PlanError),

    #[error("execution {id} did not complete within {max_wait:?}")]
    Timeout { id: ObjectId, max_wait: Duration },

    /// The execution object reported a status string the SDK does not
    /// recognize. Treated as terminal, never retried.
    #[error("execution {id} reported unknown status `{status}`")]
    UnknownStatus { id: ObjectId, status: String },
}
