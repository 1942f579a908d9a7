use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// An opaque identifier of an on-chain object (`0x`-prefixed hex string).
///
/// The SDK never inspects the identifier beyond passing it back to the
/// node, so no format validation is performed locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A typed argument for a contract entry point.
///
/// The variant set is closed so that every call site is checked
/// exhaustively at compile time instead of passing free-form values.
/// Argument count and ordering are still only validated by the chain;
/// a mismatch surfaces as an on-chain execution failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    /// UTF-8 string scalar.
    String(String),
    /// Raw bytes, encoded as a JSON array of numbers on the wire.
    ByteArray(Vec<u8>),
    /// 64-bit unsigned integer, encoded as a decimal string on the wire
    /// because JSON numbers cannot carry the full u64 range.
    U64(u64),
    Bool(bool),
    /// Reference to an owned or shared on-chain object.
    ObjectRef(ObjectId),
    StringArray(Vec<String>),
}

impl CallArg {
    /// The JSON encoding used by the `unsafe_moveCall` RPC parameters.
    pub fn to_json(&self) -> Value {
        match self {
            CallArg::String(s) => Value::String(s.clone()),
            CallArg::ByteArray(bytes) => {
                Value::Array(bytes.iter().map(|b| Value::from(*b)).collect())
            }
            CallArg::U64(n) => Value::String(n.to_string()),
            CallArg::Bool(b) => Value::Bool(*b),
            CallArg::ObjectRef(id) => Value::String(id.as_str().to_owned()),
            CallArg::StringArray(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

/// An unsigned call descriptor for a single entry-point invocation.
///
/// Construction is pure; nothing is sent until the descriptor is handed to
/// a [`crate::rpc::ChainClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCall {
    /// The deployed package containing the module.
    pub package: ObjectId,
    /// Module name inside the package, e.g. `cluster`.
    pub module: String,
    /// Entry-point function name, e.g. `create`.
    pub function: String,
    /// Positionally-ordered arguments. Order is part of the wire contract.
    pub args: Vec<CallArg>,
}

impl MoveCall {
    pub fn new(
        package: ObjectId,
        module: impl Into<String>,
        function: impl Into<String>,
        args: Vec<CallArg>,
    ) -> Self {
        Self {
            package,
            module: module.into(),
            function: function.into(),
            args,
        }
    }

    /// Renders the fully-qualified target, `<package>::<module>::<function>`.
    pub fn target(&self) -> String {
        format!("{}::{}::{}", self.package, self.module, self.function)
    }
}
