//! Name-based dispatch: the entry point ledger hosts call into.
//!
//! Hosts deliver an invocation as a function name plus positional string
//! arguments, e.g. `{"function":"CreateKey","Args":["k1"]}`, and expect the
//! response back as a JSON string. Array parameters (the key list of
//! `CreateBulkKeys`) arrive JSON-encoded in a single argument.

use std::fmt;
use std::str::FromStr;

use keyledger_core::CodecError;
use keyledger_store::WorldState;
use serde::{Deserialize, Serialize};

use crate::contract::KeyContract;
use crate::error::{ContractError, Result};

/// Functions exported by the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    CreateKey,
    CreateBulkKeys,
    CreateKeyWithAttachment,
    ConsumeKey,
    ReadKey,
    QueryAllKeys,
}

impl Function {
    pub const ALL: [Function; 6] = [
        Function::CreateKey,
        Function::CreateBulkKeys,
        Function::CreateKeyWithAttachment,
        Function::ConsumeKey,
        Function::ReadKey,
        Function::QueryAllKeys,
    ];

    /// The name deployed clients call. Attachment creation keeps its
    /// historical `CreateKeyWithImage` name; `CreateKeyWithAttachment` is
    /// accepted as an alias.
    pub fn name(self) -> &'static str {
        match self {
            Function::CreateKey => "CreateKey",
            Function::CreateBulkKeys => "CreateBulkKeys",
            Function::CreateKeyWithAttachment => "CreateKeyWithImage",
            Function::ConsumeKey => "ConsumeKey",
            Function::ReadKey => "ReadKey",
            Function::QueryAllKeys => "QueryAllKeys",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Function::QueryAllKeys => 0,
            Function::CreateKeyWithAttachment => 2,
            _ => 1,
        }
    }

    /// Whether the function never writes, so a host may evaluate it as a
    /// query without ordering a transaction.
    pub fn is_read_only(self) -> bool {
        matches!(self, Function::ReadKey | Function::QueryAllKeys)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Function {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CreateKey" => Ok(Function::CreateKey),
            "CreateBulkKeys" => Ok(Function::CreateBulkKeys),
            "CreateKeyWithImage" | "CreateKeyWithAttachment" => {
                Ok(Function::CreateKeyWithAttachment)
            }
            "ConsumeKey" => Ok(Function::ConsumeKey),
            "ReadKey" => Ok(Function::ReadKey),
            "QueryAllKeys" => Ok(Function::QueryAllKeys),
            other => Err(ContractError::UnknownFunction(other.to_owned())),
        }
    }
}

/// A host invocation in the ledger's `{"function": ..., "Args": [...]}` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub function: String,
    #[serde(rename = "Args", alias = "args", default)]
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(function: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            function: function.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ContractError::InvalidArguments(format!("malformed invocation: {}", e)))
    }
}

impl KeyContract {
    /// Run an [`Invocation`] and return the JSON response.
    pub fn invoke<W: WorldState + ?Sized>(&self, ws: &mut W, invocation: &Invocation) -> Result<String> {
        self.dispatch(ws, &invocation.function, &invocation.args)
    }

    /// Route `function` with positional `args` to the matching operation and
    /// serialize its response.
    pub fn dispatch<W: WorldState + ?Sized>(
        &self,
        ws: &mut W,
        function: &str,
        args: &[String],
    ) -> Result<String> {
        let function: Function = function.parse()?;
        if args.len() != function.arity() {
            return Err(ContractError::InvalidArguments(format!(
                "{} takes {} argument(s), got {}",
                function,
                function.arity(),
                args.len()
            )));
        }

        tracing::debug!(function = %function, tx_id = %ws.tx_id(), "dispatching");

        match function {
            Function::CreateKey => to_json(&self.create_key(ws, &args[0])?),
            Function::CreateBulkKeys => {
                let keys: Vec<String> = serde_json::from_str(&args[0]).map_err(|e| {
                    ContractError::InvalidArguments(format!(
                        "CreateBulkKeys expects a JSON array of strings: {}",
                        e
                    ))
                })?;
                to_json(&self.create_bulk_keys(ws, keys.as_slice())?)
            }
            Function::CreateKeyWithAttachment => {
                to_json(&self.create_key_with_attachment(ws, &args[0], &args[1])?)
            }
            Function::ConsumeKey => to_json(&self.consume_key(ws, &args[0])?),
            Function::ReadKey => to_json(&self.read_key(&*ws, &args[0])?),
            Function::QueryAllKeys => to_json(&self.query_all_keys(&*ws)?),
        }
    }
}

fn to_json<T: Serialize>(response: &T) -> Result<String> {
    serde_json::to_string(response).map_err(|e| ContractError::Encode(CodecError::Encoding(e)))
}
