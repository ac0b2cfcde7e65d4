use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier sent with every request; the node echoes it back.
pub const CLIENT_ID: &str = "timechain";

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: &'static str,
    pub method: &'a str,
    pub params: &'a [Value],
}

impl<'a> RpcRequest<'a> {
    pub fn new(method: &'a str, params: &'a [Value]) -> Self {
        Self {
            jsonrpc: "1.0",
            id: CLIENT_ID,
            method,
            params,
        }
    }
}

/// Response envelope. `error` is kept untyped because gateways disagree on
/// its shape (object, string, or `null`).
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
}

/// Error payload pulled out of a populated envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamFault {
    pub code: Option<i64>,
    pub message: String,
}

impl RpcResponse {
    /// Returns the upstream fault if the `error` field is non-empty.
    ///
    /// `null`, `false`, `0`, `""`, `{}` and `[]` all count as "no error".
    pub fn fault(&self) -> Option<UpstreamFault> {
        let error = self.error.as_ref()?;
        match error {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) if s.is_empty() => None,
            Value::Object(map) if map.is_empty() => None,
            Value::Array(items) if items.is_empty() => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::Object(map) => Some(UpstreamFault {
                code: map.get("code").and_then(Value::as_i64),
                message: map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
                    .unwrap_or_else(|| error.to_string()),
            }),
            Value::String(s) => Some(UpstreamFault {
                code: None,
                message: s.clone(),
            }),
            other => Some(UpstreamFault {
                code: None,
                message: other.to_string(),
            }),
        }
    }
}

/// Result of `estimatesmartfee`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SmartFeeEstimate {
    /// BTC per kvB; absent when the node lacks data for the horizon
    #[serde(default)]
    pub feerate: Option<f64>,
    #[serde(default)]
    pub errors: Vec<String>,
    pub blocks: u32,
}

/// Verbose `getrawtransaction` result, trimmed to what fee computation reads.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RawTransaction {
    #[serde(default)]
    pub txid: String,
    pub vin: Vec<TxInput>,
    pub vout: Vec<TxOutput>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct TxInput {
    #[serde(default)]
    pub txid: Option<String>,
    #[serde(default)]
    pub vout: Option<u32>,
    /// Present (hex scriptSig) only on coinbase inputs
    #[serde(default)]
    pub coinbase: Option<String>,
}

impl TxInput {
    pub fn spending(txid: impl Into<String>, vout: u32) -> Self {
        Self {
            txid: Some(txid.into()),
            vout: Some(vout),
            coinbase: None,
        }
    }

    pub fn is_coinbase(&self) -> bool {
        self.coinbase.is_some()
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TxOutput {
    /// Amount in BTC
    pub value: f64,
    #[serde(default)]
    pub n: Option<u32>,
}
