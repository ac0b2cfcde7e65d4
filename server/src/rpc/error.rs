//! RPC error types

use thiserror::Error;

/// Errors raised while talking to the upstream node.
#[derive(Error, Debug)]
pub enum RpcError {
    /// The HTTP exchange itself could not complete (connect, TLS, timeout)
    #[error("transport failure calling `{method}`: {source}")]
    Transport {
        method: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx status whose body was not a JSON-RPC envelope
    #[error("upstream answered `{method}` with HTTP {status}")]
    HttpStatus { method: String, status: u16 },

    /// Body was not JSON, or the result did not have the expected shape
    #[error("malformed response to `{method}`: {reason}")]
    Decode { method: String, reason: String },

    /// The node populated the envelope's `error` field
    #[error("upstream error for `{method}`: {message}")]
    Upstream {
        method: String,
        code: Option<i64>,
        message: String,
    },
}

impl RpcError {
    /// RPC method the failing call was issued for.
    pub fn method(&self) -> &str {
        match self {
            RpcError::Transport { method, .. }
            | RpcError::HttpStatus { method, .. }
            | RpcError::Decode { method, .. }
            | RpcError::Upstream { method, .. } => method,
        }
    }

    /// True when the node itself reported the failure.
    pub fn is_upstream(&self) -> bool {
        matches!(self, RpcError::Upstream { .. })
    }

    /// True when the call never produced a usable envelope.
    pub fn is_transport(&self) -> bool {
        !self.is_upstream()
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RpcError::Transport { source, .. } if source.is_timeout())
    }
}
