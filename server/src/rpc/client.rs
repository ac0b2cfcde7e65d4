use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::error::RpcError;
use super::types::{RawTransaction, RpcRequest, RpcResponse, SmartFeeEstimate};
use super::BitcoinRpc;
use crate::config::RpcConfig;

/// JSON-RPC 1.0 client bound to one upstream URL.
///
/// The underlying `reqwest::Client` pools connections; nothing else is kept
/// between calls.
#[derive(Debug, Clone)]
pub struct RpcClient {
    client: Client,
    url: String,
}

impl RpcClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &RpcConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.url.clone(), Duration::from_secs(config.timeout_secs))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue `method` and return the raw `result` value.
    ///
    /// The envelope's `error` field is checked before the HTTP status, since
    /// nodes answer failed calls with 200 and with 500 alike.
    pub async fn call_value(&self, method: &str, params: &[Value]) -> Result<Value, RpcError> {
        let started = Instant::now();
        let request = RpcRequest::new(method, params);

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|source| {
                let source = source.without_url();
                warn!(method, error = %source, timeout = source.is_timeout(), "RPC transport failure");
                RpcError::Transport {
                    method: method.to_string(),
                    source,
                }
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|source| RpcError::Transport {
            method: method.to_string(),
            source: source.without_url(),
        })?;

        let envelope: RpcResponse = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                warn!(method, status = status.as_u16(), "RPC call rejected by upstream");
                return Err(RpcError::HttpStatus {
                    method: method.to_string(),
                    status: status.as_u16(),
                });
            }
            Err(e) => {
                return Err(RpcError::Decode {
                    method: method.to_string(),
                    reason: e.to_string(),
                })
            }
        };

        if let Some(fault) = envelope.fault() {
            warn!(method, code = ?fault.code, message = %fault.message, "RPC error envelope");
            return Err(RpcError::Upstream {
                method: method.to_string(),
                code: fault.code,
                message: fault.message,
            });
        }

        if !status.is_success() {
            return Err(RpcError::HttpStatus {
                method: method.to_string(),
                status: status.as_u16(),
            });
        }

        debug!(method, elapsed_ms = started.elapsed().as_millis() as u64, "RPC call completed");

        envelope.result.ok_or_else(|| RpcError::Decode {
            method: method.to_string(),
            reason: "envelope carried neither result nor error".to_string(),
        })
    }

    /// Issue `method` and deserialize its `result` into `T`.
    pub async fn call<T>(&self, method: &str, params: &[Value]) -> Result<T, RpcError>
    where
        T: DeserializeOwned,
    {
        let value = self.call_value(method, params).await?;
        serde_json::from_value(value).map_err(|e| RpcError::Decode {
            method: method.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl BitcoinRpc for RpcClient {
    async fn estimate_smart_fee(&self, target_blocks: u32) -> Result<SmartFeeEstimate, RpcError> {
        self.call("estimatesmartfee", &[json!(target_blocks)]).await
    }

    async fn get_raw_transaction(&self, txid: &str) -> Result<RawTransaction, RpcError> {
        self.call("getrawtransaction", &[json!(txid), json!(true)]).await
    }
}
