//! Upstream node access
//!
//! A thin JSON-RPC 1.0 client plus the [`BitcoinRpc`] trait the fee layer is
//! written against, so tests can swap in an in-memory node.

mod client;
mod error;
mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::RpcClient;
pub use error::RpcError;
pub use types::{
    RawTransaction, RpcRequest, RpcResponse, SmartFeeEstimate, TxInput, TxOutput, UpstreamFault,
    CLIENT_ID,
};

use async_trait::async_trait;

/// The node methods the service consumes.
#[async_trait]
pub trait BitcoinRpc: Send + Sync {
    /// `estimatesmartfee <target_blocks>`
    async fn estimate_smart_fee(&self, target_blocks: u32) -> Result<SmartFeeEstimate, RpcError>;

    /// `getrawtransaction <txid> true`
    async fn get_raw_transaction(&self, txid: &str) -> Result<RawTransaction, RpcError>;
}
