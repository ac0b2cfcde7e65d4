//! In-memory node used by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{BitcoinRpc, RawTransaction, RpcError, SmartFeeEstimate, TxInput, TxOutput};

/// Deterministic 64-hex transaction id.
pub(crate) fn txid(n: u8) -> String {
    format!("{:064x}", n)
}

#[derive(Default)]
pub(crate) struct MockNode {
    estimates: HashMap<u32, SmartFeeEstimate>,
    transactions: HashMap<String, RawTransaction>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
    completed: Mutex<Vec<String>>,
}

impl MockNode {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answer `estimatesmartfee requested` with `feerate` for `answered` blocks.
    pub(crate) fn with_estimate(mut self, requested: u32, feerate: Option<f64>, answered: u32) -> Self {
        let errors = match feerate {
            Some(_) => Vec::new(),
            None => vec!["Insufficient data or no feerate found".to_string()],
        };
        self.estimates.insert(
            requested,
            SmartFeeEstimate {
                feerate,
                errors,
                blocks: answered,
            },
        );
        self
    }

    pub(crate) fn with_tx(mut self, id: String, inputs: Vec<(String, u32)>, outputs: Vec<f64>) -> Self {
        let vin = inputs
            .into_iter()
            .map(|(prev, vout)| TxInput::spending(prev, vout))
            .collect();
        self.transactions.insert(id.clone(), raw(id, vin, outputs));
        self
    }

    pub(crate) fn with_coinbase(mut self, id: String, outputs: Vec<f64>) -> Self {
        let vin = vec![TxInput {
            coinbase: Some("03a0bb0d".to_string()),
            ..TxInput::default()
        }];
        self.transactions.insert(id.clone(), raw(id, vin, outputs));
        self
    }

    /// Lookups of `id` fail as if the connection dropped.
    pub(crate) fn failing(mut self, id: String) -> Self {
        self.failing.insert(id);
        self
    }

    pub(crate) fn delayed(mut self, id: String, delay: Duration) -> Self {
        self.delays.insert(id, delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Transaction ids in the order their lookups finished.
    pub(crate) fn completed_lookups(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

fn raw(txid: String, vin: Vec<TxInput>, outputs: Vec<f64>) -> RawTransaction {
    RawTransaction {
        txid,
        vin,
        vout: outputs
            .into_iter()
            .enumerate()
            .map(|(n, value)| TxOutput {
                value,
                n: Some(n as u32),
            })
            .collect(),
    }
}

#[async_trait]
impl BitcoinRpc for MockNode {
    async fn estimate_smart_fee(&self, target_blocks: u32) -> Result<SmartFeeEstimate, RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.estimates
            .get(&target_blocks)
            .cloned()
            .ok_or_else(|| RpcError::Upstream {
                method: "estimatesmartfee".to_string(),
                code: Some(-8),
                message: "Invalid conf_target".to_string(),
            })
    }

    async fn get_raw_transaction(&self, txid: &str) -> Result<RawTransaction, RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(txid) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(txid) {
            return Err(RpcError::HttpStatus {
                method: "getrawtransaction".to_string(),
                status: 503,
            });
        }
        let tx = self.transactions.get(txid).cloned().ok_or_else(|| RpcError::Upstream {
            method: "getrawtransaction".to_string(),
            code: Some(-5),
            message: "No such mempool or blockchain transaction".to_string(),
        })?;
        self.completed.lock().unwrap().push(txid.to_string());
        Ok(tx)
    }
}
