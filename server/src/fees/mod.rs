//! Fee computation
//!
//! Derives smart-fee estimates and per-transaction fees from the node. All
//! monetary arithmetic is done on [`Sats`]; BTC floats only appear at the
//! RPC and HTTP boundaries.

mod amount;
mod error;
mod estimate;
mod transaction;

pub use amount::{btc_per_kvb_to_sats_per_vb, Sats, MAX_MONEY, SATS_PER_BTC};
pub use error::{FeeError, ResolutionFailure, Result};
pub use estimate::{FeeEstimate, MAX_CONF_TARGET};
pub use transaction::{validate_txid, TransactionFees};

use std::sync::Arc;

use crate::rpc::BitcoinRpc;

/// Default cap on concurrent prior-transaction lookups per request.
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 16;

/// Request-scoped fee operations over a shared RPC handle.
#[derive(Clone)]
pub struct FeeService {
    rpc: Arc<dyn BitcoinRpc>,
    max_concurrent_lookups: usize,
}

impl FeeService {
    pub fn new(rpc: Arc<dyn BitcoinRpc>) -> Self {
        Self {
            rpc,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }

    /// Set the fan-out width used when resolving inputs. Zero is treated as one.
    pub fn with_max_concurrent_lookups(mut self, limit: usize) -> Self {
        self.max_concurrent_lookups = limit.max(1);
        self
    }

    pub fn max_concurrent_lookups(&self) -> usize {
        self.max_concurrent_lookups
    }
}

impl std::fmt::Debug for FeeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeeService")
            .field("max_concurrent_lookups", &self.max_concurrent_lookups)
            .finish_non_exhaustive()
    }
}
