use thiserror::Error;

use crate::rpc::RpcError;

/// Why a single input's spent value could not be determined.
#[derive(Error, Debug)]
pub enum ResolutionFailure {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("prior transaction has only {available} outputs")]
    MissingOutput { available: usize },

    #[error("prior output carries an invalid amount {value}")]
    InvalidAmount { value: f64 },
}

/// Fee computation errors
#[derive(Error, Debug)]
pub enum FeeError {
    /// Confirmation target outside `1..=max`
    #[error("Max target block value is {max}. Please use a target between 1 and {max} (got {requested})")]
    InvalidTarget { requested: i64, max: u32 },

    #[error("invalid transaction id `{0}`: expected 64 hex characters")]
    InvalidTxid(String),

    #[error("No fee estimate available for {blocks} blocks")]
    EstimateUnavailable { blocks: u32, errors: Vec<String> },

    #[error("transaction {txid} is a coinbase transaction and pays no fee")]
    CoinbaseTransaction { txid: String },

    #[error("transaction {txid} is malformed: {reason}")]
    MalformedTransaction { txid: String, reason: String },

    #[error("could not resolve input {input_index} ({prev_txid}:{vout}): {reason}")]
    Resolution {
        input_index: usize,
        prev_txid: String,
        vout: u32,
        #[source]
        reason: ResolutionFailure,
    },

    /// Inputs are worth less than outputs
    #[error("transaction {txid} spends {input_sats} sat but creates {output_sats} sat")]
    NegativeFee {
        txid: String,
        input_sats: i64,
        output_sats: i64,
    },

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

impl FeeError {
    /// Caller-supplied parameter rejected before or after the node was asked.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FeeError::InvalidTarget { .. }
                | FeeError::InvalidTxid(_)
                | FeeError::CoinbaseTransaction { .. }
                | FeeError::NegativeFee { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FeeError>;
