use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{info, warn};

use super::amount::Sats;
use super::error::{FeeError, ResolutionFailure, Result};
use super::FeeService;
use crate::rpc::{TxInput, TxOutput};

/// Fee breakdown for one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFees {
    pub txid: String,
    pub input_total: Sats,
    pub output_total: Sats,
    pub fee: Sats,
}

/// Reject anything that is not a 32-byte hex transaction id.
pub fn validate_txid(txid: &str) -> Result<()> {
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(txid, &mut bytes).map_err(|_| FeeError::InvalidTxid(txid.to_string()))
}

/// Output spent by one input.
#[derive(Debug, Clone, Copy)]
struct OutPoint<'a> {
    input_index: usize,
    txid: &'a str,
    vout: u32,
}

impl OutPoint<'_> {
    fn failed(&self, reason: ResolutionFailure) -> FeeError {
        warn!(
            input = self.input_index,
            prev_txid = self.txid,
            vout = self.vout,
            error = %reason,
            "input resolution failed"
        );
        FeeError::Resolution {
            input_index: self.input_index,
            prev_txid: self.txid.to_string(),
            vout: self.vout,
            reason,
        }
    }
}

fn output_total(txid: &str, outputs: &[TxOutput]) -> Result<Sats> {
    outputs
        .iter()
        .enumerate()
        .try_fold(Sats::ZERO, |total, (n, output)| {
            Sats::from_btc(output.value)
                .and_then(|value| total.checked_add(value))
                .ok_or_else(|| FeeError::MalformedTransaction {
                    txid: txid.to_string(),
                    reason: format!("output {n} carries an invalid amount {}", output.value),
                })
        })
}

fn outpoints<'a>(txid: &str, inputs: &'a [TxInput]) -> Result<Vec<OutPoint<'a>>> {
    if inputs.is_empty() {
        return Err(FeeError::MalformedTransaction {
            txid: txid.to_string(),
            reason: "transaction has no inputs".to_string(),
        });
    }
    if inputs.iter().any(TxInput::is_coinbase) {
        return Err(FeeError::CoinbaseTransaction {
            txid: txid.to_string(),
        });
    }

    inputs
        .iter()
        .enumerate()
        .map(|(input_index, input)| match (input.txid.as_deref(), input.vout) {
            (Some(prev), Some(vout)) => Ok(OutPoint {
                input_index,
                txid: prev,
                vout,
            }),
            _ => Err(FeeError::MalformedTransaction {
                txid: txid.to_string(),
                reason: format!("input {input_index} does not reference a previous output"),
            }),
        })
        .collect()
}

impl FeeService {
    /// Compute the fee paid by `txid`.
    ///
    /// Every input is resolved by fetching the transaction it spends. Lookups
    /// run concurrently (bounded by `max_concurrent_lookups`) and the result
    /// is all-or-nothing: one failed lookup fails the whole computation with
    /// [`FeeError::Resolution`], and lookups still in flight are dropped.
    pub async fn get_tx_fees(&self, txid: &str) -> Result<TransactionFees> {
        validate_txid(txid)?;

        let tx = self.rpc.get_raw_transaction(txid).await?;
        let output_total = output_total(txid, &tx.vout)?;
        let input_total = self.input_total(txid, &tx.vin).await?;

        let fee = input_total - output_total;
        if fee.is_negative() {
            return Err(FeeError::NegativeFee {
                txid: txid.to_string(),
                input_sats: input_total.to_sat(),
                output_sats: output_total.to_sat(),
            });
        }

        info!(
            txid,
            inputs = tx.vin.len(),
            outputs = tx.vout.len(),
            fee_sats = fee.to_sat(),
            "transaction fee computed"
        );

        Ok(TransactionFees {
            txid: txid.to_string(),
            input_total,
            output_total,
            fee,
        })
    }

    async fn input_total(&self, txid: &str, inputs: &[TxInput]) -> Result<Sats> {
        let outpoints = outpoints(txid, inputs)?;

        let values: Vec<Sats> = stream::iter(outpoints)
            .map(|outpoint| self.resolve(outpoint))
            .buffer_unordered(self.max_concurrent_lookups)
            .try_collect()
            .await?;

        values
            .into_iter()
            .try_fold(Sats::ZERO, Sats::checked_add)
            .ok_or_else(|| FeeError::MalformedTransaction {
                txid: txid.to_string(),
                reason: "input total overflows".to_string(),
            })
    }

    async fn resolve(&self, outpoint: OutPoint<'_>) -> Result<Sats> {
        let prev = self
            .rpc
            .get_raw_transaction(outpoint.txid)
            .await
            .map_err(|e| outpoint.failed(e.into()))?;

        let output = prev.vout.get(outpoint.vout as usize).ok_or_else(|| {
            outpoint.failed(ResolutionFailure::MissingOutput {
                available: prev.vout.len(),
            })
        })?;

        Sats::from_btc(output.value)
            .ok_or_else(|| outpoint.failed(ResolutionFailure::InvalidAmount { value: output.value }))
    }
}
