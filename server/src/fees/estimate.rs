use tracing::debug;

use super::amount::btc_per_kvb_to_sats_per_vb;
use super::error::{FeeError, Result};
use super::FeeService;

/// Largest confirmation target `estimatesmartfee` answers for.
pub const MAX_CONF_TARGET: u32 = 1008;

#[derive(Debug, Clone, PartialEq)]
pub struct FeeEstimate {
    /// Target the node actually answered for; may differ from the request
    pub target_blocks: u32,
    pub btc_per_kvb: f64,
    pub sats_per_vb: i64,
}

fn validate_target(requested: i64) -> Result<u32> {
    match u32::try_from(requested) {
        Ok(blocks) if (1..=MAX_CONF_TARGET).contains(&blocks) => Ok(blocks),
        _ => Err(FeeError::InvalidTarget {
            requested,
            max: MAX_CONF_TARGET,
        }),
    }
}

impl FeeService {
    /// Estimate the fee rate needed to confirm within `target_blocks`.
    ///
    /// Out-of-range targets are rejected before the node is contacted. A
    /// missing `feerate` means the node has too little data for the horizon
    /// and yields [`FeeError::EstimateUnavailable`].
    pub async fn estimate_fee(&self, target_blocks: i64) -> Result<FeeEstimate> {
        let blocks = validate_target(target_blocks)?;
        let estimate = self.rpc.estimate_smart_fee(blocks).await?;

        let feerate = match estimate.feerate {
            Some(rate) if rate.is_finite() && rate >= 0.0 => rate,
            _ => {
                return Err(FeeError::EstimateUnavailable {
                    blocks,
                    errors: estimate.errors,
                })
            }
        };

        let sats_per_vb = btc_per_kvb_to_sats_per_vb(feerate);
        debug!(requested = blocks, answered = estimate.blocks, feerate, sats_per_vb, "fee estimate");

        Ok(FeeEstimate {
            target_blocks: estimate.blocks,
            btc_per_kvb: feerate,
            sats_per_vb,
        })
    }
}
