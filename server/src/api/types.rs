//! Request and response bodies

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::fees::{FeeEstimate, TransactionFees};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeeEstimateQuery {
    /// Confirmation target in blocks, 1 to 1008 (default: 1)
    #[param(default = 1, minimum = 1, maximum = 1008)]
    pub blocks: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeeEstimateResponse {
    /// Confirmation target the estimate is valid for
    pub target_blocks: u32,
    #[serde(rename = "estimated_fee_BTC_per_kvB")]
    pub estimated_fee_btc_per_kvb: f64,
    #[serde(rename = "estimated_fee_sats_per_vB")]
    pub estimated_fee_sats_per_vb: i64,
}

impl From<FeeEstimate> for FeeEstimateResponse {
    fn from(estimate: FeeEstimate) -> Self {
        Self {
            target_blocks: estimate.target_blocks,
            estimated_fee_btc_per_kvb: estimate.btc_per_kvb,
            estimated_fee_sats_per_vb: estimate.sats_per_vb,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TxFeesResponse {
    pub txid: String,
    pub input_btc: f64,
    pub output_btc: f64,
    /// Fee in satoshis
    pub fees: i64,
}

impl From<TransactionFees> for TxFeesResponse {
    fn from(fees: TransactionFees) -> Self {
        Self {
            txid: fees.txid,
            input_btc: fees.input_total.to_btc(),
            output_btc: fees.output_total.to_btc(),
            fees: fees.fee.to_sat(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub name: String,
}
