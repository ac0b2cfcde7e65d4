//! API error types and error handling

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::fees::FeeError;

/// API Result type alias
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// API error response structure
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status code
    pub code: u16,
    /// Error message
    pub message: String,
    /// RPC method and identifiers involved, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid request parameters
    #[error("{message}")]
    BadRequest {
        message: String,
        details: Option<String>,
    },

    /// Nothing to return for the request
    #[error("{message}")]
    NotFound {
        message: String,
        details: Option<String>,
    },

    /// Request was well formed but names an inconsistent transaction
    #[error("{message}")]
    Unprocessable {
        message: String,
        details: Option<String>,
    },

    /// The upstream node failed or could not be reached
    #[error("{message}")]
    BadGateway {
        message: String,
        details: Option<String>,
    },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound {
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway {
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, value: impl Into<String>) -> Self {
        match &mut self {
            ApiError::BadRequest { details, .. }
            | ApiError::NotFound { details, .. }
            | ApiError::Unprocessable { details, .. }
            | ApiError::BadGateway { details, .. } => *details = Some(value.into()),
        }
        self
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            ApiError::BadRequest { details, .. }
            | ApiError::NotFound { details, .. }
            | ApiError::Unprocessable { details, .. }
            | ApiError::BadGateway { details, .. } => details.as_deref(),
        }
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_response = ErrorResponse {
            code: status_code.as_u16(),
            message: self.to_string(),
            details: self.details().map(str::to_owned),
        };

        HttpResponse::build(status_code).json(error_response)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Conversion from fee computation errors
impl From<FeeError> for ApiError {
    fn from(err: FeeError) -> Self {
        let message = err.to_string();
        match err {
            // `/fee-estimate` has always answered an out-of-range target with 502
            FeeError::InvalidTarget { .. } => ApiError::bad_gateway(message),
            FeeError::InvalidTxid(_) => ApiError::bad_request(message),
            FeeError::EstimateUnavailable { errors, .. } => {
                let error = ApiError::not_found(message);
                if errors.is_empty() {
                    error
                } else {
                    error.with_details(errors.join("; "))
                }
            }
            FeeError::CoinbaseTransaction { txid } | FeeError::NegativeFee { txid, .. } => {
                ApiError::Unprocessable {
                    message,
                    details: Some(format!("txid: {txid}")),
                }
            }
            FeeError::MalformedTransaction { txid, .. } => ApiError::bad_gateway(message)
                .with_details(format!("method: getrawtransaction, txid: {txid}")),
            FeeError::Resolution {
                input_index,
                prev_txid,
                vout,
                ..
            } => ApiError::bad_gateway(message).with_details(format!(
                "method: getrawtransaction, input: {input_index}, prev_txid: {prev_txid}, vout: {vout}"
            )),
            FeeError::Rpc(e) => {
                ApiError::bad_gateway(message).with_details(format!("method: {}", e.method()))
            }
        }
    }
}
