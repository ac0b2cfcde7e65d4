//! API routes

use actix_web::{web, HttpResponse};
use tracing::debug;
use utoipa::OpenApi;

use super::docs::ApiDoc;
use super::error::{ApiError, ApiResult, ErrorResponse};
use super::types::{
    FeeEstimateQuery, FeeEstimateResponse, HealthResponse, MessageResponse, TxFeesResponse,
};
use crate::fees::FeeService;

/// Fee service handle shared by all workers
pub type FeeData = web::Data<FeeService>;

/// Confirmation target used when `blocks` is omitted
pub const DEFAULT_TARGET_BLOCKS: i64 = 1;

/// Configure all API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::bad_request(format!("Invalid query string: {err}")).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        ApiError::bad_request(format!("Invalid path: {err}")).into()
    }))
    .route("/", web::get().to(root))
    .route("/health", web::get().to(health_check))
    .route("/fee-estimate", web::get().to(fee_estimate))
    .route("/get-tx-fees/{txid}", web::get().to(get_tx_fees))
    .route("/openapi.json", web::get().to(openapi_json));
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/",
    tag = "service",
    responses(
        (status = 200, description = "Service is up", body = MessageResponse)
    )
)]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        message: "Hello World!".to_string(),
    })
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "service",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
    })
}

/// Estimate the fee needed to confirm within `blocks` blocks
///
/// Returns the node's rate in BTC/kvB and the same rate in sat/vB.
#[utoipa::path(
    get,
    path = "/fee-estimate",
    tag = "fees",
    params(FeeEstimateQuery),
    responses(
        (status = 200, description = "Fee estimate", body = FeeEstimateResponse),
        (status = 400, description = "Malformed query string", body = ErrorResponse),
        (status = 404, description = "No estimate available for this horizon", body = ErrorResponse),
        (status = 502, description = "Target above 1008 blocks, or upstream failure", body = ErrorResponse)
    )
)]
pub async fn fee_estimate(
    query: web::Query<FeeEstimateQuery>,
    fees: FeeData,
) -> ApiResult<HttpResponse> {
    let blocks = query.blocks.unwrap_or(DEFAULT_TARGET_BLOCKS);
    debug!(blocks, "fee estimate requested");

    let estimate = fees.estimate_fee(blocks).await?;

    Ok(HttpResponse::Ok().json(FeeEstimateResponse::from(estimate)))
}

/// Get the fee paid by a transaction
///
/// Resolves every input through the node and returns totals in BTC and the
/// fee in satoshis.
#[utoipa::path(
    get,
    path = "/get-tx-fees/{txid}",
    tag = "fees",
    params(
        ("txid" = String, Path, description = "Transaction ID (64 hex characters)")
    ),
    responses(
        (status = 200, description = "Transaction fee", body = TxFeesResponse),
        (status = 400, description = "Invalid transaction ID format", body = ErrorResponse),
        (status = 422, description = "Coinbase or inconsistent transaction", body = ErrorResponse),
        (status = 502, description = "Transaction or one of its inputs could not be resolved", body = ErrorResponse)
    )
)]
pub async fn get_tx_fees(path: web::Path<String>, fees: FeeData) -> ApiResult<HttpResponse> {
    let txid = path.into_inner();
    let result = fees.get_tx_fees(&txid).await?;

    Ok(HttpResponse::Ok().json(TxFeesResponse::from(result)))
}

/// OpenAPI document for this service
async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::mock::{txid, MockNode};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;
    use std::sync::Arc;

    fn fee_data(node: MockNode) -> (Arc<MockNode>, FeeData) {
        let node = Arc::new(node);
        let data = web::Data::new(FeeService::new(node.clone()));
        (node, data)
    }

    macro_rules! app {
        ($data:expr) => {
            test::init_service(App::new().app_data($data.clone()).configure(configure)).await
        };
    }

    #[actix_web::test]
    async fn test_root() {
        let (_, data) = fee_data(MockNode::new());
        let app = app!(data);

        let req = test::TestRequest::get().uri("/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, serde_json::json!({ "message": "Hello World!" }));
    }

    #[actix_web::test]
    async fn test_fee_estimate_defaults_to_one_block() {
        let (node, data) = fee_data(MockNode::new().with_estimate(1, Some(0.00001), 2));
        let app = app!(data);

        let req = test::TestRequest::get().uri("/fee-estimate").to_request();
        let body: FeeEstimateResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.target_blocks, 2);
        assert_eq!(body.estimated_fee_btc_per_kvb, 0.00001);
        assert_eq!(body.estimated_fee_sats_per_vb, 1);
        assert_eq!(node.calls(), 1);
    }

    #[actix_web::test]
    async fn test_fee_estimate_over_ceiling_is_bad_gateway() {
        let (node, data) = fee_data(MockNode::new());
        let app = app!(data);

        let req = test::TestRequest::get().uri("/fee-estimate?blocks=1009").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.code, 502);
        assert!(body.message.starts_with("Max target block value is 1008"));
        assert_eq!(node.calls(), 0);
    }

    #[actix_web::test]
    async fn test_fee_estimate_unavailable_is_not_found() {
        let (_, data) = fee_data(MockNode::new().with_estimate(500, None, 500));
        let app = app!(data);

        let req = test::TestRequest::get().uri("/fee-estimate?blocks=500").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.message, "No fee estimate available for 500 blocks");
    }

    #[actix_web::test]
    async fn test_fee_estimate_non_integer_blocks() {
        let (_, data) = fee_data(MockNode::new());
        let app = app!(data);

        let req = test::TestRequest::get().uri("/fee-estimate?blocks=soon").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_get_tx_fees() {
        let (node, data) = fee_data(
            MockNode::new()
                .with_tx(txid(20), vec![], vec![7.0, 3.0001])
                .with_tx(txid(21), vec![], vec![0.5])
                .with_tx(txid(2), vec![(txid(20), 1), (txid(21), 0)], vec![3.5]),
        );
        let app = app!(data);

        let req = test::TestRequest::get()
            .uri(&format!("/get-tx-fees/{}", txid(2)))
            .to_request();
        let body: TxFeesResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.txid, txid(2));
        assert_eq!(body.input_btc, 3.5001);
        assert_eq!(body.output_btc, 3.5);
        assert_eq!(body.fees, 10_000);
        assert_eq!(node.calls(), 3);
    }

    #[actix_web::test]
    async fn test_get_tx_fees_resolution_failure() {
        let (_, data) = fee_data(
            MockNode::new()
                .with_tx(txid(3), vec![(txid(30), 0)], vec![1.0])
                .failing(txid(30)),
        );
        let app = app!(data);

        let req = test::TestRequest::get()
            .uri(&format!("/get-tx-fees/{}", txid(3)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body: ErrorResponse = test::read_body_json(resp).await;
        let details = body.details.unwrap();
        assert!(details.contains("input: 0"));
        assert!(details.contains(&txid(30)));
    }

    #[actix_web::test]
    async fn test_get_tx_fees_invalid_txid() {
        let (node, data) = fee_data(MockNode::new());
        let app = app!(data);

        let req = test::TestRequest::get().uri("/get-tx-fees/xyz").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(node.calls(), 0);
    }

    #[actix_web::test]
    async fn test_openapi_lists_routes() {
        let (_, data) = fee_data(MockNode::new());
        let app = app!(data);

        let req = test::TestRequest::get().uri("/openapi.json").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let paths = body["paths"].as_object().unwrap();
        assert!(paths.contains_key("/fee-estimate"));
        assert!(paths.contains_key("/get-tx-fees/{txid}"));
    }
}
