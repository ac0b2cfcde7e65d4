//! OpenAPI documentation

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::routes::root,
        crate::api::routes::health_check,
        crate::api::routes::fee_estimate,
        crate::api::routes::get_tx_fees,
    ),
    components(
        schemas(
            crate::api::types::FeeEstimateResponse,
            crate::api::types::TxFeesResponse,
            crate::api::types::MessageResponse,
            crate::api::types::HealthResponse,
            crate::api::error::ErrorResponse,
        )
    ),
    tags(
        (name = "fees", description = "Fee estimates and per-transaction fees derived from the upstream node"),
        (name = "service", description = "Liveness and health"),
    ),
    info(
        title = "Timechain Backend API",
        description = "Bitcoin fee estimates and transaction fees over a full-node JSON-RPC endpoint",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
