//! HTTP surface
//!
//! Read-only endpoints that translate query and path parameters into fee
//! computations and map their errors onto HTTP statuses.

mod docs;
mod error;
mod server;
pub mod routes;
pub mod types;

pub use docs::ApiDoc;
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use server::ApiServer;
