// Timechain backend library

// Enforce panic-free code in production
#![cfg_attr(not(test), warn(clippy::unwrap_used))]
#![cfg_attr(not(test), warn(clippy::expect_used))]
#![cfg_attr(not(test), warn(clippy::panic))]
// Test-specific allows
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod api;
pub mod config;
pub mod fees;
pub mod logging;
pub mod rpc;

pub use api::ApiServer;
pub use config::ServiceConfig;
pub use fees::FeeService;
pub use rpc::RpcClient;
