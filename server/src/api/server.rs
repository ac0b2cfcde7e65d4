//! API server implementation

use std::net::{IpAddr, SocketAddr, TcpListener};
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use tracing::info;

use super::routes;
use crate::config::ApiConfig;
use crate::fees::FeeService;

/// API server
pub struct ApiServer {
    fees: FeeService,
    config: ApiConfig,
}

impl ApiServer {
    pub fn new(fees: FeeService, config: ApiConfig) -> Self {
        Self { fees, config }
    }

    /// Address from the configuration
    pub fn socket_addr(&self) -> std::io::Result<SocketAddr> {
        let ip: IpAddr = self.config.bind_address.parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind address {}: {e}", self.config.bind_address),
            )
        })?;
        Ok(SocketAddr::new(ip, self.config.port))
    }

    /// Bind the configured address and start serving
    pub fn start(self) -> std::io::Result<Server> {
        let listener = TcpListener::bind(self.socket_addr()?)?;
        self.start_on(listener)
    }

    /// Start serving on an already-bound listener
    pub fn start_on(self, listener: TcpListener) -> std::io::Result<Server> {
        let fee_data = web::Data::new(self.fees);
        let config = self.config;
        let local_addr = listener.local_addr()?;
        let allow_any_origin = config.cors_allowed_origins.iter().any(|o| o == "*");
        let origins = config.cors_allowed_origins.clone();

        let server = HttpServer::new(move || {
            let cors = if allow_any_origin {
                Cors::default().allow_any_origin()
            } else {
                origins
                    .iter()
                    .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            }
            .allowed_methods(vec!["GET"])
            .allow_any_header()
            .max_age(3600);

            App::new()
                .app_data(fee_data.clone())
                .wrap(
                    middleware::DefaultHeaders::new()
                        .add(("X-Content-Type-Options", "nosniff"))
                        .add(("X-Frame-Options", "DENY")),
                )
                .wrap(middleware::NormalizePath::new(middleware::TrailingSlash::Trim))
                .wrap(cors)
                .wrap(middleware::Logger::default())
                .configure(routes::configure)
        })
        .client_request_timeout(Duration::from_secs(config.request_timeout))
        .listen(listener)?
        .run();

        info!("API server listening on {}", local_addr);

        Ok(server)
    }
}
