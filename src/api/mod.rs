//! HTTP surface: three routes over the process inspector.

pub mod error;
mod handlers;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{Condition, DefaultHeaders, NormalizePath, TrailingSlash};
use actix_web::{App, web};

use crate::config::{Config, ServerConfig};
use crate::system::collector::Collector;
use crate::system::kill::Terminator;

/// State shared by every worker.
pub struct AppState {
    pub(crate) collector: Arc<Mutex<Collector>>,
    pub(crate) terminator: Terminator,
    pub(crate) cpu_window: Duration,
}

impl AppState {
    pub fn new(terminator: Terminator, cpu_window: Duration) -> Self {
        AppState {
            collector: Arc::new(Mutex::new(Collector::new())),
            terminator,
            cpu_window,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let terminator = Terminator::new(
            config.terminate.timeout(),
            config.terminate.poll_interval(),
        );
        Self::new(terminator, config.sampling.cpu_window())
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/processes/", web::get().to(handlers::list_processes))
        .route(
            "/processes/terminate/{pid}/",
            web::post().to(handlers::terminate_process),
        )
        .route("/system-summary/", web::get().to(handlers::system_summary));
}

/// Assemble the application: routes under `api_prefix`, trailing slash
/// optional, and an `Access-Control-Allow-Origin` header when configured.
pub fn build_app(
    state: web::Data<AppState>,
    server: ServerConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let origin = server.cors_allow_origin;
    let cors = DefaultHeaders::new().add((
        "Access-Control-Allow-Origin",
        origin.clone().unwrap_or_default(),
    ));
    let prefix = server.api_prefix.trim_end_matches('/').to_string();

    App::new()
        .app_data(state)
        .wrap(Condition::new(origin.is_some(), cors))
        .wrap(NormalizePath::new(TrailingSlash::Always))
        .service(web::scope(&prefix).configure(routes))
}
