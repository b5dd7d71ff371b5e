use std::sync::Arc;

use actix_web::http::header;
use actix_web::middleware::DefaultHeaders;
use actix_web::web;

use crate::data::store::SuburbStore;
use crate::summary::Summarizer;
use crate::valuation::estimator::Estimator;

pub mod admin;
pub mod analyze;
pub mod estimate;
pub mod health;
pub mod suburbs;

/// Shared by every worker; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SuburbStore>,
    pub estimator: Estimator,
    pub summarizer: Arc<dyn Summarizer>
}

impl AppState {
    pub fn new(
        store: Arc<SuburbStore>,
        estimator: Estimator,
        summarizer: Arc<dyn Summarizer>
    ) -> Self {
        AppState { store, estimator, summarizer }
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/", web::get().to(health::index))
        .route("/health", web::get().to(health::health))
        .route("/value-estimate", web::get().to(estimate::value_estimate))
        .route("/top-suburbs", web::get().to(suburbs::top_suburbs))
        .route("/analyze", web::post().to(analyze::analyze))
        .route("/reload", web::post().to(admin::reload));
}

/// Lets browser front-ends on other origins call the API.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
}
