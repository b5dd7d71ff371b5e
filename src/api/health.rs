use actix_web::{Error, HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub records: usize,
    pub loaded_at: Option<DateTime<Utc>>
}

pub async fn index() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Suburb valuation API is running across Australia"
    })))
}

pub async fn health(state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    let table = state.store.snapshot();
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_owned(),
        records: table.len(),
        loaded_at: table.loaded_at()
    }))
}
