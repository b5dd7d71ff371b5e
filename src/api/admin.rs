use actix_web::{Error, HttpResponse, web};
use log::error;
use serde_json::json;

use crate::api::AppState;
use crate::data::state::refresh_state;

/// Reloads the suburb file now instead of waiting for the refresher.
pub async fn reload(state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    match refresh_state(&state.store).await {
        Ok(count) => Ok(HttpResponse::Ok().json(json!({ "records": count }))),
        Err(err) => {
            error!("Error while reloading suburb data: {}", err);
            Ok(HttpResponse::InternalServerError().json(json!({
                "error": err.to_string(),
                "records": state.store.len()
            })))
        },
    }
}
