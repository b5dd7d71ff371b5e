use std::sync::Arc;

use actix_web::error::BlockingError;
use actix_web::web;
use log::{error, info};

use crate::data::state::error::RefreshError;
use crate::data::store::SuburbStore;

pub mod error;
pub mod state_refresher;

/// Reloads the store from its source on the blocking pool.
///
/// When the reload fails and the store already holds data, the current table
/// is kept and the error is returned so the caller can decide how loud to be.
pub async fn refresh_state(store: &Arc<SuburbStore>) -> Result<usize, RefreshError> {
    info!("Refreshing suburb data from {}", store.source().display());
    let reload_store = store.clone();
    let result = web::block(move || reload_store.reload())
        .await
        .map_err(|err| match err {
            BlockingError::Error(inner) => inner,
            BlockingError::Canceled => RefreshError::IO(Box::new("data refresh was canceled")),
        });

    match result {
        Ok(count) => {
            info!("Successfully refreshed data ({} suburbs)", count);
            Ok(count)
        },
        Err(err) => {
            if store.len() == 0 {
                error!("{}; no fallback data is available", err);
            } else {
                info!("Falling back to current data ({} suburbs)", store.len());
            }
            Err(err)
        }
    }
}
