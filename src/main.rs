use std::io;
use std::sync::Arc;

use actix_web::{App, HttpServer};
use actix_web::middleware::Logger;
use env_logger::Env;
use log::{error, info, warn};

use crate::api::AppState;
use crate::config::Settings;
use crate::data::state::state_refresher::StateRefresher;
use crate::data::store::SuburbStore;
use crate::summary::{LocalSummarizer, Summarizer};
use crate::summary::openai::OpenAiSummarizer;
use crate::valuation::estimator::Estimator;

mod api;
mod config;
mod data;
mod summary;
mod utils;
mod valuation;
mod api_tests;

#[actix_rt::main]
async fn main() -> io::Result<()> {
    env_logger::from_env(Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env()?;

    let store = Arc::new(SuburbStore::new(settings.data_path.clone()));
    store.load();

    if let Some(interval) = settings.refresh_interval {
        let refresher_store = store.clone();
        actix_rt::spawn(async move {
            let state_refresher = StateRefresher::new(interval, false);
            state_refresher.start(&refresher_store).await;
        });
    }

    let state = AppState::new(store, Estimator::default(), summarizer(&settings));
    let bind_address = settings.bind_address();
    info!("Listening on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .data(state.clone())
            .wrap(Logger::default())
            .wrap(api::cors_headers())
            .configure(api::routes)
    })
    .bind(bind_address)?
    .run()
    .await
}

fn summarizer(settings: &Settings) -> Arc<dyn Summarizer> {
    match &settings.openai {
        Some(openai) => {
            info!("OPENAI_API_KEY found, using {} for summaries", openai.model);
            match OpenAiSummarizer::new(&openai.api_url, &openai.api_key, &openai.model, openai.timeout) {
                Ok(summarizer) => Arc::new(summarizer),
                Err(err) => {
                    error!("Could not build summary client, using local summaries: {}", err);
                    Arc::new(LocalSummarizer)
                },
            }
        },
        None => {
            warn!("OPENAI_API_KEY is missing, using local summaries");
            Arc::new(LocalSummarizer)
        },
    }
}
