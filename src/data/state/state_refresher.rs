use std::sync::Arc;
use std::time::Duration;

use log::{error, info};

use crate::data::state::refresh_state;
use crate::data::store::SuburbStore;

/// Periodically reloads the suburb store from disk.
pub struct StateRefresher {
    interval: Duration,
    refresh_on_start: bool
}

impl StateRefresher {
    pub fn new(interval: Duration, refresh_on_start: bool) -> Self {
        StateRefresher { interval, refresh_on_start }
    }

    pub async fn start(&self, store: &Arc<SuburbStore>) {
        info!("Starting data refresh every {} seconds", self.interval.as_secs());
        if self.refresh_on_start {
            self.refresh(store).await;
        }
        loop {
            actix_rt::time::delay_for(self.interval).await;
            self.refresh(store).await;
        }
    }

    async fn refresh(&self, store: &Arc<SuburbStore>) {
        if let Err(err) = refresh_state(store).await {
            error!("Error while refreshing data: {}", err);
        }
    }
}
