use actix_web::{Error, HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::data::models::RankedSuburb;
use crate::utils::parse_param;
use crate::valuation::ranker::{rank, Goal, RankOutcome, RankQuery};

#[derive(Debug, Default, Deserialize)]
pub struct TopSuburbsRequest {
    state: Option<String>,
    budget: Option<String>,
    goal: Option<String>,
    limit: Option<String>
}

impl TopSuburbsRequest {
    pub fn into_query(self) -> RankQuery {
        let defaults = RankQuery::default();
        RankQuery {
            state: self.state
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty()),
            budget: parse_param::<f64>(self.budget.as_deref())
                .filter(|budget| budget.is_finite())
                .unwrap_or(defaults.budget),
            goal: self.goal
                .as_deref()
                .map(Goal::from_label)
                .unwrap_or(defaults.goal),
            limit: parse_param(self.limit.as_deref()).unwrap_or(defaults.limit)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankStatus {
    Ok,
    NoCandidates,
    NoData
}

#[derive(Debug, Serialize)]
pub struct TopSuburbsResponse {
    pub status: RankStatus,
    pub count: usize,
    pub results: Vec<RankedSuburb>
}

impl From<RankOutcome> for TopSuburbsResponse {
    fn from(outcome: RankOutcome) -> Self {
        let (status, results) = match outcome {
            RankOutcome::Ranked(results) => (RankStatus::Ok, results),
            RankOutcome::NoCandidates => (RankStatus::NoCandidates, Vec::new()),
            RankOutcome::NoData => (RankStatus::NoData, Vec::new()),
        };
        TopSuburbsResponse { status, count: results.len(), results }
    }
}

pub async fn top_suburbs(
    request: web::Query<TopSuburbsRequest>,
    state: web::Data<AppState>
) -> Result<HttpResponse, Error> {
    let query = request.into_inner().into_query();
    let table = state.store.snapshot();
    let outcome = rank(&table, &state.estimator, &query, &mut rand::thread_rng());

    Ok(HttpResponse::Ok().json(TopSuburbsResponse::from(outcome)))
}
