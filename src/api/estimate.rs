use actix_web::{Error, HttpResponse, web};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::data::models::EstimateResult;
use crate::summary::{local_summary, PropertyBrief};
use crate::utils::parse_param;
use crate::valuation::estimator::{EstimateQuery, PropertyType};

/// Every parameter is optional and read as text, so a bad value falls back to
/// its default instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct EstimateRequest {
    suburb: Option<String>,
    state: Option<String>,
    #[serde(rename = "type")]
    property_type: Option<String>,
    beds: Option<String>,
    weekly_rent: Option<String>
}

impl EstimateRequest {
    pub fn into_query(self) -> EstimateQuery {
        let defaults = EstimateQuery::default();
        EstimateQuery {
            suburb: non_blank(self.suburb).unwrap_or(defaults.suburb),
            state: non_blank(self.state).unwrap_or(defaults.state),
            property_type: non_blank(self.property_type)
                .map(|t| PropertyType::from_label(&t))
                .unwrap_or(defaults.property_type),
            bedrooms: parse_param(self.beds.as_deref()),
            weekly_rent: parse_param::<f64>(self.weekly_rent.as_deref())
                .filter(|rent| rent.is_finite())
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EstimateResponse {
    pub suburb: String,
    pub state: String,
    pub property_type: String,
    pub bedrooms: Option<u32>,
    pub estimated: i64,
    pub growth_pct: f64,
    pub weekly_rent_used: f64,
    pub gross_yield_pct: f64,
    pub projected_price_5yr: i64,
    pub roi_5yr_pct: f64,
    pub found_record: bool,
    pub summary: String,
    pub summary_source: String
}

impl EstimateResponse {
    fn new(query: EstimateQuery, estimate: EstimateResult, summary: String, source: &str) -> Self {
        EstimateResponse {
            suburb: query.suburb,
            state: query.state,
            property_type: query.property_type.label().to_owned(),
            bedrooms: query.bedrooms,
            estimated: estimate.estimated,
            growth_pct: estimate.growth_pct,
            weekly_rent_used: estimate.weekly_rent_used,
            gross_yield_pct: estimate.gross_yield_pct,
            projected_price_5yr: estimate.projected_price_5yr,
            roi_5yr_pct: estimate.roi_5yr_pct,
            found_record: estimate.found_record,
            summary,
            summary_source: source.to_owned()
        }
    }
}

pub async fn value_estimate(
    request: web::Query<EstimateRequest>,
    state: web::Data<AppState>
) -> Result<HttpResponse, Error> {
    let query = request.into_inner().into_query();
    let estimate = {
        let table = state.store.snapshot();
        state.estimator.estimate(&table, &query, &mut rand::thread_rng())
    };

    let brief = PropertyBrief::from_estimate(&query.suburb, &query.state, &estimate);
    let (summary, source) = match state.summarizer.summarize(brief).await {
        Ok(summary) => (summary, state.summarizer.source()),
        Err(err) => {
            warn!("Falling back to local summary for {}, {}: {}", query.suburb, query.state, err);
            (local_summary(&query.suburb, &query.state, &estimate), "local")
        },
    };

    Ok(HttpResponse::Ok().json(EstimateResponse::new(query, estimate, summary, source)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
