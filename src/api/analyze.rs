use actix_web::{Error, HttpResponse, web};
use log::error;
use serde::Deserialize;
use serde_json::json;

use crate::api::AppState;
use crate::summary::PropertyBrief;
use crate::valuation::estimator::{DEFAULT_STATE, DEFAULT_SUBURB};

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AnalyzeEstimates {
    estimated: String,
    rent: String,
    growth: String,
    demand: String,
    interest: String
}

impl Default for AnalyzeEstimates {
    fn default() -> Self {
        AnalyzeEstimates {
            estimated: "$850,000".to_owned(),
            rent: "$600 per week".to_owned(),
            growth: "8.5%".to_owned(),
            demand: "High".to_owned(),
            interest: "Investor Hotspot".to_owned()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnalyzeRequest {
    suburb: Option<String>,
    state: Option<String>,
    estimates: AnalyzeEstimates
}

impl AnalyzeRequest {
    pub fn into_brief(self) -> PropertyBrief {
        PropertyBrief {
            suburb: self.suburb.unwrap_or_else(|| DEFAULT_SUBURB.to_owned()),
            state: self.state.unwrap_or_else(|| DEFAULT_STATE.to_owned()),
            estimated: self.estimates.estimated,
            rent: self.estimates.rent,
            growth: self.estimates.growth,
            demand: Some(self.estimates.demand),
            interest: Some(self.estimates.interest)
        }
    }
}

/// Summarizes caller-supplied figures. Unlike `/value-estimate` there is no
/// local fallback: a summarizer failure is reported as 503.
pub async fn analyze(
    request: web::Json<AnalyzeRequest>,
    state: web::Data<AppState>
) -> Result<HttpResponse, Error> {
    let brief = request.into_inner().into_brief();
    match state.summarizer.summarize(brief).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(json!({ "summary": summary }))),
        Err(err) => {
            error!("Error while summarizing: {}", err);
            Ok(HttpResponse::ServiceUnavailable().json(json!({ "error": err.to_string() })))
        },
    }
}
