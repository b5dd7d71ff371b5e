use std::fmt::Formatter;

use futures::future::{self, BoxFuture};

use crate::data::models::EstimateResult;
use crate::utils::format_dollars;

pub mod openai;

/// Figures handed to a summarizer, already formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyBrief {
    pub suburb: String,
    pub state: String,
    pub estimated: String,
    pub rent: String,
    pub growth: String,
    pub demand: Option<String>,
    pub interest: Option<String>
}

impl PropertyBrief {
    pub fn from_estimate(suburb: &str, state: &str, estimate: &EstimateResult) -> Self {
        PropertyBrief {
            suburb: suburb.to_owned(),
            state: state.to_owned(),
            estimated: format_dollars(estimate.estimated),
            rent: format!("{} per week", format_dollars(estimate.weekly_rent_used.round() as i64)),
            growth: format!("{}%", estimate.growth_pct),
            demand: None,
            interest: None
        }
    }

    /// Prompt sent to a text-generation backend.
    pub fn prompt(&self) -> String {
        let mut figures = vec![
            format!("- Estimated current value: {}", self.estimated),
            format!("- Median rent: {}", self.rent),
            format!("- 12-month growth: {}", self.growth),
        ];
        if let Some(demand) = &self.demand {
            figures.push(format!("- Demand rating: {}", demand));
        }
        if let Some(interest) = &self.interest {
            figures.push(format!("- Investor interest level: {}", interest));
        }

        format!(
            "You are a senior Australian property analyst. Provide a concise (3-4 sentence) \
             investment summary for {}, {} given:\n\n{}\n\n\
             Summarize in professional, investor-friendly language.",
            self.suburb,
            self.state,
            figures.join("\n")
        )
    }
}

#[derive(Debug)]
pub enum SummaryError {
    /// The backend could not be reached or answered with an error status.
    Unavailable(String),
    /// The backend answered but without usable text.
    InvalidResponse(String)
}

impl std::fmt::Display for SummaryError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            SummaryError::Unavailable(msg) => write!(f, "Summary service unavailable: {}", msg),
            SummaryError::InvalidResponse(msg) => write!(f, "Invalid summary response: {}", msg),
        }
    }
}

impl std::error::Error for SummaryError {}

impl From<reqwest::Error> for SummaryError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            SummaryError::InvalidResponse(error.to_string())
        } else {
            SummaryError::Unavailable(error.to_string())
        }
    }
}

/// Produces a natural-language summary for a property brief.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, brief: PropertyBrief) -> BoxFuture<'static, Result<String, SummaryError>>;

    /// Short tag reported to clients alongside the summary.
    fn source(&self) -> &'static str;
}

/// Summarizer that never leaves the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSummarizer;

impl Summarizer for LocalSummarizer {
    fn summarize(&self, brief: PropertyBrief) -> BoxFuture<'static, Result<String, SummaryError>> {
        let mut summary = format!(
            "{}, {} has an estimated current value of {}, median rent of {} and annual growth of {}.",
            brief.suburb, brief.state, brief.estimated, brief.rent, brief.growth
        );
        if let Some(demand) = brief.demand {
            summary.push_str(&format!(" Demand is rated {}.", demand));
        }
        if let Some(interest) = brief.interest {
            summary.push_str(&format!(" Investor interest: {}.", interest));
        }
        Box::pin(future::ready(Ok(summary)))
    }

    fn source(&self) -> &'static str {
        "local"
    }
}

/// Deterministic summary built only from the estimate figures.
pub fn local_summary(suburb: &str, state: &str, estimate: &EstimateResult) -> String {
    format!(
        "{}, {}: estimated value {} with a gross yield of {}% on {} per week. \
         At {}% annual growth the 5-year projection is {} (ROI {}%).",
        suburb,
        state,
        format_dollars(estimate.estimated),
        estimate.gross_yield_pct,
        format_dollars(estimate.weekly_rent_used.round() as i64),
        estimate.growth_pct,
        format_dollars(estimate.projected_price_5yr),
        estimate.roi_5yr_pct
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate() -> EstimateResult {
        EstimateResult {
            estimated: 850000,
            growth_pct: 4.5,
            weekly_rent_used: 600.0,
            gross_yield_pct: 3.67,
            projected_price_5yr: 1059253,
            roi_5yr_pct: 24.62,
            found_record: true
        }
    }

    #[test]
    fn test_brief_from_estimate() {
        let brief = PropertyBrief::from_estimate("Sydney", "NSW", &estimate());
        assert_eq!(brief.estimated, "$850,000");
        assert_eq!(brief.rent, "$600 per week");
        assert_eq!(brief.growth, "4.5%");

        let prompt = brief.prompt();
        assert!(prompt.contains("Sydney, NSW"));
        assert!(prompt.contains("- Estimated current value: $850,000"));
        assert!(!prompt.contains("Demand rating"));
    }

    #[test]
    fn test_local_summary_is_deterministic() {
        let first = local_summary("Sydney", "NSW", &estimate());
        assert_eq!(first, local_summary("Sydney", "NSW", &estimate()));
        assert!(first.contains("$850,000"));
        assert!(first.contains("3.67%"));
        assert!(first.contains("$1,059,253"));
    }

    #[actix_rt::test]
    async fn test_local_summarizer() {
        let mut brief = PropertyBrief::from_estimate("Sydney", "NSW", &estimate());
        brief.demand = Some("High".to_string());
        let summary = LocalSummarizer.summarize(brief).await.unwrap();
        assert!(summary.starts_with("Sydney, NSW has an estimated current value of $850,000"));
        assert!(summary.contains("Demand is rated High."));
    }
}
