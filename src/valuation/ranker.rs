use std::cmp::Ordering;

use rand::Rng;

use crate::data::models::{normalize_state, RankedSuburb, SuburbRecord};
use crate::data::store::SuburbTable;
use crate::valuation::estimator::{EstimateQuery, Estimator};

pub const DEFAULT_BUDGET: f64 = 1_000_000.0;
pub const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    /// Highest annualised rent relative to median price first.
    Yield,
    /// Highest annual growth first.
    Growth
}

impl Goal {
    /// `"yield"` (any case) selects [`Goal::Yield`]; everything else is growth.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("yield") {
            Goal::Yield
        } else {
            Goal::Growth
        }
    }

    fn sort_key(self, record: &SuburbRecord) -> f64 {
        match self {
            Goal::Yield => record.rent_to_price_ratio(),
            Goal::Growth => record.annual_growth_pct,
        }
    }
}

impl Default for Goal {
    fn default() -> Self {
        Goal::Yield
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankQuery {
    pub state: Option<String>,
    pub budget: f64,
    pub goal: Goal,
    pub limit: i64
}

impl Default for RankQuery {
    fn default() -> Self {
        RankQuery {
            state: None,
            budget: DEFAULT_BUDGET,
            goal: Goal::default(),
            limit: DEFAULT_LIMIT
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RankOutcome {
    Ranked(Vec<RankedSuburb>),
    /// Records are loaded but none pass the state and budget filters.
    NoCandidates,
    /// The store is empty.
    NoData
}

impl RankOutcome {
    pub fn suburbs(&self) -> &[RankedSuburb] {
        match self {
            RankOutcome::Ranked(suburbs) => suburbs.as_slice(),
            _ => &[],
        }
    }
}

/// Filters suburbs by state and budget, orders them by `goal` and scores the
/// survivors with a fresh estimate.
///
/// Records with an unknown price never qualify. Ties keep load order.
pub fn rank<R: Rng + ?Sized>(
    table: &SuburbTable,
    estimator: &Estimator,
    query: &RankQuery,
    rng: &mut R
) -> RankOutcome {
    if table.is_empty() {
        return RankOutcome::NoData;
    }

    let state = query.state.as_ref().map(|s| normalize_state(s));
    let mut candidates: Vec<&SuburbRecord> = table
        .records()
        .iter()
        .filter(|r| state.as_ref().map_or(true, |s| &r.state == s))
        .filter(|r| r.has_price() && r.median_price <= query.budget)
        .collect();

    if candidates.is_empty() {
        return RankOutcome::NoCandidates;
    }
    if query.limit <= 0 {
        return RankOutcome::Ranked(Vec::new());
    }

    // sort_by is stable, so equal keys stay in load order
    candidates.sort_by(|a, b| {
        query.goal
            .sort_key(b)
            .partial_cmp(&query.goal.sort_key(a))
            .unwrap_or(Ordering::Equal)
    });

    let ranked = candidates
        .into_iter()
        .take(query.limit as usize)
        .map(|record| {
            let estimate = estimator.estimate(
                table,
                &EstimateQuery::for_suburb(&record.suburb, &record.state),
                rng
            );
            RankedSuburb {
                record: record.clone(),
                score_est: estimate.gross_yield_pct
            }
        })
        .collect();

    RankOutcome::Ranked(ranked)
}
