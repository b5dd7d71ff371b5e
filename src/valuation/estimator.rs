use rand::Rng;

use crate::data::models::{EstimateResult, SuburbRecord};
use crate::data::store::SuburbTable;
use crate::utils::round_to;

pub const DEFAULT_SUBURB: &str = "Sydney";
pub const DEFAULT_STATE: &str = "NSW";

const PROJECTION_YEARS: i32 = 5;
const WEEKS_PER_YEAR: f64 = 52.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    House,
    Townhouse,
    Other
}

impl PropertyType {
    /// Unrecognised labels (units, apartments, typos...) all land in `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "house" => PropertyType::House,
            "townhouse" => PropertyType::Townhouse,
            _ => PropertyType::Other,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            PropertyType::House => 1.05,
            PropertyType::Townhouse => 1.02,
            PropertyType::Other => 0.92,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Townhouse => "townhouse",
            PropertyType::Other => "other",
        }
    }
}

impl Default for PropertyType {
    fn default() -> Self {
        PropertyType::House
    }
}

/// Fallback values used when the store has nothing to say about a suburb.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorConfig {
    /// Centre of the synthetic base price.
    pub base_anchor: f64,
    /// Synthetic base price is drawn from `base_anchor ± base_jitter`.
    pub base_jitter: f64,
    pub default_growth_pct: f64,
    pub default_weekly_rent: f64,
    /// Final estimate is scaled by `1 ± variance`.
    pub variance: f64
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        EstimatorConfig {
            base_anchor: 750_000.0,
            base_jitter: 150_000.0,
            default_growth_pct: 4.5,
            default_weekly_rent: 480.0,
            variance: 0.03
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EstimateQuery {
    pub suburb: String,
    pub state: String,
    pub property_type: PropertyType,
    pub bedrooms: Option<u32>,
    pub weekly_rent: Option<f64>
}

impl EstimateQuery {
    /// Query for a suburb with the default property type and no bedroom count.
    pub fn for_suburb(suburb: &str, state: &str) -> Self {
        EstimateQuery {
            suburb: suburb.to_owned(),
            state: state.to_owned(),
            ..EstimateQuery::default()
        }
    }
}

impl Default for EstimateQuery {
    fn default() -> Self {
        EstimateQuery {
            suburb: DEFAULT_SUBURB.to_owned(),
            state: DEFAULT_STATE.to_owned(),
            property_type: PropertyType::default(),
            bedrooms: None,
            weekly_rent: None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Estimator {
    config: EstimatorConfig
}

impl Estimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Estimator { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimates value, yield and 5-year ROI for a suburb.
    ///
    /// Never fails: anything the store does not know is replaced by a
    /// default. Randomness comes only from `rng`: one draw for the variance,
    /// plus one for the synthetic base price when the suburb has no price.
    pub fn estimate<R: Rng + ?Sized>(
        &self,
        table: &SuburbTable,
        query: &EstimateQuery,
        rng: &mut R
    ) -> EstimateResult {
        let record = table.find(&query.suburb, &query.state);

        let base_price = match record {
            Some(r) if r.has_price() => r.median_price,
            _ => self.synthetic_base(rng),
        };
        let growth_pct = record
            .map(|r| r.annual_growth_pct)
            .unwrap_or(self.config.default_growth_pct);
        let weekly_rent_used = self.weekly_rent(record, query.weekly_rent);

        let adjusted = base_price
            * query.property_type.multiplier()
            * bedroom_multiplier(query.bedrooms);
        let variance = if self.config.variance > 0.0 {
            rng.gen_range(-self.config.variance..=self.config.variance)
        } else {
            0.0
        };
        let estimated = (adjusted * (1.0 + variance)).round() as i64;

        let projected_price_5yr = (estimated as f64
            * (1.0 + growth_pct / 100.0).powi(PROJECTION_YEARS))
            .round() as i64;

        let (gross_yield_pct, roi_5yr_pct) = if estimated > 0 {
            let price = estimated as f64;
            (
                round_to(weekly_rent_used * WEEKS_PER_YEAR / price * 100.0, 2),
                round_to((projected_price_5yr - estimated) as f64 / price * 100.0, 2)
            )
        } else {
            (0.0, 0.0)
        };

        EstimateResult {
            estimated,
            growth_pct,
            weekly_rent_used,
            gross_yield_pct,
            projected_price_5yr,
            roi_5yr_pct,
            found_record: record.is_some()
        }
    }

    fn synthetic_base<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let jitter = self.config.base_jitter;
        if jitter > 0.0 {
            self.config.base_anchor + rng.gen_range(-jitter..=jitter)
        } else {
            self.config.base_anchor
        }
    }

    fn weekly_rent(&self, record: Option<&SuburbRecord>, requested: Option<f64>) -> f64 {
        match (requested, record) {
            (Some(rent), _) if rent > 0.0 => rent,
            (_, Some(r)) if r.has_rent() => r.median_rent_weekly,
            _ => self.config.default_weekly_rent,
        }
    }
}

/// `1 + (bedrooms - 3) * 0.03`, except that a missing or zero bedroom count
/// disables the adjustment entirely instead of being read as zero bedrooms.
pub fn bedroom_multiplier(bedrooms: Option<u32>) -> f64 {
    match bedrooms {
        None | Some(0) => 1.0,
        Some(beds) => 1.0 + (f64::from(beds) - 3.0) * 0.03,
    }
}
