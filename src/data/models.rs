use log::debug;
use serde::{Deserialize, Serialize};

/// Row of the suburb medians CSV file.
///
/// Every column is read as text so a blank or malformed cell never fails the
/// whole row; numeric columns are parsed leniently in [`SuburbRow::into_record`].
#[derive(Debug, Default, Deserialize)]
pub struct SuburbRow {
    #[serde(default)]
    pub suburb: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub median_price: String,
    #[serde(default)]
    pub annual_growth_pct: String,
    #[serde(default)]
    pub median_rent_weekly: String,
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lon: String
}

impl SuburbRow {
    /// Returns `None` when the row has no suburb name.
    pub fn into_record(self) -> Option<SuburbRecord> {
        let suburb = self.suburb.trim();
        if suburb.is_empty() {
            return None;
        }

        Some(SuburbRecord {
            suburb: suburb.to_owned(),
            state: normalize_state(&self.state),
            postcode: non_blank(self.postcode),
            median_price: parse_number("median_price", &self.median_price).max(0.0),
            annual_growth_pct: parse_number("annual_growth_pct", &self.annual_growth_pct),
            median_rent_weekly: parse_number("median_rent_weekly", &self.median_rent_weekly).max(0.0),
            lat: non_blank(self.lat),
            lon: non_blank(self.lon)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuburbRecord {
    pub suburb: String,
    pub state: String,
    pub postcode: Option<String>,
    /// 0 means unknown.
    pub median_price: f64,
    pub annual_growth_pct: f64,
    /// 0 means unknown.
    pub median_rent_weekly: f64,
    pub lat: Option<String>,
    pub lon: Option<String>
}

impl SuburbRecord {
    pub fn key(&self) -> SuburbKey {
        SuburbKey::new(&self.suburb, &self.state)
    }

    pub fn has_price(&self) -> bool {
        self.median_price > 0.0
    }

    pub fn has_rent(&self) -> bool {
        self.median_rent_weekly > 0.0
    }

    /// Annualised rent over median price, or 0 when the price is unknown.
    pub fn rent_to_price_ratio(&self) -> f64 {
        if self.has_price() {
            self.median_rent_weekly * 52.0 / self.median_price
        } else {
            0.0
        }
    }
}

/// Composite lookup key: lowercase suburb, uppercase state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SuburbKey {
    suburb: String,
    state: String
}

impl SuburbKey {
    pub fn new(suburb: &str, state: &str) -> Self {
        SuburbKey {
            suburb: suburb.trim().to_lowercase(),
            state: normalize_state(state)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateResult {
    pub estimated: i64,
    pub growth_pct: f64,
    pub weekly_rent_used: f64,
    pub gross_yield_pct: f64,
    pub projected_price_5yr: i64,
    pub roi_5yr_pct: f64,
    pub found_record: bool
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSuburb {
    #[serde(flatten)]
    pub record: SuburbRecord,
    pub score_est: f64
}

pub fn normalize_state(state: &str) -> String {
    state.trim().to_uppercase()
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn parse_number(column: &str, cell: &str) -> f64 {
    let cell = cell.trim();
    if cell.is_empty() {
        return 0.0;
    }
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            debug!("Invalid {} value {:?}, defaulting to 0", column, cell);
            0.0
        }
    }
}
