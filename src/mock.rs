//! Synthetic data served when a real source is unavailable.
//!
//! The shapes are fixed; values for indicator series and country happiness
//! series carry uniform jitter drawn from a [`Jitter`] the provider owns.

use crate::models::{
    CodeName, Country, HappinessRecord, IndicatorObservation, MAX_SPAN_YEARS, YearRange,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

pub const GDP_PER_CAPITA: &str = "NY.GDP.PCAP.CD";
pub const LIFE_EXPECTANCY: &str = "SP.DYN.LE00.IN";
pub const UNEMPLOYMENT: &str = "SL.UEM.TOTL.ZS";
pub const EDUCATION_EXPENDITURE: &str = "SE.XPD.TOTL.GD.ZS";

/// Base value for indicator/country pairs missing from [`BASE_VALUES`].
pub const DEFAULT_BASE_VALUE: f64 = 100.0;

/// Year every mock happiness record is stamped with.
pub const MOCK_HAPPINESS_YEAR: i32 = 2023;

/// Uniform random source behind mock jitter.
///
/// Seed it for reproducible output; [`Jitter::from_entropy`] gives a fresh
/// sequence per instance.
#[derive(Debug)]
pub struct Jitter {
    rng: Mutex<StdRng>,
}

impl Jitter {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self::from_entropy(),
        }
    }

    /// Uniform draw in `[lo, hi)`.
    pub fn uniform(&self, lo: f64, hi: f64) -> f64 {
        // A poisoned lock only means another draw panicked; the rng state is still usable.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.random_range(lo..hi)
    }
}

const BASE_VALUES: &[(&str, [(&str, f64); 8])] = &[
    (
        GDP_PER_CAPITA,
        [
            ("USA", 65000.0),
            ("IND", 2400.0),
            ("CHN", 12000.0),
            ("DEU", 50000.0),
            ("BRA", 9000.0),
            ("JPN", 40000.0),
            ("GBR", 45000.0),
            ("FRA", 43000.0),
        ],
    ),
    (
        LIFE_EXPECTANCY,
        [
            ("USA", 78.5),
            ("IND", 69.7),
            ("CHN", 77.4),
            ("DEU", 81.2),
            ("BRA", 75.9),
            ("JPN", 84.6),
            ("GBR", 81.4),
            ("FRA", 82.7),
        ],
    ),
    (
        UNEMPLOYMENT,
        [
            ("USA", 5.4),
            ("IND", 7.1),
            ("CHN", 4.0),
            ("DEU", 3.6),
            ("BRA", 12.3),
            ("JPN", 2.8),
            ("GBR", 4.2),
            ("FRA", 8.1),
        ],
    ),
    (
        EDUCATION_EXPENDITURE,
        [
            ("USA", 6.2),
            ("IND", 4.6),
            ("CHN", 4.1),
            ("DEU", 4.8),
            ("BRA", 6.1),
            ("JPN", 3.4),
            ("GBR", 5.5),
            ("FRA", 5.4),
        ],
    ),
];

pub fn base_value(indicator: &str, country: &str) -> f64 {
    BASE_VALUES
        .iter()
        .find(|(id, _)| *id == indicator)
        .and_then(|(_, row)| row.iter().find(|(c, _)| *c == country))
        .map(|(_, v)| *v)
        .unwrap_or(DEFAULT_BASE_VALUE)
}

/// Year-over-year multiplier applied to the base value.
pub fn growth_factor(indicator: &str) -> f64 {
    match indicator {
        GDP_PER_CAPITA => 1.02,
        LIFE_EXPECTANCY => 1.003,
        UNEMPLOYMENT => 0.98,
        EDUCATION_EXPENDITURE => 1.01,
        _ => 1.01,
    }
}

pub fn indicator_name(indicator: &str) -> &'static str {
    match indicator {
        GDP_PER_CAPITA => "GDP per capita (current US$)",
        LIFE_EXPECTANCY => "Life expectancy at birth, total (years)",
        UNEMPLOYMENT => "Unemployment, total (% of total labor force)",
        EDUCATION_EXPENDITURE => "Government expenditure on education, total (% of GDP)",
        _ => "Unknown Indicator",
    }
}

/// Display name for one of the mock countries, or the code itself.
pub fn country_name(code: &str) -> String {
    COUNTRIES
        .iter()
        .find(|c| c.0 == code)
        .map(|c| c.1.to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Years a mock series covers: the range, cut to [`MAX_SPAN_YEARS`] from its start.
fn series_years(range: YearRange) -> impl Iterator<Item = i32> {
    if range.year_count() > MAX_SPAN_YEARS {
        log::warn!("mock series for {range} cut to {MAX_SPAN_YEARS} years");
    }
    range.years().take(MAX_SPAN_YEARS)
}

/// Round to two decimals, half away from zero.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Expected (jitter-free) value for `year`.
pub fn trend_value(indicator: &str, country: &str, year: i32, start_year: i32) -> f64 {
    base_value(indicator, country) * growth_factor(indicator).powi(year - start_year)
}

pub fn indicator_series(
    indicator: &str,
    country: &str,
    range: YearRange,
    jitter: &Jitter,
) -> Vec<IndicatorObservation> {
    let name = indicator_name(indicator);
    let country_display = country_name(country);
    series_years(range)
        .map(|year| {
            let trend = trend_value(indicator, country, year, range.start);
            IndicatorObservation {
                indicator_id: indicator.to_string(),
                indicator_name: name.to_string(),
                country_code: country.to_string(),
                country_name: country_display.clone(),
                year,
                value: Some(round2(trend * jitter.uniform(0.9, 1.1))),
                unit: String::new(),
                obs_status: String::new(),
                decimal: Some(1),
            }
        })
        .collect()
}

// (id, name, capital, region id, region, income id, income)
const COUNTRIES: [(&str, &str, &str, &str, &str, &str, &str); 8] = [
    ("USA", "United States", "Washington D.C.", "NAC", "North America", "HIC", "High income"),
    ("IND", "India", "New Delhi", "SAS", "South Asia", "LMC", "Lower middle income"),
    ("CHN", "China", "Beijing", "EAS", "East Asia & Pacific", "UMC", "Upper middle income"),
    ("DEU", "Germany", "Berlin", "ECS", "Europe & Central Asia", "HIC", "High income"),
    ("BRA", "Brazil", "Brasilia", "LCN", "Latin America & Caribbean", "UMC", "Upper middle income"),
    ("JPN", "Japan", "Tokyo", "EAS", "East Asia & Pacific", "HIC", "High income"),
    ("GBR", "United Kingdom", "London", "ECS", "Europe & Central Asia", "HIC", "High income"),
    ("FRA", "France", "Paris", "ECS", "Europe & Central Asia", "HIC", "High income"),
];

pub fn countries() -> Vec<Country> {
    COUNTRIES
        .iter()
        .map(|&(id, name, capital, rid, region, iid, income)| Country {
            id: id.to_string(),
            iso2_code: None,
            name: name.to_string(),
            capital_city: capital.to_string(),
            region: CodeName::new(rid, region),
            income_level: CodeName::new(iid, income),
        })
        .collect()
}

// (name, code, score, region, gdp, social, health, freedom, generosity, corruption)
type HappinessRow = (&'static str, &'static str, f64, &'static str, [f64; 6]);

const HAPPINESS: [HappinessRow; 8] = [
    ("United States", "USA", 6.894, "North America", [1.488, 1.504, 0.856, 0.586, 0.308, 0.394]),
    ("India", "IND", 4.036, "South Asia", [0.755, 0.765, 0.588, 0.498, 0.200, 0.085]),
    ("China", "CHN", 5.125, "East Asia & Pacific", [1.181, 1.402, 0.932, 0.416, 0.106, 0.100]),
    ("Germany", "DEU", 7.034, "Europe & Central Asia", [1.456, 1.570, 0.963, 0.612, 0.248, 0.464]),
    ("Brazil", "BRA", 6.293, "Latin America & Caribbean", [1.004, 1.439, 0.802, 0.390, 0.099, 0.086]),
    ("Japan", "JPN", 5.886, "East Asia & Pacific", [1.420, 1.419, 1.088, 0.445, 0.069, 0.408]),
    ("United Kingdom", "GBR", 7.064, "Europe & Central Asia", [1.441, 1.545, 0.943, 0.558, 0.464, 0.382]),
    ("France", "FRA", 6.661, "Europe & Central Asia", [1.449, 1.479, 1.000, 0.557, 0.184, 0.305]),
];

pub fn happiness_records() -> Vec<HappinessRecord> {
    HAPPINESS
        .iter()
        .map(|&(country, code, score, region, f)| HappinessRecord {
            country: country.to_string(),
            country_code: code.to_string(),
            year: MOCK_HAPPINESS_YEAR,
            happiness_score: score,
            region: region.to_string(),
            gdp_per_capita: f[0],
            social_support: f[1],
            healthy_life_expectancy: f[2],
            freedom_to_make_life_choices: f[3],
            generosity: f[4],
            perceptions_of_corruption: f[5],
        })
        .collect()
}

/// One record per year, each the base record with `±0.25` added to the score.
/// Unknown codes give an empty series.
pub fn country_happiness_series(
    country_code: &str,
    range: YearRange,
    jitter: &Jitter,
) -> Vec<HappinessRecord> {
    let Some(base) = happiness_records()
        .into_iter()
        .find(|r| r.country_code == country_code)
    else {
        return Vec::new();
    };
    series_years(range)
        .map(|year| HappinessRecord {
            year,
            happiness_score: base.happiness_score + jitter.uniform(-0.25, 0.25),
            ..base.clone()
        })
        .collect()
}
