use crate::error::FetchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Region value the World Bank uses for aggregate pseudo-countries ("Euro area", "World", ...).
pub const AGGREGATES_REGION: &str = "Aggregates";

/// Years accepted from user input: four digits.
pub const MIN_YEAR: i32 = 1000;
pub const MAX_YEAR: i32 = 9999;

/// Widest span a single query may cover.
pub const MAX_SPAN_YEARS: usize = 200;

/// Inclusive span of years used in indicator and happiness queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Like [`YearRange::new`], but both ends must be four-digit years and the
    /// span at most [`MAX_SPAN_YEARS`]. An inverted range is accepted and is empty.
    pub fn checked(start: i32, end: i32) -> Result<Self, FetchError> {
        let range = Self::new(start, end);
        let in_bounds = |y: i32| (MIN_YEAR..=MAX_YEAR).contains(&y);
        if !in_bounds(start) || !in_bounds(end) || range.year_count() > MAX_SPAN_YEARS {
            return Err(FetchError::InvalidRange(range.to_string()));
        }
        Ok(range)
    }

    /// `start:end`, as the World Bank `date` parameter expects it.
    pub fn to_query_param(&self) -> String {
        format!("{}:{}", self.start, self.end)
    }

    /// Years in ascending order. Empty when `start > end`.
    pub fn years(&self) -> impl Iterator<Item = i32> + use<> {
        self.start..=self.end
    }

    /// Number of years covered; computed in `i64` so extreme ends cannot overflow.
    pub fn year_count(&self) -> usize {
        let span = i64::from(self.end) - i64::from(self.start) + 1;
        usize::try_from(span.max(0)).unwrap_or(usize::MAX)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::new(2010, 2023)
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl FromStr for YearRange {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse = |part: &str| {
            part.trim()
                .parse::<i32>()
                .map_err(|_| FetchError::InvalidRange(s.to_string()))
        };
        match s.split_once(':') {
            Some((a, b)) => Self::checked(parse(a)?, parse(b)?),
            None => {
                let year = parse(s)?;
                Self::checked(year, year)
            }
        }
        .map_err(|_| FetchError::InvalidRange(s.to_string()))
    }
}

/// Metadata section returned by the API (position 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub page: u32,
    pub pages: u32,
    /// Some responses encode `per_page` as a string, others as a number.
    #[serde(deserialize_with = "de_u32_from_string_or_number")]
    pub per_page: u32,
    #[serde(deserialize_with = "de_u32_from_string_or_number")]
    pub total: u32,
}

fn de_u32_from_string_or_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct U32Visitor;

    impl<'de> Visitor<'de> for U32Visitor {
        type Value = u32;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a string or integer representing a non-negative number")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(E::custom)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(|_| E::custom("negative value for u32"))
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.trim().parse::<u32>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(U32Visitor)
}

/// `{ "id": ..., "value": ... }` pair the World Bank uses for regions, income levels, indicators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeName {
    pub id: String,
    pub value: String,
}

impl CodeName {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    /// ISO3 code, e.g. `DEU`.
    pub id: String,
    #[serde(default)]
    pub iso2_code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub capital_city: String,
    pub region: CodeName,
    pub income_level: CodeName,
}

impl Country {
    /// Real countries have a capital and are not one of the API's aggregate groupings.
    pub fn is_listable(&self) -> bool {
        !self.capital_city.trim().is_empty() && !self.is_aggregate()
    }

    pub fn is_aggregate(&self) -> bool {
        self.region.value.trim() == AGGREGATES_REGION || self.region.id == AGGREGATES_REGION
    }
}

/// Raw indicator entry from the API (position 1 array).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub indicator: CodeName,
    pub country: CodeName,
    #[serde(default)]
    pub countryiso3code: String,
    pub date: String,
    pub value: Option<f64>,
    pub unit: Option<String>,
    #[serde(rename = "obs_status")]
    pub obs_status: Option<String>,
    pub decimal: Option<i32>,
}

/// One indicator value for one country and year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorObservation {
    pub indicator_id: String,
    pub indicator_name: String,
    pub country_code: String,
    pub country_name: String,
    pub year: i32,
    pub value: Option<f64>,
    pub unit: String,
    pub obs_status: String,
    pub decimal: Option<i32>,
}

impl From<Entry> for IndicatorObservation {
    fn from(e: Entry) -> Self {
        let year = e.date.trim().parse::<i32>().unwrap_or(0);
        // Aggregates come back without an ISO3 code; fall back to the short id.
        let country_code = if e.countryiso3code.is_empty() {
            e.country.id
        } else {
            e.countryiso3code
        };
        Self {
            indicator_id: e.indicator.id,
            indicator_name: e.indicator.value,
            country_code,
            country_name: e.country.value,
            year,
            value: e.value,
            unit: e.unit.unwrap_or_default(),
            obs_status: e.obs_status.unwrap_or_default(),
            decimal: e.decimal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HappinessRecord {
    pub country: String,
    pub country_code: String,
    pub year: i32,
    /// Cantril ladder score, roughly 0..10.
    pub happiness_score: f64,
    pub region: String,
    pub gdp_per_capita: f64,
    pub social_support: f64,
    pub healthy_life_expectancy: f64,
    pub freedom_to_make_life_choices: f64,
    pub generosity: f64,
    pub perceptions_of_corruption: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalAggregate {
    pub region: String,
    pub average_happiness: f64,
    pub country_count: usize,
    pub countries: Vec<HappinessRecord>,
}

/// Grouping key used by the series statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub indicator_id: String,
    pub country_code: String,
}
