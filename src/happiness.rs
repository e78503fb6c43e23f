//! World Happiness Report data.
//!
//! There is no usable happiness API yet: the real path reports
//! [`FetchError::NotImplemented`] without touching the network, so every call
//! resolves to the built-in dataset.

use crate::config::Config;
use crate::error::FetchError;
use crate::mock::{self, Jitter};
use crate::models::{HappinessRecord, RegionalAggregate, YearRange};
use crate::stats;
use async_trait::async_trait;

pub const DEFAULT_YEAR: i32 = 2023;

pub fn default_series_range() -> YearRange {
    YearRange::new(2015, 2023)
}

/// Supplier of happiness data consumed by [`crate::happiness_state::HappinessState`].
#[async_trait]
pub trait HappinessSource: Send + Sync {
    async fn happiness_data(&self, year: i32) -> Result<Vec<HappinessRecord>, FetchError>;

    async fn country_happiness(
        &self,
        country_code: &str,
        range: YearRange,
    ) -> Result<Vec<HappinessRecord>, FetchError>;

    async fn regional_happiness(&self) -> Result<Vec<RegionalAggregate>, FetchError>;
}

pub struct HappinessProvider {
    base_url: String,
    jitter: Jitter,
    development_mode: bool,
}

impl HappinessProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.happiness.base_url.clone(),
            jitter: Jitter::from_seed(config.mock_seed),
            development_mode: config.development_mode,
        }
    }

    pub fn with_jitter(jitter: Jitter) -> Self {
        Self {
            base_url: Config::default().happiness.base_url,
            jitter,
            development_mode: false,
        }
    }

    fn remote_unavailable(&self, what: &str) -> FetchError {
        FetchError::NotImplemented {
            endpoint: format!("{}/{what}", self.base_url),
        }
    }

    fn announce_mock(&self, msg: std::fmt::Arguments<'_>) {
        if self.development_mode {
            log::info!("{msg}");
        } else {
            log::debug!("{msg}");
        }
    }

    async fn fetch_happiness(&self, _year: i32) -> Result<Vec<HappinessRecord>, FetchError> {
        Err(self.remote_unavailable("happiness"))
    }

    async fn fetch_country_happiness(
        &self,
        _country_code: &str,
        _range: YearRange,
    ) -> Result<Vec<HappinessRecord>, FetchError> {
        Err(self.remote_unavailable("happiness/country"))
    }

    /// All countries for `year`. The mock records are always dated
    /// [`mock::MOCK_HAPPINESS_YEAR`], whatever year was asked for.
    pub async fn get_happiness_data(&self, year: i32) -> Vec<HappinessRecord> {
        log::debug!("fetching happiness data for year {year}");
        match self.fetch_happiness(year).await {
            Ok(records) => records,
            Err(e) => {
                self.announce_mock(format_args!(
                    "using mock happiness data for year {year} ({e})"
                ));
                mock::happiness_records()
            }
        }
    }

    /// Yearly series for one country; empty when the code is unknown.
    pub async fn get_country_happiness(
        &self,
        country_code: &str,
        range: YearRange,
    ) -> Vec<HappinessRecord> {
        log::debug!("fetching happiness data for {country_code} ({range})");
        match self.fetch_country_happiness(country_code, range).await {
            Ok(records) => records,
            Err(e) => {
                self.announce_mock(format_args!(
                    "using mock happiness data for {country_code} ({range}): {e}"
                ));
                self.mock_country_data(country_code, range)
            }
        }
    }

    pub fn mock_country_data(&self, country_code: &str, range: YearRange) -> Vec<HappinessRecord> {
        mock::country_happiness_series(country_code, range, &self.jitter)
    }

    /// Per-region average score, member count and members.
    pub async fn get_regional_happiness(&self) -> Vec<RegionalAggregate> {
        let records = self.get_happiness_data(DEFAULT_YEAR).await;
        stats::regional_summary(&records)
    }
}

#[async_trait]
impl HappinessSource for HappinessProvider {
    async fn happiness_data(&self, year: i32) -> Result<Vec<HappinessRecord>, FetchError> {
        Ok(self.get_happiness_data(year).await)
    }

    async fn country_happiness(
        &self,
        country_code: &str,
        range: YearRange,
    ) -> Result<Vec<HappinessRecord>, FetchError> {
        Ok(self.get_country_happiness(country_code, range).await)
    }

    async fn regional_happiness(&self) -> Result<Vec<RegionalAggregate>, FetchError> {
        Ok(self.get_regional_happiness().await)
    }
}
