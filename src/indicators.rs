//! Country metadata and indicator series from the World Bank, with mock fallback.

use crate::api::{self, Client, JsonSource};
use crate::config::Config;
use crate::error::FetchError;
use crate::mock::{self, Jitter};
use crate::models::{Country, IndicatorObservation, YearRange};
use async_trait::async_trait;
use std::sync::Arc;

/// Country code meaning "every economy" in indicator queries.
pub const ALL_COUNTRIES: &str = "all";

/// Supplier of the country list consumed by [`crate::country_state::CountryState`].
#[async_trait]
pub trait CountrySource: Send + Sync {
    async fn countries(&self) -> Result<Vec<Country>, FetchError>;
}

pub struct IndicatorProvider {
    source: Arc<dyn JsonSource>,
    jitter: Jitter,
    development_mode: bool,
}

impl IndicatorProvider {
    /// Provider backed by the World Bank endpoint from `config`.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = Client::new(&config.world_bank.base_url, config.world_bank.timeout())?;
        Ok(Self {
            source: Arc::new(client),
            jitter: Jitter::from_seed(config.mock_seed),
            development_mode: config.development_mode,
        })
    }

    pub fn with_source(source: Arc<dyn JsonSource>, jitter: Jitter) -> Self {
        Self {
            source,
            jitter,
            development_mode: false,
        }
    }

    fn announce_mock(&self, msg: std::fmt::Arguments<'_>) {
        if self.development_mode {
            log::info!("{msg}");
        } else {
            log::debug!("{msg}");
        }
    }

    /// Country list from the API, or the eight built-in countries on any failure.
    pub async fn get_countries(&self) -> Vec<Country> {
        log::debug!("fetching countries from World Bank API");
        match api::fetch_countries(self.source.as_ref()).await {
            Ok(countries) => {
                log::info!("fetched {} countries from World Bank API", countries.len());
                countries
            }
            Err(e) => {
                log::warn!("World Bank API failed, using mock countries: {e}");
                let countries = mock::countries();
                self.announce_mock(format_args!("serving {} mock countries", countries.len()));
                countries
            }
        }
    }

    /// Observations for `indicator` over `range`, one per year when mocked.
    pub async fn get_indicator_data(
        &self,
        indicator: &str,
        country: &str,
        range: YearRange,
    ) -> Vec<IndicatorObservation> {
        log::debug!("fetching indicator {indicator} for {country} ({range})");
        match api::fetch_indicator(self.source.as_ref(), indicator, country, range).await {
            Ok(points) => {
                log::info!(
                    "fetched {} observations of {indicator} for {country}",
                    points.len()
                );
                points
            }
            Err(e) => {
                log::warn!("World Bank API failed for indicator {indicator}, using mock data: {e}");
                let points = self.mock_indicator_data(indicator, country, range);
                self.announce_mock(format_args!(
                    "serving {} mock observations of {indicator} for {country}",
                    points.len()
                ));
                points
            }
        }
    }

    pub fn mock_indicator_data(
        &self,
        indicator: &str,
        country: &str,
        range: YearRange,
    ) -> Vec<IndicatorObservation> {
        mock::indicator_series(indicator, country, range, &self.jitter)
    }

    pub async fn get_gdp_per_capita(
        &self,
        country: &str,
        range: YearRange,
    ) -> Vec<IndicatorObservation> {
        self.get_indicator_data(mock::GDP_PER_CAPITA, country, range)
            .await
    }

    pub async fn get_life_expectancy(
        &self,
        country: &str,
        range: YearRange,
    ) -> Vec<IndicatorObservation> {
        self.get_indicator_data(mock::LIFE_EXPECTANCY, country, range)
            .await
    }

    pub async fn get_unemployment_rate(
        &self,
        country: &str,
        range: YearRange,
    ) -> Vec<IndicatorObservation> {
        self.get_indicator_data(mock::UNEMPLOYMENT, country, range)
            .await
    }

    /// Government education expenditure (% of GDP).
    pub async fn get_education_index(
        &self,
        country: &str,
        range: YearRange,
    ) -> Vec<IndicatorObservation> {
        self.get_indicator_data(mock::EDUCATION_EXPENDITURE, country, range)
            .await
    }
}

#[async_trait]
impl CountrySource for IndicatorProvider {
    async fn countries(&self) -> Result<Vec<Country>, FetchError> {
        Ok(self.get_countries().await)
    }
}
