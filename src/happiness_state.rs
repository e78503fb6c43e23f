//! Reactive holder for happiness and regional datasets.
//!
//! The two loaders swallow failures into `error` and reset their list to empty.
//! [`HappinessState::get_country_happiness`] records the error too but also
//! returns it, so callers asking for a single series can react to it directly.

use crate::error::FetchError;
use crate::happiness::HappinessSource;
use crate::models::{HappinessRecord, RegionalAggregate, YearRange};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HappinessSnapshot {
    pub happiness: Vec<HappinessRecord>,
    pub regional: Vec<RegionalAggregate>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct HappinessState {
    source: Arc<dyn HappinessSource>,
    state: watch::Sender<HappinessSnapshot>,
}

impl HappinessState {
    pub fn new(source: Arc<dyn HappinessSource>) -> Self {
        let (state, _) = watch::channel(HappinessSnapshot::default());
        Self { source, state }
    }

    pub fn snapshot(&self) -> HappinessSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<HappinessSnapshot> {
        self.state.subscribe()
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    pub async fn load_happiness_data(&self, year: i32) {
        self.begin();
        log::debug!("loading happiness data for year {year}");
        let result = self.source.happiness_data(year).await;
        self.state.send_modify(|s| {
            match result {
                Ok(records) => {
                    log::info!("loaded {} happiness records", records.len());
                    s.happiness = records;
                }
                Err(e) => {
                    log::error!("loading happiness data for {year}: {e}");
                    s.error = Some(format!("Failed to load happiness data: {e}"));
                    s.happiness = Vec::new();
                }
            }
            s.loading = false;
        });
    }

    pub async fn load_regional_data(&self) {
        self.begin();
        log::debug!("loading regional happiness data");
        let result = self.source.regional_happiness().await;
        self.state.send_modify(|s| {
            match result {
                Ok(regions) => {
                    log::info!("loaded {} regional records", regions.len());
                    s.regional = regions;
                }
                Err(e) => {
                    log::error!("loading regional happiness data: {e}");
                    s.error = Some(format!("Failed to load regional happiness data: {e}"));
                    s.regional = Vec::new();
                }
            }
            s.loading = false;
        });
    }

    /// Series for one country. Does not touch `loading` or the stored lists.
    pub async fn get_country_happiness(
        &self,
        country_code: &str,
        range: YearRange,
    ) -> Result<Vec<HappinessRecord>, FetchError> {
        log::debug!("loading happiness data for {country_code} ({range})");
        match self.source.country_happiness(country_code, range).await {
            Ok(records) => Ok(records),
            Err(e) => {
                log::error!("loading happiness data for {country_code}: {e}");
                self.state.send_modify(|s| {
                    s.error = Some(format!("Failed to load country happiness data: {e}"));
                });
                Err(e)
            }
        }
    }

    /// Score of the first loaded record for `country_code`.
    pub fn get_happiness_score(&self, country_code: &str) -> Option<f64> {
        self.state
            .borrow()
            .happiness
            .iter()
            .find(|r| r.country_code == country_code)
            .map(|r| r.happiness_score)
    }
}
