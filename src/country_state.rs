//! Reactive holder for the country list.

use crate::indicators::CountrySource;
use crate::models::Country;
use std::sync::Arc;
use tokio::sync::watch;

pub const LOAD_COUNTRIES_ERROR: &str = "Failed to load countries data";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountrySnapshot {
    pub countries: Vec<Country>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct CountryState {
    source: Arc<dyn CountrySource>,
    state: watch::Sender<CountrySnapshot>,
}

impl CountryState {
    pub fn new(source: Arc<dyn CountrySource>) -> Self {
        let (state, _) = watch::channel(CountrySnapshot::default());
        Self { source, state }
    }

    pub fn snapshot(&self) -> CountrySnapshot {
        self.state.borrow().clone()
    }

    /// Receiver that sees every state transition.
    pub fn subscribe(&self) -> watch::Receiver<CountrySnapshot> {
        self.state.subscribe()
    }

    /// Replace the list with the listable countries from the source.
    ///
    /// Concurrent calls are not coalesced; whichever settles last wins.
    pub async fn load_countries(&self) {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = self.source.countries().await;

        self.state.send_modify(|s| {
            match result {
                Ok(all) => {
                    s.countries = all.into_iter().filter(Country::is_listable).collect();
                }
                Err(e) => {
                    log::error!("{LOAD_COUNTRIES_ERROR}: {e}");
                    s.error = Some(LOAD_COUNTRIES_ERROR.to_string());
                }
            }
            s.loading = false;
        });
    }

    pub fn get_country_by_code(&self, code: &str) -> Option<Country> {
        self.state
            .borrow()
            .countries
            .iter()
            .find(|c| c.id == code)
            .cloned()
    }

    pub fn get_countries_by_region(&self, region_code: &str) -> Vec<Country> {
        self.state
            .borrow()
            .countries
            .iter()
            .filter(|c| c.region.id == region_code)
            .cloned()
            .collect()
    }
}
