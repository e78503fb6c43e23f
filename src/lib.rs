//! happilens
//!
//! Data layer for a country happiness and economic-indicator dashboard.
//! Pairs with the `happilens` CLI.
//!
//! ### Features
//! - World Bank country metadata and indicator series, with mock fallback
//! - World Happiness Report scores (mock dataset) and regional averages
//! - Reactive load state (`tokio::sync::watch`) for countries and happiness data
//! - Seedable mock jitter for reproducible output
//!
//! ### Example
//! ```no_run
//! use std::sync::Arc;
//! use happilens::{Config, CountryState, IndicatorProvider, YearRange};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load(None)?;
//! let provider = Arc::new(IndicatorProvider::new(&config)?);
//! let gdp = provider
//!     .get_gdp_per_capita("DEU", YearRange::new(2015, 2020))
//!     .await;
//! println!("{:#?}", happilens::stats::series_summary(&gdp));
//!
//! let countries = CountryState::new(provider);
//! countries.load_countries().await;
//! println!("{} countries", countries.snapshot().countries.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod country_state;
pub mod error;
pub mod happiness;
pub mod happiness_state;
pub mod indicators;
pub mod mock;
pub mod models;
pub mod stats;

pub use config::Config;
pub use country_state::{CountrySnapshot, CountryState};
pub use error::FetchError;
pub use happiness::{HappinessProvider, HappinessSource};
pub use happiness_state::{HappinessSnapshot, HappinessState};
pub use indicators::{CountrySource, IndicatorProvider};
pub use models::{Country, HappinessRecord, IndicatorObservation, RegionalAggregate, YearRange};
