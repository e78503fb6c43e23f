use async_trait::async_trait;
use happilens::country_state::LOAD_COUNTRIES_ERROR;
use happilens::mock;
use happilens::models::{CodeName, Country};
use happilens::{CountrySource, CountryState, FetchError};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

fn country(id: &str, capital: &str, region_id: &str, region: &str) -> Country {
    Country {
        id: id.into(),
        iso2_code: None,
        name: id.into(),
        capital_city: capital.into(),
        region: CodeName::new(region_id, region),
        income_level: CodeName::new("HIC", "High income"),
    }
}

struct Listed(Vec<Country>);

#[async_trait]
impl CountrySource for Listed {
    async fn countries(&self) -> Result<Vec<Country>, FetchError> {
        Ok(self.0.clone())
    }
}

struct Broken;

#[async_trait]
impl CountrySource for Broken {
    async fn countries(&self) -> Result<Vec<Country>, FetchError> {
        Err(FetchError::Api("boom".into()))
    }
}

/// Succeeds on the first call, fails on every later one.
struct FailsAfterFirst {
    calls: AtomicUsize,
}

#[async_trait]
impl CountrySource for FailsAfterFirst {
    async fn countries(&self) -> Result<Vec<Country>, FetchError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(mock::countries())
        } else {
            Err(FetchError::Api("second call".into()))
        }
    }
}

/// Holds every call until the gate is opened.
struct Gated {
    gate: Arc<Notify>,
    fail: bool,
}

#[async_trait]
impl CountrySource for Gated {
    async fn countries(&self) -> Result<Vec<Country>, FetchError> {
        self.gate.notified().await;
        if self.fail {
            Err(FetchError::Api("late failure".into()))
        } else {
            Ok(mock::countries())
        }
    }
}

#[tokio::test]
async fn load_drops_aggregates_and_capital_less_entries() {
    let state = CountryState::new(Arc::new(Listed(vec![
        country("DEU", "Berlin", "ECS", "Europe & Central Asia"),
        country("EUU", "", "NA", "Aggregates"),
        country("WLD", "Somewhere", "NA", "Aggregates"),
        country("XKX", "  ", "ECS", "Europe & Central Asia"),
        country("FRA", "Paris", "ECS", "Europe & Central Asia"),
    ])));
    state.load_countries().await;

    let snap = state.snapshot();
    assert!(!snap.loading);
    assert_eq!(snap.error, None);
    let ids: Vec<&str> = snap.countries.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["DEU", "FRA"]);
    assert!(
        snap.countries
            .iter()
            .all(|c| !c.capital_city.trim().is_empty() && c.region.value != "Aggregates")
    );
}

#[tokio::test]
async fn lookups_over_loaded_list() {
    let state = CountryState::new(Arc::new(Listed(mock::countries())));
    assert!(state.get_country_by_code("DEU").is_none());

    state.load_countries().await;
    assert_eq!(state.get_country_by_code("JPN").unwrap().name, "Japan");
    assert!(state.get_country_by_code("ZZZ").is_none());

    let europe: Vec<String> = state
        .get_countries_by_region("ECS")
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(europe, ["DEU", "GBR", "FRA"]);
    assert!(state.get_countries_by_region("MEA").is_empty());
}

#[tokio::test]
async fn first_load_failure_sets_fixed_error() {
    let state = CountryState::new(Arc::new(Broken));
    state.load_countries().await;
    let snap = state.snapshot();
    assert!(!snap.loading);
    assert_eq!(snap.error.as_deref(), Some(LOAD_COUNTRIES_ERROR));
    assert!(snap.countries.is_empty());
}

#[tokio::test]
async fn failed_reload_keeps_previous_list() {
    let state = CountryState::new(Arc::new(FailsAfterFirst {
        calls: AtomicUsize::new(0),
    }));
    state.load_countries().await;
    assert_eq!(state.snapshot().countries.len(), 8);
    assert_eq!(state.snapshot().error, None);

    state.load_countries().await;
    let snap = state.snapshot();
    assert!(!snap.loading);
    assert_eq!(snap.error.as_deref(), Some(LOAD_COUNTRIES_ERROR));
    assert_eq!(snap.countries.len(), 8);
    assert_eq!(state.get_country_by_code("BRA").unwrap().capital_city, "Brasilia");
}

#[tokio::test]
async fn loading_flag_spans_the_call() {
    for fail in [false, true] {
        let gate = Arc::new(Notify::new());
        let state = Arc::new(CountryState::new(Arc::new(Gated {
            gate: gate.clone(),
            fail,
        })));
        assert!(!state.snapshot().loading);

        let mut rx = state.subscribe();
        let task = tokio::spawn({
            let state = state.clone();
            async move { state.load_countries().await }
        });

        rx.wait_for(|s| s.loading).await.unwrap();
        assert!(state.snapshot().loading);
        assert_eq!(state.snapshot().error, None);

        gate.notify_one();
        task.await.unwrap();

        let snap = state.snapshot();
        assert!(!snap.loading);
        assert_eq!(snap.error.is_some(), fail);
    }
}

#[tokio::test]
async fn provider_fallback_feeds_the_state() {
    use happilens::IndicatorProvider;
    use happilens::api::JsonSource;
    use serde_json::Value;

    struct Offline;

    #[async_trait]
    impl JsonSource for Offline {
        async fn get_json(&self, path: &str) -> Result<Value, FetchError> {
            Err(FetchError::Malformed {
                url: path.into(),
                reason: "offline".into(),
            })
        }
    }

    let provider = IndicatorProvider::with_source(Arc::new(Offline), mock::Jitter::seeded(1));
    let state = CountryState::new(Arc::new(provider));
    state.load_countries().await;
    let snap = state.snapshot();
    assert_eq!(snap.countries.len(), 8);
    assert_eq!(snap.error, None);
}
