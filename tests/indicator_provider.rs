use async_trait::async_trait;
use happilens::api::JsonSource;
use happilens::mock::{self, Jitter};
use happilens::{FetchError, IndicatorProvider, YearRange};
use serde_json::{Value, json};
use std::sync::Arc;

/// Every request fails as if the network were down.
struct Offline;

#[async_trait]
impl JsonSource for Offline {
    async fn get_json(&self, path: &str) -> Result<Value, FetchError> {
        Err(FetchError::Malformed {
            url: path.to_string(),
            reason: "offline".into(),
        })
    }
}

struct Fixed(Value);

#[async_trait]
impl JsonSource for Fixed {
    async fn get_json(&self, _path: &str) -> Result<Value, FetchError> {
        Ok(self.0.clone())
    }
}

fn offline(seed: u64) -> IndicatorProvider {
    IndicatorProvider::with_source(Arc::new(Offline), Jitter::seeded(seed))
}

#[tokio::test]
async fn countries_fall_back_to_builtin_list() {
    let countries = offline(1).get_countries().await;
    assert_eq!(countries.len(), 8);
    let ids: Vec<&str> = countries.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["USA", "IND", "CHN", "DEU", "BRA", "JPN", "GBR", "FRA"]);
    assert!(countries.iter().all(|c| c.is_listable()));
    let deu = &countries[3];
    assert_eq!(deu.capital_city, "Berlin");
    assert_eq!(deu.region.id, "ECS");
    assert_eq!(deu.income_level.value, "High income");
}

#[tokio::test]
async fn malformed_country_body_falls_back() {
    let p = IndicatorProvider::with_source(
        Arc::new(Fixed(json!({"unexpected": true}))),
        Jitter::seeded(1),
    );
    assert_eq!(p.get_countries().await.len(), 8);
}

#[tokio::test]
async fn real_countries_are_passed_through() {
    let body = json!([
        {"page": 1, "pages": 1, "per_page": "300", "total": 1},
        [{
            "id": "NOR", "iso2Code": "NO", "name": "Norway",
            "region": {"id": "ECS", "value": "Europe & Central Asia"},
            "incomeLevel": {"id": "HIC", "value": "High income"},
            "capitalCity": "Oslo"
        }]
    ]);
    let p = IndicatorProvider::with_source(Arc::new(Fixed(body)), Jitter::seeded(1));
    let countries = p.get_countries().await;
    assert_eq!(countries.len(), 1);
    assert_eq!(countries[0].name, "Norway");
}

#[tokio::test]
async fn mock_series_has_one_point_per_year_within_band() {
    let range = YearRange::new(2010, 2023);
    let pts = offline(42)
        .get_indicator_data(mock::GDP_PER_CAPITA, "USA", range)
        .await;
    assert_eq!(pts.len(), 14);
    for (i, p) in pts.iter().enumerate() {
        let year = 2010 + i as i32;
        assert_eq!(p.year, year);
        assert_eq!(p.indicator_id, mock::GDP_PER_CAPITA);
        assert_eq!(p.indicator_name, "GDP per capita (current US$)");
        assert_eq!(p.country_code, "USA");
        assert_eq!(p.country_name, "United States");
        assert_eq!(p.unit, "");
        let expected = 65000.0 * 1.02f64.powi(year - 2010);
        let v = p.value.unwrap();
        assert!(
            v >= expected * 0.9 - 0.01 && v <= expected * 1.1 + 0.01,
            "{year}: {v} outside ±10% of {expected}"
        );
        // two decimals
        assert!(((v * 100.0).round() - v * 100.0).abs() < 1e-6);
    }
}

#[tokio::test]
async fn growth_factors_follow_indicator() {
    for (code, country, base, growth) in [
        (mock::LIFE_EXPECTANCY, "JPN", 84.6, 1.003),
        (mock::UNEMPLOYMENT, "BRA", 12.3, 0.98),
        (mock::EDUCATION_EXPENDITURE, "GBR", 5.5, 1.01),
        ("XX.UNKNOWN", "DEU", 100.0, 1.01),
        (mock::GDP_PER_CAPITA, "ZZZ", 100.0, 1.02),
    ] {
        let pts = offline(3)
            .get_indicator_data(code, country, YearRange::new(2000, 2004))
            .await;
        assert_eq!(pts.len(), 5);
        for p in &pts {
            let expected: f64 = base * f64::powi(growth, p.year - 2000);
            let v = p.value.unwrap();
            assert!(v >= expected * 0.9 - 0.01 && v <= expected * 1.1 + 0.01);
        }
    }
}

#[tokio::test]
async fn unknown_indicator_and_country_names() {
    let pts = offline(5)
        .get_indicator_data("XX.UNKNOWN", "all", YearRange::new(2020, 2020))
        .await;
    assert_eq!(pts.len(), 1);
    assert_eq!(pts[0].indicator_name, "Unknown Indicator");
    assert_eq!(pts[0].country_name, "all");
}

#[tokio::test]
async fn inverted_range_yields_nothing() {
    let pts = offline(5)
        .get_indicator_data(mock::GDP_PER_CAPITA, "USA", YearRange::new(2023, 2010))
        .await;
    assert!(pts.is_empty());
}

#[tokio::test]
async fn convenience_wrappers_pick_indicator() {
    let p = offline(9);
    let r = YearRange::new(2015, 2016);
    assert_eq!(p.get_gdp_per_capita("IND", r).await[0].indicator_id, "NY.GDP.PCAP.CD");
    assert_eq!(p.get_life_expectancy("IND", r).await[0].indicator_id, "SP.DYN.LE00.IN");
    assert_eq!(p.get_unemployment_rate("IND", r).await[0].indicator_id, "SL.UEM.TOTL.ZS");
    assert_eq!(p.get_education_index("IND", r).await[0].indicator_id, "SE.XPD.TOTL.GD.ZS");
}

#[tokio::test]
async fn seeded_providers_agree() {
    let r = YearRange::new(2010, 2023);
    let a = offline(11).get_gdp_per_capita("CHN", r).await;
    let b = offline(11).get_gdp_per_capita("CHN", r).await;
    assert_eq!(a, b);
}
