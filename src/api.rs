//! Async client for the **World Bank API (v2)**.
//!
//! Covers the two endpoints the indicator provider needs:
//! - `countries` listing (country metadata with region and income level)
//! - `countries/{code}/indicators/{code}` observations, paginated
//!
//! Both return `[Meta, [item, ...]]` on success and `[{"message": ...}]` on an
//! API-level error. Requests go through the [`JsonSource`] trait so callers can
//! swap the network for a canned or failing source.
//!
//! There is no retry: a failed request is reported once and the caller decides
//! what to substitute.

use crate::error::FetchError;
use crate::models::{Country, Entry, IndicatorObservation, Meta, YearRange};
use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use serde_json::Value;
use std::time::Duration;

/// Anything that can answer a GET with a JSON document.
///
/// `path` is relative to the source's base URL and includes the query string.
#[async_trait]
pub trait JsonSource: Send + Sync {
    async fn get_json(&self, path: &str) -> Result<Value, FetchError>;
}

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .redirect(Policy::limited(5))
            .default_headers(headers)
            .user_agent(concat!("happilens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl JsonSource for Client {
    async fn get_json(&self, path: &str) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }
        resp.json::<Value>()
            .await
            .map_err(|e| FetchError::malformed(&url, format!("decode json: {e}")))
    }
}

// Allow -, _, . unescaped in codes (common for indicator ids)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc(segment: &str) -> String {
    percent_encoding::utf8_percent_encode(segment.trim(), SAFE).to_string()
}

/// Split a World Bank payload into its meta block and (possibly absent) data array.
fn split_payload<'a>(v: &'a Value, path: &str) -> Result<(Meta, Option<&'a Value>), FetchError> {
    let arr = v
        .as_array()
        .ok_or_else(|| FetchError::malformed(path, "not a top-level array"))?;
    let head = arr
        .first()
        .ok_or_else(|| FetchError::malformed(path, "empty array"))?;
    if let Some(message) = head.get("message") {
        return Err(FetchError::Api(message.to_string()));
    }
    let meta: Meta = serde_json::from_value(head.clone())
        .map_err(|e| FetchError::malformed(path, format!("parse meta: {e}")))?;
    let data = arr.get(1).filter(|d| !d.is_null());
    Ok((meta, data))
}

pub fn countries_path() -> String {
    "/countries?format=json&per_page=300".to_string()
}

pub fn indicator_path(indicator: &str, country: &str, range: YearRange, page: u32) -> String {
    format!(
        "/countries/{}/indicators/{}?format=json&date={}&per_page=1000&page={}",
        enc(country),
        enc(indicator),
        range.to_query_param(),
        page
    )
}

/// Fetch the country listing. A response without any countries counts as malformed.
pub async fn fetch_countries(source: &dyn JsonSource) -> Result<Vec<Country>, FetchError> {
    let path = countries_path();
    let v = source.get_json(&path).await?;
    let (_meta, data) = split_payload(&v, &path)?;
    let data = data.ok_or_else(|| FetchError::malformed(&path, "missing country array"))?;
    let countries: Vec<Country> = serde_json::from_value(data.clone())
        .map_err(|e| FetchError::malformed(&path, format!("parse countries: {e}")))?;
    if countries.is_empty() {
        return Err(FetchError::malformed(&path, "no countries returned"));
    }
    Ok(countries)
}

/// Fetch every page of one indicator for one country code (or `all`).
pub async fn fetch_indicator(
    source: &dyn JsonSource,
    indicator: &str,
    country: &str,
    range: YearRange,
) -> Result<Vec<IndicatorObservation>, FetchError> {
    // Safety cap to avoid pathological jobs
    let max_pages = 1000u32;

    let mut page = 1u32;
    let mut out = Vec::new();
    loop {
        let path = indicator_path(indicator, country, range, page);
        let v = source.get_json(&path).await?;
        let (meta, data) = split_payload(&v, &path)?;
        let Some(data) = data else {
            break;
        };
        let entries: Vec<Entry> = serde_json::from_value(data.clone())
            .map_err(|e| FetchError::malformed(&path, format!("parse entries: {e}")))?;
        out.extend(entries.into_iter().map(IndicatorObservation::from));

        if page >= meta.pages || page >= max_pages {
            break;
        }
        page += 1;
    }
    Ok(out)
}
