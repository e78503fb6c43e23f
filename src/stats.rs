use crate::models::{GroupKey, HappinessRecord, IndicatorObservation, RegionalAggregate};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics for one indicator series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub key: GroupKey,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Compute statistics grouped by (indicator_id, country_code).
pub fn series_summary(points: &[IndicatorObservation]) -> Vec<Summary> {
    let mut groups: BTreeMap<GroupKey, (Vec<f64>, usize)> = BTreeMap::new();
    for p in points {
        let key = GroupKey {
            indicator_id: p.indicator_id.clone(),
            country_code: p.country_code.clone(),
        };
        let slot = groups.entry(key).or_default();
        match p.value {
            Some(v) if v.is_finite() => slot.0.push(v),
            _ => slot.1 += 1,
        }
    }

    groups
        .into_iter()
        .map(|(key, (mut vals, missing))| {
            vals.sort_by(f64::total_cmp);
            let count = vals.len();
            let mean = (count > 0).then(|| vals.iter().sum::<f64>() / count as f64);
            let median = match count {
                0 => None,
                n if n % 2 == 1 => Some(vals[n / 2]),
                n => Some((vals[n / 2 - 1] + vals[n / 2]) / 2.0),
            };
            Summary {
                key,
                count,
                missing,
                min: vals.first().copied(),
                max: vals.last().copied(),
                mean,
                median,
            }
        })
        .collect()
}

/// Group happiness records by region, in the order regions first appear.
pub fn regional_summary(records: &[HappinessRecord]) -> Vec<RegionalAggregate> {
    let mut index: AHashMap<&str, usize> = AHashMap::new();
    let mut out: Vec<(f64, RegionalAggregate)> = Vec::new();
    for r in records {
        let slot = *index.entry(r.region.as_str()).or_insert_with(|| {
            out.push((
                0.0,
                RegionalAggregate {
                    region: r.region.clone(),
                    average_happiness: 0.0,
                    country_count: 0,
                    countries: Vec::new(),
                },
            ));
            out.len() - 1
        });
        let (total, agg) = &mut out[slot];
        *total += r.happiness_score;
        agg.country_count += 1;
        agg.countries.push(r.clone());
    }

    out.into_iter()
        .map(|(total, mut agg)| {
            agg.average_happiness = total / agg.country_count as f64;
            agg
        })
        .collect()
}
