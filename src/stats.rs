use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::MergedRecord;

/// One bar of an equal-width histogram over `[lower, upper)`; the last bin is
/// closed on both ends.
#[derive(Debug, Clone, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Mean of `value` per `group` key, ignoring rows where the value is null.
/// Rows with a null group key are skipped, and a group whose values are all
/// null is omitted rather than reported as NaN. An empty map therefore means
/// "no data" and the caller renders a placeholder instead of a chart.
pub fn grouped_mean<G, V>(rows: &[MergedRecord], group: G, value: V) -> BTreeMap<String, f64>
where
    G: Fn(&MergedRecord) -> Option<&str>,
    V: Fn(&MergedRecord) -> Option<f64>,
{
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for row in rows {
        let (Some(key), Some(value)) = (group(row), value(row)) else {
            continue;
        };
        let entry = sums.entry(key.to_string()).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(key, (total, count))| (key, total / count as f64))
        .collect()
}

/// All non-null values of a field, in table order so binning is reproducible.
pub fn distribution<V>(rows: &[MergedRecord], value: V) -> Vec<f64>
where
    V: Fn(&MergedRecord) -> Option<f64>,
{
    rows.iter().filter_map(value).collect()
}

/// Equal-width histogram over `[min, max]` of `values`. When every value is
/// identical the range is degenerate and the whole distribution lands in one
/// bin. Empty input yields no bins, the "no data" signal.
pub fn histogram(values: &[f64], bin_count: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bin_count == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bin_count as f64;
    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for &value in values {
        let index = (((value - min) / width) as usize).min(bin_count - 1);
        bins[index].count += 1;
    }

    bins
}
