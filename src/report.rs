use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use crate::models::MergedRecord;
use crate::stats::{self, HistogramBin};

const HISTOGRAM_BINS: usize = 10;

/// One chart of a dashboard page: a keyed aggregate series, a histogram, or
/// the placeholder shown when every input value is null.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Series {
        title: String,
        points: BTreeMap<String, f64>,
    },
    Histogram {
        title: String,
        bins: Vec<HistogramBin>,
    },
    NoData {
        title: String,
        message: String,
    },
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Series { title, .. } | Chart::Histogram { title, .. } | Chart::NoData { title, .. } => title,
        }
    }
}

fn mean_chart<G, V>(title: &str, rows: &[MergedRecord], group: G, value: V, missing: &str) -> Chart
where
    G: Fn(&MergedRecord) -> Option<&str>,
    V: Fn(&MergedRecord) -> Option<f64>,
{
    let points = stats::grouped_mean(rows, group, value);
    if points.is_empty() {
        Chart::NoData {
            title: title.to_string(),
            message: missing.to_string(),
        }
    } else {
        Chart::Series {
            title: title.to_string(),
            points,
        }
    }
}

fn histogram_chart<V>(title: &str, rows: &[MergedRecord], value: V, missing: &str) -> Chart
where
    V: Fn(&MergedRecord) -> Option<f64>,
{
    let values = stats::distribution(rows, value);
    if values.is_empty() {
        Chart::NoData {
            title: title.to_string(),
            message: missing.to_string(),
        }
    } else {
        Chart::Histogram {
            title: title.to_string(),
            bins: stats::histogram(&values, HISTOGRAM_BINS),
        }
    }
}

/// Charts of the Demographics page, in display order.
pub fn demographics_page(rows: &[MergedRecord]) -> Vec<Chart> {
    vec![
        mean_chart(
            "Average Weight by Race",
            rows,
            |r| r.race.as_deref(),
            |r| r.weight,
            "No weight data available.",
        ),
        mean_chart(
            "Average Height by Race",
            rows,
            |r| r.race.as_deref(),
            |r| r.height,
            "No height data available.",
        ),
        mean_chart(
            "Average BMI by Gender",
            rows,
            |r| r.gender.as_deref(),
            |r| r.bmi,
            "No BMI data available.",
        ),
        mean_chart(
            "Average BMI by Ethnicity",
            rows,
            |r| r.ethnic.as_deref(),
            |r| r.bmi,
            "No BMI data available.",
        ),
        mean_chart(
            "Average BMI by Race",
            rows,
            |r| r.race.as_deref(),
            |r| r.bmi,
            "No BMI data available.",
        ),
        histogram_chart(
            "BMI Distribution",
            rows,
            |r| r.bmi,
            "No BMI data available.",
        ),
    ]
}

/// Charts of the Physical Activity page, in display order.
pub fn activity_page(rows: &[MergedRecord]) -> Vec<Chart> {
    let minutes: [(&str, fn(&MergedRecord) -> Option<f64>); 4] = [
        ("Sedentary", |r| r.sedentary),
        ("Light", |r| r.light),
        ("Moderate", |r| r.moderate),
        ("Vigorous", |r| r.vigorous),
    ];

    let mut charts = Vec::new();
    for (label, value) in minutes {
        charts.push(mean_chart(
            &format!("Average {label} Minutes by Timepoint"),
            rows,
            |r| r.timepoint.as_deref(),
            value,
            &format!("No {label} Activity data available."),
        ));
    }
    for (label, value) in minutes {
        charts.push(histogram_chart(
            &format!("Distribution of {label} Activity Minutes"),
            rows,
            value,
            &format!("No {label} Activity data available."),
        ));
    }
    charts
}

/// Renders a page as markdown, one section per chart.
pub fn render_markdown(page_title: &str, row_count: usize, charts: &[Chart]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# {page_title}");
    let _ = writeln!(output, "{row_count} records after filtering.");

    for chart in charts {
        let _ = writeln!(output);
        let _ = writeln!(output, "## {}", chart.title());
        match chart {
            Chart::Series { points, .. } => {
                for (key, mean) in points {
                    let _ = writeln!(output, "- {key}: {mean:.2}");
                }
            }
            Chart::Histogram { bins, .. } => {
                for bin in bins {
                    let _ = writeln!(output, "- [{:.2}, {:.2}): {}", bin.lower, bin.upper, bin.count);
                }
            }
            Chart::NoData { message, .. } => {
                let _ = writeln!(output, "{message}");
            }
        }
    }

    output
}
