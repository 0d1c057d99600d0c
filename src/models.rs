use chrono::NaiveDate;
use serde::Deserialize;

/// One row of the demographics table. `id` is meant to be unique per subject.
#[derive(Debug, Clone, Deserialize)]
pub struct DemographicRecord {
    pub id: i64,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub gender: Option<String>,
    pub race: Option<String>,
    pub ethnic: Option<String>,
    pub birthdate: Option<i32>,
    pub bmi: Option<f64>,
}

/// One row of the activity table: one record per (subject, timepoint).
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityRecord {
    pub id: i64,
    #[serde(rename = "Sedentary")]
    pub sedentary: Option<f64>,
    #[serde(rename = "Light")]
    pub light: Option<f64>,
    #[serde(rename = "Moderate")]
    pub moderate: Option<f64>,
    #[serde(rename = "Vigorous")]
    pub vigorous: Option<f64>,
    #[serde(rename = "Date")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "Timepoint")]
    pub timepoint: Option<String>,
}

/// An activity record with the matching subject's demographics attached.
/// All demographic fields are `None` when the subject id has no match
/// (left-join semantics: every activity record survives). `age` is derived
/// once at load time from the configured reference year.
#[derive(Debug, Clone)]
pub struct MergedRecord {
    pub id: i64,
    pub sedentary: Option<f64>,
    pub light: Option<f64>,
    pub moderate: Option<f64>,
    pub vigorous: Option<f64>,
    pub date: Option<NaiveDate>,
    pub timepoint: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub gender: Option<String>,
    pub race: Option<String>,
    pub ethnic: Option<String>,
    pub birthdate: Option<i32>,
    pub bmi: Option<f64>,
    pub age: Option<i32>,
}
