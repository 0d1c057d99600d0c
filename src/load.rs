use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};

use crate::models::{ActivityRecord, DemographicRecord};

const DEMOGRAPHIC_COLUMNS: &[&str] = &[
    "id", "weight", "height", "gender", "race", "ethnic", "birthdate", "bmi",
];

const ACTIVITY_COLUMNS: &[&str] = &[
    "id", "Sedentary", "Light", "Moderate", "Vigorous", "Date", "Timepoint",
];

/// Loads the demographics table. Fails if the file is unreadable, a required
/// column is missing, or a row does not parse.
pub fn load_demographics(path: &Path) -> anyhow::Result<Vec<DemographicRecord>> {
    let reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open demographics table {}", path.display()))?;
    read_demographics(reader)
        .with_context(|| format!("failed to read demographics table {}", path.display()))
}

/// Loads the activity table with the same failure contract as
/// [`load_demographics`].
pub fn load_activity(path: &Path) -> anyhow::Result<Vec<ActivityRecord>> {
    let reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open activity table {}", path.display()))?;
    read_activity(reader).with_context(|| format!("failed to read activity table {}", path.display()))
}

fn read_demographics<R: Read>(mut reader: csv::Reader<R>) -> anyhow::Result<Vec<DemographicRecord>> {
    check_columns(&mut reader, DEMOGRAPHIC_COLUMNS)?;
    let mut records = Vec::new();
    for result in reader.deserialize::<DemographicRecord>() {
        records.push(result?);
    }
    Ok(records)
}

fn read_activity<R: Read>(mut reader: csv::Reader<R>) -> anyhow::Result<Vec<ActivityRecord>> {
    check_columns(&mut reader, ACTIVITY_COLUMNS)?;
    let mut records = Vec::new();
    for result in reader.deserialize::<ActivityRecord>() {
        records.push(result?);
    }
    Ok(records)
}

fn check_columns<R: Read>(reader: &mut csv::Reader<R>, expected: &[&str]) -> anyhow::Result<()> {
    let headers = reader.headers().context("failed to read header row")?;
    for column in expected {
        if !headers.iter().any(|h| h == *column) {
            bail!("missing required column '{column}'");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demographics_reader(data: &str) -> csv::Reader<&[u8]> {
        csv::Reader::from_reader(data.as_bytes())
    }

    #[test]
    fn parses_demographics_with_blank_fields() {
        let data = "id,weight,height,gender,race,ethnic,birthdate,bmi\n\
                    1,70.5,170,M,A,X,2000,24.4\n\
                    2,,,F,B,Y,,\n";
        let records = read_demographics(demographics_reader(data)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].weight, Some(70.5));
        assert_eq!(records[0].birthdate, Some(2000));
        assert_eq!(records[1].weight, None);
        assert_eq!(records[1].birthdate, None);
    }

    #[test]
    fn rejects_missing_column() {
        let data = "id,weight,height,gender,race,ethnic,bmi\n1,70,170,M,A,X,24\n";
        let err = read_demographics(demographics_reader(data)).unwrap_err();
        assert!(err.to_string().contains("birthdate"));
    }

    #[test]
    fn parses_activity_rows() {
        let data = "id,Sedentary,Light,Moderate,Vigorous,Date,Timepoint\n\
                    1,100,50,,10,2013-06-01,T1\n\
                    1,120,40,30,,,T2\n";
        let records = read_activity(csv::Reader::from_reader(data.as_bytes())).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sedentary, Some(100.0));
        assert_eq!(records[0].moderate, None);
        assert_eq!(records[1].date, None);
        assert_eq!(records[1].timepoint.as_deref(), Some("T2"));
    }
}
