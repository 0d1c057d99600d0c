use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::load;
use crate::models::{ActivityRecord, DemographicRecord, MergedRecord};

/// The merged table: built once at startup, immutable, passed by reference
/// into every filter and aggregation call.
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Vec<MergedRecord>,
}

impl Dataset {
    pub fn load(demo_path: &Path, activity_path: &Path, reference_year: i32) -> anyhow::Result<Self> {
        let demographics = load::load_demographics(demo_path)?;
        let activity = load::load_activity(activity_path)?;
        Ok(Self::from_tables(&demographics, &activity, reference_year))
    }

    pub fn from_tables(
        demographics: &[DemographicRecord],
        activity: &[ActivityRecord],
        reference_year: i32,
    ) -> Self {
        let mut rows = merge(demographics, activity);
        derive_age(&mut rows, reference_year);
        Self { rows }
    }

    pub fn rows(&self) -> &[MergedRecord] {
        &self.rows
    }

    /// Distinct non-null values of a categorical field, for widget population.
    pub fn distinct_values<F>(&self, field: F) -> BTreeSet<String>
    where
        F: Fn(&MergedRecord) -> Option<&str>,
    {
        self.rows
            .iter()
            .filter_map(|row| field(row).map(str::to_string))
            .collect()
    }

    pub fn genders(&self) -> BTreeSet<String> {
        self.distinct_values(|row| row.gender.as_deref())
    }

    pub fn races(&self) -> BTreeSet<String> {
        self.distinct_values(|row| row.race.as_deref())
    }

    pub fn ethnicities(&self) -> BTreeSet<String> {
        self.distinct_values(|row| row.ethnic.as_deref())
    }

    /// Observed (min, max) age across all rows, or `None` when every age is
    /// null. Used for the age slider bounds.
    pub fn age_range(&self) -> Option<(i32, i32)> {
        let mut ages = self.rows.iter().filter_map(|row| row.age);
        let first = ages.next()?;
        Some(ages.fold((first, first), |(lo, hi), age| (lo.min(age), hi.max(age))))
    }
}

/// Left outer join of activity records onto demographics by subject id.
/// Every activity record yields exactly one output row; unmatched rows keep
/// all demographic fields null. A duplicated id in the demographics table is
/// a data-quality problem: the first occurrence wins and a warning is logged.
pub fn merge(demographics: &[DemographicRecord], activity: &[ActivityRecord]) -> Vec<MergedRecord> {
    let mut by_id: HashMap<i64, &DemographicRecord> = HashMap::with_capacity(demographics.len());
    for record in demographics {
        if by_id.contains_key(&record.id) {
            log::warn!(
                "duplicate subject id {} in demographics table, keeping first occurrence",
                record.id
            );
            continue;
        }
        by_id.insert(record.id, record);
    }

    activity
        .iter()
        .map(|act| {
            let demo = by_id.get(&act.id);
            MergedRecord {
                id: act.id,
                sedentary: act.sedentary,
                light: act.light,
                moderate: act.moderate,
                vigorous: act.vigorous,
                date: act.date,
                timepoint: act.timepoint.clone(),
                weight: demo.and_then(|d| d.weight),
                height: demo.and_then(|d| d.height),
                gender: demo.and_then(|d| d.gender.clone()),
                race: demo.and_then(|d| d.race.clone()),
                ethnic: demo.and_then(|d| d.ethnic.clone()),
                birthdate: demo.and_then(|d| d.birthdate),
                bmi: demo.and_then(|d| d.bmi),
                age: None,
            }
        })
        .collect()
}

/// Computes `age = reference_year - birthdate` for every row; null birthdate
/// stays null. The reference year is fixed configuration, never wall clock.
pub fn derive_age(rows: &mut [MergedRecord], reference_year: i32) {
    for row in rows {
        row.age = row.birthdate.map(|year| reference_year - year);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_demo(id: i64, race: &str, birthdate: Option<i32>) -> DemographicRecord {
        DemographicRecord {
            id,
            weight: Some(70.0),
            height: Some(170.0),
            gender: Some("M".to_string()),
            race: Some(race.to_string()),
            ethnic: Some("X".to_string()),
            birthdate,
            bmi: Some(24.2),
        }
    }

    fn sample_activity(id: i64, timepoint: &str) -> ActivityRecord {
        ActivityRecord {
            id,
            sedentary: Some(100.0),
            light: Some(50.0),
            moderate: Some(20.0),
            vigorous: Some(10.0),
            date: None,
            timepoint: Some(timepoint.to_string()),
        }
    }

    #[test]
    fn every_activity_row_survives_the_join() {
        let demographics = vec![sample_demo(1, "A", Some(2000))];
        let activity = vec![
            sample_activity(1, "T1"),
            sample_activity(1, "T2"),
            sample_activity(9, "T1"),
        ];
        let merged = merge(&demographics, &activity);
        assert_eq!(merged.len(), activity.len());
    }

    #[test]
    fn unmatched_rows_keep_demographics_null() {
        let demographics = vec![sample_demo(1, "A", Some(2000))];
        let activity = vec![sample_activity(7, "T1")];
        let merged = merge(&demographics, &activity);
        assert_eq!(merged[0].id, 7);
        assert_eq!(merged[0].weight, None);
        assert_eq!(merged[0].race, None);
        assert_eq!(merged[0].birthdate, None);
        assert_eq!(merged[0].sedentary, Some(100.0));
    }

    #[test]
    fn duplicate_subject_id_resolves_to_first_match() {
        let mut second = sample_demo(1, "B", Some(1990));
        second.weight = Some(99.0);
        let demographics = vec![sample_demo(1, "A", Some(2000)), second];
        let activity = vec![sample_activity(1, "T1")];
        let merged = merge(&demographics, &activity);
        assert_eq!(merged[0].race.as_deref(), Some("A"));
        assert_eq!(merged[0].weight, Some(70.0));
    }

    #[test]
    fn age_follows_birthdate_exactly() {
        let demographics = vec![sample_demo(1, "A", Some(2000)), sample_demo(2, "B", None)];
        let activity = vec![sample_activity(1, "T1"), sample_activity(2, "T1")];
        let mut merged = merge(&demographics, &activity);
        derive_age(&mut merged, 2024);
        assert_eq!(merged[0].age, Some(24));
        assert_eq!(merged[1].age, None);
    }

    #[test]
    fn dataset_exposes_widget_bounds() {
        let demographics = vec![sample_demo(1, "A", Some(2000)), sample_demo(2, "B", Some(1980))];
        let activity = vec![sample_activity(1, "T1"), sample_activity(2, "T2")];
        let dataset = Dataset::from_tables(&demographics, &activity, 2024);
        assert_eq!(dataset.age_range(), Some((24, 44)));
        let races: Vec<String> = dataset.races().into_iter().collect();
        assert_eq!(races, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn age_range_is_none_when_all_birthdates_missing() {
        let demographics = vec![sample_demo(1, "A", None)];
        let activity = vec![sample_activity(1, "T1")];
        let dataset = Dataset::from_tables(&demographics, &activity, 2024);
        assert_eq!(dataset.age_range(), None);
    }
}
