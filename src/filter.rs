use std::collections::BTreeSet;

use crate::dataset::Dataset;
use crate::models::MergedRecord;

/// The current widget state: allowed categorical values plus a closed age
/// interval. Rebuilt per invocation, never stored.
#[derive(Debug, Clone)]
pub struct FilterSelection {
    pub genders: BTreeSet<String>,
    pub races: BTreeSet<String>,
    pub ethnicities: BTreeSet<String>,
    pub age_min: i32,
    pub age_max: i32,
}

impl FilterSelection {
    /// Default selection: every observed value of each categorical field and
    /// the full observed age range, so the filter starts out as a no-op.
    pub fn all(dataset: &Dataset) -> Self {
        let (age_min, age_max) = dataset.age_range().unwrap_or((0, 0));
        Self {
            genders: dataset.genders(),
            races: dataset.races(),
            ethnicities: dataset.ethnicities(),
            age_min,
            age_max,
        }
    }

    /// A row passes when its gender is null or selected, its race and
    /// ethnicity are selected, and its age is non-null and inside the
    /// interval. The null exemption applies to gender only: rows with a
    /// missing gender always pass that clause, while missing race, ethnicity,
    /// or age always fail theirs.
    pub fn matches(&self, row: &MergedRecord) -> bool {
        let gender_ok = match row.gender.as_deref() {
            None => true,
            Some(gender) => self.genders.contains(gender),
        };
        let race_ok = row
            .race
            .as_deref()
            .is_some_and(|race| self.races.contains(race));
        let ethnic_ok = row
            .ethnic
            .as_deref()
            .is_some_and(|ethnic| self.ethnicities.contains(ethnic));
        let age_ok = row
            .age
            .is_some_and(|age| self.age_min <= age && age <= self.age_max);
        gender_ok && race_ok && ethnic_ok && age_ok
    }

    /// Filtered view of the merged table. Inverted or out-of-range age bounds
    /// simply produce an empty result.
    pub fn apply(&self, dataset: &Dataset) -> Vec<MergedRecord> {
        dataset
            .rows()
            .iter()
            .filter(|row| self.matches(row))
            .cloned()
            .collect()
    }
}
