//! Default activities and sub-activities used to seed a new worksheet.

use crate::models::{BandLevel, LineItem, DEFAULT_MARGIN, DEFAULT_SEED_HOURS};

/// Number of top-level activities in the default catalog.
pub const ACTIVITY_COUNT: usize = 10;

/// Sub-activity given to an activity that has no catalog entry.
pub const GENERAL_TASK: &str = "General Task";

const SUB_ACTIVITIES: &[(&str, &[&str])] = &[
    (
        "Activity 1",
        &["Design Phase", "Risk Assessment", "Documentation"],
    ),
    ("Activity 2", &["Data Collection", "Patient Recruitment"]),
    ("Activity 3", &["Trial Monitoring", "Reporting"]),
    ("Activity 4", &["Data Analysis", "Validation"]),
    ("Activity 5", &["Regulatory Submission", "Compliance Check"]),
    ("Activity 6", &["Protocol Design"]),
    ("Activity 7", &["Site Selection", "Setup"]),
    ("Activity 8", &["Staff Training", "Ethics Review"]),
    ("Activity 9", &["Budget Planning", "Approval Processes"]),
    ("Activity 10", &["Audit and Quality Control"]),
];

/// Activity names in display order: `Activity 1` through `Activity 10`.
pub fn activities() -> Vec<String> {
    (1..=ACTIVITY_COUNT).map(|i| format!("Activity {}", i)).collect()
}

/// Catalog sub-activities for `activity`, or a single [`GENERAL_TASK`] when
/// the activity has no entry.
pub fn sub_activities(activity: &str) -> &'static [&'static str] {
    SUB_ACTIVITIES
        .iter()
        .find(|(name, _)| *name == activity)
        .map(|(_, subs)| *subs)
        .unwrap_or(&[GENERAL_TASK])
}

/// One row per (activity, sub-activity) pair, all at `default_band`,
/// [`DEFAULT_SEED_HOURS`] and [`DEFAULT_MARGIN`].
pub fn seed_rows(default_band: &BandLevel) -> Vec<LineItem> {
    activities()
        .into_iter()
        .flat_map(|activity| {
            sub_activities(&activity)
                .iter()
                .map(move |sub| LineItem {
                    activity: activity.clone(),
                    sub_activity: (*sub).to_string(),
                    band_level: default_band.clone(),
                    hours: DEFAULT_SEED_HOURS,
                    margin: DEFAULT_MARGIN,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_one_row_per_catalog_sub_activity() {
        let rows = seed_rows(&"Band 1 - Junior Analyst".into());
        let expected: usize = SUB_ACTIVITIES.iter().map(|(_, subs)| subs.len()).sum();
        assert_eq!(rows.len(), expected);
        assert_eq!(rows.len(), 19);
        assert_eq!(rows[0].activity, "Activity 1");
        assert_eq!(rows[0].sub_activity, "Design Phase");
        assert_eq!(rows[18].activity, "Activity 10");
        assert_eq!(rows[18].sub_activity, "Audit and Quality Control");
    }

    #[test]
    fn seeded_rows_use_defaults() {
        for row in seed_rows(&"Band 1 - Junior Analyst".into()) {
            assert_eq!(row.band_level.as_str(), "Band 1 - Junior Analyst");
            assert_eq!(row.hours, 10.0);
            assert_eq!(row.margin, 0.25);
        }
    }

    #[test]
    fn unknown_activity_gets_general_task() {
        assert_eq!(sub_activities("Activity 42"), &["General Task"]);
    }
}
