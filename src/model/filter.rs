//! Filter-building state machine
//!
//! A filter session walks `Idle -> ColumnSelected -> ValuesLoaded ->
//! Applied`, or back to `Idle` on cancel. At most one session is open at a
//! time: choosing another column silently discards the previous one.

use std::collections::BTreeSet;

use serde::Deserialize;

/// How many distinct values are offered for interactive selection
pub const VALUE_DISPLAY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterPhase {
    #[default]
    Idle,
    ColumnSelected,
    ValuesLoaded,
    Applied,
}

/// Distinct values of a column with their sample counts (parallel arrays)
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnValues {
    pub values: Vec<String>,
    pub counts: Vec<u64>,
}

/// The in-progress state of building a column-value filter
#[derive(Debug, Default)]
pub struct FilterSession {
    pub phase: FilterPhase,
    pub column: Option<String>,
    /// First [`VALUE_DISPLAY_LIMIT`] (value, count) pairs
    pub values: Vec<(String, u64)>,
    /// True number of distinct values in the column
    pub total_values: usize,
    /// Indices into `values` currently checked
    pub selected: BTreeSet<usize>,
}

impl FilterSession {
    /// Begin a session for `column`, discarding any previous session
    pub fn select_column(&mut self, column: &str) {
        *self = FilterSession {
            phase: FilterPhase::ColumnSelected,
            column: Some(column.to_string()),
            ..FilterSession::default()
        };
    }

    /// Record the distinct-values response, keeping the first pairs only
    pub fn values_loaded(&mut self, response: ColumnValues) {
        self.total_values = response.values.len();
        self.values = response
            .values
            .into_iter()
            .zip(response.counts)
            .take(VALUE_DISPLAY_LIMIT)
            .collect();
        self.selected.clear();
        self.phase = FilterPhase::ValuesLoaded;
    }

    /// How many distinct values are not shown ("... and N more")
    pub fn hidden_values(&self) -> usize {
        self.total_values.saturating_sub(self.values.len())
    }

    pub fn toggle(&mut self, index: usize) {
        if index >= self.values.len() {
            return;
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
    }

    pub fn select_all(&mut self) {
        self.selected = (0..self.values.len()).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// `apply` is only valid with values loaded and at least one checked
    pub fn can_apply(&self) -> bool {
        self.phase == FilterPhase::ValuesLoaded && !self.selected.is_empty()
    }

    pub fn selected_values(&self) -> Vec<String> {
        self.selected
            .iter()
            .filter_map(|i| self.values.get(*i).map(|(v, _)| v.clone()))
            .collect()
    }

    /// Discard the session unconditionally
    pub fn cancel(&mut self) {
        *self = FilterSession::default();
    }

    /// A successful apply clears the session contents; the phase rests at
    /// `Applied` until a new column is chosen or the session is cancelled
    pub fn applied(&mut self) {
        *self = FilterSession {
            phase: FilterPhase::Applied,
            ..FilterSession::default()
        };
    }
}

/// Result of a successfully applied filter; the row subset it names is
/// exposed for download as the derived dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterOutcome {
    pub original_count: u64,
    pub filtered_count: u64,
    #[serde(default)]
    pub preview: String,
}

/// Metadata columns auto-detected for the clinical quick filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClinicalColumns {
    pub grade: Option<String>,
    pub idh: Option<String>,
    pub age: Option<String>,
}

/// Detect grade/IDH/age columns among the metadata column names.
///
/// Matching is by case-insensitive substring, first hit wins, in the
/// column order reported by the backend.
pub fn detect_clinical_columns(columns: &[String]) -> ClinicalColumns {
    let find = |needles: &[&str]| {
        columns
            .iter()
            .find(|col| {
                let lower = col.to_lowercase();
                needles.iter().any(|n| lower.contains(n))
            })
            .cloned()
    };

    ClinicalColumns {
        grade: find(&["grade", "tumor", "tissue_type", "sample_type"]),
        idh: find(&["idh", "mutation"]),
        age: find(&["age"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_session(column: &str, n_values: usize) -> FilterSession {
        let mut session = FilterSession::default();
        session.select_column(column);
        session.values_loaded(ColumnValues {
            values: (0..n_values).map(|i| format!("v{i}")).collect(),
            counts: (0..n_values as u64).collect(),
        });
        session
    }

    #[test]
    fn test_phases_advance_through_selection_and_load() {
        let mut session = FilterSession::default();
        assert_eq!(session.phase, FilterPhase::Idle);

        session.select_column("grade");
        assert_eq!(session.phase, FilterPhase::ColumnSelected);
        assert_eq!(session.column.as_deref(), Some("grade"));

        session.values_loaded(ColumnValues {
            values: vec!["II".into(), "III".into(), "IV".into()],
            counts: vec![10, 20, 30],
        });
        assert_eq!(session.phase, FilterPhase::ValuesLoaded);
        assert_eq!(session.values.len(), 3);
        assert_eq!(session.hidden_values(), 0);
    }

    #[test]
    fn test_only_first_ten_values_are_retained() {
        let session = loaded_session("site", 37);
        assert_eq!(session.values.len(), VALUE_DISPLAY_LIMIT);
        assert_eq!(session.total_values, 37);
        assert_eq!(session.hidden_values(), 27);
    }

    #[test]
    fn test_apply_requires_nonempty_selection() {
        let mut session = loaded_session("grade", 3);
        assert!(!session.can_apply());

        session.toggle(1);
        assert!(session.can_apply());
        assert_eq!(session.selected_values(), vec!["v1"]);

        session.toggle(1);
        assert!(!session.can_apply());
        // Phase is unchanged by a rejected apply attempt
        assert_eq!(session.phase, FilterPhase::ValuesLoaded);
    }

    #[test]
    fn test_selecting_new_column_discards_previous_session() {
        let mut session = loaded_session("grade", 5);
        session.toggle(0);
        session.toggle(2);

        session.select_column("idh_status");
        assert_eq!(session.phase, FilterPhase::ColumnSelected);
        assert_eq!(session.column.as_deref(), Some("idh_status"));
        assert!(session.values.is_empty());
        assert!(session.selected.is_empty());
    }

    #[test]
    fn test_apply_rests_at_applied_until_new_column() {
        let mut session = loaded_session("grade", 3);
        session.toggle(0);
        assert!(session.can_apply());

        session.applied();
        assert_eq!(session.phase, FilterPhase::Applied);
        assert!(session.values.is_empty());
        assert!(!session.can_apply());

        session.select_column("site");
        assert_eq!(session.phase, FilterPhase::ColumnSelected);
    }

    #[test]
    fn test_cancel_discards_unconditionally() {
        let mut session = loaded_session("grade", 5);
        session.toggle(0);
        session.cancel();
        assert_eq!(session.phase, FilterPhase::Idle);
        assert!(session.column.is_none());
        assert!(session.values.is_empty());
    }

    #[test]
    fn test_select_all_and_clear() {
        let mut session = loaded_session("grade", 4);
        session.select_all();
        assert_eq!(session.selected.len(), 4);
        session.clear_selection();
        assert!(session.selected.is_empty());
    }

    #[test]
    fn test_toggle_out_of_range_is_ignored() {
        let mut session = loaded_session("grade", 2);
        session.toggle(9);
        assert!(session.selected.is_empty());
    }

    #[test]
    fn test_detect_clinical_columns() {
        let columns: Vec<String> = ["sample_id", "Tumor_Grade", "IDH1_mutation", "age_at_diagnosis"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let detected = detect_clinical_columns(&columns);
        assert_eq!(detected.grade.as_deref(), Some("Tumor_Grade"));
        assert_eq!(detected.idh.as_deref(), Some("IDH1_mutation"));
        assert_eq!(detected.age.as_deref(), Some("age_at_diagnosis"));

        let none = detect_clinical_columns(&["sample_id".to_string()]);
        assert_eq!(none, ClinicalColumns::default());
    }
}
