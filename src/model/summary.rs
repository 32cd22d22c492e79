//! Dataset summary models
//!
//! The backend manages two tabular datasets: sample metadata and the
//! gene-expression matrix. A summary for either is absent until the data
//! has been loaded server-side, and is replaced wholesale on every
//! successful load, upload, filter, or reset.

use serde::Deserialize;

/// One of the two logical datasets the backend manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Metadata,
    Expression,
}

impl DatasetKind {
    pub fn all() -> [DatasetKind; 2] {
        [DatasetKind::Metadata, DatasetKind::Expression]
    }

    /// Name used in endpoint paths (`view_{name}_data`)
    pub fn name(&self) -> &'static str {
        match self {
            DatasetKind::Metadata => "metadata",
            DatasetKind::Expression => "expression",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DatasetKind::Metadata => "Metadata",
            DatasetKind::Expression => "Expression Data",
        }
    }

    /// How the rows/columns of this dataset are described to the user
    pub fn column_label(&self) -> &'static str {
        match self {
            DatasetKind::Metadata => "columns",
            DatasetKind::Expression => "genes",
        }
    }
}

/// Summary of one loaded dataset as reported by the backend
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSummary {
    /// (rows, columns)
    pub shape: (u64, u64),
    #[serde(default)]
    pub missing_values: u64,
    #[serde(default)]
    pub duplicates: u64,
    #[serde(default)]
    pub columns: Vec<String>,
    /// Server-rendered preview of the first rows
    #[serde(default)]
    pub preview: String,
}

/// Response of the summary endpoint; either dataset may be absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryResponse {
    pub metadata: Option<DatasetSummary>,
    pub expression: Option<DatasetSummary>,
}

impl SummaryResponse {
    pub fn is_empty(&self) -> bool {
        self.metadata.is_none() && self.expression.is_none()
    }

    pub fn get(&self, kind: DatasetKind) -> Option<&DatasetSummary> {
        match kind {
            DatasetKind::Metadata => self.metadata.as_ref(),
            DatasetKind::Expression => self.expression.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_deserializes_shape_array() {
        let json = r#"{
            "metadata": {
                "shape": [120, 14],
                "missing_values": 3,
                "duplicates": 0,
                "columns": ["sample_id", "grade"],
                "preview": "| sample_id | grade |"
            }
        }"#;
        let summary: SummaryResponse = serde_json::from_str(json).unwrap();
        let metadata = summary.metadata.unwrap();
        assert_eq!(metadata.shape, (120, 14));
        assert_eq!(metadata.columns.len(), 2);
        assert!(summary.expression.is_none());
    }

    #[test]
    fn test_empty_summary() {
        let summary: SummaryResponse = serde_json::from_str("{}").unwrap();
        assert!(summary.is_empty());
        assert!(summary.get(DatasetKind::Metadata).is_none());
        assert!(summary.get(DatasetKind::Expression).is_none());
    }
}
