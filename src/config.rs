use serde::{Deserialize, Serialize};

/// Column names binding a tabular input to the record fields. Names are
/// configuration, not contract; the defaults match the demo tables.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub group: String,
    pub predicted: String,
    /// Ground-truth column, skipped when absent from the table.
    pub actual: Option<String>,
    /// Predicted-probability column, skipped when absent from the table.
    pub score: Option<String>,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            group: "group".to_string(),
            predicted: "predicted".to_string(),
            actual: Some("actual".to_string()),
            score: Some("score".to_string()),
        }
    }
}

impl ColumnSpec {
    pub fn with_group_column(mut self, name: &str) -> Self {
        self.group = name.to_string();
        self
    }
}
