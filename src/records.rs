use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// One evaluated instance: what the model said, what actually happened,
/// and which demographic subgroup the instance belongs to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub group: String,
    /// Predicted binary outcome, must be 0 or 1.
    pub predicted: i64,
    /// Ground-truth binary outcome. Not needed for demographic parity.
    pub actual: Option<i64>,
    /// Predicted probability, used for the ranking metrics (ROC-AUC,
    /// average precision) when present.
    #[serde(default)]
    pub score: Option<f64>,
}

impl Record {
    pub fn new(group: impl Into<String>, predicted: i64, actual: Option<i64>) -> Self {
        Self {
            group: group.into(),
            predicted,
            actual,
            score: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum InvalidInput {
    #[error("no records to evaluate")]
    Empty,
    #[error("record {index}: {field} label is {value}, labels must be 0 or 1")]
    BadLabel {
        index: usize,
        field: &'static str,
        value: i64,
    },
    #[error("record {index}: group {group:?} is not in the reference group set")]
    UnknownGroup { index: usize, group: String },
}

/// Check the whole collection up front: non-empty, binary labels, and (when a
/// reference set is given) no stray group values. Fails on the first offender,
/// nothing is computed from a bad input.
pub fn validate(records: &[Record], reference: Option<&[String]>) -> Result<(), InvalidInput> {
    if records.is_empty() {
        return Err(InvalidInput::Empty);
    }

    let known: Option<HashSet<&str>> =
        reference.map(|groups| groups.iter().map(|g| g.as_str()).collect());

    for (index, rec) in records.iter().enumerate() {
        if rec.predicted != 0 && rec.predicted != 1 {
            return Err(InvalidInput::BadLabel {
                index,
                field: "predicted",
                value: rec.predicted,
            });
        }
        if let Some(actual) = rec.actual {
            if actual != 0 && actual != 1 {
                return Err(InvalidInput::BadLabel {
                    index,
                    field: "actual",
                    value: actual,
                });
            }
        }
        if let Some(known) = &known {
            if !known.contains(rec.group.as_str()) {
                return Err(InvalidInput::UnknownGroup {
                    index,
                    group: rec.group.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(validate(&[], None), Err(InvalidInput::Empty));
    }

    #[test]
    fn out_of_range_predicted_label_is_rejected() {
        let recs = vec![
            Record::new("A", 1, Some(1)),
            Record::new("A", 2, Some(0)),
        ];
        assert_eq!(
            validate(&recs, None),
            Err(InvalidInput::BadLabel {
                index: 1,
                field: "predicted",
                value: 2,
            })
        );
    }

    #[test]
    fn out_of_range_actual_label_is_rejected() {
        let recs = vec![Record::new("A", 0, Some(-1))];
        assert_eq!(
            validate(&recs, None),
            Err(InvalidInput::BadLabel {
                index: 0,
                field: "actual",
                value: -1,
            })
        );
    }

    #[test]
    fn group_outside_reference_set_is_rejected() {
        let recs = vec![Record::new("C", 1, None)];
        let reference = vec!["A".to_string(), "B".to_string()];
        assert_eq!(
            validate(&recs, Some(&reference)),
            Err(InvalidInput::UnknownGroup {
                index: 0,
                group: "C".to_string(),
            })
        );
    }

    #[test]
    fn missing_actual_is_fine() {
        let recs = vec![Record::new("A", 1, None), Record::new("B", 0, None)];
        assert_eq!(validate(&recs, None), Ok(()));
    }
}
