use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::metrics::ranking::{average_precision, roc_auc};
use crate::records::Record;

/// Per-group counts and rates derived from one pass over the group's records.
/// Rates whose denominator can legitimately be zero are `Option` and stay
/// `None` rather than going NaN.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub group: String,
    pub count: usize,
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
    /// P(predicted = 1) within the group. Defined for every non-empty group.
    pub positive_rate: f64,
    /// TP / (TP + FN), `None` without positive-truth records.
    pub true_positive_rate: Option<f64>,
    /// FP / (FP + TN), `None` without negative-truth records.
    pub false_positive_rate: Option<f64>,
    /// FN / (FN + TP), complement of the TPR.
    pub false_negative_rate: Option<f64>,
    /// TP / (TP + FP), `None` when the group never predicts positive
    /// among records with ground truth.
    pub precision: Option<f64>,
    /// FN / FP, `None` when the group has no false positives.
    pub treatment_ratio: Option<f64>,
    /// Rank-based ROC-AUC over the group's scored records.
    pub roc_auc: Option<f64>,
    /// Average precision over the group's scored records.
    pub average_precision: Option<f64>,
}

fn ratio(num: usize, den: usize) -> Option<f64> {
    if den == 0 {
        None
    } else {
        Some(num as f64 / den as f64)
    }
}

fn fold_group(group: &str, members: &[&Record]) -> GroupStats {
    let count = members.len();
    let predicted_positive = members.iter().filter(|r| r.predicted == 1).count();

    let mut tp = 0;
    let mut fp = 0;
    let mut tn = 0;
    let mut fn_count = 0;
    for rec in members {
        if let Some(actual) = rec.actual {
            match (rec.predicted, actual) {
                (1, 1) => tp += 1,
                (1, 0) => fp += 1,
                (0, 0) => tn += 1,
                _ => fn_count += 1,
            }
        }
    }

    let scored: Vec<(f64, i64)> = members
        .iter()
        .filter_map(|r| match (r.score, r.actual) {
            (Some(s), Some(y)) => Some((s, y)),
            _ => None,
        })
        .collect();

    GroupStats {
        group: group.to_string(),
        count,
        true_positives: tp,
        false_positives: fp,
        true_negatives: tn,
        false_negatives: fn_count,
        positive_rate: predicted_positive as f64 / count as f64,
        true_positive_rate: ratio(tp, tp + fn_count),
        false_positive_rate: ratio(fp, fp + tn),
        false_negative_rate: ratio(fn_count, fn_count + tp),
        precision: ratio(tp, tp + fp),
        treatment_ratio: if fp == 0 {
            None
        } else {
            Some(fn_count as f64 / fp as f64)
        },
        roc_auc: roc_auc(&scored),
        average_precision: average_precision(&scored),
    }
}

/// Partition records by group and fold every partition into a `GroupStats`.
/// Groups come back sorted by identifier, so repeated runs over the same
/// input produce bit-identical output.
pub fn group_stats(records: &[Record]) -> Vec<GroupStats> {
    let mut partitions: BTreeMap<&str, Vec<&Record>> = BTreeMap::new();
    for rec in records {
        partitions.entry(rec.group.as_str()).or_default().push(rec);
    }
    partitions
        .iter()
        .map(|(group, members)| fold_group(group, members))
        .collect()
}
