use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::metrics::groups::{group_stats, GroupStats};
use crate::records::{validate, InvalidInput, Record};

/// Whole-dataset fairness metrics. Every field is `None` when fewer than two
/// groups carry the rate it compares; with a single group present the whole
/// report is `None` by that rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FairnessReport {
    /// Max pairwise |positive rate difference|.
    pub demographic_parity_gap: Option<f64>,
    /// Max over group pairs of max(|TPR diff|, |FPR diff|). A group missing
    /// one of the rates is excluded from that rate's comparison only.
    pub equalized_odds_gap: Option<f64>,
    /// min / max positive rate, `None` when the max is zero.
    pub disparate_impact_ratio: Option<f64>,
    /// Max pairwise |FNR difference| (equal opportunity).
    pub equal_opportunity_gap: Option<f64>,
    /// Max pairwise |FPR difference| (predictive equality).
    pub predictive_equality_gap: Option<f64>,
    /// Max pairwise |precision difference| (predictive parity).
    pub predictive_parity_gap: Option<f64>,
    /// Max pairwise |0.5 * ((FPR_i - FPR_j) + (TPR_i - TPR_j))|.
    pub average_odds_difference: Option<f64>,
    /// Max pairwise |FN/FP ratio difference| (treatment equality).
    pub treatment_equality_gap: Option<f64>,
    /// Max pairwise |ROC-AUC difference| over groups with scored records.
    pub roc_auc_gap: Option<f64>,
    /// Max pairwise |average precision difference|.
    pub average_precision_gap: Option<f64>,
    /// The per-group statistics the metrics above were derived from.
    pub groups: Vec<GroupStats>,
}

fn max_pairwise_gap(rates: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let defined: Vec<f64> = rates.flatten().collect();
    if defined.len() < 2 {
        return None;
    }
    defined
        .iter()
        .tuple_combinations()
        .map(|(a, b)| (a - b).abs())
        .fold(None, |acc: Option<f64>, gap| {
            Some(acc.map_or(gap, |m| m.max(gap)))
        })
}

fn disparate_impact(groups: &[GroupStats]) -> Option<f64> {
    if groups.len() < 2 {
        return None;
    }
    let min = groups
        .iter()
        .map(|g| g.positive_rate)
        .fold(f64::INFINITY, f64::min);
    let max = groups
        .iter()
        .map(|g| g.positive_rate)
        .fold(f64::NEG_INFINITY, f64::max);
    if max == 0.0 {
        None
    } else {
        Some(min / max)
    }
}

fn average_odds(groups: &[GroupStats]) -> Option<f64> {
    // Needs both rates on both sides of every compared pair.
    let defined: Vec<(f64, f64)> = groups
        .iter()
        .filter_map(|g| match (g.true_positive_rate, g.false_positive_rate) {
            (Some(tpr), Some(fpr)) => Some((tpr, fpr)),
            _ => None,
        })
        .collect();
    if defined.len() < 2 {
        return None;
    }
    defined
        .iter()
        .tuple_combinations()
        .map(|((tpr_a, fpr_a), (tpr_b, fpr_b))| {
            (0.5 * ((fpr_a - fpr_b) + (tpr_a - tpr_b))).abs()
        })
        .fold(None, |acc: Option<f64>, gap| {
            Some(acc.map_or(gap, |m| m.max(gap)))
        })
}

fn report_from_stats(groups: Vec<GroupStats>) -> FairnessReport {
    let tpr_gap = max_pairwise_gap(groups.iter().map(|g| g.true_positive_rate));
    let fpr_gap = max_pairwise_gap(groups.iter().map(|g| g.false_positive_rate));
    let equalized_odds_gap = match (tpr_gap, fpr_gap) {
        (Some(t), Some(f)) => Some(t.max(f)),
        (Some(t), None) => Some(t),
        (None, Some(f)) => Some(f),
        (None, None) => None,
    };

    FairnessReport {
        demographic_parity_gap: max_pairwise_gap(
            groups.iter().map(|g| Some(g.positive_rate)),
        ),
        equalized_odds_gap,
        disparate_impact_ratio: disparate_impact(&groups),
        equal_opportunity_gap: max_pairwise_gap(groups.iter().map(|g| g.false_negative_rate)),
        predictive_equality_gap: fpr_gap,
        predictive_parity_gap: max_pairwise_gap(groups.iter().map(|g| g.precision)),
        average_odds_difference: average_odds(&groups),
        treatment_equality_gap: max_pairwise_gap(groups.iter().map(|g| g.treatment_ratio)),
        roc_auc_gap: max_pairwise_gap(groups.iter().map(|g| g.roc_auc)),
        average_precision_gap: max_pairwise_gap(groups.iter().map(|g| g.average_precision)),
        groups,
    }
}

/// Evaluate fairness over `records`, with the subgroup set inferred from the
/// distinct group values present.
pub fn evaluate(records: &[Record]) -> Result<FairnessReport, InvalidInput> {
    validate(records, None)?;
    Ok(report_from_stats(group_stats(records)))
}

/// Evaluate against a caller-supplied reference group set. Records whose
/// group is outside the set are rejected as invalid input.
pub fn evaluate_with_groups(
    records: &[Record],
    reference: &[String],
) -> Result<FairnessReport, InvalidInput> {
    validate(records, Some(reference))?;
    Ok(report_from_stats(group_stats(records)))
}
