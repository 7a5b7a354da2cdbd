use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use crate::metrics::fairness::FairnessReport;
use crate::metrics::groups::GroupStats;

fn fmt_rate(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.4}"),
        None => "n/a".to_string(),
    }
}

/// Per-group statistics as a terminal table.
pub fn group_table(groups: &[GroupStats]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "group", "count", "TP", "FP", "TN", "FN", "pos rate", "TPR", "FPR", "precision",
            "ROC-AUC",
        ]);
    for g in groups {
        table.add_row(vec![
            g.group.clone(),
            g.count.to_string(),
            g.true_positives.to_string(),
            g.false_positives.to_string(),
            g.true_negatives.to_string(),
            g.false_negatives.to_string(),
            fmt_rate(Some(g.positive_rate)),
            fmt_rate(g.true_positive_rate),
            fmt_rate(g.false_positive_rate),
            fmt_rate(g.precision),
            fmt_rate(g.roc_auc),
        ]);
    }
    table
}

/// The whole-dataset fairness metrics as a two-column table.
pub fn report_table(report: &FairnessReport) -> Table {
    let rows: [(&str, Option<f64>); 10] = [
        ("demographic parity gap", report.demographic_parity_gap),
        ("equalized odds gap", report.equalized_odds_gap),
        ("disparate impact ratio", report.disparate_impact_ratio),
        ("equal opportunity gap", report.equal_opportunity_gap),
        ("predictive equality gap", report.predictive_equality_gap),
        ("predictive parity gap", report.predictive_parity_gap),
        ("average odds difference", report.average_odds_difference),
        ("treatment equality gap", report.treatment_equality_gap),
        ("ROC-AUC gap", report.roc_auc_gap),
        ("average precision gap", report.average_precision_gap),
    ];

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["metric", "value"]);
    for (name, value) in rows {
        table.add_row(vec![name.to_string(), fmt_rate(value)]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fairness::evaluate;
    use crate::records::Record;

    #[test]
    fn undefined_metrics_render_as_na() {
        let recs = vec![Record::new("A", 1, None), Record::new("B", 0, None)];
        let report = evaluate(&recs).unwrap();
        let rendered = report_table(&report).to_string();
        assert!(rendered.contains("demographic parity gap"));
        assert!(rendered.contains("n/a"));
    }

    #[test]
    fn group_table_has_a_row_per_group() {
        let recs = vec![
            Record::new("A", 1, Some(1)),
            Record::new("B", 0, Some(0)),
            Record::new("C", 1, Some(0)),
        ];
        let report = evaluate(&recs).unwrap();
        let rendered = group_table(&report.groups).to_string();
        for group in ["A", "B", "C"] {
            assert!(rendered.contains(group));
        }
    }
}
