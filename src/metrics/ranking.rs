use ordered_float::OrderedFloat;

/// Rank-based ROC-AUC (Mann-Whitney U with tie-averaged ranks) over
/// (score, actual) pairs. `None` when either class is absent.
pub fn roc_auc(scored: &[(f64, i64)]) -> Option<f64> {
    let n_pos = scored.iter().filter(|(_, y)| *y == 1).count();
    let n_neg = scored.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut by_score: Vec<&(f64, i64)> = scored.iter().collect();
    by_score.sort_by_key(|(s, _)| OrderedFloat(*s));

    // Average ranks over tied scores, then sum the ranks of the positives.
    let mut rank_sum_pos = 0.0;
    let mut i = 0;
    while i < by_score.len() {
        let mut j = i;
        while j < by_score.len() && by_score[j].0 == by_score[i].0 {
            j += 1;
        }
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for entry in &by_score[i..j] {
            if entry.1 == 1 {
                rank_sum_pos += avg_rank;
            }
        }
        i = j;
    }

    let u = rank_sum_pos - (n_pos * (n_pos + 1)) as f64 / 2.0;
    Some(u / (n_pos * n_neg) as f64)
}

/// Average precision: mean of precision@k over the positions of the positives,
/// walking the records from highest score to lowest. `None` without positives.
pub fn average_precision(scored: &[(f64, i64)]) -> Option<f64> {
    let n_pos = scored.iter().filter(|(_, y)| *y == 1).count();
    if n_pos == 0 {
        return None;
    }

    let mut by_score: Vec<&(f64, i64)> = scored.iter().collect();
    by_score.sort_by_key(|(s, _)| std::cmp::Reverse(OrderedFloat(*s)));

    let mut hits = 0usize;
    let mut sum = 0.0;
    for (k, entry) in by_score.iter().enumerate() {
        if entry.1 == 1 {
            hits += 1;
            sum += hits as f64 / (k + 1) as f64;
        }
    }
    Some(sum / n_pos as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auc_is_one_for_perfect_separation() {
        let scored = vec![(0.9, 1), (0.8, 1), (0.2, 0), (0.1, 0)];
        assert_eq!(roc_auc(&scored), Some(1.0));
    }

    #[test]
    fn auc_is_half_for_all_tied_scores() {
        let scored = vec![(0.5, 1), (0.5, 0), (0.5, 1), (0.5, 0)];
        assert_eq!(roc_auc(&scored), Some(0.5));
    }

    #[test]
    fn auc_is_zero_for_inverted_ranking() {
        let scored = vec![(0.1, 1), (0.9, 0)];
        assert_eq!(roc_auc(&scored), Some(0.0));
    }

    #[test]
    fn auc_needs_both_classes() {
        assert_eq!(roc_auc(&[(0.4, 1), (0.6, 1)]), None);
        assert_eq!(roc_auc(&[(0.4, 0)]), None);
        assert_eq!(roc_auc(&[]), None);
    }

    #[test]
    fn average_precision_perfect_ranking() {
        let scored = vec![(0.9, 1), (0.8, 1), (0.2, 0), (0.1, 0)];
        assert_eq!(average_precision(&scored), Some(1.0));
    }

    #[test]
    fn average_precision_worst_ranking() {
        // Single positive ranked last out of four.
        let scored = vec![(0.9, 0), (0.8, 0), (0.7, 0), (0.1, 1)];
        assert_eq!(average_precision(&scored), Some(0.25));
    }

    #[test]
    fn average_precision_needs_a_positive() {
        assert_eq!(average_precision(&[(0.3, 0)]), None);
    }
}
