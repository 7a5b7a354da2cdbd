use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::metrics::fairness::{evaluate, FairnessReport};
use crate::records::{validate, InvalidInput, Record};

#[derive(Clone, Debug)]
pub struct BootstrapOptions {
    pub n_resamples: usize,
    /// Two-sided confidence level, e.g. 0.95 for a 2.5%..97.5% interval.
    pub confidence: f64,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            n_resamples: 2000,
            confidence: 0.95,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

/// Percentile-bootstrap confidence intervals for the headline report fields.
/// A field is `None` when it was undefined in every resample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BootstrapReport {
    pub n_resamples: usize,
    pub confidence: f64,
    pub demographic_parity_gap: Option<Interval>,
    pub equalized_odds_gap: Option<Interval>,
    pub disparate_impact_ratio: Option<Interval>,
}

fn resample(records: &[Record], rng: &mut impl Rng) -> Vec<Record> {
    let n = records.len();
    let mut sample = Vec::with_capacity(n);
    for _ in 0..n {
        sample.push(records[rng.gen_range(0..n)].clone());
    }
    sample
}

/// Interpolated percentile of an unsorted sample.
fn percentile(values: &[f64], q: f64) -> f64 {
    let mut col = values.to_vec();
    col.sort_by_key(|v| OrderedFloat(*v));
    let m = col.len();
    if m == 1 {
        return col[0];
    }
    let h = (m - 1) as f64 * q.clamp(0.0, 1.0);
    let i0 = h.floor() as usize;
    let i1 = h.ceil() as usize;
    let frac = h - i0 as f64;
    (1.0 - frac) * col[i0] + frac * col[i1]
}

fn interval(values: &[f64], confidence: f64) -> Option<Interval> {
    if values.is_empty() {
        return None;
    }
    let tail = (1.0 - confidence) / 2.0;
    Some(Interval {
        lo: percentile(values, tail),
        hi: percentile(values, 1.0 - tail),
    })
}

/// Bootstrap the fairness report: resample the records with replacement, one
/// seeded rng per replicate so reruns are reproducible, evaluate the replicates
/// in parallel, and take percentile intervals over the replicate values.
/// Replicates that drop a metric (a resample can lose a whole group) are
/// excluded from that metric's interval.
pub fn bootstrap(
    records: &[Record],
    opts: &BootstrapOptions,
) -> Result<BootstrapReport, InvalidInput> {
    validate(records, None)?;

    let replicates: Vec<FairnessReport> = (0..opts.n_resamples)
        .into_par_iter()
        .filter_map(|i| {
            let mut rng = StdRng::seed_from_u64(i as u64);
            evaluate(&resample(records, &mut rng)).ok()
        })
        .collect();

    let collect = |field: fn(&FairnessReport) -> Option<f64>| -> Vec<f64> {
        replicates.iter().filter_map(field).collect()
    };

    Ok(BootstrapReport {
        n_resamples: opts.n_resamples,
        confidence: opts.confidence,
        demographic_parity_gap: interval(&collect(|r| r.demographic_parity_gap), opts.confidence),
        equalized_odds_gap: interval(&collect(|r| r.equalized_odds_gap), opts.confidence),
        disparate_impact_ratio: interval(&collect(|r| r.disparate_impact_ratio), opts.confidence),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<Record> {
        let mut recs = Vec::new();
        for i in 0..40 {
            recs.push(Record::new("A", i64::from(i % 3 != 0), Some(i64::from(i % 2))));
            recs.push(Record::new("B", i64::from(i % 2 == 0), Some(i64::from(i % 3 == 0))));
        }
        recs
    }

    #[test]
    fn bootstrap_is_deterministic() {
        let recs = sample_records();
        let opts = BootstrapOptions {
            n_resamples: 50,
            confidence: 0.9,
        };
        let first = bootstrap(&recs, &opts).unwrap();
        let second = bootstrap(&recs, &opts).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn intervals_are_ordered_and_in_range() {
        let recs = sample_records();
        let opts = BootstrapOptions {
            n_resamples: 100,
            confidence: 0.95,
        };
        let report = bootstrap(&recs, &opts).unwrap();
        for iv in [
            report.demographic_parity_gap,
            report.equalized_odds_gap,
            report.disparate_impact_ratio,
        ]
        .into_iter()
        .flatten()
        {
            assert!(iv.lo <= iv.hi);
            assert!((0.0..=1.0).contains(&iv.lo));
            assert!((0.0..=1.0).contains(&iv.hi));
        }
        assert!(report.demographic_parity_gap.is_some());
    }

    #[test]
    fn empty_input_errors() {
        let opts = BootstrapOptions::default();
        assert_eq!(bootstrap(&[], &opts), Err(InvalidInput::Empty));
    }

    #[test]
    fn single_group_yields_no_intervals() {
        let recs = vec![Record::new("A", 1, None), Record::new("A", 0, None)];
        let opts = BootstrapOptions {
            n_resamples: 20,
            confidence: 0.95,
        };
        let report = bootstrap(&recs, &opts).unwrap();
        assert_eq!(report.demographic_parity_gap, None);
        assert_eq!(report.equalized_odds_gap, None);
        assert_eq!(report.disparate_impact_ratio, None);
    }

    #[test]
    fn percentile_interpolates() {
        let values = vec![3.0, 1.0, 2.0, 4.0];
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 1.0), 4.0);
        assert!((percentile(&values, 0.5) - 2.5).abs() < 1e-12);
    }
}
