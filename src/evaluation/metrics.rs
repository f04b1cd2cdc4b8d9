//! Classification metrics from cross-validated predictions

use serde::Serialize;

use crate::ensemble::argmax;

/// Summary statistics of one cross-validation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub instances: usize,
    pub correct: usize,
    /// Fraction of instances classified correctly
    pub accuracy: f64,
    pub error_rate: f64,
    /// True-positive rate averaged over classes, weighted by class prevalence
    pub sensitivity: f64,
    /// True-negative rate averaged over classes, weighted by class prevalence
    pub specificity: f64,
    /// One-vs-rest area under ROC averaged over classes, weighted by class prevalence
    pub auc: f64,
    /// `confusion[actual][predicted]`
    pub confusion: Vec<Vec<usize>>,
}

impl Metrics {
    /// Score predicted distributions against the actual classes
    pub fn from_predictions(actual: &[usize], distributions: &[Vec<f64>], num_classes: usize) -> Self {
        let n = actual.len();
        let mut confusion = vec![vec![0usize; num_classes]; num_classes];
        for (&a, dist) in actual.iter().zip(distributions) {
            confusion[a][argmax(dist)] += 1;
        }

        let correct: usize = (0..num_classes).map(|c| confusion[c][c]).sum();
        let accuracy = if n == 0 { 0.0 } else { correct as f64 / n as f64 };

        let class_totals: Vec<usize> = confusion.iter().map(|row| row.iter().sum()).collect();
        let predicted_totals: Vec<usize> = (0..num_classes)
            .map(|p| confusion.iter().map(|row| row[p]).sum())
            .collect();

        let mut sensitivity = 0.0;
        let mut specificity = 0.0;
        let mut auc = 0.0;
        for c in 0..num_classes {
            if class_totals[c] == 0 {
                continue;
            }
            let weight = class_totals[c] as f64 / n as f64;
            let tp = confusion[c][c];
            let fp = predicted_totals[c] - tp;
            let negatives = n - class_totals[c];
            let tn = negatives - fp;

            sensitivity += weight * tp as f64 / class_totals[c] as f64;
            if negatives > 0 {
                specificity += weight * tn as f64 / negatives as f64;
            }

            let mut scored: Vec<(f64, bool)> = actual
                .iter()
                .zip(distributions)
                .map(|(&a, dist)| (dist[c], a == c))
                .collect();
            scored.sort_by(|x, y| x.0.total_cmp(&y.0));
            auc += weight * area_under_roc(&scored);
        }

        Self {
            instances: n,
            correct,
            accuracy,
            error_rate: 1.0 - accuracy,
            sensitivity,
            specificity,
            auc,
            confusion,
        }
    }
}

/// Mann-Whitney AUC over `(score, is_positive)` pairs sorted ascending by score.
///
/// Tied scores share their average rank, so a tie counts as half a win.
/// Returns 0.5 when either side is empty.
pub fn area_under_roc(sorted_pairs: &[(f64, bool)]) -> f64 {
    let total_pos = sorted_pairs.iter().filter(|(_, p)| *p).count() as f64;
    let total_neg = sorted_pairs.len() as f64 - total_pos;
    if total_pos == 0.0 || total_neg == 0.0 {
        return 0.5;
    }

    let n = sorted_pairs.len();
    let mut rank_sum_pos = 0.0;
    let mut seen = 0.0;
    let mut i = 0;

    while i < n {
        let current = sorted_pairs[i].0;
        let mut j = i;
        while j < n && (sorted_pairs[j].0 - current).abs() < 1e-10 {
            j += 1;
        }

        let group = (j - i) as f64;
        let avg_rank = seen + group / 2.0;
        let positives = sorted_pairs[i..j].iter().filter(|(_, p)| *p).count() as f64;
        rank_sum_pos += avg_rank * positives;

        seen += group;
        i = j;
    }

    let u = rank_sum_pos - total_pos * total_pos / 2.0;
    (u / (total_pos * total_neg)).clamp(0.0, 1.0)
}
