//! Relevance analysis: rank features by symmetric uncertainty with the class

use serde::Serialize;

use super::dataset::DiscreteDataset;
use super::error::SelectionError;
use super::statistics::FeatureStatistics;

/// Features ranked by SU with the class label
#[derive(Debug, Clone, Serialize)]
pub struct RelevanceRanking {
    /// Relevance threshold the ranking was built with
    pub threshold: f64,
    /// SU(feature, class) for every feature, in feature order
    pub scores: Vec<f64>,
    /// Number of features whose score strictly exceeds the threshold
    pub len: usize,
    /// Top-`len` feature indices, descending by score
    pub relevant: Vec<usize>,
}

impl RelevanceRanking {
    /// SU of a feature with the class
    pub fn score(&self, feature: usize) -> f64 {
        self.scores[feature]
    }

    /// Rank position of a feature within the relevant subset
    pub fn position(&self, feature: usize) -> Option<usize> {
        self.relevant.iter().position(|&f| f == feature)
    }

    pub fn is_empty(&self) -> bool {
        self.relevant.is_empty()
    }
}

/// Validate a relevance threshold
pub fn validate_threshold(threshold: f64) -> Result<f64, SelectionError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(SelectionError::InvalidThreshold(threshold))
    }
}

/// Count features whose score strictly exceeds the threshold
pub fn count_above_threshold(scores: &[f64], threshold: f64) -> usize {
    scores.iter().filter(|&&s| s > threshold).count()
}

/// Extract `len` feature indices by repeated max-extraction.
///
/// Each round scans every feature with a greater-or-equal comparison starting
/// from 0, so the highest-index feature wins exact ties; the winner's working
/// score is then zeroed.
pub fn extract_top(scores: &[f64], len: usize) -> Vec<usize> {
    let mut working = scores.to_vec();
    let mut relevant = Vec::with_capacity(len);

    for _ in 0..len {
        let mut max = 0.0;
        let mut max_index = None;
        for (j, &score) in working.iter().enumerate() {
            if score >= max {
                max = score;
                max_index = Some(j);
            }
        }
        let Some(index) = max_index else {
            break;
        };
        relevant.push(index);
        working[index] = 0.0;
    }

    relevant
}

/// Rank precomputed class scores against a threshold
pub fn rank_features(scores: Vec<f64>, threshold: f64) -> Result<RelevanceRanking, SelectionError> {
    let threshold = validate_threshold(threshold)?;
    let len = count_above_threshold(&scores, threshold);
    let relevant = extract_top(&scores, len);

    Ok(RelevanceRanking {
        threshold,
        scores,
        len,
        relevant,
    })
}

/// Score every feature against the class and rank them
pub fn analyze_relevance(
    data: &DiscreteDataset,
    threshold: f64,
) -> Result<RelevanceRanking, SelectionError> {
    validate_threshold(threshold)?;
    let scores = FeatureStatistics::new(data).class_scores();
    rank_features(scores, threshold)
}
