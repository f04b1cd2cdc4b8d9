//! Supervised discretization of numeric features
//!
//! Cut points are found with the Fayyad–Irani entropy/MDL criterion: the
//! sorted values of a feature are split recursively at the boundary that
//! minimizes the class entropy of the two halves, and a split is kept only when
//! its information gain pays for the extra description length.

use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;

use super::dataset::{Dataset, DiscreteDataset, FeatureKind, MISSING};
use super::error::SelectionError;
use crate::utils::create_feature_bar;

/// Learned cut points for every feature of a dataset
#[derive(Debug, Clone, Serialize)]
pub struct Discretizer {
    features: Vec<FeatureBins>,
}

/// Binning of a single feature
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureBins {
    /// Numeric feature; bin `i` holds values in `(cuts[i-1], cuts[i]]`
    Numeric { cut_points: Vec<f64> },
    /// Nominal feature; the label index is the code
    Nominal { labels: usize },
}

impl FeatureBins {
    /// Number of bins (codes) this feature produces
    pub fn bin_count(&self) -> usize {
        match self {
            FeatureBins::Numeric { cut_points } => cut_points.len() + 1,
            FeatureBins::Nominal { labels } => *labels,
        }
    }

    /// Code of a raw value
    pub fn code(&self, value: f64) -> u32 {
        if value.is_nan() {
            return MISSING;
        }
        match self {
            FeatureBins::Numeric { cut_points } => {
                cut_points.partition_point(|&cut| cut < value) as u32
            }
            FeatureBins::Nominal { .. } => value as u32,
        }
    }
}

impl Discretizer {
    /// Learn cut points for every feature against the class
    pub fn fit(data: &Dataset) -> Self {
        Self::fit_with_progress(data, &ProgressBar::hidden())
    }

    /// Learn cut points, advancing `pb` once per feature
    pub fn fit_with_progress(data: &Dataset, pb: &ProgressBar) -> Self {
        let num_classes = data.num_classes();
        let features = (0..data.num_features())
            .into_par_iter()
            .map(|f| {
                let bins = match data.kind(f) {
                    FeatureKind::Nominal { labels } => FeatureBins::Nominal {
                        labels: labels.len(),
                    },
                    FeatureKind::Numeric => {
                        let mut pairs: Vec<(f64, usize)> = data
                            .column(f)
                            .into_iter()
                            .zip(data.classes().iter().copied())
                            .filter(|(v, _)| !v.is_nan())
                            .collect();
                        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
                        FeatureBins::Numeric {
                            cut_points: mdl_cut_points(&pairs, num_classes),
                        }
                    }
                };
                pb.inc(1);
                bins
            })
            .collect();

        Self { features }
    }

    pub fn bins(&self, feature: usize) -> &FeatureBins {
        &self.features[feature]
    }

    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    /// Numeric features that collapsed to a single bin
    pub fn single_bin_features(&self) -> usize {
        self.features
            .iter()
            .filter(|b| matches!(b, FeatureBins::Numeric { cut_points } if cut_points.is_empty()))
            .count()
    }

    /// Apply the learned bins to a dataset with the same feature layout
    pub fn transform(&self, data: &Dataset) -> Result<DiscreteDataset, SelectionError> {
        if data.num_features() != self.features.len() {
            return Err(SelectionError::RaggedRow {
                row: 0,
                found: data.num_features(),
                expected: self.features.len(),
            });
        }

        let columns: Vec<Vec<u32>> = self
            .features
            .par_iter()
            .enumerate()
            .map(|(f, bins)| {
                (0..data.num_instances())
                    .map(|r| bins.code(data.row(r)[f]))
                    .collect()
            })
            .collect();
        let class_codes = data.classes().iter().map(|&c| c as u32).collect();

        DiscreteDataset::new(data.feature_names().to_vec(), columns, class_codes)
    }
}

/// Fit and apply a discretizer, ticking a progress bar over features when `show_progress` is set
pub fn discretize_dataset(
    data: &Dataset,
    show_progress: bool,
) -> Result<(DiscreteDataset, Discretizer), SelectionError> {
    let pb = create_feature_bar(data.num_features() as u64, "Discretizing", show_progress);
    let discretizer = Discretizer::fit_with_progress(data, &pb);
    pb.finish_and_clear();

    let discrete = discretizer.transform(data)?;
    Ok((discrete, discretizer))
}

/// Entropy in bits of a class-count vector
fn class_entropy(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    -counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            p * p.log2()
        })
        .sum::<f64>()
}

fn classes_present(counts: &[usize]) -> i32 {
    counts.iter().filter(|&&c| c > 0).count() as i32
}

/// Best boundary of a sorted subset: (split index, cut value, left counts, right counts, entropy)
fn find_best_boundary(
    sorted_pairs: &[(f64, usize)],
    num_classes: usize,
) -> Option<(usize, f64, Vec<usize>, Vec<usize>, f64)> {
    let n = sorted_pairs.len();
    let mut total = vec![0usize; num_classes];
    for &(_, c) in sorted_pairs {
        total[c] += 1;
    }

    let mut best: Option<(usize, f64, Vec<usize>, Vec<usize>, f64)> = None;
    let mut best_entropy = class_entropy(&total);
    let mut left = vec![0usize; num_classes];

    for i in 0..n - 1 {
        left[sorted_pairs[i].1] += 1;

        // Only split between distinct values
        if sorted_pairs[i].0 >= sorted_pairs[i + 1].0 {
            continue;
        }

        let right: Vec<usize> = total.iter().zip(&left).map(|(t, l)| t - l).collect();
        let left_n = (i + 1) as f64;
        let right_n = (n - i - 1) as f64;
        let entropy = (left_n * class_entropy(&left) + right_n * class_entropy(&right)) / n as f64;

        if entropy < best_entropy {
            best_entropy = entropy;
            let cut = (sorted_pairs[i].0 + sorted_pairs[i + 1].0) / 2.0;
            best = Some((i + 1, cut, left.clone(), right, entropy));
        }
    }

    best
}

/// Recursive MDL cut point search over `(value, class)` pairs sorted by value
pub fn mdl_cut_points(sorted_pairs: &[(f64, usize)], num_classes: usize) -> Vec<f64> {
    if sorted_pairs.len() < 2 || num_classes == 0 {
        return Vec::new();
    }

    let Some((split, cut, left, right, split_entropy)) =
        find_best_boundary(sorted_pairs, num_classes)
    else {
        return Vec::new();
    };

    let mut total = vec![0usize; num_classes];
    for &(_, c) in sorted_pairs {
        total[c] += 1;
    }

    let n = sorted_pairs.len() as f64;
    let prior_entropy = class_entropy(&total);
    let gain = prior_entropy - split_entropy;
    if gain <= 0.0 {
        return Vec::new();
    }

    let k = classes_present(&total);
    let k1 = classes_present(&left);
    let k2 = classes_present(&right);
    let delta = (3f64.powi(k) - 2.0).log2()
        - (k as f64 * prior_entropy
            - k1 as f64 * class_entropy(&left)
            - k2 as f64 * class_entropy(&right));
    let threshold = ((n - 1.0).log2() + delta) / n;

    if gain <= threshold {
        return Vec::new();
    }

    let (left_pairs, right_pairs) = sorted_pairs.split_at(split);
    let mut cuts = mdl_cut_points(left_pairs, num_classes);
    cuts.push(cut);
    cuts.extend(mdl_cut_points(right_pairs, num_classes));
    cuts
}
