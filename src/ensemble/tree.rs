//! Decision-tree learner ("C" members).
//!
//! Grows a binary tree top-down. Each node tests one feature against a
//! threshold chosen by information gain; among the features whose gain is at
//! least average, the one with the highest gain ratio wins. Rows with a missing
//! value follow the branch that received more known rows. Leaves predict the
//! class frequencies of the training rows that reached them.

use std::cmp::Ordering;

use super::classifier::{Learner, Model, TrainingError, TrainingSet};

const MIN_GAIN: f64 = 1e-10;
const AVERAGE_GAIN_SLACK: f64 = 1e-3;

/// Tree learner parameters
#[derive(Debug, Clone)]
pub struct DecisionTree {
    /// Minimum known rows on each side of a split
    pub min_leaf: usize,
    pub max_depth: usize,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self {
            min_leaf: 2,
            max_depth: 32,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        distribution: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        missing_left: bool,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A fitted decision tree
#[derive(Debug, Clone)]
pub struct TreeModel {
    root: Node,
}

impl TreeModel {
    /// Number of leaves
    pub fn leaves(&self) -> usize {
        fn count(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Split { left, right, .. } => count(left) + count(right),
            }
        }
        count(&self.root)
    }

    pub fn depth(&self) -> usize {
        fn depth(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + depth(left).max(depth(right)),
            }
        }
        depth(&self.root)
    }
}

impl Model for TreeModel {
    fn distribution(&self, row: &[f64]) -> Vec<f64> {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { distribution } => return distribution.clone(),
                Node::Split {
                    feature,
                    threshold,
                    missing_left,
                    left,
                    right,
                } => {
                    let value = row[*feature];
                    let go_left = if value.is_nan() {
                        *missing_left
                    } else {
                        value <= *threshold
                    };
                    node = if go_left { left } else { right };
                }
            }
        }
    }
}

impl Learner for DecisionTree {
    fn name(&self) -> &str {
        "decision tree"
    }

    fn fit(&self, data: &TrainingSet, _seed: u64) -> Result<Box<dyn Model>, TrainingError> {
        Ok(Box::new(self.fit_tree(data)?))
    }
}

/// Best threshold found for one feature
#[derive(Debug, Clone)]
struct Candidate {
    feature: usize,
    threshold: f64,
    gain: f64,
    gain_ratio: f64,
    left_known: usize,
    right_known: usize,
}

impl DecisionTree {
    /// Fit and return the concrete tree
    pub fn fit_tree(&self, data: &TrainingSet) -> Result<TreeModel, TrainingError> {
        if data.is_empty() {
            return Err(TrainingError::EmptyTrainingSet);
        }
        let rows: Vec<usize> = (0..data.len()).collect();
        let root = self.grow(data, &rows, 0, None);
        Ok(TreeModel { root })
    }

    fn grow(&self, data: &TrainingSet, rows: &[usize], depth: usize, parent: Option<&[f64]>) -> Node {
        let counts = class_counts(data, rows);
        let distribution = match normalize(&counts) {
            Some(d) => d,
            None => {
                return Node::Leaf {
                    distribution: parent
                        .map(<[f64]>::to_vec)
                        .unwrap_or_else(|| vec![1.0 / data.num_classes as f64; data.num_classes]),
                }
            }
        };

        let pure = counts.iter().any(|&c| c == rows.len());
        if pure || depth >= self.max_depth || rows.len() < 2 * self.min_leaf {
            return Node::Leaf { distribution };
        }

        let candidates: Vec<Candidate> = (0..data.num_features())
            .filter_map(|f| self.best_split(data, rows, f))
            .collect();
        let Some(best) = choose(&candidates) else {
            return Node::Leaf { distribution };
        };

        let missing_left = best.left_known >= best.right_known;
        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows.iter().copied().partition(|&r| {
            let value = data.rows[r][best.feature];
            if value.is_nan() {
                missing_left
            } else {
                value <= best.threshold
            }
        });

        Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            missing_left,
            left: Box::new(self.grow(data, &left_rows, depth + 1, Some(&distribution))),
            right: Box::new(self.grow(data, &right_rows, depth + 1, Some(&distribution))),
        }
    }

    fn best_split(&self, data: &TrainingSet, rows: &[usize], feature: usize) -> Option<Candidate> {
        let mut known: Vec<(f64, usize)> = rows
            .iter()
            .map(|&r| (data.rows[r][feature], data.classes[r]))
            .filter(|(v, _)| !v.is_nan())
            .collect();
        let n_known = known.len();
        if n_known < 2 * self.min_leaf {
            return None;
        }
        known.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let mut total = vec![0usize; data.num_classes];
        for &(_, c) in &known {
            total[c] += 1;
        }
        let parent_entropy = entropy(&total);

        let mut left = vec![0usize; data.num_classes];
        let mut best: Option<(f64, usize)> = None;
        for i in 0..n_known - 1 {
            left[known[i].1] += 1;
            if known[i].0 == known[i + 1].0 {
                continue;
            }
            let left_n = i + 1;
            let right_n = n_known - left_n;
            if left_n < self.min_leaf || right_n < self.min_leaf {
                continue;
            }
            let right: Vec<usize> = total.iter().zip(&left).map(|(t, l)| t - l).collect();
            let children = (left_n as f64 * entropy(&left) + right_n as f64 * entropy(&right))
                / n_known as f64;
            let gain = parent_entropy - children;
            if best.map_or(true, |(g, _)| gain > g) {
                best = Some((gain, i));
            }
        }

        let (gain, split) = best?;
        let left_known = split + 1;
        let right_known = n_known - left_known;
        let missing = rows.len() - n_known;

        // Unknown rows dilute the gain and count as their own branch in the split info.
        let known_fraction = n_known as f64 / rows.len() as f64;
        let gain = gain * known_fraction;
        let split_info = entropy(&[left_known, right_known, missing]);
        let gain_ratio = if split_info > 0.0 { gain / split_info } else { 0.0 };

        Some(Candidate {
            feature,
            threshold: (known[split].0 + known[split + 1].0) / 2.0,
            gain,
            gain_ratio,
            left_known,
            right_known,
        })
    }
}

/// Highest gain ratio among candidates with at least average gain; first wins ties
fn choose(candidates: &[Candidate]) -> Option<&Candidate> {
    let useful: Vec<&Candidate> = candidates.iter().filter(|c| c.gain > MIN_GAIN).collect();
    if useful.is_empty() {
        return None;
    }
    let average = useful.iter().map(|c| c.gain).sum::<f64>() / useful.len() as f64;

    let mut best: Option<&Candidate> = None;
    for c in useful {
        if c.gain < average - AVERAGE_GAIN_SLACK {
            continue;
        }
        if best.map_or(true, |b| c.gain_ratio > b.gain_ratio) {
            best = Some(c);
        }
    }
    best
}

fn class_counts(data: &TrainingSet, rows: &[usize]) -> Vec<usize> {
    let mut counts = vec![0usize; data.num_classes];
    for &r in rows {
        counts[data.classes[r]] += 1;
    }
    counts
}

fn normalize(counts: &[usize]) -> Option<Vec<f64>> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return None;
    }
    Some(counts.iter().map(|&c| c as f64 / total as f64).collect())
}

fn entropy(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum()
}
