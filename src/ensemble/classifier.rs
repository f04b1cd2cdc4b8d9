//! Classifier capabilities: the learner/model traits and the classifier kind

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use super::svm::LinearSvm;
use super::tree::DecisionTree;

/// Errors raised while training a classifier
#[derive(Debug, Error, PartialEq)]
pub enum TrainingError {
    #[error("cannot train on an empty set of rows")]
    EmptyTrainingSet,

    #[error("cannot train a classifier restricted to zero features")]
    NoFeatures,

    #[error("training set declares no classes")]
    NoClasses,

    #[error("training row {row} has class {class}, but only {num_classes} classes exist")]
    ClassOutOfRange {
        row: usize,
        class: usize,
        num_classes: usize,
    },

    #[error("solver failed: {0}")]
    Solver(String),
}

/// Projected training rows handed to a [`Learner`]
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub rows: Vec<Vec<f64>>,
    pub classes: Vec<usize>,
    pub num_classes: usize,
}

impl TrainingSet {
    pub fn new(
        rows: Vec<Vec<f64>>,
        classes: Vec<usize>,
        num_classes: usize,
    ) -> Result<Self, TrainingError> {
        if rows.is_empty() {
            return Err(TrainingError::EmptyTrainingSet);
        }
        if num_classes == 0 {
            return Err(TrainingError::NoClasses);
        }
        if rows[0].is_empty() {
            return Err(TrainingError::NoFeatures);
        }
        if let Some((row, &class)) = classes.iter().enumerate().find(|(_, &c)| c >= num_classes) {
            return Err(TrainingError::ClassOutOfRange {
                row,
                class,
                num_classes,
            });
        }
        Ok(Self {
            rows,
            classes,
            num_classes,
        })
    }

    pub fn num_features(&self) -> usize {
        self.rows[0].len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.num_classes];
        for &c in &self.classes {
            counts[c] += 1;
        }
        counts
    }
}

/// A trained classifier producing class-probability distributions
pub trait Model: Send + Sync {
    /// Distribution over all classes for one (already projected) row
    fn distribution(&self, row: &[f64]) -> Vec<f64>;
}

/// Something that trains a [`Model`]
pub trait Learner: Send + Sync {
    fn name(&self) -> &str;

    fn fit(&self, data: &TrainingSet, seed: u64) -> Result<Box<dyn Model>, TrainingError>;
}

/// Base classifier of every ensemble member; one kind per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClassifierKind {
    /// Decision-tree style ("C")
    Tree,
    /// Margin (linear SVM) style ("S")
    Margin,
}

impl ClassifierKind {
    /// Learner with default parameters for this kind
    pub fn learner(&self) -> Box<dyn Learner> {
        match self {
            ClassifierKind::Tree => Box::new(DecisionTree::default()),
            ClassifierKind::Margin => Box::new(LinearSvm::default()),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ClassifierKind::Tree => "decision tree",
            ClassifierKind::Margin => "linear SVM",
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierKind::Tree => write!(f, "C"),
            ClassifierKind::Margin => write!(f, "S"),
        }
    }
}

impl FromStr for ClassifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C" | "c" | "tree" => Ok(ClassifierKind::Tree),
            "S" | "s" | "svm" => Ok(ClassifierKind::Margin),
            _ => Err(format!(
                "The type of classifier must be 'C' (tree) or 'S' (SVM), got '{}'",
                s
            )),
        }
    }
}

/// Index of the largest probability; the lowest index wins ties
pub fn argmax(distribution: &[f64]) -> usize {
    let mut best = 0;
    for (i, &p) in distribution.iter().enumerate() {
        if p > distribution[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("C".parse::<ClassifierKind>().unwrap(), ClassifierKind::Tree);
        assert_eq!("S".parse::<ClassifierKind>().unwrap(), ClassifierKind::Margin);
        assert_eq!("svm".parse::<ClassifierKind>().unwrap(), ClassifierKind::Margin);
        assert!("X".parse::<ClassifierKind>().is_err());
        assert_eq!(ClassifierKind::Tree.to_string(), "C");
    }

    #[test]
    fn test_argmax_prefers_lowest_index_on_ties() {
        assert_eq!(argmax(&[0.25, 0.5, 0.25]), 1);
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[0.0, 0.0, 0.0]), 0);
    }

    #[test]
    fn test_training_set_validation() {
        assert_eq!(
            TrainingSet::new(vec![], vec![], 2).unwrap_err(),
            TrainingError::EmptyTrainingSet
        );
        assert_eq!(
            TrainingSet::new(vec![vec![]], vec![0], 2).unwrap_err(),
            TrainingError::NoFeatures
        );
        assert!(matches!(
            TrainingSet::new(vec![vec![1.0]], vec![4], 2),
            Err(TrainingError::ClassOutOfRange { class: 4, .. })
        ));
        let set = TrainingSet::new(vec![vec![1.0], vec![2.0]], vec![0, 1], 2).unwrap();
        assert_eq!(set.class_counts(), vec![1, 1]);
    }
}
