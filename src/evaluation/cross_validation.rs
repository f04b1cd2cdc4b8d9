//! Stratified k-fold cross-validation of an ensemble

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use thiserror::Error;

use crate::ensemble::{Ensemble, Model, TrainingError};
use crate::pipeline::Dataset;

use super::metrics::Metrics;

/// Default number of folds
pub const DEFAULT_FOLDS: usize = 10;

/// Errors raised while cross-validating
#[derive(Debug, Error, PartialEq)]
pub enum EvaluationError {
    #[error("cross-validation needs at least 2 folds, got {0}")]
    InvalidFolds(usize),

    #[error("cannot split {instances} instances into {folds} folds")]
    TooFewInstances { instances: usize, folds: usize },

    #[error("ensemble has no members to evaluate")]
    EmptyEnsemble,

    #[error("training failed in fold {fold}: {source}")]
    Training {
        fold: usize,
        #[source]
        source: TrainingError,
    },
}

/// Assign every row to one of `folds` test folds, stratified by class.
///
/// Row indices are shuffled with `seed`, then each class's rows are dealt
/// round-robin, continuing the deal position from one class to the next.
pub fn stratified_folds(
    classes: &[usize],
    num_classes: usize,
    folds: usize,
    seed: u64,
) -> Result<Vec<Vec<usize>>, EvaluationError> {
    if folds < 2 {
        return Err(EvaluationError::InvalidFolds(folds));
    }
    if classes.len() < folds {
        return Err(EvaluationError::TooFewInstances {
            instances: classes.len(),
            folds,
        });
    }

    let mut order: Vec<usize> = (0..classes.len()).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));

    let mut assignment = vec![Vec::new(); folds];
    let mut next = 0;
    for class in 0..num_classes {
        for &row in order.iter().filter(|&&r| classes[r] == class) {
            assignment[next % folds].push(row);
            next += 1;
        }
    }
    Ok(assignment)
}

/// Stratified k-fold cross-validator
#[derive(Debug, Clone, Copy)]
pub struct CrossValidator {
    folds: usize,
}

impl Default for CrossValidator {
    fn default() -> Self {
        Self {
            folds: DEFAULT_FOLDS,
        }
    }
}

impl CrossValidator {
    pub fn new(folds: usize) -> Result<Self, EvaluationError> {
        if folds < 2 {
            return Err(EvaluationError::InvalidFolds(folds));
        }
        Ok(Self { folds })
    }

    pub fn folds(&self) -> usize {
        self.folds
    }

    /// Train on k-1 folds, predict the held-out fold, and score all predictions.
    ///
    /// Folds run in parallel; predictions are merged in fold order.
    pub fn evaluate(&self, ensemble: &Ensemble, data: &Dataset, seed: u64) -> Result<Metrics, EvaluationError> {
        if ensemble.is_empty() {
            return Err(EvaluationError::EmptyEnsemble);
        }
        let assignment = stratified_folds(data.classes(), data.num_classes(), self.folds, seed)?;

        let per_fold: Vec<Vec<(usize, Vec<f64>)>> = assignment
            .par_iter()
            .enumerate()
            .map(|(fold, test)| -> Result<Vec<(usize, Vec<f64>)>, EvaluationError> {
                let train: Vec<usize> = assignment
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| *k != fold)
                    .flat_map(|(_, rows)| rows.iter().copied())
                    .collect();

                let fitted = ensemble
                    .fit(data, &train, seed)
                    .map_err(|source| EvaluationError::Training { fold, source })?;

                Ok(test
                    .iter()
                    .map(|&row| (data.class_of(row), fitted.distribution(data.row(row))))
                    .collect())
            })
            .collect::<Result<_, _>>()?;

        let (actual, distributions): (Vec<usize>, Vec<Vec<f64>>) = per_fold.into_iter().flatten().unzip();
        Ok(Metrics::from_predictions(&actual, &distributions, data.num_classes()))
    }
}
