//! Ensemble assembly and average-of-probabilities voting

use serde::Serialize;

use crate::pipeline::{Dataset, RetainedSet, SelectionError};

use super::classifier::{argmax, ClassifierKind, Model, TrainingError};
use super::filter::{FeatureFilter, FilteredModel};

/// One ensemble member: a base classifier restricted to a feature set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierSpec {
    pub kind: ClassifierKind,
    /// Retained feature indices, ascending
    pub features: Vec<usize>,
}

/// Combines member distributions by averaging them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AverageVote;

impl AverageVote {
    /// Element-wise mean of the member distributions
    pub fn combine(&self, distributions: &[Vec<f64>], num_classes: usize) -> Vec<f64> {
        let mut combined = vec![0.0; num_classes];
        if distributions.is_empty() {
            return combined;
        }
        for dist in distributions {
            for (c, p) in combined.iter_mut().zip(dist) {
                *c += p;
            }
        }
        let n = distributions.len() as f64;
        combined.iter_mut().for_each(|c| *c /= n);
        combined
    }
}

/// An untrained ensemble: member specs plus the voting rule
#[derive(Debug, Clone, Serialize)]
pub struct Ensemble {
    pub kind: ClassifierKind,
    pub members: Vec<ClassifierSpec>,
    pub vote: AverageVote,
}

impl Ensemble {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Train every member on `rows`; member `i` uses seed `seed + i`
    pub fn fit(&self, data: &Dataset, rows: &[usize], seed: u64) -> Result<FittedEnsemble, TrainingError> {
        let learner = self.kind.learner();
        let members = self
            .members
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                FilteredModel::fit(
                    FeatureFilter::new(spec.features.clone()),
                    learner.as_ref(),
                    data,
                    rows,
                    seed.wrapping_add(i as u64),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FittedEnsemble {
            members,
            vote: self.vote,
            num_classes: data.num_classes(),
        })
    }
}

/// A trained ensemble
pub struct FittedEnsemble {
    members: Vec<FilteredModel>,
    vote: AverageVote,
    num_classes: usize,
}

impl FittedEnsemble {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Predicted class index; the lowest index wins ties
    pub fn predict(&self, row: &[f64]) -> usize {
        argmax(&self.distribution(row))
    }
}

impl Model for FittedEnsemble {
    fn distribution(&self, row: &[f64]) -> Vec<f64> {
        let distributions: Vec<Vec<f64>> = self.members.iter().map(|m| m.distribution(row)).collect();
        self.vote.combine(&distributions, self.num_classes)
    }
}

/// Collects one member per retained set, up to a fixed number
#[derive(Debug, Clone)]
pub struct EnsembleBuilder {
    kind: ClassifierKind,
    max_members: usize,
    members: Vec<ClassifierSpec>,
}

impl EnsembleBuilder {
    pub fn new(kind: ClassifierKind, max_members: usize) -> Result<Self, SelectionError> {
        if max_members == 0 {
            return Err(SelectionError::InvalidEnsembleSize(max_members));
        }
        Ok(Self {
            kind,
            max_members,
            members: Vec::with_capacity(max_members),
        })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.max_members
    }

    /// Add a member restricted to the retained features of one round
    pub fn push(&mut self, set: &RetainedSet) -> Result<&ClassifierSpec, SelectionError> {
        self.push_features(set.retained.clone())
    }

    /// Add a member restricted to `features` (sorted ascending on insert)
    pub fn push_features(&mut self, mut features: Vec<usize>) -> Result<&ClassifierSpec, SelectionError> {
        if self.is_full() {
            return Err(SelectionError::EnsembleFull(self.max_members));
        }
        if features.is_empty() {
            return Err(SelectionError::NoFeatures);
        }
        features.sort_unstable();
        features.dedup();
        self.members.push(ClassifierSpec {
            kind: self.kind,
            features,
        });
        Ok(&self.members[self.members.len() - 1])
    }

    pub fn build(self) -> Ensemble {
        Ensemble {
            kind: self.kind,
            members: self.members,
            vote: AverageVote,
        }
    }
}
