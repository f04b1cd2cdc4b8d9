//! Feature filtering: restrict a classifier to one retained-feature set

use crate::pipeline::Dataset;

use super::classifier::{Learner, Model, TrainingError, TrainingSet};

/// Keeps only the listed features of a row, in the listed order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFilter {
    features: Vec<usize>,
}

impl FeatureFilter {
    pub fn new(features: Vec<usize>) -> Self {
        Self { features }
    }

    pub fn features(&self) -> &[usize] {
        &self.features
    }

    pub fn project(&self, row: &[f64]) -> Vec<f64> {
        self.features.iter().map(|&f| row[f]).collect()
    }

    /// Project the given dataset rows into a training set
    pub fn training_set(&self, data: &Dataset, rows: &[usize]) -> Result<TrainingSet, TrainingError> {
        if self.features.is_empty() {
            return Err(TrainingError::NoFeatures);
        }
        let projected = rows.iter().map(|&r| self.project(data.row(r))).collect();
        let classes = rows.iter().map(|&r| data.class_of(r)).collect();
        TrainingSet::new(projected, classes, data.num_classes())
    }
}

/// A model trained on filtered rows that accepts full rows
pub struct FilteredModel {
    filter: FeatureFilter,
    inner: Box<dyn Model>,
}

impl FilteredModel {
    /// Filter the training rows and fit `learner` on them
    pub fn fit(
        filter: FeatureFilter,
        learner: &dyn Learner,
        data: &Dataset,
        rows: &[usize],
        seed: u64,
    ) -> Result<Self, TrainingError> {
        let training = filter.training_set(data, rows)?;
        let inner = learner.fit(&training, seed)?;
        Ok(Self { filter, inner })
    }

    pub fn filter(&self) -> &FeatureFilter {
        &self.filter
    }
}

impl Model for FilteredModel {
    fn distribution(&self, row: &[f64]) -> Vec<f64> {
        self.inner.distribution(&self.filter.project(row))
    }
}
