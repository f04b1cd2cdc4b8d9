//! Linear support vector machine ("S" members).
//!
//! Features are min-max scaled to [0, 1] using the training rows, missing
//! values are replaced by the training mean. Multi-class problems are split
//! one-vs-one; each pairwise machine is a `linfa_svm` classifier with a linear
//! kernel. The distribution is the share of pairwise votes per class.

use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_svm::{Svm, SvmParams};
use ndarray::{Array1, Array2, Axis};

use super::classifier::{Learner, Model, TrainingError, TrainingSet};

/// SVM learner parameters
#[derive(Debug, Clone)]
pub struct LinearSvm {
    /// Soft-margin penalty, applied to both classes of a pair
    pub c: f64,
    /// Solver stopping tolerance
    pub eps: f64,
}

impl Default for LinearSvm {
    fn default() -> Self {
        Self { c: 1.0, eps: 1e-3 }
    }
}

#[derive(Debug, Clone)]
struct Scaling {
    min: Vec<f64>,
    range: Vec<f64>,
    fill: Vec<f64>,
}

impl Scaling {
    fn fit(data: &TrainingSet) -> Self {
        let d = data.num_features();
        let mut min = vec![f64::INFINITY; d];
        let mut max = vec![f64::NEG_INFINITY; d];
        let mut sum = vec![0.0; d];
        let mut known = vec![0usize; d];

        for row in &data.rows {
            for (j, &v) in row.iter().enumerate() {
                if v.is_nan() {
                    continue;
                }
                min[j] = min[j].min(v);
                max[j] = max[j].max(v);
                sum[j] += v;
                known[j] += 1;
            }
        }

        let mut range = vec![0.0; d];
        let mut fill = vec![0.0; d];
        for j in 0..d {
            if known[j] == 0 {
                min[j] = 0.0;
                continue;
            }
            range[j] = max[j] - min[j];
            fill[j] = sum[j] / known[j] as f64;
        }
        Self { min, range, fill }
    }

    fn apply(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .enumerate()
            .map(|(j, &v)| {
                let v = if v.is_nan() { self.fill[j] } else { v };
                if self.range[j] > 0.0 {
                    (v - self.min[j]) / self.range[j]
                } else {
                    0.0
                }
            })
            .collect()
    }

    /// Scaled rows as a records matrix
    fn records(&self, rows: &[&[f64]]) -> Array2<f64> {
        let width = self.min.len();
        let mut records = Array2::zeros((rows.len(), width));
        for (mut out, row) in records.axis_iter_mut(Axis(0)).zip(rows) {
            out.assign(&Array1::from(self.apply(row)));
        }
        records
    }
}

/// One binary machine; `true` predicts `positive`
struct PairwiseMachine {
    positive: usize,
    negative: usize,
    svm: Svm<f64, bool>,
}

/// A fitted one-vs-one linear SVM
pub struct SvmModel {
    scaling: Scaling,
    machines: Vec<PairwiseMachine>,
    num_classes: usize,
    /// Class predicted when training saw a single class
    constant: Option<usize>,
}

impl SvmModel {
    pub fn num_machines(&self) -> usize {
        self.machines.len()
    }
}

impl Model for SvmModel {
    fn distribution(&self, row: &[f64]) -> Vec<f64> {
        let mut votes = vec![0.0; self.num_classes];
        if let Some(class) = self.constant {
            votes[class] = 1.0;
            return votes;
        }

        let record = self.scaling.records(&[row]);
        for machine in &self.machines {
            let predicted: Array1<bool> = machine.svm.predict(&record);
            let winner = if predicted.iter().any(|&p| p) {
                machine.positive
            } else {
                machine.negative
            };
            votes[winner] += 1.0;
        }
        let total = self.machines.len() as f64;
        votes.iter_mut().for_each(|v| *v /= total);
        votes
    }
}

impl Learner for LinearSvm {
    fn name(&self) -> &str {
        "linear SVM"
    }

    fn fit(&self, data: &TrainingSet, _seed: u64) -> Result<Box<dyn Model>, TrainingError> {
        Ok(Box::new(self.fit_svm(data)?))
    }
}

impl LinearSvm {
    fn params(&self) -> SvmParams<f64, bool> {
        Svm::<f64, bool>::params()
            .eps(self.eps)
            .pos_neg_weights(self.c, self.c)
            .linear_kernel()
    }

    /// Fit and return the concrete model
    pub fn fit_svm(&self, data: &TrainingSet) -> Result<SvmModel, TrainingError> {
        if data.is_empty() {
            return Err(TrainingError::EmptyTrainingSet);
        }
        let scaling = Scaling::fit(data);

        let present: Vec<usize> = data
            .class_counts()
            .iter()
            .enumerate()
            .filter(|(_, &n)| n > 0)
            .map(|(c, _)| c)
            .collect();
        let constant = (present.len() == 1).then(|| present[0]);

        let mut machines = Vec::new();
        for (i, &a) in present.iter().enumerate() {
            for &b in &present[i + 1..] {
                machines.push(self.train_pair(data, &scaling, a, b)?);
            }
        }

        Ok(SvmModel {
            scaling,
            machines,
            num_classes: data.num_classes,
            constant,
        })
    }

    fn train_pair(
        &self,
        data: &TrainingSet,
        scaling: &Scaling,
        positive: usize,
        negative: usize,
    ) -> Result<PairwiseMachine, TrainingError> {
        let (rows, targets): (Vec<&[f64]>, Vec<bool>) = data
            .rows
            .iter()
            .zip(&data.classes)
            .filter(|(_, &c)| c == positive || c == negative)
            .map(|(row, &c)| (row.as_slice(), c == positive))
            .unzip();

        let dataset = Dataset::new(scaling.records(&rows), Array1::from(targets));
        let svm = self
            .params()
            .fit(&dataset)
            .map_err(|e| TrainingError::Solver(e.to_string()))?;

        Ok(PairwiseMachine {
            positive,
            negative,
            svm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::classifier::argmax;

    #[test]
    fn test_binary_separable() {
        let rows = vec![
            vec![0.0, 5.0],
            vec![0.5, 4.0],
            vec![1.0, 6.0],
            vec![0.2, 5.5],
            vec![9.0, 5.0],
            vec![9.5, 4.5],
            vec![10.0, 6.0],
            vec![8.8, 5.2],
        ];
        let classes = vec![0, 0, 0, 0, 1, 1, 1, 1];
        let data = TrainingSet::new(rows, classes, 2).unwrap();
        let model = LinearSvm::default().fit_svm(&data).unwrap();

        assert_eq!(model.num_machines(), 1);
        assert_eq!(model.distribution(&[0.3, 5.0]), vec![1.0, 0.0]);
        assert_eq!(model.distribution(&[9.6, 5.0]), vec![0.0, 1.0]);
    }

    #[test]
    fn test_margin_kind_learner_fits_through_trait() {
        let rows: Vec<Vec<f64>> = (0..12).map(|i| vec![if i < 6 { i as f64 } else { 50.0 + i as f64 }]).collect();
        let classes: Vec<usize> = (0..12).map(|i| usize::from(i >= 6)).collect();
        let data = TrainingSet::new(rows, classes, 2).unwrap();

        let learner = crate::ensemble::ClassifierKind::Margin.learner();
        assert_eq!(learner.name(), "linear SVM");
        let model = learner.fit(&data, 3).unwrap();
        assert_eq!(model.distribution(&[1.0]), vec![1.0, 0.0]);
        assert_eq!(model.distribution(&[60.0]), vec![0.0, 1.0]);
    }

    #[test]
    fn test_three_classes_one_vs_one() {
        let rows: Vec<Vec<f64>> = [0.0, 0.5, 1.0, 10.0, 10.5, 11.0, 20.0, 20.5, 21.0]
            .iter()
            .map(|&v| vec![v])
            .collect();
        let classes = vec![0, 0, 0, 1, 1, 1, 2, 2, 2];
        let data = TrainingSet::new(rows, classes, 3).unwrap();
        let model = LinearSvm::default().fit_svm(&data).unwrap();

        assert_eq!(model.num_machines(), 3);
        let dist = model.distribution(&[0.0]);
        assert!((dist.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(argmax(&dist), 0);
        assert_eq!(argmax(&model.distribution(&[21.0])), 2);
    }

    #[test]
    fn test_single_class_is_constant() {
        let data = TrainingSet::new(vec![vec![1.0], vec![2.0]], vec![1, 1], 3).unwrap();
        let model = LinearSvm::default().fit_svm(&data).unwrap();
        assert_eq!(model.num_machines(), 0);
        assert_eq!(model.distribution(&[5.0]), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_missing_values_use_training_mean() {
        let scaling = Scaling::fit(
            &TrainingSet::new(vec![vec![0.0], vec![4.0], vec![f64::NAN]], vec![0, 1, 0], 2).unwrap(),
        );
        assert_eq!(scaling.apply(&[f64::NAN]), vec![0.5]);
        assert_eq!(scaling.apply(&[4.0]), vec![1.0]);

        let known: &[f64] = &[2.0];
        let missing: &[f64] = &[f64::NAN];
        let records = scaling.records(&[known, missing]);
        assert_eq!(records.dim(), (2, 1));
        assert_eq!(records[[0, 0]], 0.5);
        assert_eq!(records[[1, 0]], 0.5);
    }

    #[test]
    fn test_refit_gives_same_predictions() {
        let rows: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64, (i % 3) as f64]).collect();
        let classes: Vec<usize> = (0..20).map(|i| usize::from(i >= 10)).collect();
        let data = TrainingSet::new(rows, classes, 2).unwrap();
        let a = LinearSvm::default().fit_svm(&data).unwrap();
        let b = LinearSvm::default().fit_svm(&data).unwrap();
        for i in 0..20 {
            let row = [i as f64, 1.0];
            assert_eq!(a.distribution(&row), b.distribution(&row));
        }
    }
}
