//! Ensemble module - base learners, feature filtering and voting

pub mod classifier;
pub mod filter;
pub mod svm;
pub mod tree;
pub mod vote;

pub use classifier::{argmax, ClassifierKind, Learner, Model, TrainingError, TrainingSet};
pub use filter::{FeatureFilter, FilteredModel};
pub use svm::{LinearSvm, SvmModel};
pub use tree::{DecisionTree, TreeModel};
pub use vote::{AverageVote, ClassifierSpec, Ensemble, EnsembleBuilder, FittedEnsemble};

use serde::Serialize;

use crate::pipeline::{
    DiscreteDataset, RedundancyEliminator, RelevanceRanking, RetainedSet, RetentionPolicy,
    SelectionError, SuCache,
};

/// Ensemble produced by the redundancy rounds, with the rounds that built it
#[derive(Debug, Clone, Serialize)]
pub struct SelectionOutcome {
    pub ensemble: Ensemble,
    pub rounds: Vec<RetainedSet>,
    /// Distinct feature pairs whose SU was computed
    pub pairs_evaluated: usize,
}

/// Run redundancy rounds over `ranking` and add one member per round.
///
/// Stops when a round removes nothing or once `ensemble_size` members exist.
pub fn select_ensemble(
    data: &DiscreteDataset,
    ranking: &RelevanceRanking,
    kind: ClassifierKind,
    ensemble_size: usize,
    policy: RetentionPolicy,
) -> Result<SelectionOutcome, SelectionError> {
    let mut builder = EnsembleBuilder::new(kind, ensemble_size)?;
    let mut eliminator =
        RedundancyEliminator::new(ranking, SuCache::new(data), ensemble_size, policy)?;

    let mut rounds = Vec::new();
    for set in eliminator.by_ref() {
        builder.push(&set)?;
        rounds.push(set);
    }

    Ok(SelectionOutcome {
        ensemble: builder.build(),
        rounds,
        pairs_evaluated: eliminator.scorer().pairs_evaluated(),
    })
}
