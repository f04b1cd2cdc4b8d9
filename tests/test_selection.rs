//! Integration tests for the relevance/redundancy engine

use std::collections::HashMap;

use ecbgs::ensemble::{select_ensemble, ClassifierKind};
use ecbgs::pipeline::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn discretized_fixture() -> DiscreteDataset {
    let data = Dataset::from_dataframe(&create_expression_dataframe(), None).unwrap();
    let (discrete, _) = discretize_dataset(&data, false).unwrap();
    discrete
}

/// Fixed SU table standing in for the statistics
struct TableScorer(HashMap<(usize, usize), f64>);

impl TableScorer {
    fn new(pairs: &[((usize, usize), f64)]) -> Self {
        let mut table = HashMap::new();
        for &((a, b), su) in pairs {
            table.insert((a, b), su);
            table.insert((b, a), su);
        }
        Self(table)
    }
}

impl PairScorer for TableScorer {
    fn pair_su(&mut self, fp: usize, fq: usize) -> f64 {
        self.0.get(&(fp, fq)).copied().unwrap_or(0.0)
    }
}

#[test]
fn test_entropy_bounds_and_symmetry() {
    let discrete = discretized_fixture();
    let stats = FeatureStatistics::new(&discrete);

    for f in 0..discrete.num_features() {
        let x = Variable::Feature(f);
        let h = stats.entropy(x);
        let distinct = discrete.distinct_count(f).max(1) as f64;
        assert!(h >= 0.0 && h <= distinct.log2() + 1e-12, "entropy out of bounds for {}", f);

        let forward = stats.symmetric_uncertainty(x, Variable::Class);
        let backward = stats.symmetric_uncertainty(Variable::Class, x);
        assert!((forward - backward).abs() < 1e-9);
        assert!((0.0..=1.0 + 1e-12).contains(&forward));
    }
}

#[test]
fn test_constant_feature_degenerate_su() {
    let discrete = DiscreteDataset::from_rows(&[vec![0], vec![0], vec![0]], vec![1, 1, 1]).unwrap();
    let stats = FeatureStatistics::new(&discrete);
    assert_eq!(stats.entropy(Variable::Feature(0)), 0.0);
    assert_eq!(stats.symmetric_uncertainty(Variable::Feature(0), Variable::Class), 1.0);
}

#[test]
fn test_fixture_relevance() {
    let discrete = discretized_fixture();
    let ranking = analyze_relevance(&discrete, 0.0).unwrap();

    // gene_a and gene_b separate the classes perfectly; gene_noise carries nothing
    assert!((ranking.score(0) - 1.0).abs() < 1e-12);
    assert!((ranking.score(1) - 1.0).abs() < 1e-12);
    assert_eq!(ranking.score(2), 0.0);
    assert_eq!(ranking.len, 2);
    // Exact tie: the higher index comes first
    assert_eq!(ranking.relevant, vec![1, 0]);
}

#[test]
fn test_threshold_zero_counts_positive_scores() {
    let scores = vec![0.0, 0.2, 0.0, 0.05, 0.9];
    let ranking = rank_features(scores.clone(), 0.0).unwrap();
    assert_eq!(ranking.len, scores.iter().filter(|&&s| s > 0.0).count());
    assert_eq!(ranking.relevant, vec![4, 1, 3]);
}

#[test]
fn test_ranking_is_idempotent() {
    let scores = vec![0.3, 0.7, 0.7, 0.1, 0.5];
    let first = rank_features(scores.clone(), 0.2).unwrap();
    let second = rank_features(scores, 0.2).unwrap();
    assert_eq!(first.relevant, second.relevant);
}

#[test]
fn test_invalid_threshold() {
    assert_eq!(
        rank_features(vec![0.5], 1.5).unwrap_err(),
        SelectionError::InvalidThreshold(1.5)
    );
}

#[test]
fn test_four_feature_scenario() {
    // A, B, C, D with SU-to-class 0.8, 0.6, 0.3, 0.1 and threshold 0.2
    let ranking = rank_features(vec![0.8, 0.6, 0.3, 0.1], 0.2).unwrap();
    assert_eq!(ranking.len, 3);
    assert_eq!(ranking.relevant, vec![0, 1, 2]);

    let scorer = TableScorer::new(&[((0, 1), 0.65), ((0, 2), 0.1), ((1, 2), 0.1)]);
    let single: Vec<RetainedSet> = RedundancyEliminator::new(&ranking, scorer, 1, RetentionPolicy::PerRound)
        .unwrap()
        .collect();
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].retained, vec![0, 2]);
    assert_eq!(single[0].removed, vec![1]);

    let scorer = TableScorer::new(&[((0, 1), 0.65), ((0, 2), 0.1), ((1, 2), 0.1)]);
    let rounds: Vec<RetainedSet> = RedundancyEliminator::new(&ranking, scorer, 5, RetentionPolicy::PerRound)
        .unwrap()
        .collect();
    assert_eq!(rounds.len(), 2);
    assert_eq!(rounds[1].start_point, 1);
    assert_eq!(rounds[1].retained, vec![1, 2]);
    assert!(rounds[1].removed.is_empty());
}

#[test]
fn test_member_limit_is_respected() {
    // Every later feature is dominated by its predecessor, so rounds never run dry
    let ranking = rank_features(vec![0.9, 0.8, 0.7, 0.6, 0.5, 0.4], 0.0).unwrap();
    let mut pairs = Vec::new();
    for a in 0..6 {
        for b in (a + 1)..6 {
            pairs.push(((a, b), 0.95));
        }
    }
    let rounds: Vec<RetainedSet> =
        RedundancyEliminator::new(&ranking, TableScorer::new(&pairs), 3, RetentionPolicy::PerRound)
            .unwrap()
            .collect();
    assert_eq!(rounds.len(), 3);
    assert_eq!(rounds[0].retained, vec![0]);
    assert_eq!(rounds[1].start_point, 1);
    assert_eq!(rounds[2].start_point, 2);
}

#[test]
fn test_select_ensemble_on_fixture() {
    let discrete = discretized_fixture();
    let ranking = analyze_relevance(&discrete, 0.0).unwrap();

    let outcome = select_ensemble(&discrete, &ranking, ClassifierKind::Tree, 5, RetentionPolicy::PerRound).unwrap();

    assert_eq!(outcome.rounds.len(), 2);
    assert_eq!(outcome.rounds[0].retained, vec![1]);
    assert_eq!(outcome.rounds[0].removed, vec![0]);
    assert_eq!(outcome.rounds[1].retained, vec![0]);
    assert_eq!(outcome.ensemble.len(), 2);
    assert_eq!(outcome.pairs_evaluated, 1);
    assert!(outcome
        .ensemble
        .members
        .iter()
        .all(|m| m.kind == ClassifierKind::Tree));
}

#[test]
fn test_cumulative_retention() {
    let discrete = discretized_fixture();
    let ranking = analyze_relevance(&discrete, 0.0).unwrap();

    let outcome =
        select_ensemble(&discrete, &ranking, ClassifierKind::Margin, 5, RetentionPolicy::Cumulative).unwrap();
    assert_eq!(outcome.ensemble.members[0].features, vec![1]);
    assert_eq!(outcome.ensemble.members[1].features, vec![0, 1]);
}

#[test]
fn test_ensemble_size_one_gives_one_member() {
    let discrete = discretized_fixture();
    let ranking = analyze_relevance(&discrete, 0.0).unwrap();
    let outcome = select_ensemble(&discrete, &ranking, ClassifierKind::Tree, 1, RetentionPolicy::PerRound).unwrap();
    assert_eq!(outcome.ensemble.len(), 1);
}

#[test]
fn test_no_relevant_features() {
    let discrete = discretized_fixture();
    let ranking = analyze_relevance(&discrete, 1.0).unwrap();
    assert!(ranking.is_empty());

    let err = select_ensemble(&discrete, &ranking, ClassifierKind::Tree, 3, RetentionPolicy::PerRound).unwrap_err();
    assert_eq!(err, SelectionError::NoRelevantFeatures { threshold: 1.0 });
}
