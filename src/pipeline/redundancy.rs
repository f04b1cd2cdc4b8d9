//! Redundancy analysis: split the relevant features into non-redundant subsets
//!
//! Each round walks a working copy of the ranked relevant features from a start
//! point and drops every feature `fq` whose SU with an earlier surviving feature
//! `fp` is at least its SU with the class. The survivors of a round become one
//! ensemble member. The next round starts from the strongest feature removed in
//! the previous round, so successive members explore different near-optimal
//! subsets.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::SelectionError;
use super::relevance::RelevanceRanking;
use super::statistics::SuCache;

/// Source of SU scores between two features
pub trait PairScorer {
    fn pair_su(&mut self, fp: usize, fq: usize) -> f64;
}

impl PairScorer for SuCache<'_> {
    fn pair_su(&mut self, fp: usize, fq: usize) -> f64 {
        self.pair(fp, fq)
    }
}

/// Which features a round's classifier is restricted to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum RetentionPolicy {
    /// Only the current round's survivors
    #[default]
    PerRound,
    /// Survivors of the current round and of every earlier round
    Cumulative,
}

impl fmt::Display for RetentionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetentionPolicy::PerRound => write!(f, "per-round"),
            RetentionPolicy::Cumulative => write!(f, "cumulative"),
        }
    }
}

impl FromStr for RetentionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "per-round" | "per_round" | "round" => Ok(RetentionPolicy::PerRound),
            "cumulative" | "accumulate" => Ok(RetentionPolicy::Cumulative),
            _ => Err(format!(
                "Unknown retention policy: '{}'. Use 'per-round' or 'cumulative'.",
                s
            )),
        }
    }
}

/// Outcome of one redundancy round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetainedSet {
    /// Zero-based round number
    pub round: usize,
    /// Feature the scan started from
    pub start_point: usize,
    /// Features surviving this round's scan, in rank order
    pub survivors: Vec<usize>,
    /// Features removed this round, in removal order
    pub removed: Vec<usize>,
    /// Features the round's classifier filters to, ascending by index
    pub retained: Vec<usize>,
}

/// Iterator over redundancy rounds, one [`RetainedSet`] per ensemble member
pub struct RedundancyEliminator<'a, S: PairScorer> {
    ranking: &'a RelevanceRanking,
    scorer: S,
    max_rounds: usize,
    policy: RetentionPolicy,
    round: usize,
    previous_removed: Vec<usize>,
    accumulated: BTreeSet<usize>,
    finished: bool,
}

impl<'a, S: PairScorer> RedundancyEliminator<'a, S> {
    /// Create an eliminator producing at most `number_of_classifiers` rounds
    pub fn new(
        ranking: &'a RelevanceRanking,
        scorer: S,
        number_of_classifiers: usize,
        policy: RetentionPolicy,
    ) -> Result<Self, SelectionError> {
        if number_of_classifiers == 0 {
            return Err(SelectionError::InvalidEnsembleSize(number_of_classifiers));
        }
        if ranking.is_empty() {
            return Err(SelectionError::NoRelevantFeatures {
                threshold: ranking.threshold,
            });
        }
        Ok(Self {
            ranking,
            scorer,
            max_rounds: number_of_classifiers,
            policy,
            round: 0,
            previous_removed: Vec::new(),
            accumulated: BTreeSet::new(),
            finished: false,
        })
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// First round: the top-ranked feature. Later rounds: the previous round's
    /// removed feature with the highest class SU (earliest removal wins ties).
    fn start_point(&self) -> usize {
        let mut start = self.ranking.relevant[0];
        let mut best = f64::NEG_INFINITY;
        for &feature in &self.previous_removed {
            let score = self.ranking.score(feature);
            if score > best {
                best = score;
                start = feature;
            }
        }
        start
    }

    /// Pairwise dominance scan over the ranked features from `start` onward
    fn scan(&mut self, start: usize) -> (Vec<usize>, Vec<usize>) {
        let offset = self.ranking.position(start).unwrap_or(0);
        let mut candidates: Vec<usize> = self.ranking.relevant[offset..].to_vec();
        let mut removed = Vec::new();

        // fq is only ever removed after fp's position, so `p` stays valid
        let mut p = 0;
        while p + 1 < candidates.len() {
            let fp = candidates[p];
            let mut q = p + 1;
            while q < candidates.len() {
                let fq = candidates[q];
                if self.scorer.pair_su(fp, fq) >= self.ranking.score(fq) {
                    removed.push(candidates.remove(q));
                } else {
                    q += 1;
                }
            }
            p += 1;
        }

        (candidates, removed)
    }
}

impl<S: PairScorer> Iterator for RedundancyEliminator<'_, S> {
    type Item = RetainedSet;

    fn next(&mut self) -> Option<RetainedSet> {
        if self.finished {
            return None;
        }

        let start_point = self.start_point();
        let (survivors, removed) = self.scan(start_point);

        let retained: Vec<usize> = match self.policy {
            RetentionPolicy::PerRound => {
                let mut features = survivors.clone();
                features.sort_unstable();
                features
            }
            RetentionPolicy::Cumulative => {
                self.accumulated.extend(survivors.iter().copied());
                self.accumulated.iter().copied().collect()
            }
        };

        let set = RetainedSet {
            round: self.round,
            start_point,
            survivors,
            removed: removed.clone(),
            retained,
        };

        self.round += 1;
        if removed.is_empty() || self.round >= self.max_rounds {
            self.finished = true;
        }
        self.previous_removed = removed;

        Some(set)
    }
}
