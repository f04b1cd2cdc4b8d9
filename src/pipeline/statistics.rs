//! Information-theoretic statistics over discretized variables
//!
//! Entropy, conditional entropy, information gain and symmetric uncertainty (SU)
//! between any two variables of a [`DiscreteDataset`], where a variable is either
//! a feature column or the class label. All probabilities are empirical
//! frequencies over every row; a missing code counts toward the row total but
//! toward no value.

use std::collections::HashMap;

use rayon::prelude::*;

use super::dataset::{DiscreteDataset, MISSING};

/// A column of the discretized matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    Feature(usize),
    Class,
}

/// Stateless statistics over a borrowed [`DiscreteDataset`]
#[derive(Debug, Clone, Copy)]
pub struct FeatureStatistics<'a> {
    data: &'a DiscreteDataset,
}

impl<'a> FeatureStatistics<'a> {
    pub fn new(data: &'a DiscreteDataset) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &'a DiscreteDataset {
        self.data
    }

    fn codes(&self, var: Variable) -> &'a [u32] {
        match var {
            Variable::Feature(f) => self.data.column(f),
            Variable::Class => self.data.class_codes(),
        }
    }

    fn cardinality(&self, var: Variable) -> usize {
        match var {
            Variable::Feature(f) => self.data.cardinality(f) as usize,
            Variable::Class => self.data.class_cardinality() as usize,
        }
    }

    fn histogram(&self, var: Variable) -> Vec<usize> {
        let mut counts = vec![0usize; self.cardinality(var)];
        for &code in self.codes(var) {
            if code != MISSING {
                counts[code as usize] += 1;
            }
        }
        counts
    }

    /// Empirical frequency of `value` in `var`
    pub fn partial_prob(&self, var: Variable, value: u32) -> f64 {
        let n = self.data.num_instances();
        let count = self.codes(var).iter().filter(|&&c| c == value).count();
        if count == 0 || value == MISSING {
            0.0
        } else {
            count as f64 / n as f64
        }
    }

    /// H(X) in bits
    pub fn entropy(&self, var: Variable) -> f64 {
        let n = self.data.num_instances() as f64;
        let entropy: f64 = self
            .histogram(var)
            .into_iter()
            .filter(|&c| c > 0)
            .map(|c| {
                let p = c as f64 / n;
                p * p.log2()
            })
            .sum();
        -entropy
    }

    /// Empirical P(X = value_x | Y = value_y); 0 when Y never takes `value_y`
    pub fn partial_cond_prob(&self, x: Variable, value_x: u32, y: Variable, value_y: u32) -> f64 {
        let mut num = 0usize;
        let mut den = 0usize;
        for (&cx, &cy) in self.codes(x).iter().zip(self.codes(y)) {
            if cy == value_y && cy != MISSING {
                den += 1;
                if cx == value_x && cx != MISSING {
                    num += 1;
                }
            }
        }
        if den == 0 {
            0.0
        } else {
            num as f64 / den as f64
        }
    }

    /// H(X | Y) in bits, from a single contingency-table pass
    pub fn conditional_entropy(&self, x: Variable, y: Variable) -> f64 {
        let n = self.data.num_instances() as f64;
        let card_x = self.cardinality(x);
        let card_y = self.cardinality(y);

        // joint[y * card_x + x]; y_counts include rows where X is missing
        let mut joint = vec![0usize; card_x * card_y];
        let mut y_counts = vec![0usize; card_y];
        for (&cx, &cy) in self.codes(x).iter().zip(self.codes(y)) {
            if cy == MISSING {
                continue;
            }
            y_counts[cy as usize] += 1;
            if cx != MISSING {
                joint[cy as usize * card_x + cx as usize] += 1;
            }
        }

        let mut total = 0.0;
        for (vy, &count_y) in y_counts.iter().enumerate() {
            if count_y == 0 {
                continue;
            }
            let p_y = count_y as f64 / n;
            let inner: f64 = joint[vy * card_x..(vy + 1) * card_x]
                .iter()
                .filter(|&&c| c > 0)
                .map(|&c| {
                    let p = c as f64 / count_y as f64;
                    p * p.log2()
                })
                .sum();
            total += p_y * inner;
        }
        -total
    }

    /// IG(X, Y) = H(X) - H(X | Y)
    pub fn information_gain(&self, x: Variable, y: Variable) -> f64 {
        self.entropy(x) - self.conditional_entropy(x, y)
    }

    /// SU(X, Y) = 2 * IG(X, Y) / (H(X) + H(Y)), or 1 when both entropies are 0
    pub fn symmetric_uncertainty(&self, x: Variable, y: Variable) -> f64 {
        let hx = self.entropy(x);
        let hy = self.entropy(y);
        su_from_parts(hx, hy, hx - self.conditional_entropy(x, y))
    }

    /// SU of every feature with the class, in feature order
    pub fn class_scores(&self) -> Vec<f64> {
        let h_class = self.entropy(Variable::Class);
        (0..self.data.num_features())
            .into_par_iter()
            .map(|f| {
                let var = Variable::Feature(f);
                let hf = self.entropy(var);
                su_from_parts(hf, h_class, hf - self.conditional_entropy(var, Variable::Class))
            })
            .collect()
    }
}

fn su_from_parts(hx: f64, hy: f64, ig: f64) -> f64 {
    let denom = hx + hy;
    if denom == 0.0 {
        1.0
    } else {
        2.0 * ig / denom
    }
}

/// Memoized SU between feature pairs visited by the redundancy scan.
///
/// Feature entropies are computed at most once; pair scores are keyed by the
/// ordered pair `(fp, fq)` so the value reused is exactly the one first computed.
#[derive(Debug)]
pub struct SuCache<'a> {
    stats: FeatureStatistics<'a>,
    entropies: HashMap<Variable, f64>,
    pairs: HashMap<(usize, usize), f64>,
}

impl<'a> SuCache<'a> {
    pub fn new(data: &'a DiscreteDataset) -> Self {
        Self {
            stats: FeatureStatistics::new(data),
            entropies: HashMap::new(),
            pairs: HashMap::new(),
        }
    }

    pub fn statistics(&self) -> FeatureStatistics<'a> {
        self.stats
    }

    pub fn entropy(&mut self, var: Variable) -> f64 {
        let stats = self.stats;
        *self.entropies.entry(var).or_insert_with(|| stats.entropy(var))
    }

    /// SU(fp, fq), computed on first request
    pub fn pair(&mut self, fp: usize, fq: usize) -> f64 {
        if let Some(&su) = self.pairs.get(&(fp, fq)) {
            return su;
        }
        let x = Variable::Feature(fp);
        let y = Variable::Feature(fq);
        let hx = self.entropy(x);
        let hy = self.entropy(y);
        let su = su_from_parts(hx, hy, hx - self.stats.conditional_entropy(x, y));
        self.pairs.insert((fp, fq), su);
        su
    }

    /// Number of distinct feature pairs evaluated so far
    pub fn pairs_evaluated(&self) -> usize {
        self.pairs.len()
    }
}
