use rand::seq::SliceRandom;
use rand::Rng;

use crate::decay::Decay;
use crate::env::Action;
use crate::table::ValueVector;
use strum::VariantArray;

/// Exploration policy result
pub enum Choice {
    Explore,
    Exploit,
}

/// Epsilon greedy policy over an action-value vector, with uniform tie-breaking
///
/// Action indices are partitioned into a best set (value exactly equal to the
/// maximum; exact comparison is sound because values only arise from identical
/// zero initialization or identical update arithmetic) and the rest. With
/// probability `1 - epsilon`, or whenever every action is best, the choice is
/// uniform over the best set; otherwise it is uniform over the rest.
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// Invoke epsilon greedy policy at time `t`
    pub fn choose(&self, t: f64, rng: &mut impl Rng) -> Choice {
        if rng.gen::<f64>() < self.epsilon.evaluate(t) {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }

    /// Select an action from `values` at time `t`
    pub fn select(&self, t: f64, values: &ValueVector, rng: &mut impl Rng) -> Action {
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let (best, rest): (Vec<usize>, Vec<usize>) =
            (0..values.len()).partition(|&i| values[i] == max);

        let pool = match self.choose(t, rng) {
            Choice::Explore if !rest.is_empty() => &rest,
            _ => &best,
        };
        let i = *pool
            .choose(rng)
            .expect("the best set holds at least the argmax");
        Action::VARIANTS[i]
    }
}
