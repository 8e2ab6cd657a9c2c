use super::boltzmann::BoltzmannExploration;

use crate::errors::PolicyError;

use serde::{Deserialize, Serialize};

/// How the per-action exponentials are normalized before sampling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Weights use `exp(x / t)` but the normalizer sums `exp(x / t²)`.
    /// Sampling renormalizes, so only overflow and underflow of the normalizer are observable.
    #[default]
    Literal,
    /// Weights and normalizer both use `exp((x - max) / t)`.
    Consistent,
}

/// Range of the random value compared against cumulative probabilities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawRange {
    /// Uniform in `[0, 1)`.
    #[default]
    Unit,
    /// Integer in `[0, i32::MAX)`. A draw of 0 picks the first action, any draw
    /// above 1 misses every cumulative probability and ends on the last action.
    Integer,
}

/// What to do when the probabilities cannot be computed in the requested form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degeneracy {
    /// Sample from the max-shifted form, or uniformly among the best actions when t is 0.
    #[default]
    Saturate,
    Fail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoicePath {
    /// The draw fell within the cumulative probability of the chosen action.
    Sampled,
    /// The draw exceeded every cumulative probability, the last action was returned.
    Fallback,
    /// The probabilities were degenerate and rebuilt before sampling.
    Saturated,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Choice {
    pub action: usize,
    pub draw: f64,
    pub path: ChoicePath,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyType {
    Boltzmann {
        temperature: f64,
        seed: Option<u64>,
        #[serde(default)]
        normalization: Normalization,
        #[serde(default)]
        draw_range: DrawRange,
        #[serde(default)]
        on_degenerate: Degeneracy,
    },
}

impl PolicyType {
    pub fn into_inner(self) -> Box<dyn ExplorationPolicy + Send> {
        match self {
            PolicyType::Boltzmann {
                temperature,
                seed,
                normalization,
                draw_range,
                on_degenerate,
            } => Box::new(
                BoltzmannExploration::new(temperature, seed)
                    .with_normalization(normalization)
                    .with_draw_range(draw_range)
                    .with_degeneracy(on_degenerate),
            ),
        }
    }
}

impl Clone for Box<dyn ExplorationPolicy + Send> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

pub trait CloneBoxedPolicy {
    fn clone_box(&self) -> Box<dyn ExplorationPolicy + Send>;
}

pub trait ExplorationPolicy: Send + CloneBoxedPolicy {
    /// Description that rebuilds this policy through [`PolicyType::into_inner`].
    /// Only the seed of a [`MaybeSeededRng`](super::MaybeSeededRng) is carried: any
    /// other random source, such as [`FixedDraws`](super::FixedDraws), reports no seed
    /// and is rebuilt on an entropy-seeded generator.
    fn policy_type(&self) -> PolicyType;
    fn temperature(&self) -> f64;
    fn set_temperature(&mut self, temperature: f64);
    fn choose(&mut self, estimates: &[f64]) -> Result<Choice, PolicyError>;

    fn choose_action(&mut self, estimates: &[f64]) -> Result<usize, PolicyError> {
        self.choose(estimates).map(|Choice { action, .. }| action)
    }
}
