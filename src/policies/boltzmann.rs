use super::policy::{
    Choice, ChoicePath, CloneBoxedPolicy, Degeneracy, DrawRange, ExplorationPolicy,
    Normalization, PolicyType,
};
use super::rng::{MaybeSeededRng, RandomSource};

use crate::errors::PolicyError;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

fn clamp_temperature(temperature: f64) -> f64 {
    // f64::max discards NaN
    temperature.max(0.0)
}

fn non_negative<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_temperature)
}

/// Action probabilities before the final division by their sum. Sampling walks `values[i] / sum`.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionProbabilities {
    values: Vec<f64>,
    sum: f64,
}

impl ActionProbabilities {
    fn literal(estimates: &[f64], temperature: f64) -> Self {
        let mut values = Vec::with_capacity(estimates.len());
        let mut normalizer = 0.0;

        for &estimate in estimates {
            values.push((estimate / temperature).exp());
            normalizer += (estimate / (temperature * temperature)).exp();
        }
        values.iter_mut().for_each(|p| *p /= normalizer);

        Self::from_values(values)
    }

    fn consistent(estimates: &[f64], temperature: f64) -> Self {
        let max = max_estimate(estimates);
        let weights = estimates
            .iter()
            .map(|&estimate| ((estimate - max) / temperature).exp())
            .collect::<Vec<f64>>();
        let normalizer = weights.iter().sum::<f64>();

        Self::from_values(weights.into_iter().map(|w| w / normalizer).collect())
    }

    // stable form, never degenerate for NaN-free estimates
    fn saturated(estimates: &[f64], temperature: f64) -> Self {
        let max = max_estimate(estimates);
        let values = if temperature > 0.0 && max.is_finite() {
            estimates
                .iter()
                .map(|&estimate| ((estimate - max) / temperature).exp())
                .collect()
        } else {
            estimates
                .iter()
                .map(|&estimate| if estimate == max { 1.0 } else { 0.0 })
                .collect()
        };

        Self::from_values(values)
    }

    fn from_values(values: Vec<f64>) -> Self {
        let sum = values.iter().sum();
        Self { values, sum }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn normalized(&self) -> Vec<f64> {
        self.values.iter().map(|p| p / self.sum).collect()
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.sum.is_finite() && self.sum > 0.0) || self.values.iter().any(|p| !p.is_finite())
    }

    /// First action whose cumulative probability reaches `draw`. With `skip_zero`,
    /// actions with a probability of exactly 0 are never selected.
    fn select(&self, draw: f64, skip_zero: bool) -> Option<usize> {
        let mut cumulative = 0.0;
        self.values.iter().position(|&p| {
            cumulative += p / self.sum;
            (p > 0.0 || !skip_zero) && draw <= cumulative
        })
    }
}

fn max_estimate(estimates: &[f64]) -> f64 {
    estimates
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Boltzmann distribution exploration: action `i` is drawn with probability
/// proportional to `exp(estimates[i] / temperature)`.
///
/// The temperature is clamped to be non-negative on construction, on update and
/// when deserialized. High temperatures flatten the distribution towards uniform,
/// low ones concentrate it on the best estimates.
///
/// Each choice consumes exactly one draw from the random source:
/// - with [`DrawRange::Unit`] the draw is uniform in `[0, 1)` and the walk over
///   cumulative probabilities is a proper weighted sample, skipping actions whose
///   probability is exactly 0;
/// - with [`DrawRange::Integer`] the draw is an integer in `[0, i32::MAX)` and the
///   walk returns the first action with `draw <= cumulative`: a draw of 0 always
///   picks the first action, even at probability 0, and anything above 1 ends on
///   the last one through [`ChoicePath::Fallback`].
///
/// When the probabilities are degenerate (zero temperature, overflowing or
/// underflowing exponentials, infinite estimates) the policy either rebuilds them
/// in the max-shifted form, uniform over the best estimates when the temperature
/// is 0, or fails with [`PolicyError::NumericDegeneracy`], see [`Degeneracy`].
///
/// Not synchronized: wrap in a lock or use one instance per thread.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoltzmannExploration<R = MaybeSeededRng> {
    #[serde(deserialize_with = "non_negative")]
    temperature: f64,
    #[serde(default)]
    normalization: Normalization,
    #[serde(default)]
    draw_range: DrawRange,
    #[serde(default)]
    on_degenerate: Degeneracy,
    rng: R,
}

impl BoltzmannExploration<MaybeSeededRng> {
    pub fn new(temperature: f64, seed: Option<u64>) -> Self {
        Self::with_source(temperature, MaybeSeededRng::new(seed))
    }
}

impl<R: RandomSource> BoltzmannExploration<R> {
    pub fn with_source(temperature: f64, rng: R) -> Self {
        Self {
            temperature: clamp_temperature(temperature),
            normalization: Normalization::default(),
            draw_range: DrawRange::default(),
            on_degenerate: Degeneracy::default(),
            rng,
        }
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn with_draw_range(mut self, draw_range: DrawRange) -> Self {
        self.draw_range = draw_range;
        self
    }

    pub fn with_degeneracy(mut self, on_degenerate: Degeneracy) -> Self {
        self.on_degenerate = on_degenerate;
        self
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn set_temperature(&mut self, temperature: f64) {
        self.temperature = clamp_temperature(temperature);
    }

    pub fn action_probabilities(
        &self,
        estimates: &[f64],
    ) -> Result<ActionProbabilities, PolicyError> {
        if estimates.is_empty() {
            return Err(PolicyError::EmptyEstimates);
        }
        if let Some(index) = estimates.iter().position(|estimate| estimate.is_nan()) {
            return Err(PolicyError::InvalidEstimate { index });
        }

        Ok(match self.normalization {
            Normalization::Literal => ActionProbabilities::literal(estimates, self.temperature),
            Normalization::Consistent => {
                ActionProbabilities::consistent(estimates, self.temperature)
            }
        })
    }

    pub fn choose(&mut self, estimates: &[f64]) -> Result<Choice, PolicyError> {
        let probabilities = self.action_probabilities(estimates)?;

        let (probabilities, saturated) = if probabilities.is_degenerate() {
            match self.on_degenerate {
                Degeneracy::Fail => {
                    return Err(PolicyError::NumericDegeneracy {
                        temperature: self.temperature,
                    })
                }
                Degeneracy::Saturate => {
                    debug!(
                        temperature = %self.temperature,
                        actions = %estimates.len(),
                        "Saturating degenerate action probabilities"
                    );
                    (
                        ActionProbabilities::saturated(estimates, self.temperature),
                        true,
                    )
                }
            }
        } else {
            (probabilities, false)
        };

        let (draw, skip_zero) = match self.draw_range {
            DrawRange::Unit => (self.rng.next_unit(), true),
            DrawRange::Integer => (self.rng.next_non_negative() as f64, false),
        };

        let choice = match probabilities.select(draw, skip_zero) {
            Some(action) => Choice {
                action,
                draw,
                path: if saturated {
                    ChoicePath::Saturated
                } else {
                    ChoicePath::Sampled
                },
            },
            None => Choice {
                action: estimates.len() - 1,
                draw,
                path: ChoicePath::Fallback,
            },
        };

        debug!(action = %choice.action, draw = %choice.draw, path = ?choice.path, "Chose action");
        Ok(choice)
    }

    pub fn choose_action(&mut self, estimates: &[f64]) -> Result<usize, PolicyError> {
        self.choose(estimates).map(|Choice { action, .. }| action)
    }
}

impl<R> CloneBoxedPolicy for BoltzmannExploration<R>
where
    R: RandomSource + Clone + Send + 'static,
{
    fn clone_box(&self) -> Box<dyn ExplorationPolicy + Send> {
        Box::new(self.clone())
    }
}

impl<R> ExplorationPolicy for BoltzmannExploration<R>
where
    R: RandomSource + Clone + Send + 'static,
{
    fn policy_type(&self) -> PolicyType {
        PolicyType::Boltzmann {
            temperature: self.temperature,
            seed: self.rng.seed(),
            normalization: self.normalization,
            draw_range: self.draw_range,
            on_degenerate: self.on_degenerate,
        }
    }

    fn temperature(&self) -> f64 {
        Self::temperature(self)
    }

    fn set_temperature(&mut self, temperature: f64) {
        Self::set_temperature(self, temperature)
    }

    fn choose(&mut self, estimates: &[f64]) -> Result<Choice, PolicyError> {
        Self::choose(self, estimates)
    }
}
