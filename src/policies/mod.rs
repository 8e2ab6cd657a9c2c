mod boltzmann;
mod policy;
mod rng;

pub use boltzmann::{ActionProbabilities, BoltzmannExploration};
pub use policy::{
    Choice, ChoicePath, CloneBoxedPolicy, Degeneracy, DrawRange, ExplorationPolicy,
    Normalization, PolicyType,
};
pub use rng::{FixedDraws, MaybeSeededRng, RandomSource};
