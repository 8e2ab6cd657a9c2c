pub mod config;
pub mod errors;
pub mod policies;

pub use config::AppConfig;
pub use errors::{PolicyError, SetupError};
pub use policies::{
    ActionProbabilities, BoltzmannExploration, Choice, ChoicePath, Degeneracy, DrawRange,
    ExplorationPolicy, FixedDraws, MaybeSeededRng, Normalization, PolicyType, RandomSource,
};
