use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("No action estimates to choose from")]
    EmptyEstimates,
    #[error("Action estimate {index} is NaN")]
    InvalidEstimate { index: usize },
    #[error("Degenerate action probabilities at temperature {temperature}")]
    NumericDegeneracy { temperature: f64 },
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("Cannot install tracing subscriber: {0}")]
    Tracing(String),
}
