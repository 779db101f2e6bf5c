use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid network shape {input_size}x{hidden_size}x{output_size}: every layer needs at least one neuron")]
    InvalidShape {
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
    },

    #[error("expected {expected} parameters for this shape, got {actual}")]
    ParameterCountMismatch { expected: usize, actual: usize },

    #[error("symbol {symbol} at position {position} is out of range (must be below {limit})")]
    SequenceSymbolOutOfRange {
        position: usize,
        symbol: usize,
        limit: usize,
    },

    #[error("symbol {symbol} has no one-hot slot (must be below {limit})")]
    SymbolOutOfRange { symbol: usize, limit: usize },

    #[error("weight matrices do not fit a {input_size}x{hidden_size}x{output_size} network")]
    WeightShapeMismatch {
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
    },

    #[error("input vector has length {actual}, network expects {expected} (bias included)")]
    InputWidthMismatch { expected: usize, actual: usize },

    #[error("population is empty")]
    EmptyPopulation,

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}
