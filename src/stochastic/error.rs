use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
  #[error("invalid parameters: {0}")]
  InvalidParameters(String),
  #[error("a simulation needs at least one path")]
  EmptyPaths,
  #[error("a simulation needs at least one time step")]
  NoSteps,
  #[error("row {index} is outside 0..={num_steps}")]
  RowOutOfRange { index: usize, num_steps: usize },
  #[error("row has {actual} values, expected {expected}")]
  RowLength { expected: usize, actual: usize },
}
