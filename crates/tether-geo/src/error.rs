use thiserror::Error;

#[derive(Debug, Error)]
pub enum FenceError {
    /// Radius (or another fence setting) failed boundary validation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
