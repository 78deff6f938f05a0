use std::fmt;

/// Errors raised when a particle session is created from invalid parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// At least one particle is required.
    EmptyPopulation,
    /// Viewport dimensions must be non-zero.
    InvalidViewport { width: u32, height: u32 },
    /// A sampling range has a bad bound (negative, non-finite, or min > max).
    InvalidRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::EmptyPopulation => write!(f, "particle count must be at least 1"),
            SimError::InvalidViewport { width, height } => {
                write!(f, "viewport {}x{} must have positive dimensions", width, height)
            }
            SimError::InvalidRange { name, min, max } => {
                write!(f, "{} range {}..{} is invalid", name, min, max)
            }
        }
    }
}

impl std::error::Error for SimError {}
