use crate::direction::Direction;

/// Result type for windvane level calculations.
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("divider impedance must be at least 1 ohm, got {divider}")]
    InvalidParameter { divider: f64 },

    #[error("level bits must be at most 31, got {0}")]
    InvalidLevelBits(u32),

    #[error("unable to find best impedance for divider: {0}")]
    OptimizationFailed(String),

    #[error("resistance for {direction} must be positive, got {ohms}")]
    InvalidResistance { direction: Direction, ohms: f64 },

    #[error("invalid search bounds ({low}, {high}): need 1 <= low < high")]
    InvalidBounds { low: f64, high: f64 },

    #[error("need at least 2 switch positions to separate, got {0}")]
    TooFewPositions(usize),

    #[error("unknown compass direction: {0:?}")]
    UnknownDirection(String),
}
