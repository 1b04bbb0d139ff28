use crate::{
    error::{Error, Result},
    levels::{DividerPosition, MAX_LEVEL_BITS},
};

/// Bits of ADC output used when none are given.
pub const DEFAULT_LEVEL_BITS: u32 = 12;

/// Divider impedances (ohms) searched when no bounds are given.
pub const DEFAULT_BOUNDS: (f64, f64) = (100.0, 200000.0);

/// Settings shared by evaluation and the divider search.
///
/// - `level_bits`: The precision of the ADC in bits (eg. for 12-bit precision, use `12`)
/// - `bounds`: The `(low, high)` divider impedances to search between (ohms)
/// - `divider_position`: Which side of the ADC pin the divider sits on
///
/// # Examples
///
/// ```
/// use windvane_adc_levels::{Config, DividerPosition};
///
/// let config = Config {
///     level_bits: 10,
///     bounds: (1000.0, 10000.0),
///     divider_position: DividerPosition::Supply,
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub level_bits: u32,
    pub bounds: (f64, f64),
    pub divider_position: DividerPosition,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level_bits: DEFAULT_LEVEL_BITS,
            bounds: DEFAULT_BOUNDS,
            divider_position: DividerPosition::default(),
        }
    }
}

impl Config {
    /// Checks that every divider inside `bounds` is a valid impedance and
    /// that `level_bits` fits an ADC word.
    pub fn validate(&self) -> Result<()> {
        if self.level_bits > MAX_LEVEL_BITS {
            return Err(Error::InvalidLevelBits(self.level_bits));
        }

        let (low, high) = self.bounds;
        if low >= 1.0 && high.is_finite() && low < high {
            Ok(())
        } else {
            Err(Error::InvalidBounds { low, high })
        }
    }
}
