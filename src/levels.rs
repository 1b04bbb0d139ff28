use crate::{
    direction::Direction,
    error::{Error, Result},
    network::ResistorNetwork,
};
use core::fmt;

/// Widest ADC word whose rounded codes still fit a `u32`.
pub const MAX_LEVEL_BITS: u32 = 31;

/// Which side of the ADC pin the divider resistor sits on.
///
/// - `Ground`: supply, vane, ADC pin, divider, ground. Level rises with the divider.
/// - `Supply`: supply, divider, ADC pin, vane, ground. Level rises with the vane.
///
/// One layout mirrors the other (`2^bits - level`), so the gaps between
/// levels are the same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DividerPosition {
    #[default]
    Ground,
    Supply,
}

impl DividerPosition {
    fn fraction(self, divider: f64, resistance: f64) -> f64 {
        match self {
            DividerPosition::Ground => divider / (divider + resistance),
            DividerPosition::Supply => resistance / (divider + resistance),
        }
    }
}

/// Predicted, unrounded ADC code for each switch position, in network order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelMap {
    levels: Vec<(Direction, f64)>,
}

impl LevelMap {
    pub fn get(&self, direction: Direction) -> Option<f64> {
        self.levels
            .iter()
            .find(|(d, _)| *d == direction)
            .map(|(_, level)| *level)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, f64)> + '_ {
        self.levels.iter().copied()
    }

    /// Each level rounded to the nearest ADC code.
    pub fn rounded(&self) -> impl Iterator<Item = (Direction, u32)> + '_ {
        self.iter()
            .map(|(direction, level)| (direction, level.round() as u32))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl FromIterator<(Direction, f64)> for LevelMap {
    fn from_iter<I: IntoIterator<Item = (Direction, f64)>>(iter: I) -> Self {
        Self {
            levels: iter.into_iter().collect(),
        }
    }
}

/// Formats the rounded codes as `{NE: 445, E: 2048}`.
impl fmt::Display for LevelMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, (direction, code)) in self.rounded().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{direction}: {code}")?;
        }
        f.write_str("}")
    }
}

/// Predicts the ADC code for every position in `resistors` with the
/// divider between the ADC pin and ground.
///
/// Each code is `divider / (divider + resistance) * 2^level_bits`, left
/// unrounded. Fails with [`Error::InvalidParameter`] if `divider` is below
/// 1 ohm or not finite, and with [`Error::InvalidLevelBits`] if `level_bits`
/// is above [`MAX_LEVEL_BITS`].
///
/// # Examples
///
/// ```
/// use windvane_adc_levels::{compute_levels, Direction, ResistorNetwork};
///
/// let network = ResistorNetwork::new([(Direction::NE, 8200.0), (Direction::E, 1000.0)])?;
/// let levels = compute_levels(&network, 1000.0, 12)?;
///
/// assert_eq!(levels.get(Direction::E), Some(2048.0));
/// assert_eq!(levels.to_string(), "{NE: 445, E: 2048}");
/// # Ok::<(), windvane_adc_levels::Error>(())
/// ```
pub fn compute_levels(resistors: &ResistorNetwork, divider: f64, level_bits: u32) -> Result<LevelMap> {
    compute_levels_with(resistors, divider, level_bits, DividerPosition::Ground)
}

/// Like [`compute_levels`], with the divider on the given side of the pin.
pub fn compute_levels_with(
    resistors: &ResistorNetwork,
    divider: f64,
    level_bits: u32,
    position: DividerPosition,
) -> Result<LevelMap> {
    if !(divider.is_finite() && divider >= 1.0) {
        return Err(Error::InvalidParameter { divider });
    }
    if level_bits > MAX_LEVEL_BITS {
        return Err(Error::InvalidLevelBits(level_bits));
    }

    let full_scale = 2f64.powi(level_bits as i32);

    Ok(resistors
        .iter()
        .map(|(direction, resistance)| {
            (
                direction,
                position.fraction(divider, resistance) * full_scale,
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> ResistorNetwork {
        ResistorNetwork::new([(Direction::NE, 8200.0), (Direction::E, 1000.0)]).unwrap()
    }

    #[test]
    fn matches_divider_formula() {
        let levels = compute_levels(&pair(), 1000.0, 12).unwrap();

        assert_eq!(levels.get(Direction::E), Some(2048.0));
        let ne = levels.get(Direction::NE).unwrap();
        assert!((ne - 1000.0 / 9200.0 * 4096.0).abs() < 1e-9);
        assert_eq!(ne.round(), 445.0);
    }

    #[test]
    fn one_level_per_resistor() {
        let network = ResistorNetwork::weathervane();
        let levels = compute_levels(&network, 3377.0, 12).unwrap();

        assert_eq!(levels.len(), network.len());
        assert!(network
            .iter()
            .zip(levels.iter())
            .all(|((r, _), (l, _))| r == l));
    }

    #[test]
    fn levels_stay_inside_full_scale() {
        let network = ResistorNetwork::weathervane();
        for bits in [1, 8, 12, 16] {
            for divider in [1.0, 100.0, 3377.0, 200000.0] {
                let full_scale = 2f64.powi(bits);
                let levels = compute_levels(&network, divider, bits as u32).unwrap();
                assert!(levels.iter().all(|(_, l)| l > 0.0 && l < full_scale));
            }
        }
    }

    #[test]
    fn rejects_divider_below_one_ohm() {
        assert_eq!(
            compute_levels(&pair(), 0.5, 12),
            Err(Error::InvalidParameter { divider: 0.5 })
        );
        assert!(compute_levels(&pair(), -1.0, 12).is_err());
        assert!(compute_levels(&pair(), f64::NAN, 12).is_err());
        assert_eq!(
            compute_levels(&pair(), f64::INFINITY, 12),
            Err(Error::InvalidParameter {
                divider: f64::INFINITY
            })
        );
        assert!(compute_levels(&pair(), 1.0, 12).is_ok());
    }

    #[test]
    fn rejects_codes_wider_than_u32() {
        assert_eq!(
            compute_levels(&pair(), 1000.0, 40),
            Err(Error::InvalidLevelBits(40))
        );

        let widest = compute_levels(&pair(), 1000.0, MAX_LEVEL_BITS).unwrap();
        assert_eq!(widest.get(Direction::E), Some(1073741824.0));
        assert!(widest.rounded().any(|code| code == (Direction::E, 1 << 30)));
    }

    #[test]
    fn supply_side_divider_mirrors_ground_side() {
        let network = ResistorNetwork::weathervane();
        let ground = compute_levels(&network, 3377.0, 12).unwrap();
        let supply = compute_levels_with(&network, 3377.0, 12, DividerPosition::Supply).unwrap();

        for ((_, g), (_, s)) in ground.iter().zip(supply.iter()) {
            assert!((g + s - 4096.0).abs() < 1e-9);
        }
    }

    #[test]
    fn supply_side_divider_reproduces_firmware_targets() {
        let network = ResistorNetwork::weathervane();
        let supply = compute_levels_with(&network, 3377.0, 12, DividerPosition::Supply).unwrap();
        let rounded: Vec<_> = supply.rounded().collect();

        assert!(rounded.contains(&(Direction::E, 936)));
        assert!(rounded.contains(&(Direction::SE, 1616)));
        assert!(rounded.contains(&(Direction::ESE, 693)));
    }

    #[test]
    fn displays_rounded_codes() {
        let levels = compute_levels(&pair(), 1000.0, 12).unwrap();
        assert_eq!(levels.to_string(), "{NE: 445, E: 2048}");
        assert_eq!(LevelMap::default().to_string(), "{}");
    }
}
