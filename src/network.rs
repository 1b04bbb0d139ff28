use crate::{
    direction::Direction,
    error::{Error, Result},
};

/// Measured resistance (ohms) of each reed switch in the weathervane.
const MEASURED: [(Direction, f64); 8] = [
    (Direction::NE, 8200.0),
    (Direction::E, 1000.0),
    (Direction::SE, 2200.0),
    (Direction::S, 3900.0),
    (Direction::SW, 16000.0),
    (Direction::W, 120000.0),
    (Direction::NW, 64900.0),
    (Direction::N, 33000.0),
];

/// Intermediate positions close two neighbouring switches at once.
const BETWEEN: [(Direction, Direction, Direction); 8] = [
    (Direction::NNE, Direction::N, Direction::NE),
    (Direction::ENE, Direction::NE, Direction::E),
    (Direction::ESE, Direction::E, Direction::SE),
    (Direction::SSE, Direction::SE, Direction::S),
    (Direction::SSW, Direction::S, Direction::SW),
    (Direction::WSW, Direction::SW, Direction::W),
    (Direction::WNW, Direction::W, Direction::NW),
    (Direction::NNW, Direction::NW, Direction::N),
];

/// Returns the resistance of `r1` and `r2` in parallel.
///
/// # Examples
///
/// ```
/// use windvane_adc_levels::combine;
///
/// // 5.1k and 10k in parallel give roughly 3377 ohms
/// assert_eq!(combine(5100.0, 10000.0).round(), 3377.0);
/// ```
pub fn combine(r1: f64, r2: f64) -> f64 {
    1.0 / (1.0 / r1 + 1.0 / r2)
}

/// The resistance seen by the ADC for each switch position, in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResistorNetwork {
    resistors: Vec<(Direction, f64)>,
}

impl ResistorNetwork {
    /// Builds a network from `(direction, ohms)` pairs.
    ///
    /// Fails with [`Error::InvalidResistance`] if any resistance is not a
    /// positive, finite number. A direction given twice keeps its first
    /// position and its last value.
    pub fn new<I>(resistors: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Direction, f64)>,
    {
        let mut network = Self::default();
        for (direction, ohms) in resistors {
            network.insert(direction, ohms)?;
        }
        Ok(network)
    }

    /// The 16 position network of the weathervane: the 8 measured switches,
    /// then the 8 positions between them.
    ///
    /// # Examples
    ///
    /// ```
    /// use windvane_adc_levels::{Direction, ResistorNetwork};
    ///
    /// let network = ResistorNetwork::weathervane();
    /// assert_eq!(network.len(), 16);
    /// assert_eq!(network.get(Direction::E), Some(1000.0));
    /// ```
    pub fn weathervane() -> Self {
        let derived = BETWEEN.map(|(direction, left, right)| {
            (direction, combine(measured(left), measured(right)))
        });

        Self {
            resistors: MEASURED.into_iter().chain(derived).collect(),
        }
    }

    /// Sets the resistance for `direction`, replacing any previous value.
    pub fn insert(&mut self, direction: Direction, ohms: f64) -> Result<()> {
        if !(ohms.is_finite() && ohms > 0.0) {
            return Err(Error::InvalidResistance { direction, ohms });
        }

        match self.resistors.iter_mut().find(|(d, _)| *d == direction) {
            Some(entry) => entry.1 = ohms,
            None => self.resistors.push((direction, ohms)),
        }
        Ok(())
    }

    pub fn get(&self, direction: Direction) -> Option<f64> {
        self.resistors
            .iter()
            .find(|(d, _)| *d == direction)
            .map(|(_, ohms)| *ohms)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, f64)> + '_ {
        self.resistors.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.resistors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resistors.is_empty()
    }
}

// Only called with directions from MEASURED.
fn measured(direction: Direction) -> f64 {
    MEASURED
        .iter()
        .find(|(d, _)| *d == direction)
        .map_or(f64::NAN, |(_, ohms)| *ohms)
}
