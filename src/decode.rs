use crate::{direction::Direction, levels::LevelMap};
use embedded_hal::adc::{Channel, OneShot};

/// Expected ADC code for each direction, used to decode raw readings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LevelTable {
    targets: Vec<(Direction, u32)>,
}

impl LevelTable {
    pub fn new<I>(targets: I) -> Self
    where
        I: IntoIterator<Item = (Direction, u32)>,
    {
        Self {
            targets: targets.into_iter().collect(),
        }
    }

    pub fn targets(&self) -> &[(Direction, u32)] {
        &self.targets
    }

    /// Returns the direction whose target is closest to `reading`, or
    /// `None` if the table is empty. Ties go to the earlier entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use windvane_adc_levels::{Direction, LevelTable};
    ///
    /// let table = LevelTable::new([(Direction::E, 936), (Direction::SE, 1616)]);
    /// assert_eq!(table.nearest(1200), Some(Direction::E));
    /// assert_eq!(table.nearest(1400), Some(Direction::SE));
    /// ```
    pub fn nearest(&self, reading: u32) -> Option<Direction> {
        self.targets
            .iter()
            .fold(None, |best: Option<(Direction, u32)>, &(direction, target)| {
                let diff = target.abs_diff(reading);
                match best {
                    Some((_, best_diff)) if best_diff <= diff => best,
                    _ => Some((direction, diff)),
                }
            })
            .map(|(direction, _)| direction)
    }
}

impl From<&LevelMap> for LevelTable {
    fn from(levels: &LevelMap) -> Self {
        Self::new(levels.rounded())
    }
}

type Error<Adc, ADC, Word, Pin> = nb::Error<<Adc as OneShot<ADC, Word, Pin>>::Error>;

/// Reads a weathervane through an ADC pin and reports the direction.
///
/// Generic over `embedded_hal`'s `OneShot`; the crate itself never opens a device.
#[derive(Debug)]
pub struct WindvaneDecoder<Pin> {
    pin: Pin,
    table: LevelTable,
}

impl<Pin> WindvaneDecoder<Pin> {
    /// Returns a decoder matching readings on `pin` against `table`.
    ///
    /// # Examples
    ///
    /// ```
    /// use windvane_adc_levels::{
    ///     compute_levels_with, DividerPosition, LevelTable, ResistorNetwork, WindvaneDecoder,
    /// };
    /// # use embedded_hal_mock::adc::{Mock, MockChan0, Transaction};
    /// #
    /// # let expectations: [Transaction<u16>; 1] = [Transaction::read(0, 940)];
    /// # let mut adc = Mock::new(&expectations);
    /// # let pin = MockChan0 {};
    ///
    /// let levels = compute_levels_with(
    ///     &ResistorNetwork::weathervane(),
    ///     3377.0,
    ///     12,
    ///     DividerPosition::Supply,
    /// )?;
    /// let mut decoder = WindvaneDecoder::new(pin, LevelTable::from(&levels));
    ///
    /// assert_eq!(decoder.read(&mut adc).map(|d| d.map(|d| d.label())), Ok(Some("E")));
    /// # Ok::<(), windvane_adc_levels::Error>(())
    /// ```
    pub fn new<ADC>(pin: Pin, table: LevelTable) -> Self
    where
        Pin: Channel<ADC>,
    {
        Self { pin, table }
    }

    /// Destroys the decoder and returns the `Pin`.
    pub fn free(self) -> Pin {
        self.pin
    }

    pub fn table(&self) -> &LevelTable {
        &self.table
    }

    /// Takes one reading and returns the nearest direction. Returns
    /// `Ok(None)` only when the table is empty.
    pub fn read<Adc, ADC, Word>(&mut self, adc: &mut Adc) -> Result<Option<Direction>, Error<Adc, ADC, Word, Pin>>
    where
        Word: Into<u32>,
        Pin: Channel<ADC>,
        Adc: OneShot<ADC, Word, Pin>,
    {
        let reading = adc.read(&mut self.pin)?;
        Ok(self.table.nearest(reading.into()))
    }
}
