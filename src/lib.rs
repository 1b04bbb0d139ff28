//! ADC levels for weathervanes that switch a resistor per direction.
//!
//! A weathervane of this kind closes one reed switch (or two neighbouring
//! switches for the in-between directions) and is read through a voltage
//! divider. This crate predicts the ADC code for every direction, measures
//! how well separated the codes are, searches for the divider that
//! separates them best, and decodes raw readings back into directions.
//!
//! ```
//! use windvane_adc_levels::{compute_levels, find_best_impedance, minimum_gap, ResistorNetwork};
//!
//! let network = ResistorNetwork::weathervane();
//! let divider = find_best_impedance(&network, (100.0, 200000.0), 12)?;
//! let levels = compute_levels(&network, divider, 12)?;
//!
//! assert!(minimum_gap(&levels) > 75.0);
//! # Ok::<(), windvane_adc_levels::Error>(())
//! ```

mod config;
mod decode;
mod direction;
mod error;
mod gap;
mod levels;
mod network;
mod optimize;

pub use config::{Config, DEFAULT_BOUNDS, DEFAULT_LEVEL_BITS};
pub use decode::{LevelTable, WindvaneDecoder};
pub use direction::Direction;
pub use error::{Error, Result};
pub use gap::{closest_pair, minimum_gap};
pub use levels::{compute_levels, compute_levels_with, DividerPosition, LevelMap, MAX_LEVEL_BITS};
pub use network::{combine, ResistorNetwork};
pub use optimize::{find_best_impedance, find_best_impedance_with, BoundedBrent, Minimum, ScalarMinimizer};
