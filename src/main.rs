//! Prints the ADC levels of the weathervane for a divider, or finds the
//! divider that keeps them furthest apart.

use std::io::{self, Write};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use windvane_adc_levels::{
    closest_pair, compute_levels_with, find_best_impedance_with, minimum_gap, BoundedBrent, Config,
    DividerPosition, Error, LevelTable, ResistorNetwork, ScalarMinimizer, DEFAULT_BOUNDS,
    DEFAULT_LEVEL_BITS, MAX_LEVEL_BITS,
};

const USAGE_PROMPT: &str = "You must specify one of --impedance or --optimize";

#[derive(Debug, Parser)]
#[command(name = "windvane_adc_levels")]
#[command(about = "ADC levels for a resistor-switched weathervane read through a voltage divider")]
#[command(version)]
struct Cli {
    /// Finds the best impedance to use for the divider resistor given the
    /// resistances of the weathervane resistors. This matters on ADCs with
    /// only ~8 effective bits, where the separation between the voltages of
    /// each direction is critical.
    #[arg(long, conflicts_with = "impedance")]
    optimize: bool,

    /// A number of ohms to use for the divider resistor. Prints the closest
    /// integral ADC level for each switch direction.
    #[arg(long, allow_hyphen_values = true)]
    impedance: Option<f64>,

    /// The number of bits of level data to show.
    #[arg(
        long = "level_bits",
        default_value_t = DEFAULT_LEVEL_BITS,
        value_parser = clap::value_parser!(u32).range(1..=MAX_LEVEL_BITS as i64)
    )]
    level_bits: u32,

    /// Lowest divider impedance tried by --optimize (ohms)
    #[arg(long = "min_impedance", default_value_t = DEFAULT_BOUNDS.0)]
    min_impedance: f64,

    /// Highest divider impedance tried by --optimize (ohms)
    #[arg(long = "max_impedance", default_value_t = DEFAULT_BOUNDS.1)]
    max_impedance: f64,

    /// Which side of the ADC pin the divider resistor is wired to.
    #[arg(long = "divider_position", value_enum, default_value_t = Position::Ground)]
    divider_position: Position,

    /// A raw ADC reading to decode into the nearest direction.
    #[arg(long, requires = "impedance")]
    decode: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Position {
    /// Divider between the ADC pin and ground
    Ground,
    /// Divider between the supply and the ADC pin
    Supply,
}

impl From<Position> for DividerPosition {
    fn from(position: Position) -> Self {
        match position {
            Position::Ground => DividerPosition::Ground,
            Position::Supply => DividerPosition::Supply,
        }
    }
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            level_bits: self.level_bits,
            bounds: (self.min_impedance, self.max_impedance),
            divider_position: self.divider_position.into(),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("windvane_adc_levels=warn")),
        )
        .init();

    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();
    run(&BoundedBrent::default(), &cli, &mut stdout)
}

fn run<M, W>(minimizer: &M, cli: &Cli, out: &mut W) -> Result<()>
where
    M: ScalarMinimizer,
    W: Write,
{
    let config = cli.config();
    let network = ResistorNetwork::weathervane();

    if cli.optimize {
        match find_best_impedance_with(minimizer, &network, &config) {
            Ok(divider) => writeln!(out, "{divider}")?,
            Err(Error::OptimizationFailed(diagnostic)) => {
                writeln!(out, "Unable to find best impedance for divider: {diagnostic}")?
            }
            Err(err) => return Err(err.into()),
        }
    } else if let Some(divider) = cli.impedance {
        let levels = compute_levels_with(&network, divider, config.level_bits, config.divider_position)?;
        writeln!(out, "{levels}")?;
        writeln!(out, "Minimum diff between levels: {}", minimum_gap(&levels))?;

        if let Some((lower, upper, gap)) = closest_pair(&levels) {
            info!(%lower, %upper, gap, "closest pair of levels");
        }

        if let Some(reading) = cli.decode {
            if let Some(direction) = LevelTable::from(&levels).nearest(reading) {
                writeln!(out, "Reading {reading} decodes to {direction}")?;
            }
        }
    } else {
        writeln!(out, "{USAGE_PROMPT}")?;
    }

    Ok(())
}
