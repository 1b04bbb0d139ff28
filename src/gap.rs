use crate::{direction::Direction, levels::LevelMap};

/// Returns the smallest distance between two neighbouring levels once sorted.
///
/// With fewer than two levels there is nothing to separate and the result
/// is `f64::INFINITY`, which callers must read as "no constraint".
///
/// # Examples
///
/// ```
/// use windvane_adc_levels::{compute_levels, minimum_gap, Direction, ResistorNetwork};
///
/// let network = ResistorNetwork::new([(Direction::NE, 8200.0), (Direction::E, 1000.0)])?;
/// let gap = minimum_gap(&compute_levels(&network, 1000.0, 12)?);
///
/// assert_eq!(gap.round(), 1603.0);
/// # Ok::<(), windvane_adc_levels::Error>(())
/// ```
pub fn minimum_gap(levels: &LevelMap) -> f64 {
    closest_pair(levels).map_or(f64::INFINITY, |(_, _, gap)| gap)
}

/// Returns the two adjacent directions (lower level first) whose levels are
/// closest together, and the distance between them.
///
/// Ties go to the lowest pair of levels.
pub fn closest_pair(levels: &LevelMap) -> Option<(Direction, Direction, f64)> {
    let mut sorted: Vec<_> = levels.iter().collect();
    sorted.sort_by(|(_, a), (_, b)| a.total_cmp(b));

    sorted
        .windows(2)
        .map(|w| (w[0].0, w[1].0, w[1].1 - w[0].1))
        .fold(None, |best, candidate| match best {
            Some((_, _, gap)) if gap <= candidate.2 => best,
            _ => Some(candidate),
        })
}
