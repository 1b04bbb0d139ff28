use crate::{
    config::Config,
    error::{Error, Result},
    gap::minimum_gap,
    levels::compute_levels_with,
    network::ResistorNetwork,
};
use tracing::{debug, trace, warn};

const GOLDEN_MEAN: f64 = 0.381_966_011_250_105_1;

/// Outcome of a bounded scalar search.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Best point found.
    pub x: f64,
    /// Objective value at `x`.
    pub value: f64,
    pub converged: bool,
    pub evaluations: usize,
    pub message: String,
}

/// A derivative-free search for the minimum of `objective` on `[low, high]`.
pub trait ScalarMinimizer {
    fn minimize(&self, objective: &mut dyn FnMut(f64) -> f64, low: f64, high: f64) -> Minimum;
}

/// Brent's bounded method: golden-section steps, with parabolic
/// interpolation whenever the parabola lands inside the bracket.
///
/// The search never evaluates the end points themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedBrent {
    /// Absolute tolerance on `x`.
    pub xatol: f64,
    pub max_evaluations: usize,
}

impl Default for BoundedBrent {
    fn default() -> Self {
        Self {
            xatol: 1e-5,
            max_evaluations: 500,
        }
    }
}

impl ScalarMinimizer for BoundedBrent {
    fn minimize(&self, objective: &mut dyn FnMut(f64) -> f64, low: f64, high: f64) -> Minimum {
        let sqrt_eps = f64::EPSILON.sqrt();
        let (mut a, mut b) = (low, high);

        // xf: best so far, nfc: second best, fulc: third best
        let mut fulc = a + GOLDEN_MEAN * (b - a);
        let mut nfc = fulc;
        let mut xf = fulc;
        let mut rat = 0.0_f64;
        let mut e = 0.0_f64;

        let mut fx = objective(xf);
        let mut evaluations = 1;
        let mut fu = f64::INFINITY;
        let mut ffulc = fx;
        let mut fnfc = fx;

        let mut xm = 0.5 * (a + b);
        let mut tol1 = sqrt_eps * xf.abs() + self.xatol / 3.0;
        let mut tol2 = 2.0 * tol1;
        let mut exhausted = false;

        while (xf - xm).abs() > tol2 - 0.5 * (b - a) {
            let mut golden = true;

            if e.abs() > tol1 {
                let r = (xf - nfc) * (fx - ffulc);
                let q = (xf - fulc) * (fx - fnfc);
                let mut p = (xf - fulc) * q - (xf - nfc) * r;
                let mut q = 2.0 * (q - r);
                if q > 0.0 {
                    p = -p;
                }
                q = q.abs();
                let previous = e;
                e = rat;

                if p.abs() < (0.5 * q * previous).abs() && p > q * (a - xf) && p < q * (b - xf) {
                    golden = false;
                    rat = p / q;
                    let x = xf + rat;
                    if x - a < tol2 || b - x < tol2 {
                        rat = if xm >= xf { tol1 } else { -tol1 };
                    }
                }
            }

            if golden {
                e = if xf >= xm { a - xf } else { b - xf };
                rat = GOLDEN_MEAN * e;
            }

            let step = rat.abs().max(tol1);
            let x = if rat >= 0.0 { xf + step } else { xf - step };
            fu = objective(x);
            evaluations += 1;
            trace!(x, value = fu, evaluations, "objective evaluated");

            if fu <= fx {
                if x >= xf {
                    a = xf;
                } else {
                    b = xf;
                }
                (fulc, ffulc) = (nfc, fnfc);
                (nfc, fnfc) = (xf, fx);
                (xf, fx) = (x, fu);
            } else {
                if x < xf {
                    a = x;
                } else {
                    b = x;
                }
                if fu <= fnfc || nfc == xf {
                    (fulc, ffulc) = (nfc, fnfc);
                    (nfc, fnfc) = (x, fu);
                } else if fu <= ffulc || fulc == xf || fulc == nfc {
                    (fulc, ffulc) = (x, fu);
                }
            }

            xm = 0.5 * (a + b);
            tol1 = sqrt_eps * xf.abs() + self.xatol / 3.0;
            tol2 = 2.0 * tol1;

            if evaluations >= self.max_evaluations {
                exhausted = true;
                break;
            }
        }

        let (converged, message) = if xf.is_nan() || fx.is_nan() || fu.is_nan() {
            (false, "NaN result encountered.")
        } else if exhausted {
            (false, "Maximum number of function calls reached.")
        } else {
            (true, "Solution found.")
        };

        Minimum {
            x: xf,
            value: fx,
            converged,
            evaluations,
            message: message.to_string(),
        }
    }
}

/// Finds the divider impedance within `bounds` that keeps the levels of
/// `resistors` furthest apart, using [`BoundedBrent`].
///
/// The answer is a local best: the minimum gap switches between pairs of
/// directions as the divider changes, so the objective can have several peaks.
///
/// # Examples
///
/// ```
/// use windvane_adc_levels::{find_best_impedance, ResistorNetwork};
///
/// let best = find_best_impedance(&ResistorNetwork::weathervane(), (100.0, 200000.0), 12)?;
/// assert!(best > 3000.0 && best < 4000.0);
/// # Ok::<(), windvane_adc_levels::Error>(())
/// ```
pub fn find_best_impedance(resistors: &ResistorNetwork, bounds: (f64, f64), level_bits: u32) -> Result<f64> {
    let config = Config {
        level_bits,
        bounds,
        ..Config::default()
    };
    find_best_impedance_with(&BoundedBrent::default(), resistors, &config)
}

/// Like [`find_best_impedance`], with the search strategy and settings given.
pub fn find_best_impedance_with<M>(minimizer: &M, resistors: &ResistorNetwork, config: &Config) -> Result<f64>
where
    M: ScalarMinimizer + ?Sized,
{
    config.validate()?;
    if resistors.len() < 2 {
        return Err(Error::TooFewPositions(resistors.len()));
    }

    let (low, high) = config.bounds;
    let mut objective = |divider: f64| {
        compute_levels_with(resistors, divider, config.level_bits, config.divider_position)
            .map_or(f64::INFINITY, |levels| -minimum_gap(&levels))
    };

    let minimum = minimizer.minimize(&mut objective, low, high);
    if !minimum.converged {
        warn!(?minimum, "divider search did not converge");
        return Err(Error::OptimizationFailed(format!(
            "{} (x = {}, gap = {}, evaluations = {})",
            minimum.message, minimum.x, -minimum.value, minimum.evaluations
        )));
    }

    debug!(
        divider = minimum.x,
        gap = -minimum.value,
        evaluations = minimum.evaluations,
        "found best divider"
    );
    Ok(minimum.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compute_levels, direction::Direction};

    struct Fixed(Minimum);

    impl ScalarMinimizer for Fixed {
        fn minimize(&self, objective: &mut dyn FnMut(f64) -> f64, _low: f64, _high: f64) -> Minimum {
            objective(self.0.x);
            self.0.clone()
        }
    }

    fn fixed(x: f64, converged: bool) -> Fixed {
        Fixed(Minimum {
            x,
            value: -1.0,
            converged,
            evaluations: 1,
            message: if converged { "ok" } else { "gave up" }.to_string(),
        })
    }

    fn gap_at(divider: f64) -> f64 {
        minimum_gap(&compute_levels(&ResistorNetwork::weathervane(), divider, 12).unwrap())
    }

    #[test]
    fn brent_finds_parabola_minimum() {
        let minimum = BoundedBrent::default().minimize(&mut |x| (x - 2.0).powi(2) + 1.0, 0.0, 10.0);

        assert!(minimum.converged);
        assert!((minimum.x - 2.0).abs() < 1e-4);
        assert!((minimum.value - 1.0).abs() < 1e-8);
        assert_eq!(minimum.message, "Solution found.");
    }

    #[test]
    fn brent_stays_inside_bounds() {
        let mut seen = Vec::new();
        let minimum = BoundedBrent::default().minimize(
            &mut |x| {
                seen.push(x);
                x
            },
            5.0,
            7.0,
        );

        assert!(minimum.converged);
        assert!(minimum.x > 5.0 && minimum.x - 5.0 < 1e-3);
        assert!(seen.iter().all(|x| *x > 5.0 && *x < 7.0));
    }

    #[test]
    fn brent_reports_exhausted_budget() {
        let brent = BoundedBrent {
            xatol: 1e-5,
            max_evaluations: 3,
        };
        let minimum = brent.minimize(&mut |x| (x - 2.0).powi(2), 0.0, 10.0);

        assert!(!minimum.converged);
        assert_eq!(minimum.evaluations, 3);
        assert_eq!(minimum.message, "Maximum number of function calls reached.");
    }

    #[test]
    fn brent_reports_nan() {
        let minimum = BoundedBrent::default().minimize(&mut |_| f64::NAN, 0.0, 1.0);
        assert!(!minimum.converged);
    }

    #[test]
    fn weathervane_best_divider() {
        let best = find_best_impedance(&ResistorNetwork::weathervane(), (100.0, 200000.0), 12).unwrap();

        assert!(best > 100.0 && best < 200000.0);
        assert!(best > 3000.0 && best < 4000.0, "best = {best}");
        assert!(gap_at(best) > 75.0);
    }

    #[test]
    fn best_divider_beats_midpoint() {
        let best = find_best_impedance(&ResistorNetwork::weathervane(), (100.0, 200000.0), 12).unwrap();
        assert!(gap_at(best) >= gap_at(100100.0));
    }

    #[test]
    fn supply_side_finds_same_divider() {
        let network = ResistorNetwork::weathervane();
        let ground = find_best_impedance_with(&BoundedBrent::default(), &network, &Config::default()).unwrap();
        let supply = find_best_impedance_with(
            &BoundedBrent::default(),
            &network,
            &Config {
                divider_position: crate::DividerPosition::Supply,
                ..Config::default()
            },
        )
        .unwrap();

        assert!((ground - supply).abs() / ground < 1e-3);
    }

    #[test]
    fn uses_pluggable_minimizer() {
        let best = find_best_impedance_with(&fixed(4242.0, true), &ResistorNetwork::weathervane(), &Config::default());
        assert_eq!(best, Ok(4242.0));
    }

    #[test]
    fn reports_non_convergence() {
        let result = find_best_impedance_with(&fixed(4242.0, false), &ResistorNetwork::weathervane(), &Config::default());

        match result {
            Err(Error::OptimizationFailed(message)) => assert!(message.contains("gave up")),
            other => panic!("expected OptimizationFailed, got {other:?}"),
        }
    }

    #[test]
    fn rejects_bounds_below_one_ohm() {
        let result = find_best_impedance(&ResistorNetwork::weathervane(), (0.5, 1000.0), 12);
        assert_eq!(result, Err(Error::InvalidBounds { low: 0.5, high: 1000.0 }));
    }

    #[test]
    fn needs_two_positions() {
        let single = ResistorNetwork::new([(Direction::N, 33000.0)]).unwrap();
        assert_eq!(
            find_best_impedance(&single, (100.0, 200000.0), 12),
            Err(Error::TooFewPositions(1))
        );
    }
}
