//! Linear scales and axis extents
//!
//! Tick steps follow the 1-2-5 progression. Sub-unit steps are kept as their
//! inverse so that ticks like `0.6` come out exact instead of as
//! `0.6000000000000001`.

use serde::Serialize;

/// Number of ticks chart value axes aim for
pub const AXIS_TICKS: usize = 5;

/// Continuous linear domain used to pick round axis bounds and tick values
///
/// Pixel mapping is left to the drawing backend; this type only decides
/// where an axis starts, where it ends and where its labels go.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearScale {
    domain: (f64, f64),
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new((0.0, 1.0))
    }
}

impl LinearScale {
    /// Scale over `domain`
    pub fn new(domain: (f64, f64)) -> Self {
        Self { domain }
    }

    /// Input extent
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Extend the domain outward to round tick values
    #[must_use]
    pub fn nice(self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }

        let mut previous = None;
        for _ in 0..10 {
            let Some(step) = tick_increment(start, stop, count) else {
                break;
            };
            if previous == Some(step) {
                break;
            }
            match step {
                TickStep::Multiple(step) => {
                    start = (start / step).floor() * step;
                    stop = (stop / step).ceil() * step;
                }
                TickStep::Fraction(inverse) => {
                    start = (start * inverse).floor() / inverse;
                    stop = (stop * inverse).ceil() / inverse;
                }
            }
            previous = Some(step);
        }

        let domain = if reversed { (stop, start) } else { (start, stop) };
        Self { domain }
    }

    /// Round values covering the domain, roughly `count` of them
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        let (start, stop) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };
        if start == stop {
            return vec![start];
        }

        let Some(step) = tick_increment(start, stop, count) else {
            return Vec::new();
        };
        match step {
            TickStep::Multiple(step) => index_range(start / step, stop / step)
                .map(|i| i as f64 * step)
                .collect(),
            TickStep::Fraction(inverse) => index_range(start * inverse, stop * inverse)
                .map(|i| i as f64 / inverse)
                .collect(),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn index_range(start: f64, stop: f64) -> std::ops::RangeInclusive<i64> {
    (start.ceil() as i64)..=(stop.floor() as i64)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TickStep {
    /// Step of one or more units
    Multiple(f64),
    /// Step of `1 / inverse`
    Fraction(f64),
}

fn tick_increment(start: f64, stop: f64, count: usize) -> Option<TickStep> {
    let raw = (stop - start) / count.max(1) as f64;
    if !raw.is_finite() || raw <= 0.0 {
        return None;
    }

    let power = raw.log10().floor();
    let error = raw / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    Some(if power >= 0.0 {
        TickStep::Multiple(factor * 10f64.powf(power))
    } else {
        TickStep::Fraction(10f64.powf(-power) / factor)
    })
}

/// Smallest and largest finite value, `None` when there is none
pub fn extent<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Value domain for a chart axis that starts at zero and ends on a round
/// value above the data
pub fn zero_based_domain<I>(values: I, ticks: usize) -> (f64, f64)
where
    I: IntoIterator<Item = f64>,
{
    let (lo, hi) = extent(values).unwrap_or((0.0, 1.0));
    let lo = lo.min(0.0);
    let hi = if hi <= lo { lo + 1.0 } else { hi };
    LinearScale::new((lo, hi)).nice(ticks).domain()
}
