//! Small descriptive statistics used by the models.
//!
//! Non-finite samples are skipped so one bad reading cannot poison a whole
//! history; an empty (or all non-finite) input yields `0.0`.

fn finite(xs: &[f64]) -> impl Iterator<Item = f64> + '_ {
    xs.iter().copied().filter(|x| x.is_finite())
}

pub fn mean(xs: &[f64]) -> f64 {
    let (sum, n) = finite(xs).fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    if n == 0 {
        return 0.0;
    }
    sum / (n as f64)
}

pub fn sum(xs: &[f64]) -> f64 {
    finite(xs).sum()
}

/// Population standard deviation (divides by n), deterministic.
pub fn stddev_population(xs: &[f64], mean: f64) -> f64 {
    let (acc, n) = finite(xs).fold((0.0, 0usize), |(acc, n), x| {
        let d = x - mean;
        (acc + d * d, n + 1)
    });
    if n == 0 {
        return 0.0;
    }
    (acc / (n as f64)).sqrt()
}

/// Round half away from zero into an integer count.
///
/// Non-finite input maps to `0`; out-of-range values saturate.
pub fn round_count(x: f64) -> i64 {
    if !x.is_finite() {
        return 0;
    }
    x.round() as i64
}
