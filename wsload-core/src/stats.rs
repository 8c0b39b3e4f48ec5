/// Linearly-interpolated percentile of `samples`, with `p` in `[0, 100]`.
///
/// Sorts a copy ascending and interpolates between the two ranks straddling
/// `(n - 1) * p / 100`. Returns 0.0 for an empty slice.
pub fn percentile(samples: &[f64], p: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut xs = samples.to_vec();
    xs.sort_by(f64::total_cmp);

    let k = (xs.len() - 1) as f64 * (p / 100.0);
    let lo = k.floor() as usize;
    let hi = (lo + 1).min(xs.len() - 1);
    if lo == hi {
        xs[lo]
    } else {
        xs[lo] + (xs[hi] - xs[lo]) * (k - lo as f64)
    }
}
