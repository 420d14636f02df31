//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1]
//! Seed: EMA[period-1] = SMA of the first `period` values.
//! Lookback: period - 1.

/// EMA of an arbitrary series. Output has the same length as `values`.
///
/// Leading positions before the seed are NaN. A NaN inside the seed window
/// makes the whole output NaN; a NaN after the seed taints every later value.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < period || period == 0 {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);

    let mut sum = 0.0;
    for &v in values.iter().take(period) {
        if v.is_nan() {
            return result;
        }
        sum += v;
    }
    let seed = sum / period as f64;
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        if values[i].is_nan() {
            for val in result.iter_mut().skip(i) {
                *val = f64::NAN;
            }
            return result;
        }
        let ema = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = ema;
        prev = ema;
    }

    result
}

/// EMA of a series that may start with a NaN warmup prefix.
///
/// The leading NaN run is skipped and the EMA is seeded on the first
/// `period` finite values after it. Used for signal lines over series that
/// are themselves EMA-derived.
pub fn ema_after_warmup(values: &[f64], period: usize) -> Vec<f64> {
    let skip = values.iter().take_while(|v| v.is_nan()).count();
    let mut result = vec![f64::NAN; skip];
    result.extend(ema_of_series(&values[skip..], period));
    result
}
