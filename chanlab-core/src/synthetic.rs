//! Seeded random-walk bars for development, benches and property tests.
//!
//! The seed is derived from the instrument name, so the same name and date
//! range always produce the same bars.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::Bar;

/// Weekday bars from `start` to `end` inclusive, random walk from 100.0.
pub fn random_walk(instrument: &str, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
    let seed: [u8; 32] = *blake3::hash(instrument.as_bytes()).as_bytes();
    walk(StdRng::from_seed(seed), start, end)
}

/// Random walk with an explicit seed, for property tests.
pub fn random_walk_seeded(seed: u64, start: NaiveDate, days: usize) -> Vec<Bar> {
    let end = start + Duration::days(days as i64);
    walk(StdRng::seed_from_u64(seed), start, end)
}

fn walk(mut rng: StdRng, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
    let mut bars = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        bars.push(Bar::new(current, open, high, low, close));

        price = close;
        current += Duration::days(1);
    }

    bars
}
