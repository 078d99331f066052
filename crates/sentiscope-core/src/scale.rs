//! Position scales: linear, time and band.
//!
//! These follow the usual charting conventions: a scale maps a data domain
//! onto a pixel range, `ticks` picks round values at 1/2/5 × 10ⁿ steps and
//! `nice` widens the domain to tick boundaries.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Step between ticks for roughly `count` ticks over `[start, stop]`.
#[must_use]
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let count = count.max(1) as f64;
    let raw = (stop - start).abs() / count;
    if raw <= 0.0 || !raw.is_finite() {
        return 0.0;
    }
    let power = raw.log10().floor();
    let base = 10f64.powf(power);
    let error = raw / base;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * base
}

/// Round tick values inside `[start, stop]`.
#[must_use]
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    let (lo, hi) = if start <= stop {
        (start, stop)
    } else {
        (stop, start)
    };
    let step = tick_step(lo, hi, count);
    if step == 0.0 {
        return if lo.is_finite() { vec![lo] } else { Vec::new() };
    }
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

/// Linear mapping from a numeric domain to a numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Create a scale.
    #[must_use]
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Domain endpoints.
    #[must_use]
    pub const fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Range endpoints.
    #[must_use]
    pub const fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map a domain value into the range.
    ///
    /// A zero-width domain maps everything to the middle of the range.
    #[must_use]
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 {
            0.5
        } else {
            (value - d0) / span
        };
        t.mul_add(r1 - r0, r0)
    }

    /// Extend the domain to round tick boundaries.
    #[must_use]
    pub fn nice(mut self, count: usize) -> Self {
        let (mut lo, mut hi) = self.domain;
        let reversed = hi < lo;
        if reversed {
            std::mem::swap(&mut lo, &mut hi);
        }
        let mut previous = None;
        for _ in 0..10 {
            let step = tick_step(lo, hi, count);
            if step == 0.0 || previous == Some(step) {
                break;
            }
            lo = (lo / step).floor() * step;
            hi = (hi / step).ceil() * step;
            previous = Some(step);
        }
        self.domain = if reversed { (hi, lo) } else { (lo, hi) };
        self
    }

    /// Tick values over the domain.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }
}

/// Linear scale over calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    start: NaiveDate,
    end: NaiveDate,
    inner: LinearScale,
}

impl TimeScale {
    /// Create a scale over `[start, end]`.
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate, range: (f64, f64)) -> Self {
        Self {
            start,
            end,
            inner: LinearScale::new((day_number(start), day_number(end)), range),
        }
    }

    /// Scale spanning the earliest and latest of `dates`.
    #[must_use]
    pub fn from_extent(dates: impl IntoIterator<Item = NaiveDate>, range: (f64, f64)) -> Option<Self> {
        let mut iter = dates.into_iter();
        let first = iter.next()?;
        let (start, end) = iter.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self::new(start, end, range))
    }

    /// Domain endpoints.
    #[must_use]
    pub const fn domain(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    /// Map a date into the range.
    #[must_use]
    pub fn map(&self, date: NaiveDate) -> f64 {
        self.inner.map(day_number(date))
    }

    /// Map a day number (see [`day_number`]) into the range.
    #[must_use]
    pub fn map_days(&self, days: f64) -> f64 {
        self.inner.map(days)
    }

    /// First day of every month that falls inside the domain.
    #[must_use]
    pub fn month_ticks(&self) -> Vec<NaiveDate> {
        let mut out = Vec::new();
        let mut cursor = NaiveDate::from_ymd_opt(self.start.year(), self.start.month(), 1);
        while let Some(day) = cursor {
            if day > self.end {
                break;
            }
            if day >= self.start {
                out.push(day);
            }
            cursor = if day.month() == 12 {
                NaiveDate::from_ymd_opt(day.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(day.year(), day.month() + 1, 1)
            };
        }
        out
    }
}

/// Days since the common era, as the numeric x coordinate for dates.
#[must_use]
pub fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

/// Inverse of [`day_number`].
#[must_use]
pub fn date_from_day_number(days: f64) -> Option<NaiveDate> {
    if !days.is_finite() {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(days.round() as i32)
}

/// Ordinal scale that splits a range into evenly spaced bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale<T> {
    domain: Vec<T>,
    range: (f64, f64),
    padding: f64,
}

impl<T: PartialEq + Clone> BandScale<T> {
    /// Create a band scale over the distinct values of `domain`, in first-seen
    /// order.
    #[must_use]
    pub fn new(domain: impl IntoIterator<Item = T>, range: (f64, f64)) -> Self {
        let mut distinct: Vec<T> = Vec::new();
        for value in domain {
            if !distinct.contains(&value) {
                distinct.push(value);
            }
        }
        Self {
            domain: distinct,
            range,
            padding: 0.0,
        }
    }

    /// Inner and outer padding as a fraction of the step, in [0, 1].
    #[must_use]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding.clamp(0.0, 1.0);
        self
    }

    /// Distinct domain values.
    #[must_use]
    pub fn domain(&self) -> &[T] {
        &self.domain
    }

    /// Distance between the starts of adjacent bands.
    #[must_use]
    pub fn step(&self) -> f64 {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        (r1 - r0) / 2.0f64.mul_add(self.padding, n - self.padding).max(1.0)
    }

    /// Width of each band.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Start of the band for `value`, if it is in the domain.
    #[must_use]
    pub fn position(&self, value: &T) -> Option<f64> {
        let index = self.domain.iter().position(|v| v == value)?;
        let n = self.domain.len() as f64;
        let step = self.step();
        let (r0, r1) = self.range;
        let offset = step.mul_add(-(n - self.padding), r1 - r0) * 0.5;
        Some((index as f64).mul_add(step, r0 + offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_tick_step_round_values() {
        assert_eq!(tick_step(0.0, 10.0, 10), 1.0);
        assert_eq!(tick_step(0.0, 10.0, 5), 2.0);
        assert_eq!(tick_step(0.0, 100.0, 4), 20.0);
        assert_eq!(tick_step(0.0, 1.0, 5), 0.2);
        assert_eq!(tick_step(3.0, 3.0, 5), 0.0);
    }

    #[test]
    fn test_ticks_inside_domain() {
        assert_eq!(ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(ticks(-1.0, 1.0, 4), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(ticks(5.0, 5.0, 5), vec![5.0]);
    }

    #[test]
    fn test_linear_map() {
        let s = LinearScale::new((0.0, 10.0), (0.0, 100.0));
        assert_eq!(s.map(5.0), 50.0);
        assert_eq!(s.map(12.0), 120.0);
        let flipped = LinearScale::new((0.0, 10.0), (330.0, 0.0));
        assert_eq!(flipped.map(0.0), 330.0);
        assert_eq!(flipped.map(10.0), 0.0);
    }

    #[test]
    fn test_linear_degenerate_domain_maps_to_middle() {
        let s = LinearScale::new((4.0, 4.0), (0.0, 100.0));
        assert_eq!(s.map(4.0), 50.0);
        assert_eq!(s.map(-7.0), 50.0);
    }

    #[test]
    fn test_linear_nice() {
        let s = LinearScale::new((0.0, 0.93), (160.0, 0.0)).nice(5);
        assert_eq!(s.domain(), (0.0, 1.0));
        let s = LinearScale::new((0.0, 47.0), (0.0, 1.0)).nice(5);
        assert_eq!(s.domain(), (0.0, 50.0));
    }

    #[test]
    fn test_time_scale_maps_endpoints() {
        let s = TimeScale::new(date(2024, 3, 1), date(2024, 5, 31), (0.0, 600.0));
        assert_eq!(s.map(date(2024, 3, 1)), 0.0);
        assert_eq!(s.map(date(2024, 5, 31)), 600.0);
        let mid = s.map(date(2024, 4, 15));
        assert!(mid > 0.0 && mid < 600.0);
    }

    #[test]
    fn test_time_scale_from_extent() {
        let s = TimeScale::from_extent(
            [date(2024, 4, 2), date(2024, 3, 9), date(2024, 5, 1)],
            (0.0, 1.0),
        )
        .unwrap();
        assert_eq!(s.domain(), (date(2024, 3, 9), date(2024, 5, 1)));
        assert!(TimeScale::from_extent(std::iter::empty(), (0.0, 1.0)).is_none());
    }

    #[test]
    fn test_month_ticks() {
        let s = TimeScale::new(date(2024, 3, 1), date(2024, 5, 20), (0.0, 1.0));
        assert_eq!(
            s.month_ticks(),
            vec![date(2024, 3, 1), date(2024, 4, 1), date(2024, 5, 1)]
        );
        let across_year = TimeScale::new(date(2023, 12, 5), date(2024, 1, 5), (0.0, 1.0));
        assert_eq!(across_year.month_ticks(), vec![date(2024, 1, 1)]);
    }

    #[test]
    fn test_day_number_round_trip() {
        let d = date(2024, 4, 7);
        assert_eq!(date_from_day_number(day_number(d)), Some(d));
        assert_eq!(date_from_day_number(f64::NAN), None);
    }

    #[test]
    fn test_band_scale_without_padding() {
        let s = BandScale::new(["a", "b", "c", "d"], (0.0, 100.0));
        assert_eq!(s.step(), 25.0);
        assert_eq!(s.bandwidth(), 25.0);
        assert_eq!(s.position(&"a"), Some(0.0));
        assert_eq!(s.position(&"d"), Some(75.0));
        assert_eq!(s.position(&"z"), None);
    }

    #[test]
    fn test_band_scale_with_padding() {
        let s = BandScale::new([1, 2, 3], (0.0, 250.0)).padding(0.1);
        // step = 250 / (3 - 0.1 + 0.2)
        let step = 250.0 / 3.1;
        assert!((s.step() - step).abs() < 1e-9);
        assert!((s.bandwidth() - step * 0.9).abs() < 1e-9);
        let first = s.position(&1).unwrap();
        assert!((first - step * 0.1).abs() < 1e-9);
        let last = s.position(&3).unwrap();
        assert!((last + s.bandwidth() - (250.0 - step * 0.1)).abs() < 1e-9);
    }

    #[test]
    fn test_band_scale_deduplicates() {
        let s = BandScale::new(["x", "y", "x"], (0.0, 1.0));
        assert_eq!(s.domain(), &["x", "y"]);
    }
}
