//! # Score Trend
//! Time-windowed view over recent total scores (default 14 days),
//! backing the trend arrow shown next to the score: rising, falling,
//! or flat across the window. Informational only; velocity alerts
//! compare two scores directly and do not read this.

use serde::Serialize;
use std::{
    collections::VecDeque,
    sync::Mutex,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// Direction of the score across the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Rising,
    Falling,
    Flat,
}

/// Aggregate view over the in-window samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendSummary {
    pub average: f32,
    pub count: usize,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    ts_unix: u64,
    score: i32,
}

/// Thread-safe sliding window over total risk scores.
#[derive(Debug)]
pub struct TrendWindow {
    samples: Mutex<VecDeque<Sample>>,
    window: Duration,
}

impl TrendWindow {
    /// Create a new trend window with the given duration.
    pub fn with_window(window: Duration) -> Self {
        Self {
            samples: Mutex::new(VecDeque::new()),
            window,
        }
    }

    /// Convenience constructor for the 14-day trend window.
    pub fn new_14d() -> Self {
        Self::with_window(Duration::from_secs(14 * 24 * 3600))
    }

    /// Record a new total score. If `ts_unix` is `None`, current time
    /// is used. Entries older than the window are discarded here.
    pub fn record(&self, score: i32, ts_unix: Option<u64>) {
        let now = now_unix();
        let cutoff = now.saturating_sub(self.window.as_secs());

        let mut samples = self.samples.lock().expect("trend window mutex poisoned");
        samples.push_back(Sample {
            ts_unix: ts_unix.unwrap_or(now),
            score,
        });
        while samples.front().is_some_and(|s| s.ts_unix < cutoff) {
            samples.pop_front();
        }
    }

    /// Average, sample count, and direction over the window, in one
    /// pass. Direction compares the newest in-window score against
    /// the oldest; fewer than two samples read as flat.
    pub fn summary(&self) -> TrendSummary {
        let cutoff = now_unix().saturating_sub(self.window.as_secs());
        let samples = self.samples.lock().expect("trend window mutex poisoned");

        let mut count: usize = 0;
        let mut sum: i64 = 0;
        let mut oldest: Option<i32> = None;
        let mut newest: Option<i32> = None;

        for s in samples.iter().filter(|s| s.ts_unix >= cutoff) {
            count += 1;
            sum += s.score as i64;
            if oldest.is_none() {
                oldest = Some(s.score);
            }
            newest = Some(s.score);
        }

        let average = if count > 0 { sum as f32 / count as f32 } else { 0.0 };
        let direction = match (oldest, newest) {
            (Some(o), Some(n)) if n > o => TrendDirection::Rising,
            (Some(o), Some(n)) if n < o => TrendDirection::Falling,
            _ => TrendDirection::Flat,
        };

        TrendSummary {
            average,
            count,
            direction,
        }
    }

    /// Length of the window in seconds (useful for diagnostics).
    pub fn window_secs(&self) -> u64 {
        self.window.as_secs()
    }
}

/// Current UNIX time in seconds.
fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rising_when_newest_exceeds_oldest() {
        let w = TrendWindow::new_14d();
        w.record(40, None);
        w.record(45, None);
        w.record(60, None);
        let s = w.summary();
        assert_eq!(s.count, 3);
        assert_eq!(s.direction, TrendDirection::Rising);
        assert!((s.average - 48.333_332).abs() < 1e-4);
    }

    #[test]
    fn falling_when_newest_below_oldest() {
        let w = TrendWindow::new_14d();
        w.record(60, None);
        w.record(40, None);
        assert_eq!(w.summary().direction, TrendDirection::Falling);
    }

    #[test]
    fn single_sample_reads_flat() {
        let w = TrendWindow::new_14d();
        w.record(61, None);
        let s = w.summary();
        assert_eq!(s.count, 1);
        assert_eq!(s.direction, TrendDirection::Flat);
    }

    #[test]
    fn old_samples_fall_out_of_window() {
        let w = TrendWindow::with_window(Duration::from_secs(100));
        let now = super::now_unix();
        w.record(90, Some(now - 500)); // outside window
        w.record(10, Some(now));
        let s = w.summary();
        assert_eq!(s.count, 1);
        assert!((s.average - 10.0).abs() < 1e-6);
        // the stale high score no longer influences the direction
        assert_eq!(s.direction, TrendDirection::Flat);
    }

    #[test]
    fn empty_window_reports_zero_and_flat() {
        let w = TrendWindow::new_14d();
        let s = w.summary();
        assert_eq!(s.count, 0);
        assert_eq!(s.average, 0.0);
        assert_eq!(s.direction, TrendDirection::Flat);
    }
}
