//! In-memory log of recent assessments. Bounded, process-local, lost
//! on restart (by spec: no persistence). Besides diagnostics it
//! supplies the previous total score when a caller asks for a velocity
//! check without passing one.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::assessment::Assessment;
use crate::thresholds::RiskBand;
use crate::signal::SignalKind;

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub ts_unix: u64,
    pub band: RiskBand,
    pub total_score: i32,
    // compact explainability fingerprint for quick diagnostics:
    pub top_signals: Vec<SignalKind>,
    pub top_contributions: Vec<f32>,
}

#[derive(Debug)]
pub struct History {
    inner: Mutex<Vec<HistoryEntry>>,
    cap: usize,
}

impl History {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::with_capacity(cap.min(10_000))),
            cap: cap.min(10_000),
        }
    }

    pub fn push(&self, a: &Assessment) {
        let ts = now_unix();
        let (signals, contributions) = {
            let mut s = Vec::new();
            let mut c = Vec::new();
            for rc in a.top_contributors.iter().take(3) {
                s.push(rc.key);
                c.push(rc.contribution);
            }
            (s, c)
        };

        let entry = HistoryEntry {
            ts_unix: ts,
            band: a.band,
            total_score: a.total_score,
            top_signals: signals,
            top_contributions: contributions,
        };

        let mut v = self.inner.lock().expect("history mutex poisoned");
        v.push(entry);
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
    }

    pub fn snapshot_last_n(&self, n: usize) -> Vec<HistoryEntry> {
        let v = self.inner.lock().expect("history mutex poisoned");
        let len = v.len();
        let start = len.saturating_sub(n);
        v[start..].to_vec()
    }

    /// Total score of the most recent entry, if any.
    pub fn last_score(&self) -> Option<i32> {
        let v = self.inner.lock().expect("history mutex poisoned");
        v.last().map(|e| e.total_score)
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
