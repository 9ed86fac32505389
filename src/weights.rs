//! # Signal Weights
//!
//! Per-signal weights in percentage points (0-100 scale, not
//! fractions). The set SHOULD sum to 100; violations are detected and
//! reported (`InvalidWeightTotal`) but never block a computation —
//! the caller gets a warning alongside a score computed with the
//! weights as supplied.
//!
//! Loads from a JSON file of `{ "<signal key>": weight }` pairs with a
//! built-in default seed as fallback, and a hot-reload wrapper that
//! re-reads the file when its modified time changes.

use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
    time::SystemTime,
};
use tracing::{debug, warn};

use crate::error::ScoreError;
use crate::signal::SignalKind;

/// Tolerance for the 100-point sum check, so integer slider weights
/// behave exactly and float noise does not trip the warning.
const WEIGHT_SUM_TOLERANCE: f32 = 0.01;

/// A mapping from signal to its weight in percentage points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightSet {
    weights: BTreeMap<SignalKind, f32>,
}

impl WeightSet {
    pub fn new() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    /// Build from raw wire pairs. Unknown keys are dropped (policy:
    /// excluded, not an error) and negative weights clamp to zero.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f32)>,
    {
        let mut weights = BTreeMap::new();
        for (key, w) in pairs {
            match SignalKind::from_key(key) {
                Some(kind) => {
                    let w = if w < 0.0 {
                        warn!(signal = key, weight = w, "negative weight clamped to 0");
                        0.0
                    } else {
                        w
                    };
                    weights.insert(kind, w);
                }
                None => {
                    debug!(key, "unknown signal key in weights, excluded");
                }
            }
        }
        Self { weights }
    }

    pub fn get(&self, kind: SignalKind) -> Option<f32> {
        self.weights.get(&kind).copied()
    }

    /// Sum of all weights in percentage points.
    pub fn total(&self) -> f32 {
        self.weights.values().sum()
    }

    /// Detection only: flags a sum away from 100 without blocking
    /// anything. The engine turns this into a warning reason.
    pub fn validate(&self) -> Result<(), ScoreError> {
        let sum = self.total();
        if (sum - 100.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoreError::InvalidWeightTotal { sum });
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (SignalKind, f32)> + '_ {
        self.weights.iter().map(|(k, w)| (*k, *w))
    }

    /// Default clinical weighting used when no config file is present.
    pub fn default_seed() -> Self {
        Self::from_pairs([
            ("phq9", 25.0),
            ("gad7", 15.0),
            ("sentiment", 20.0),
            ("latency", 15.0),
            ("engagement", 10.0),
            ("keywords", 10.0),
            ("noShow", 5.0),
        ])
    }

    /// Load from a JSON file of `{key: weight}` pairs.
    /// Falls back to `default_seed()` on any error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match load_weights_file(path.as_ref()) {
            Ok(ws) => ws,
            Err(e) => {
                debug!(path = %path.as_ref().display(), error = %e, "weights config not loaded, using default seed");
                Self::default_seed()
            }
        }
    }
}

impl Default for WeightSet {
    fn default() -> Self {
        Self::default_seed()
    }
}

/// Load weights directly (no caching, no fallback). Public for tests/tools.
pub fn load_weights_file(path: &Path) -> io::Result<WeightSet> {
    let bytes = fs::read(path)?;
    let raw: HashMap<String, f32> = serde_json::from_slice(&bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(WeightSet::from_pairs(
        raw.iter().map(|(k, v)| (k.as_str(), *v)),
    ))
}

/// Hot-reload wrapper: reloads when the config file mtime changes.
#[derive(Debug)]
pub struct HotReloadWeights {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    weights: WeightSet,
    last_modified: Option<SystemTime>,
}

impl HotReloadWeights {
    /// Create with a path (defaults to "config/weights.json" if `None`).
    pub fn new(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("config/weights.json"));
        let weights = WeightSet::load_from_file(&path);
        let last_modified = fs::metadata(&path).and_then(|m| m.modified()).ok();
        Self {
            path,
            inner: RwLock::new(State {
                weights,
                last_modified,
            }),
        }
    }

    /// Get the latest weights, reloading if the config file changed.
    pub fn current(&self) -> WeightSet {
        // Fast path: compare mtimes under the read lock only.
        let needs_reload = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(mtime) => {
                let guard = self.inner.read().expect("weights lock poisoned");
                guard.last_modified != Some(mtime)
            }
            // If the file isn't there, keep whatever we have.
            Err(_) => false,
        };

        if !needs_reload {
            return self.inner.read().expect("weights lock poisoned").weights.clone();
        }

        // Slow path: reload with write lock, double-checking for races.
        let mut guard = self.inner.write().expect("weights lock poisoned");
        if let Ok(mtime) = fs::metadata(&self.path).and_then(|m| m.modified()) {
            if guard.last_modified != Some(mtime) {
                if let Ok(ws) = load_weights_file(&self.path) {
                    guard.weights = ws;
                    guard.last_modified = Some(mtime);
                }
            }
        }
        guard.weights.clone()
    }

    /// Force a reload regardless of mtime (admin endpoint).
    pub fn reload(&self) -> WeightSet {
        let mut guard = self.inner.write().expect("weights lock poisoned");
        if let Ok(ws) = load_weights_file(&self.path) {
            guard.weights = ws;
            guard.last_modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok();
        }
        guard.weights.clone()
    }
}
