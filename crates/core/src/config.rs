//! Store configuration
//!
//! Values come from the environment with defaults suited to local use.

use std::path::PathBuf;
use std::time::Duration;

use crate::task::DEFAULT_STORAGE_KEY;

/// Artificial round-trip delay applied before each repository operation
///
/// Lets callers keep async-style ergonomics against a synchronous local
/// store, and is the seam for a slower backend later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatencyProfile {
    pub get_all: Duration,
    pub get_by_id: Duration,
    pub create: Duration,
    pub update: Duration,
    pub delete: Duration,
    pub toggle: Duration,
}

impl LatencyProfile {
    /// No delay at all
    pub fn none() -> Self {
        Self::default()
    }

    /// Delays matching the original hosted-service feel
    pub fn simulated() -> Self {
        Self {
            get_all: Duration::from_millis(200),
            get_by_id: Duration::from_millis(150),
            create: Duration::from_millis(300),
            update: Duration::from_millis(250),
            delete: Duration::from_millis(200),
            toggle: Duration::from_millis(200),
        }
    }

    /// The same delay for every operation
    pub fn uniform(delay: Duration) -> Self {
        Self {
            get_all: delay,
            get_by_id: delay,
            create: delay,
            update: delay,
            delete: delay,
            toggle: delay,
        }
    }
}

/// Configuration for opening a file-backed task service
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the storage file
    pub data_dir: PathBuf,
    /// Storage key; the file is `<data_dir>/<storage_key>.json`
    pub storage_key: String,
    pub latency: LatencyProfile,
    /// Treat an unparseable store as empty instead of failing
    pub recover_corrupt: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".taskflow-data"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            latency: LatencyProfile::none(),
            recover_corrupt: false,
        }
    }
}

fn parse_flag(raw: &str, default: bool) -> bool {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl StoreConfig {
    /// Build from `TASKFLOW_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from `TASKFLOW_*` values resolved by `lookup`
    ///
    /// Missing or blank values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |name: &str| {
            lookup(name)
                .map(|raw| parse_flag(&raw, false))
                .unwrap_or(false)
        };
        let latency = if flag("TASKFLOW_SIMULATE_LATENCY") {
            LatencyProfile::simulated()
        } else {
            LatencyProfile::none()
        };

        Self {
            data_dir: non_empty(lookup("TASKFLOW_DATA_DIR"))
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            storage_key: non_empty(lookup("TASKFLOW_STORAGE_KEY")).unwrap_or(defaults.storage_key),
            latency,
            recover_corrupt: flag("TASKFLOW_RECOVER_CORRUPT"),
        }
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_latency(mut self, latency: LatencyProfile) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_recover_corrupt(mut self, recover_corrupt: bool) -> Self {
        self.recover_corrupt = recover_corrupt;
        self
    }

    /// Full path of the storage file
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.storage_key))
    }
}
