//! Tray persistence across process restarts.
//!
//! The snapshot is deliberately shallow: count, order, per-session URL,
//! and the selected index. Engine-level history, scroll positions, and
//! anything else a richer restore might want belong to the engine and
//! are out of scope here.

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;

/// Current snapshot schema version.
pub const TRAY_SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Persisted state of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// The session's URL at snapshot time: the displayed URL when one
    /// was committed, else the requested URL, else none (blank tab).
    pub url: Option<Url>,
}

/// Persisted state of the whole tray.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraySnapshot {
    /// Schema version, checked on restore.
    pub schema_version: u32,
    /// Sessions in tray order.
    pub sessions: Vec<SessionSnapshot>,
    /// Index of the selected session, if any.
    pub selected: Option<usize>,
}

impl TraySnapshot {
    /// Writes the snapshot as JSON to `path`.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reads a snapshot from a JSON file at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
