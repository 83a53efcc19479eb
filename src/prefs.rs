//! Persisted user preference: the last selected workload type.
//!
//! Stored as a small JSON object (`{"preferredWorkloadType": "..."}`) at a
//! configurable path. A missing file means "no preference".

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PrefsError;

/// Default file name, relative to the working directory.
pub const DEFAULT_PREFS_FILE: &str = ".procsize-prefs.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_workload_type: Option<String>,
}

/// File-backed preference store.
#[derive(Debug, Clone)]
pub struct PrefsStore {
    path: PathBuf,
}

impl PrefsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Preferences, PrefsError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Preferences::default()),
            Err(source) => return Err(PrefsError::Io { path: self.path.clone(), source }),
        };
        serde_json::from_str(&text).map_err(|source| PrefsError::Parse { path: self.path.clone(), source })
    }

    /// Saved workload id, ignoring an unreadable file.
    pub fn preferred_workload(&self) -> Option<String> {
        match self.load() {
            Ok(prefs) => prefs.preferred_workload_type,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable preferences");
                None
            }
        }
    }

    /// Persist the selected workload type.
    pub fn save_workload(&self, workload_id: &str) -> Result<(), PrefsError> {
        let prefs = Preferences {
            preferred_workload_type: Some(workload_id.to_string()).filter(|s| !s.is_empty()),
        };
        let json = serde_json::to_string_pretty(&prefs)
            .map_err(|source| PrefsError::Parse { path: self.path.clone(), source })?;
        std::fs::write(&self.path, json).map_err(|source| PrefsError::Io { path: self.path.clone(), source })?;
        debug!(path = %self.path.display(), workload = workload_id, "preference saved");
        Ok(())
    }
}
