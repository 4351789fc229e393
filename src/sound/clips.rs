//! Transient storage for uploaded audio clips

use std::{
    collections::HashMap,
    fmt, fs,
    path::PathBuf,
};

use serde::Serialize;
use tracing::{debug, info, warn};

/// Opaque reference to an audio clip
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClipHandle(String);

impl ClipHandle {
    /// Handle of the bundled default clip
    pub fn default_clip() -> Self {
        Self("default".to_string())
    }

    pub fn uploaded(id: u64) -> Self {
        Self(format!("upload-{}", id))
    }

    pub fn is_default(&self) -> bool {
        self.0 == "default"
    }
}

impl fmt::Display for ClipHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Allocates and releases handles for uploaded clips
pub trait ClipRegistry {
    fn register(&mut self, file_name: &str, data: &[u8]) -> Result<ClipHandle, String>;
    /// Path a player can read the clip from
    fn resolve(&self, handle: &ClipHandle) -> Option<PathBuf>;
    fn release(&mut self, handle: &ClipHandle);
}

/// Writes uploaded clips into files under a private spool directory
#[derive(Debug)]
pub struct SpoolClipRegistry {
    dir: PathBuf,
    next_id: u64,
    clips: HashMap<ClipHandle, PathBuf>,
}

impl SpoolClipRegistry {
    /// Use `dir` as the spool directory, creating it if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, String> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| format!("Failed to create spool directory {}: {}", dir.display(), e))?;
        debug!("Spooling uploaded clips in {}", dir.display());
        Ok(Self {
            dir,
            next_id: 1,
            clips: HashMap::new(),
        })
    }

    /// Spool directory under the system temp dir, unique to this process
    pub fn in_temp_dir() -> Result<Self, String> {
        Self::new(std::env::temp_dir().join(format!("pomodoro-timer-{}", std::process::id())))
    }
}

impl ClipRegistry for SpoolClipRegistry {
    fn register(&mut self, file_name: &str, data: &[u8]) -> Result<ClipHandle, String> {
        let handle = ClipHandle::uploaded(self.next_id);
        let path = self.dir.join(format!("{}-{}", handle, sanitize(file_name)));

        fs::write(&path, data)
            .map_err(|e| format!("Failed to spool clip {}: {}", file_name, e))?;

        self.next_id += 1;
        info!("Registered clip {} ({} bytes) as {}", file_name, data.len(), handle);
        self.clips.insert(handle.clone(), path);
        Ok(handle)
    }

    fn resolve(&self, handle: &ClipHandle) -> Option<PathBuf> {
        self.clips.get(handle).cloned()
    }

    fn release(&mut self, handle: &ClipHandle) {
        match self.clips.remove(handle) {
            Some(path) => {
                if let Err(e) = fs::remove_file(&path) {
                    warn!("Failed to remove spooled clip {}: {}", path.display(), e);
                }
                debug!("Released clip {}", handle);
            }
            None => debug!("Release of unknown clip {} ignored", handle),
        }
    }
}

impl Drop for SpoolClipRegistry {
    fn drop(&mut self) {
        let handles: Vec<ClipHandle> = self.clips.keys().cloned().collect();
        for handle in &handles {
            self.release(handle);
        }
        if let Err(e) = fs::remove_dir(&self.dir) {
            debug!("Spool directory {} left in place: {}", self.dir.display(), e);
        }
    }
}

/// Keep only characters that are safe in a file name
fn sanitize(file_name: &str) -> String {
    let cleaned: String = file_name
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "clip".to_string()
    } else {
        cleaned
    }
}
