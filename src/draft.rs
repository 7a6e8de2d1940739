//! Debounced draft autosave.
//!
//! Edits queue a draft write; the event loop flushes it once the buffer has
//! been quiet for the delay window. Drafts live in a JSON sidecar next to
//! the document so an unsaved session can be recovered on the next open.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Quiet period after the last edit before the draft is written.
pub const AUTOSAVE_DELAY_MS: u64 = 2000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Draft {
    pub text: String,
    /// Unix milliseconds when the draft was written.
    pub saved_at_ms: u64,
}

pub fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Sidecar path for a document, e.g. `notes.md` -> `notes.md.draft.json`.
pub fn sidecar_path(file: &Path) -> PathBuf {
    let mut name = file.file_name().map_or_else(
        || "untitled".to_string(),
        |n| n.to_string_lossy().to_string(),
    );
    name.push_str(".draft.json");
    file.with_file_name(name)
}

pub fn save(path: &Path, text: &str) -> Result<()> {
    let draft = Draft {
        text: text.to_string(),
        saved_at_ms: now_unix_ms(),
    };
    let json = serde_json::to_string(&draft).context("serialize draft")?;
    fs::write(path, json).with_context(|| format!("Failed to write draft {}", path.display()))
}

pub fn load(path: &Path) -> Result<Option<Draft>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read draft {}", path.display()))?;
    let draft = serde_json::from_str(&content)
        .with_context(|| format!("Malformed draft {}", path.display()))?;
    Ok(Some(draft))
}

/// Delete the sidecar, called after an explicit save makes it stale.
pub fn remove(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)
            .with_context(|| format!("Failed to remove draft {}", path.display()))?;
    }
    Ok(())
}

/// True when the draft was written after the document file's last
/// modification, meaning it holds edits the file does not.
pub fn is_newer_than_file(draft: &Draft, file: &Path) -> bool {
    let Ok(meta) = fs::metadata(file) else {
        return true;
    };
    let file_ms = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
    draft.saved_at_ms > file_ms
}

/// Defers draft writes until edits pause.
///
/// Every edit re-queues with the current time; `take_ready` reports once
/// when the delay has elapsed with no further edits.
#[derive(Debug)]
pub struct AutosaveDebouncer {
    delay_ms: u64,
    queued_at_ms: Option<u64>,
}

impl Default for AutosaveDebouncer {
    fn default() -> Self {
        Self::new(AUTOSAVE_DELAY_MS)
    }
}

impl AutosaveDebouncer {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            queued_at_ms: None,
        }
    }

    pub const fn queue(&mut self, now_ms: u64) {
        self.queued_at_ms = Some(now_ms);
    }

    pub const fn is_pending(&self) -> bool {
        self.queued_at_ms.is_some()
    }

    pub fn take_ready(&mut self, now_ms: u64) -> bool {
        match self.queued_at_ms {
            Some(queued) if now_ms.saturating_sub(queued) >= self.delay_ms => {
                self.queued_at_ms = None;
                true
            }
            _ => false,
        }
    }

    pub const fn cancel(&mut self) {
        self.queued_at_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sidecar_path_appends_suffix() {
        assert_eq!(
            sidecar_path(Path::new("/tmp/notes.md")),
            PathBuf::from("/tmp/notes.md.draft.json")
        );
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.md.draft.json");
        save(&path, "# draft body").unwrap();

        let draft = load(&path).unwrap().unwrap();
        assert_eq!(draft.text, "# draft body");
        assert!(draft.saved_at_ms > 0);
    }

    #[test]
    fn test_load_missing_is_none() {
        let dir = tempdir().unwrap();
        assert_eq!(load(&dir.path().join("absent.json")).unwrap(), None);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.md.draft.json");
        save(&path, "x").unwrap();
        remove(&path).unwrap();
        assert!(!path.exists());
        remove(&path).unwrap();
    }

    #[test]
    fn test_draft_newer_than_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("doc.md");
        std::fs::write(&file, "saved content").unwrap();

        let newer = Draft {
            text: "draft".into(),
            saved_at_ms: now_unix_ms() + 10_000,
        };
        assert!(is_newer_than_file(&newer, &file));

        let older = Draft {
            text: "draft".into(),
            saved_at_ms: 1,
        };
        assert!(!is_newer_than_file(&older, &file));
    }

    #[test]
    fn test_debouncer_waits_for_quiet_period() {
        let mut debouncer = AutosaveDebouncer::new(2000);
        debouncer.queue(1000);
        assert!(debouncer.is_pending());
        assert!(!debouncer.take_ready(2500));

        // A new edit restarts the window.
        debouncer.queue(2600);
        assert!(!debouncer.take_ready(3500));
        assert!(debouncer.take_ready(4600));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_debouncer_cancel() {
        let mut debouncer = AutosaveDebouncer::new(2000);
        debouncer.queue(0);
        debouncer.cancel();
        assert!(!debouncer.take_ready(10_000));
    }
}
