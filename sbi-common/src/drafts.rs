//! Draft persistence
//!
//! Drafts are timestamped JSON snapshots of an [`InterviewSession`] stored
//! under `<base>/drafts`. A draft file is created once and never rewritten;
//! saving again produces a new file.

use crate::session::InterviewSession;
use crate::time::{draft_stamp, now};
use crate::{Error, Result};
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Attempts at a unique name before giving up on a stamp
const MAX_NAME_COLLISIONS: usize = 100;

/// Durable draft save/load
pub trait DraftStore {
    /// Persist a full snapshot, returning where it was written
    fn save(&self, session: &InterviewSession) -> Result<PathBuf>;

    /// Read a snapshot back
    fn load(&self, path: &Path) -> Result<InterviewSession>;

    /// Known drafts, oldest first
    fn list(&self) -> Result<Vec<PathBuf>>;
}

/// Replace characters that are illegal or awkward in file names and collapse
/// whitespace. Never returns an empty string.
pub fn sanitize_filename(name: &str) -> String {
    let mut replaced = String::with_capacity(name.len());
    let mut in_illegal_run = false;
    for c in name.chars() {
        if matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
            if !in_illegal_run {
                replaced.push('_');
            }
            in_illegal_run = true;
        } else {
            replaced.push(c);
            in_illegal_run = false;
        }
    }

    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        "Unknown".to_string()
    } else {
        collapsed
    }
}

/// Write `bytes` to the freshly created file at `path`
///
/// A partial write is removed so a failed save leaves no unreadable draft.
fn write_or_remove(path: &Path, mut file: impl Write, bytes: &[u8]) -> Result<()> {
    let written = file.write_all(bytes).and_then(|()| file.flush());
    drop(file);
    if let Err(e) = written {
        if let Err(remove_err) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %remove_err, "Could not remove partial draft");
        }
        return Err(Error::persistence(path, e));
    }
    Ok(())
}

/// Filesystem-backed draft store
#[derive(Debug, Clone)]
pub struct FsDraftStore {
    drafts_dir: PathBuf,
}

impl FsDraftStore {
    pub fn new(drafts_dir: impl Into<PathBuf>) -> Self {
        Self {
            drafts_dir: drafts_dir.into(),
        }
    }

    /// Directory drafts are written to
    pub fn dir(&self) -> &Path {
        &self.drafts_dir
    }

    /// Save with an explicit timestamp
    pub fn save_at(&self, session: &InterviewSession, at: &DateTime<Local>) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.drafts_dir)
            .map_err(|e| Error::persistence(&self.drafts_dir, e))?;

        let json = serde_json::to_string_pretty(session)
            .map_err(|e| Error::persistence(&self.drafts_dir, e))?;

        let base = format!(
            "draft-{}-{}",
            draft_stamp(at),
            sanitize_filename(&session.candidate.name)
        );

        for attempt in 1..=MAX_NAME_COLLISIONS {
            let file_name = if attempt == 1 {
                format!("{}.json", base)
            } else {
                format!("{}-{}.json", base, attempt)
            };
            let path = self.drafts_dir.join(file_name);

            let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(Error::persistence(&path, e)),
            };
            write_or_remove(&path, file, json.as_bytes())?;

            info!(path = %path.display(), candidate = %session.candidate.name, "Draft saved");
            return Ok(path);
        }

        Err(Error::persistence(
            self.drafts_dir.join(format!("{}.json", base)),
            "too many drafts with the same name and timestamp",
        ))
    }
}

impl DraftStore for FsDraftStore {
    fn save(&self, session: &InterviewSession) -> Result<PathBuf> {
        self.save_at(session, &now())
    }

    fn load(&self, path: &Path) -> Result<InterviewSession> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::persistence(path, e))?;
        let session: InterviewSession = serde_json::from_str(&text)
            .map_err(|e| Error::persistence(path, format!("invalid draft: {}", e)))?;
        info!(path = %path.display(), candidate = %session.candidate.name, "Draft loaded");
        Ok(session)
    }

    fn list(&self) -> Result<Vec<PathBuf>> {
        let entries = match std::fs::read_dir(&self.drafts_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::persistence(&self.drafts_dir, e)),
        };

        let mut drafts = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Error::persistence(&self.drafts_dir, e))?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                drafts.push(path);
            }
        }
        drafts.sort();
        Ok(drafts)
    }
}
