//! Session persistence.
//!
//! File format: JSONL in `~/.neochat/sessions/{safe_key}.jsonl`
//! - Line 1: `{"_type":"metadata","created_at":"...","updated_at":"...","metadata":{}}`
//! - Line 2+: one message per line, in OpenAI wire format

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::conversation::Conversation;
use crate::types::{Message, Session};
use crate::utils;

// ─────────────────────────────────────────────
// Session metadata (first line of JSONL)
// ─────────────────────────────────────────────

const METADATA_TYPE: &str = "metadata";

/// Metadata header written as the first line of each JSONL session file.
#[derive(Debug, Serialize, Deserialize)]
struct SessionMetadata {
    #[serde(rename = "_type")]
    record_type: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

impl SessionMetadata {
    fn of(session: &Session) -> Self {
        Self {
            record_type: METADATA_TYPE.to_string(),
            created_at: session.created_at,
            updated_at: session.updated_at,
            metadata: session.metadata.clone(),
        }
    }
}

// ─────────────────────────────────────────────
// SessionManager
// ─────────────────────────────────────────────

/// Loads and stores conversations as JSONL files, one file per session name.
///
/// The agent loop never touches this; the caller decides when a turn's
/// conversation is worth persisting.
pub struct SessionManager {
    sessions_dir: PathBuf,
}

impl SessionManager {
    /// Create a new session manager.
    ///
    /// `sessions_dir` defaults to `~/.neochat/sessions/` if `None`.
    /// The directory is created if it doesn't exist.
    pub fn new(sessions_dir: Option<PathBuf>) -> std::io::Result<Self> {
        let dir = sessions_dir.unwrap_or_else(utils::get_sessions_path);
        std::fs::create_dir_all(&dir)?;
        Ok(SessionManager { sessions_dir: dir })
    }

    /// Load a session from disk, or start a fresh one.
    ///
    /// A transcript whose tool results are not threaded to their calls is
    /// discarded with a warning rather than fed back to a model.
    pub fn load(&self, key: &str) -> Session {
        match self.load_from_disk(key) {
            Some(session) => match session.conversation.check_threading() {
                Ok(()) => session,
                Err(e) => {
                    warn!(session = key, "Discarding persisted conversation: {}", e);
                    Session::new(key)
                }
            },
            None => Session::new(key),
        }
    }

    /// Write the whole session to disk, replacing any previous file.
    pub fn save(&self, session: &mut Session) -> std::io::Result<()> {
        session.updated_at = Utc::now();
        let path = self.session_path(&session.key);
        let mut file = std::fs::File::create(&path)?;

        writeln!(file, "{}", serde_json::to_string(&SessionMetadata::of(session))?)?;
        for msg in session.conversation.iter() {
            writeln!(file, "{}", serde_json::to_string(msg)?)?;
        }

        debug!(
            "Saved session '{}' ({} messages) to {}",
            session.key,
            session.conversation.len(),
            path.display()
        );
        Ok(())
    }

    /// Append messages produced by one turn without rewriting the file.
    ///
    /// Falls back to a full [`save`](Self::save) when the file does not exist
    /// yet, so the metadata line is always first.
    pub fn append(&self, session: &mut Session, new_messages: &[Message]) -> std::io::Result<()> {
        let path = self.session_path(&session.key);
        if !path.exists() {
            return self.save(session);
        }

        let mut file = OpenOptions::new().append(true).open(&path)?;
        for msg in new_messages {
            writeln!(file, "{}", serde_json::to_string(msg)?)?;
        }
        session.updated_at = Utc::now();
        debug!("Appended {} messages to session '{}'", new_messages.len(), session.key);
        Ok(())
    }

    /// Drop every message of a session and persist the empty transcript.
    pub fn clear(&self, session: &mut Session) -> std::io::Result<()> {
        session.conversation = Conversation::new();
        self.save(session)
    }

    /// Delete a session file.
    ///
    /// Returns `true` if the session file existed on disk.
    pub fn delete(&self, key: &str) -> bool {
        let path = self.session_path(key);
        if !path.exists() {
            return false;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!("Deleted session file: {}", path.display());
                true
            }
            Err(e) => {
                warn!("Failed to delete session file: {}", e);
                false
            }
        }
    }

    /// List all sessions from disk, newest first.
    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        let entries = match std::fs::read_dir(&self.sessions_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to read sessions directory: {}", e);
                return Vec::new();
            }
        };

        let mut summaries: Vec<SessionSummary> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "jsonl"))
            .filter_map(|path| {
                let file = std::fs::File::open(&path).ok()?;
                let mut lines = BufReader::new(file).lines();
                let meta: SessionMetadata = serde_json::from_str(&lines.next()?.ok()?).ok()?;
                let key = path.file_stem()?.to_str()?.to_string();
                Some(SessionSummary {
                    key,
                    created_at: meta.created_at,
                    updated_at: last_written(&path, meta.updated_at),
                    message_count: lines.map_while(Result::ok).filter(|l| !l.trim().is_empty()).count(),
                    path,
                })
            })
            .collect();

        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        summaries
    }

    /// Get the JSONL file path for a session key.
    fn session_path(&self, key: &str) -> PathBuf {
        self.sessions_dir
            .join(format!("{}.jsonl", utils::safe_filename(key)))
    }

    /// Load a session from a JSONL file.
    fn load_from_disk(&self, key: &str) -> Option<Session> {
        let path = self.session_path(key);
        if !path.exists() {
            return None;
        }

        let file = match std::fs::File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Failed to open session file {}: {}", path.display(), e);
                return None;
            }
        };

        let mut session = Session::new(key);
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let Ok(line) = line else { continue };
            if line.trim().is_empty() {
                continue;
            }

            if let Ok(meta) = serde_json::from_str::<SessionMetadata>(&line) {
                if meta.record_type == METADATA_TYPE {
                    session.created_at = meta.created_at;
                    session.updated_at = last_written(&path, meta.updated_at);
                    session.metadata = meta.metadata;
                    continue;
                }
            }

            match serde_json::from_str::<Message>(&line) {
                Ok(msg) => session.conversation.push(msg),
                Err(e) => warn!(
                    "Skipping unreadable line {} in {}: {}",
                    line_no + 1,
                    path.display(),
                    e
                ),
            }
        }

        debug!(
            "Loaded session '{}' with {} messages from disk",
            key,
            session.conversation.len()
        );
        Some(session)
    }
}

/// Appends leave the header untouched, so the file's modification time can
/// be newer than the recorded `updated_at`.
fn last_written(path: &Path, recorded: DateTime<Utc>) -> DateTime<Utc> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|modified| DateTime::<Utc>::from(modified).max(recorded))
        .unwrap_or(recorded)
}

/// Summary of a session for listing purposes.
#[derive(Clone, Debug)]
pub struct SessionSummary {
    /// Session key (file stem).
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub message_count: usize,
    /// Path to the JSONL file.
    pub path: PathBuf,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
