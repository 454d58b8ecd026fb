use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::state::ChatTurn;

/// Most recent turns kept in memory and on disk
pub const MAX_TURNS: usize = 50;

pub const DEFAULT_GREETING: &str = "Hey dude 🫶🏻";

/// Ordered chat history, oldest first, never longer than [`MAX_TURNS`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    /// A fresh conversation holding only the assistant's greeting
    pub fn seeded(greeting: &str) -> Self {
        Self {
            turns: vec![ChatTurn::assistant(greeting)],
        }
    }

    pub fn from_turns(turns: Vec<ChatTurn>) -> Self {
        let mut transcript = Self { turns };
        transcript.truncate_to_cap();
        transcript
    }

    /// Append a turn, dropping the oldest entries past the cap
    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
        self.truncate_to_cap();
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatTurn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    fn truncate_to_cap(&mut self) {
        if self.turns.len() > MAX_TURNS {
            let excess = self.turns.len() - MAX_TURNS;
            self.turns.drain(..excess);
        }
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a ChatTurn;
    type IntoIter = std::slice::Iter<'a, ChatTurn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

/// Reads and writes the transcript as a JSON array in a single file
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    greeting: String,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>, greeting: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            greeting: greeting.into(),
        }
    }

    /// `<data dir>/chatline/history.json`
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;

        Ok(data_dir.join("chatline").join("history.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    /// Restore the saved transcript. Missing or corrupt data gives the
    /// greeting-only transcript.
    pub fn load(&self) -> Transcript {
        match self.read() {
            Ok(Some(transcript)) => transcript,
            Ok(None) => Transcript::seeded(&self.greeting),
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "discarding unreadable history");
                Transcript::seeded(&self.greeting)
            }
        }
    }

    pub fn save(&self, transcript: &Transcript) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let content = serde_json::to_string(transcript)?;
        fs::write(&self.path, content)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }

    /// Forget the saved transcript and start over from the greeting
    pub fn clear(&self) -> Result<Transcript> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| format!("removing {}", self.path.display()));
            }
        }
        Ok(Transcript::seeded(&self.greeting))
    }

    fn read(&self) -> Result<Option<Transcript>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let turns: Vec<ChatTurn> = serde_json::from_str(&content)?;
        Ok(Some(Transcript::from_turns(turns)))
    }
}
