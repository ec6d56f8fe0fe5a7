//! Process-wide cache of user-approved words backed by a flat file.
//!
//! The file holds one lowercase word per line and only ever grows by
//! appending. Reading it is skipped unless its modification time has moved
//! past the last one we loaded, so the check can run on every keystroke.

use crate::{Error, Result};
use dashmap::DashMap;
use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, error, warn};

lazy_static! {
    static ref SHARED: DashMap<PathBuf, Arc<UserDictionary>> = DashMap::new();
}

#[derive(Debug, Default)]
struct State {
    /// Words read from or appended to the backing file.
    words: HashSet<String>,
    /// Words accepted for this process only; survive reloads.
    ignored: HashSet<String>,
    last_loaded: Option<SystemTime>,
    loads: u64,
}

#[derive(Debug)]
pub struct UserDictionary {
    path: PathBuf,
    state: Mutex<State>,
}

impl UserDictionary {
    /// An empty cache for `path`. Nothing is read until [`ensure_loaded`].
    ///
    /// [`ensure_loaded`]: UserDictionary::ensure_loaded
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(State::default()),
        }
    }

    /// The process-wide cache for `path`, created on first use.
    pub fn shared(path: impl Into<PathBuf>) -> Arc<Self> {
        let path = path.into();
        SHARED
            .entry(path.clone())
            .or_insert_with(|| Arc::new(Self::new(path)))
            .value()
            .clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bring the cache up to date with the backing file.
    ///
    /// Returns `false` if the file could not be read; the previous contents
    /// stay in place.
    pub fn ensure_loaded(&self) -> bool {
        let mut state = self.state.lock();

        match self.reload_if_stale(&mut state) {
            Ok(true) => {
                debug!(
                    path = %self.path.display(),
                    words = state.words.len(),
                    "user dictionary reloaded"
                );
                true
            }
            Ok(false) => true,
            Err(e) => {
                warn!(error = %e, "failed to load user dictionary");
                false
            }
        }
    }

    fn reload_if_stale(&self, state: &mut State) -> Result<bool> {
        let modified = fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .map_err(|e| Error::io(&self.path, e))?;

        if state.last_loaded.is_some_and(|last| modified <= last) {
            return Ok(false);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;
        state.words = parse_words(&content);
        state.last_loaded = Some(modified);
        state.loads += 1;

        Ok(true)
    }

    /// Lookup of an already lowercased word.
    pub fn contains(&self, word_lower: &str) -> bool {
        let state = self.state.lock();
        state.words.contains(word_lower) || state.ignored.contains(word_lower)
    }

    /// Run `f` against a consistent view of the cache. The predicate receives
    /// lowercased words.
    pub fn with_snapshot<R>(&self, f: impl FnOnce(&dyn Fn(&str) -> bool) -> R) -> R {
        let state = self.state.lock();
        let lookup = |w: &str| state.words.contains(w) || state.ignored.contains(w);
        f(&lookup)
    }

    /// Accept `word` and persist it to the backing file.
    ///
    /// A failed append is logged; the word stays accepted for this process,
    /// across reloads.
    pub fn add(&self, word: &str) {
        let word = word.to_lowercase();
        let mut state = self.state.lock();

        // Pick up external edits first; the mtime advanced below must not hide them.
        if let Err(e) = self.reload_if_stale(&mut state) {
            debug!(error = %e, "user dictionary not refreshed before append");
        }

        if !state.words.insert(word.clone()) {
            return;
        }

        match self.append(&word) {
            Ok(modified) => {
                state.ignored.remove(&word);
                // Our own append must not look like an external edit.
                if state.last_loaded.is_some_and(|last| modified > last) {
                    state.last_loaded = Some(modified);
                }
            }
            Err(e) => {
                error!(error = %e, word = %word, "failed to persist user dictionary word");
                state.ignored.insert(word);
            }
        }
    }

    /// Accept `word` for the lifetime of the process without persisting it.
    pub fn ignore(&self, word: &str) {
        let word = word.to_lowercase();
        let mut state = self.state.lock();

        if !state.words.contains(&word) {
            state.ignored.insert(word);
        }
    }

    fn append(&self, word: &str) -> Result<SystemTime> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::io(&self.path, e))?;
        writeln!(file, "{word}").map_err(|e| Error::io(&self.path, e))?;

        file.metadata()
            .and_then(|m| m.modified())
            .map_err(|e| Error::io(&self.path, e))
    }

    /// Number of distinct accepted words, persisted and ignored.
    pub fn len(&self) -> usize {
        let state = self.state.lock();
        let unsaved = state.ignored.iter().filter(|w| !state.words.contains(*w)).count();
        state.words.len() + unsaved
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Modification time of the file contents currently cached.
    pub fn last_loaded(&self) -> Option<SystemTime> {
        self.state.lock().last_loaded
    }

    /// How many times the backing file has been read in full.
    pub fn load_count(&self) -> u64 {
        self.state.lock().loads
    }
}

fn parse_words(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_lowercase)
        .collect()
}
