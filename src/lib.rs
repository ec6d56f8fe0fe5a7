pub mod checker;
pub mod cli;
pub mod config;
pub mod dict;
pub mod error;
pub mod session;

pub use checker::{Analysis, HighlightStrategy, MisspelledSet, SpellChecker};
pub use config::Config;
pub use dict::{Dictionary, DictionaryDir, DictionaryService, DictionarySource, UserDictionary};
pub use error::{Error, Result};
pub use session::{Document, DocumentModel, HighlightSink, RenderQueue, Session, SessionState};

use serde::Serialize;

/// A word-like slice of the source text.
///
/// `start` and `end` are character offsets, not byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// A character range of the document that the renderer must flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct HighlightRange {
    pub start: usize,
    pub end: usize,
}

impl HighlightRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}
