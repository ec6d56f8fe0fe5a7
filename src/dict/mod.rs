//! Dictionaries: the boundary traits the checker talks to, the word-list
//! backed implementation, the on-disk store and the shared user dictionary.

pub mod dictionary;
pub mod store;
pub mod suggestions;
pub mod user;

use crate::Result;
use std::sync::Arc;

pub use dictionary::Dictionary;
pub use store::{DictionaryDir, DictionaryInfo};
pub use user::UserDictionary;

/// Spelling oracle for a single language.
pub trait DictionaryService: Send + Sync {
    /// Whether the dictionary rejects `word`.
    fn misspelled(&self, word: &str) -> bool;

    /// Candidate corrections for `word`, best first.
    fn suggest(&self, word: &str) -> Result<Vec<String>>;
}

/// Opens the dictionary service for a locale identifier such as `en_US`.
pub trait DictionarySource: Send + Sync {
    fn open(&self, locale: &str) -> Result<Arc<dyn DictionaryService>>;
}

impl<F> DictionarySource for F
where
    F: Fn(&str) -> Result<Arc<dyn DictionaryService>> + Send + Sync,
{
    fn open(&self, locale: &str) -> Result<Arc<dyn DictionaryService>> {
        self(locale)
    }
}
