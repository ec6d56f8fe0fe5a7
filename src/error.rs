use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no locale configured for spell checking")]
    LocaleMissing,

    #[error("no dictionary for locale '{locale}' in {}", dir.display())]
    DictionaryNotFound { locale: String, dir: PathBuf },

    #[error("failed to load dictionary {}: {source}", path.display())]
    DictionaryLoad {
        path: PathBuf,
        #[source]
        source: fst::Error,
    },

    #[error("failed to build dictionary: {0}")]
    DictionaryBuild(#[source] fst::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("user dictionary {} could not be loaded", path.display())]
    UserDictionaryUnavailable { path: PathBuf },

    #[error("invalid highlight pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("suggestion lookup failed for '{word}': {reason}")]
    Suggest { word: String, reason: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
