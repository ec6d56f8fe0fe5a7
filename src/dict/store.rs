use crate::dict::{Dictionary, DictionaryService, DictionarySource};
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const COMPILED_EXT: &str = "dict";
const WORDLIST_EXT: &str = "txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryInfo {
    pub language: String,
    pub path: PathBuf,
    pub word_count: usize,
    pub size_bytes: u64,
}

/// A directory of dictionaries named after their locale.
///
/// `<locale>.dict` holds a compiled FST and wins over a plain
/// `<locale>.txt` word list.
#[derive(Debug, Clone)]
pub struct DictionaryDir {
    root: PathBuf,
    max_suggestions: usize,
}

impl DictionaryDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_suggestions: 5,
        }
    }

    pub fn with_max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.max_suggestions = max_suggestions;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn compiled_path(&self, locale: &str) -> PathBuf {
        self.root.join(format!("{locale}.{COMPILED_EXT}"))
    }

    pub fn wordlist_path(&self, locale: &str) -> PathBuf {
        self.root.join(format!("{locale}.{WORDLIST_EXT}"))
    }

    pub fn open_dictionary(&self, locale: &str) -> Result<Dictionary> {
        self.check_locale(locale)?;

        let compiled = self.compiled_path(locale);
        let dictionary = if compiled.is_file() {
            debug!(path = %compiled.display(), "loading compiled dictionary");
            Dictionary::load_from_path(&compiled)?
        } else {
            let wordlist = self.wordlist_path(locale);
            if !wordlist.is_file() {
                return Err(self.not_found(locale));
            }
            debug!(path = %wordlist.display(), "building dictionary from word list");
            Dictionary::load_wordlist(&wordlist)?
        };

        Ok(dictionary.with_max_suggestions(self.max_suggestions))
    }

    /// Compile `wordlist` into `<root>/<locale>.dict`.
    pub fn install_wordlist(&self, wordlist: &Path, locale: &str) -> Result<DictionaryInfo> {
        self.check_locale(locale)?;
        let content = fs::read_to_string(wordlist).map_err(|e| Error::io(wordlist, e))?;
        let words: Vec<&str> = content.lines().collect();

        fs::create_dir_all(&self.root).map_err(|e| Error::io(&self.root, e))?;
        let path = self.compiled_path(locale);
        let word_count = Dictionary::build_from_words(&words, &path)?;
        let size_bytes = fs::metadata(&path).map_err(|e| Error::io(&path, e))?.len();

        Ok(DictionaryInfo {
            language: locale.to_string(),
            path,
            word_count,
            size_bytes,
        })
    }

    /// Every dictionary in the directory, sorted by language.
    pub fn list(&self) -> Result<Vec<DictionaryInfo>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut languages = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(|e| Error::io(&self.root, e))? {
            let path = entry.map_err(|e| Error::io(&self.root, e))?.path();
            let is_dictionary = matches!(
                path.extension().and_then(|s| s.to_str()),
                Some(COMPILED_EXT) | Some(WORDLIST_EXT)
            );
            if let Some(language) = path.file_stem().and_then(|s| s.to_str()) {
                if is_dictionary && !languages.iter().any(|l| l == language) {
                    languages.push(language.to_string());
                }
            }
        }
        languages.sort();

        let mut infos = Vec::with_capacity(languages.len());
        for language in languages {
            if let Some(info) = self.info(&language)? {
                infos.push(info);
            }
        }
        Ok(infos)
    }

    pub fn info(&self, locale: &str) -> Result<Option<DictionaryInfo>> {
        let compiled = self.compiled_path(locale);
        let path = if compiled.is_file() {
            compiled
        } else {
            let wordlist = self.wordlist_path(locale);
            if !wordlist.is_file() {
                return Ok(None);
            }
            wordlist
        };

        let size_bytes = fs::metadata(&path).map_err(|e| Error::io(&path, e))?.len();
        let word_count = self.open_dictionary(locale)?.len();

        Ok(Some(DictionaryInfo {
            language: locale.to_string(),
            path,
            word_count,
            size_bytes,
        }))
    }

    /// Locales name files inside the root; anything that could escape it is unknown.
    fn check_locale(&self, locale: &str) -> Result<()> {
        if locale.is_empty() {
            return Err(Error::LocaleMissing);
        }
        if locale.contains(['/', '\\']) || locale.starts_with('.') {
            return Err(self.not_found(locale));
        }
        Ok(())
    }

    fn not_found(&self, locale: &str) -> Error {
        Error::DictionaryNotFound {
            locale: locale.to_string(),
            dir: self.root.clone(),
        }
    }
}

impl DictionarySource for DictionaryDir {
    fn open(&self, locale: &str) -> Result<Arc<dyn DictionaryService>> {
        Ok(Arc::new(self.open_dictionary(locale)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_prefers_compiled() {
        let dir = tempdir().unwrap();
        let store = DictionaryDir::new(dir.path());
        fs::write(store.wordlist_path("en_US"), "alpha\n").unwrap();

        let list = dir.path().join("words.txt");
        fs::write(&list, "alpha\nbeta\ngamma\n").unwrap();
        let info = store.install_wordlist(&list, "en_US").unwrap();
        assert_eq!(info.word_count, 3);

        let dict = store.open_dictionary("en_US").unwrap();
        assert!(dict.contains("gamma"));
    }

    #[test]
    fn test_open_falls_back_to_wordlist() {
        let dir = tempdir().unwrap();
        let store = DictionaryDir::new(dir.path());
        fs::write(store.wordlist_path("fr_FR"), "bonjour\nmonde\n").unwrap();

        let service = store.open("fr_FR").unwrap();
        assert!(!service.misspelled("Bonjour"));
        assert!(service.misspelled("hello"));
    }

    #[test]
    fn test_missing_locale() {
        let dir = tempdir().unwrap();
        let store = DictionaryDir::new(dir.path());

        assert!(matches!(
            store.open_dictionary("de_DE"),
            Err(Error::DictionaryNotFound { .. })
        ));
        assert!(matches!(store.open_dictionary(""), Err(Error::LocaleMissing)));
        assert!(matches!(
            store.open_dictionary("../secret"),
            Err(Error::DictionaryNotFound { .. })
        ));
    }

    #[test]
    fn test_list_dictionaries() {
        let dir = tempdir().unwrap();
        let store = DictionaryDir::new(dir.path());
        fs::write(store.wordlist_path("en_US"), "one\ntwo\n").unwrap();
        fs::write(store.wordlist_path("en_GB"), "colour\n").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let infos = store.list().unwrap();
        let languages: Vec<_> = infos.iter().map(|i| i.language.as_str()).collect();
        assert_eq!(languages, vec!["en_GB", "en_US"]);
        assert_eq!(infos[1].word_count, 2);
    }

    #[test]
    fn test_list_missing_root() {
        let store = DictionaryDir::new("/nonexistent/spellmark/dicts");
        assert!(store.list().unwrap().is_empty());
    }
}
