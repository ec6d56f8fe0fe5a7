use crate::dict::{suggestions, DictionaryService};
use crate::{Error, Result};
use fst::{Automaton, IntoStreamer, Set, SetBuilder, Streamer};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Word-list dictionary stored as an FST set of lowercase words.
pub struct Dictionary {
    set: Set<Vec<u8>>,
    max_suggestions: usize,
}

impl Dictionary {
    /// Load a dictionary compiled with [`Dictionary::build_from_words`].
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        let set = Set::new(bytes).map_err(|source| Error::DictionaryLoad {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::from_set(set))
    }

    /// Build an in-memory dictionary from a plain word list, one word per line.
    pub fn load_wordlist(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_words(content.lines())
    }

    /// Build an in-memory dictionary from arbitrary words.
    ///
    /// Words are trimmed and lowercased; blanks and `#` comment lines are skipped.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = normalize(words);
        let set = Set::from_iter(words.iter()).map_err(Error::DictionaryBuild)?;
        Ok(Self::from_set(set))
    }

    fn from_set(set: Set<Vec<u8>>) -> Self {
        Self {
            set,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }

    pub fn with_max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.max_suggestions = max_suggestions;
        self
    }

    /// Check if word exists in dictionary
    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Get all words with a given prefix
    pub fn words_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut results = Vec::new();
        let mut stream = self
            .set
            .search(fst::automaton::Str::new(prefix).starts_with())
            .into_stream();

        while let Some(key) = stream.next() {
            if let Ok(word) = std::str::from_utf8(key) {
                results.push(word.to_string());
            }
        }

        results
    }

    /// Visit every word whose length in characters lies within `lengths`.
    ///
    /// Walks the whole set; keep it for short inputs.
    pub fn words_of_length(&self, lengths: std::ops::RangeInclusive<usize>) -> Vec<String> {
        let mut results = Vec::new();
        let mut stream = self.set.stream();

        while let Some(key) = stream.next() {
            if let Ok(word) = std::str::from_utf8(key) {
                if lengths.contains(&word.chars().count()) {
                    results.push(word.to_string());
                }
            }
        }

        results
    }

    /// Compile a word list into an FST file at `output_path`.
    ///
    /// Returns the number of distinct words written.
    pub fn build_from_words<S: AsRef<str>>(words: &[S], output_path: &Path) -> Result<usize> {
        let words = normalize(words);

        let file = File::create(output_path).map_err(|e| Error::io(output_path, e))?;
        let mut builder = SetBuilder::new(BufWriter::new(file)).map_err(Error::DictionaryBuild)?;

        for word in &words {
            builder.insert(word).map_err(Error::DictionaryBuild)?;
        }

        builder.finish().map_err(Error::DictionaryBuild)?;

        Ok(words.len())
    }
}

impl DictionaryService for Dictionary {
    fn misspelled(&self, word: &str) -> bool {
        !self.contains(word) && !self.contains(&word.to_lowercase())
    }

    fn suggest(&self, word: &str) -> Result<Vec<String>> {
        Ok(suggestions::generate(
            &word.to_lowercase(),
            self,
            self.max_suggestions,
        ))
    }
}

/// Sorted, deduplicated lowercase words ready for FST insertion.
fn normalize<I, S>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut words: Vec<String> = words
        .into_iter()
        .map(|w| w.as_ref().trim().to_lowercase())
        .filter(|w| !w.is_empty() && !w.starts_with('#'))
        .collect();
    words.sort();
    words.dedup();
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_build_and_load_dictionary() {
        let dir = tempdir().unwrap();
        let dict_path = dir.path().join("test.dict");

        let words = ["hello", "World", "test", "hello"];
        let count = Dictionary::build_from_words(&words, &dict_path).unwrap();
        assert_eq!(count, 3);

        let dict = Dictionary::load_from_path(&dict_path).unwrap();
        assert!(dict.contains("hello"));
        assert!(dict.contains("world"));
        assert!(!dict.contains("notfound"));
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.dict");
        fs::write(&path, b"definitely not an fst").unwrap();

        assert!(matches!(
            Dictionary::load_from_path(&path),
            Err(Error::DictionaryLoad { .. })
        ));
    }

    #[test]
    fn test_wordlist_skips_comments() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en_US.txt");
        fs::write(&path, "# header\nApple\n\n  banana \n").unwrap();

        let dict = Dictionary::load_wordlist(&path).unwrap();
        assert_eq!(dict.len(), 2);
        assert!(dict.contains("apple"));
        assert!(dict.contains("banana"));
    }

    #[test]
    fn test_misspelled_is_case_insensitive() {
        let dict = Dictionary::from_words(["the", "brown", "fox"]).unwrap();
        assert!(!dict.misspelled("The"));
        assert!(!dict.misspelled("FOX"));
        assert!(dict.misspelled("quikc"));
    }

    #[test]
    fn test_prefix_search() {
        let dict = Dictionary::from_words(["car", "cart", "carton", "dog"]).unwrap();
        assert_eq!(dict.words_with_prefix("cart"), vec!["cart", "carton"]);
        assert_eq!(dict.words_of_length(3..=3), vec!["car", "dog"]);
    }
}
