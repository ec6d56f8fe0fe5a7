pub mod classifier;
pub mod highlight;
pub mod tokenizer;

use crate::dict::{DictionaryService, UserDictionary};
use crate::{HighlightRange, Token};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

/// Distinct misspelled words, case preserved as they appear in the text.
pub type MisspelledSet = BTreeSet<String>;

/// How misspelled words are mapped back to ranges of the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightStrategy {
    /// One escaped, case-insensitive alternation matched over the whole text,
    /// kept where a match covers exactly one token.
    #[default]
    Pattern,
    /// Reuse the token offsets of the words that were flagged.
    Tokens,
}

impl FromStr for HighlightStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pattern" => Ok(HighlightStrategy::Pattern),
            "tokens" => Ok(HighlightStrategy::Tokens),
            _ => Err(format!("Unknown highlight strategy: {}", s)),
        }
    }
}

impl fmt::Display for HighlightStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighlightStrategy::Pattern => write!(f, "pattern"),
            HighlightStrategy::Tokens => write!(f, "tokens"),
        }
    }
}

/// Result of one full pass over a text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub misspelled: MisspelledSet,
    pub ranges: Vec<HighlightRange>,
}

/// Tokenizer, classifier and range builder bound to one dictionary and the
/// shared user dictionary.
pub struct SpellChecker {
    dictionary: Arc<dyn DictionaryService>,
    user_dictionary: Arc<UserDictionary>,
    strategy: HighlightStrategy,
}

impl SpellChecker {
    pub fn new(dictionary: Arc<dyn DictionaryService>, user_dictionary: Arc<UserDictionary>) -> Self {
        Self {
            dictionary,
            user_dictionary,
            strategy: HighlightStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: HighlightStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn user_dictionary(&self) -> &Arc<UserDictionary> {
        &self.user_dictionary
    }

    pub fn analyze(&self, text: &str) -> Analysis {
        let tokens = tokenizer::tokenize(text);
        let misspelled = classifier::classify(&tokens, &*self.dictionary, &self.user_dictionary);
        let ranges = self.ranges(text, &tokens, &misspelled);

        Analysis { misspelled, ranges }
    }

    fn ranges(&self, text: &str, tokens: &[Token], misspelled: &MisspelledSet) -> Vec<HighlightRange> {
        match self.strategy {
            HighlightStrategy::Tokens => highlight::ranges_from_tokens(tokens, misspelled),
            HighlightStrategy::Pattern => highlight::build_ranges(text, tokens, misspelled).unwrap_or_else(|e| {
                warn!(error = %e, words = misspelled.len(), "falling back to token ranges");
                highlight::ranges_from_tokens(tokens, misspelled)
            }),
        }
    }

    pub fn is_misspelled(&self, word: &str) -> bool {
        classifier::is_misspelled(word, &*self.dictionary, &self.user_dictionary)
    }

    /// Corrections for `word`, or `None` if it is not misspelled.
    ///
    /// A failing dictionary yields an empty list.
    pub fn suggest(&self, word: &str) -> Option<Vec<String>> {
        if !self.is_misspelled(word) {
            return None;
        }

        match self.dictionary.suggest(word) {
            Ok(suggestions) => Some(suggestions),
            Err(e) => {
                warn!(error = %e, word, "suggestion lookup failed");
                Some(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::Dictionary;
    use crate::{Error, Result};
    use tempfile::tempdir;

    fn checker(words: &[&str]) -> (tempfile::TempDir, SpellChecker) {
        let dir = tempdir().unwrap();
        let user = Arc::new(UserDictionary::new(dir.path().join("user.dic")));
        let dictionary = Arc::new(Dictionary::from_words(words).unwrap());
        (dir, SpellChecker::new(dictionary, user))
    }

    #[test]
    fn test_analyze_scenario() {
        let (_dir, checker) = checker(&["the", "quick", "brown", "fox"]);
        let analysis = checker.analyze("The quikc brown fox");

        assert_eq!(analysis.misspelled.iter().collect::<Vec<_>>(), vec!["quikc"]);
        assert_eq!(analysis.ranges, vec![HighlightRange::new(4, 9)]);
    }

    #[test]
    fn test_strategies_agree() {
        let (_dir, pattern) = checker(&["the", "fox"]);
        let (_dir2, tokens) = checker(&["the", "fox"]);
        let tokens = tokens.with_strategy(HighlightStrategy::Tokens);
        let text = "Teh fox, teh Fox and teh quikc";

        assert_eq!(pattern.analyze(text), tokens.analyze(text));
    }

    #[test]
    fn test_strategies_agree_beyond_latin() {
        let (_dir, pattern) = checker(&["日", "語", "quick"]);
        let (_dir2, tokens) = checker(&["日", "語", "quick"]);
        let tokens = tokens.with_strategy(HighlightStrategy::Tokens);
        let text = "日本語 quikc";

        let analysis = pattern.analyze(text);
        assert_eq!(analysis.misspelled.iter().collect::<Vec<_>>(), vec!["quikc", "本"]);
        assert_eq!(
            analysis.ranges,
            vec![HighlightRange::new(1, 2), HighlightRange::new(4, 9)]
        );
        assert_eq!(analysis, tokens.analyze(text));
    }

    #[test]
    fn test_empty_text() {
        let (_dir, checker) = checker(&["the"]);
        assert_eq!(checker.analyze(""), Analysis::default());
    }

    #[test]
    fn test_suggest_only_for_misspelled() {
        let (_dir, checker) = checker(&["quick", "brown"]);
        assert_eq!(checker.suggest("quick"), None);
        assert_eq!(checker.suggest("quikc"), Some(vec!["quick".to_string()]));

        checker.user_dictionary().ignore("quikc");
        assert_eq!(checker.suggest("quikc"), None);
    }

    struct Broken;

    impl DictionaryService for Broken {
        fn misspelled(&self, _word: &str) -> bool {
            true
        }

        fn suggest(&self, word: &str) -> Result<Vec<String>> {
            Err(Error::Suggest {
                word: word.to_string(),
                reason: "engine unavailable".to_string(),
            })
        }
    }

    #[test]
    fn test_suggest_failure_is_empty() {
        let dir = tempdir().unwrap();
        let user = Arc::new(UserDictionary::new(dir.path().join("user.dic")));
        let checker = SpellChecker::new(Arc::new(Broken), user);

        assert_eq!(checker.suggest("anything"), Some(Vec::new()));
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!(
            "Tokens".parse::<HighlightStrategy>(),
            Ok(HighlightStrategy::Tokens)
        );
        assert_eq!(
            "pattern".parse::<HighlightStrategy>(),
            Ok(HighlightStrategy::Pattern)
        );
        assert!("regex".parse::<HighlightStrategy>().is_err());
    }
}
