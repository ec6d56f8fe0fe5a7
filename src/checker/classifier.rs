use crate::checker::MisspelledSet;
use crate::dict::{DictionaryService, UserDictionary};
use crate::Token;
use std::collections::HashSet;

/// Collect the distinct token texts that the dictionary rejects and the user
/// has not accepted.
///
/// The user dictionary is consulted once, under a single lock, after the
/// dictionary has been queried for every distinct token.
pub fn classify(
    tokens: &[Token],
    dictionary: &dyn DictionaryService,
    user_dictionary: &UserDictionary,
) -> MisspelledSet {
    if tokens.is_empty() {
        return MisspelledSet::new();
    }

    let mut queried = HashSet::new();
    let flagged: Vec<&str> = tokens
        .iter()
        .map(|t| t.text.as_str())
        .filter(|word| queried.insert(*word) && dictionary.misspelled(word))
        .collect();

    if flagged.is_empty() {
        return MisspelledSet::new();
    }

    user_dictionary.with_snapshot(|accepted| {
        flagged
            .into_iter()
            .filter(|word| !accepted(&word.to_lowercase()))
            .map(str::to_string)
            .collect()
    })
}

/// Single-word form of [`classify`].
pub fn is_misspelled(
    word: &str,
    dictionary: &dyn DictionaryService,
    user_dictionary: &UserDictionary,
) -> bool {
    dictionary.misspelled(word) && !user_dictionary.contains(&word.to_lowercase())
}
