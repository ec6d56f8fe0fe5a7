use crate::Token;
use unicode_segmentation::UnicodeSegmentation;

/// Split text into word tokens on Unicode word boundaries (UAX #29).
///
/// Only segments whose first character is alphabetic are kept; punctuation,
/// whitespace and segments starting with a digit are dropped. Offsets are
/// counted in characters.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut char_pos = 0;

    for segment in text.split_word_bounds() {
        let len = segment.chars().count();
        let starts_with_letter = segment.chars().next().is_some_and(char::is_alphabetic);

        if starts_with_letter {
            tokens.push(Token {
                text: segment.to_string(),
                start: char_pos,
                end: char_pos + len,
            });
        }

        char_pos += len;
    }

    tokens
}
