use crate::checker::MisspelledSet;
use crate::{HighlightRange, Result, Token};
use regex::RegexBuilder;
use std::collections::{HashMap, HashSet};

/// Find every case-insensitive occurrence of a misspelled word that spans
/// exactly one token of `tokens`.
///
/// All words go into one escaped alternation so the text is scanned once no
/// matter how many words are flagged. Word edges come from the tokens rather
/// than regex `\b`, so scripts without spaces and words like "don't" are cut
/// the same way the tokenizer cuts them. Ranges are character offsets in order
/// of appearance.
pub fn build_ranges(
    text: &str,
    tokens: &[Token],
    misspelled: &MisspelledSet,
) -> Result<Vec<HighlightRange>> {
    if misspelled.is_empty() || tokens.is_empty() {
        return Ok(Vec::new());
    }

    let pattern = RegexBuilder::new(&alternation(misspelled))
        .case_insensitive(true)
        .build()?;

    let lowered = lowercased(misspelled);
    let by_start: HashMap<usize, &Token> = tokens.iter().map(|t| (t.start, t)).collect();

    let mut ranges = Vec::new();
    let mut byte_pos = 0;
    let mut char_pos = 0;
    let mut search_from = 0;

    while let Some(m) = pattern.find_at(text, search_from) {
        char_pos += text[byte_pos..m.start()].chars().count();
        byte_pos = m.start();
        let end = char_pos + m.as_str().chars().count();

        match by_start.get(&char_pos) {
            Some(token) if token.end == end => {
                ranges.push(HighlightRange::new(char_pos, end));
                search_from = m.end();
                continue;
            }
            // A longer alternative overran the token; the token may still be flagged.
            Some(token) if lowered.contains(&token.text.to_lowercase()) => {
                ranges.push(HighlightRange::new(token.start, token.end));
                search_from = byte_pos + token.text.len();
                continue;
            }
            _ => {}
        }

        search_from = byte_pos + text[byte_pos..].chars().next().map_or(1, char::len_utf8);
    }

    Ok(ranges)
}

/// Ranges of the tokens whose text case-insensitively equals a misspelled word.
pub fn ranges_from_tokens(tokens: &[Token], misspelled: &MisspelledSet) -> Vec<HighlightRange> {
    if misspelled.is_empty() {
        return Vec::new();
    }

    let lowered = lowercased(misspelled);
    tokens
        .iter()
        .filter(|t| lowered.contains(&t.text.to_lowercase()))
        .map(|t| HighlightRange::new(t.start, t.end))
        .collect()
}

fn lowercased(words: &MisspelledSet) -> HashSet<String> {
    words.iter().map(|w| w.to_lowercase()).collect()
}

/// `(?:w1|w2|...)` with every word escaped, longest first.
fn alternation(words: &MisspelledSet) -> String {
    let mut words: Vec<&str> = words.iter().map(String::as_str).collect();
    words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let escaped: Vec<String> = words.into_iter().map(regex::escape).collect();
    format!("(?:{})", escaped.join("|"))
}
