use crate::dict::Dictionary;
use std::collections::HashSet;

/// Common single-letter confusions tried as substitutions, both directions.
const CONFUSIONS: &[(char, char)] = &[
    ('a', 'e'),
    ('e', 'i'),
    ('i', 'o'),
    ('o', 'u'),
    ('b', 'v'),
    ('c', 'k'),
    ('f', 'v'),
    ('g', 'j'),
    ('m', 'n'),
    ('s', 'z'),
    ('t', 'd'),
];

/// Rank dictionary words close to `word` (already lowercased).
///
/// Cheap lookups run first and the expensive ones only fill what is left:
/// single edits, then shared prefixes, then a length-bounded scan for very
/// short words.
pub fn generate(word: &str, dictionary: &Dictionary, max_suggestions: usize) -> Vec<String> {
    if max_suggestions == 0 || word.is_empty() {
        return Vec::new();
    }

    let mut ranked = Ranked::new(word, max_suggestions);

    for candidate in single_edits(word) {
        if dictionary.contains(&candidate) {
            ranked.offer(candidate, 2);
        }
    }

    let len = word.chars().count();
    for (prefix_len, max_distance) in [(3, 2), (2, 3)] {
        if ranked.is_full() || len < prefix_len {
            continue;
        }
        let prefix: String = word.chars().take(prefix_len).collect();
        for candidate in dictionary.words_with_prefix(&prefix) {
            ranked.offer(candidate, max_distance);
        }
    }

    if !ranked.is_full() && len <= 3 {
        for candidate in dictionary.words_of_length(len.saturating_sub(1)..=len + 1) {
            ranked.offer(candidate, 2);
        }
    }

    ranked.finish()
}

struct Ranked<'a> {
    word: &'a str,
    max: usize,
    seen: HashSet<String>,
    found: Vec<(usize, String)>,
}

impl<'a> Ranked<'a> {
    fn new(word: &'a str, max: usize) -> Self {
        Self {
            word,
            max,
            seen: HashSet::new(),
            found: Vec::new(),
        }
    }

    fn offer(&mut self, candidate: String, max_distance: usize) {
        if candidate == self.word || self.seen.contains(&candidate) {
            return;
        }
        let distance = edit_distance(self.word, &candidate);
        if distance <= max_distance {
            self.seen.insert(candidate.clone());
            self.found.push((distance, candidate));
        }
    }

    fn is_full(&self) -> bool {
        self.found.len() >= self.max
    }

    fn finish(mut self) -> Vec<String> {
        self.found
            .sort_by(|(da, a), (db, b)| da.cmp(db).then_with(|| a.cmp(b)));
        self.found
            .into_iter()
            .take(self.max)
            .map(|(_, word)| word)
            .collect()
    }
}

/// Levenshtein distance over characters, two rows at a time.
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != *cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Deletions, adjacent transpositions and common confusions of `word`.
fn single_edits(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut edits = Vec::new();

    for i in 0..chars.len() {
        let mut edit = chars.clone();
        edit.remove(i);
        edits.push(edit.into_iter().collect());
    }

    for i in 0..chars.len().saturating_sub(1) {
        let mut edit = chars.clone();
        edit.swap(i, i + 1);
        edits.push(edit.into_iter().collect());
    }

    for (i, &ch) in chars.iter().enumerate() {
        for &(x, y) in CONFUSIONS {
            let replacement = if ch == x {
                y
            } else if ch == y {
                x
            } else {
                continue;
            };
            let mut edit = chars.clone();
            edit[i] = replacement;
            edits.push(edit.into_iter().collect());
        }
    }

    edits
}
