use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Tokens shorter than this never become keywords.
const MIN_TOKEN_CHARS: usize = 4;

static TOKEN_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("valid token boundary regex"));

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "that", "this", "with", "from", "your", "for", "you", "are", "was", "have",
        "but", "not", "they", "their", "will", "what", "about", "which",
    ]
    .into_iter()
    .collect()
});

/// Extract the `limit` most frequent keywords from a visible-text sample.
///
/// Unicode-aware tokenization on non-letter/non-digit boundaries,
/// lowercased, with short tokens and stopwords discarded. Frequency ties
/// break in first-occurrence order, so repeated calls on the same text
/// are deterministic.
///
/// The caller is responsible for the privacy boundary: text under input,
/// textarea, select, or contenteditable elements must be excluded before
/// sampling. This function only ever sees what it is given.
pub fn extract_top_keywords(text: &str, limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, (u64, usize)> = HashMap::new();
    let mut next_index = 0usize;

    for token in TOKEN_BOUNDARY.split(text) {
        let word = token.to_lowercase();
        if word.chars().count() < MIN_TOKEN_CHARS || STOPWORDS.contains(word.as_str()) {
            continue;
        }
        match counts.get_mut(&word) {
            Some((count, _)) => *count += 1,
            None => {
                counts.insert(word, (1, next_index));
                next_index += 1;
            }
        }
    }

    let mut ranked: Vec<(String, u64, usize)> = counts
        .into_iter()
        .map(|(word, (count, first_seen))| (word, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.truncate(limit);
    ranked.into_iter().map(|(word, _, _)| word).collect()
}
