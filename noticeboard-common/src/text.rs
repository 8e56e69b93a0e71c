//! Word based metrics for post bodies.
//!
//! A word is a maximal run of non-whitespace characters.

pub const WORDS_PER_MINUTE: usize = 200;
pub const PREVIEW_WORDS: usize = 50;

#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimated reading time, never less than one minute.
#[must_use]
pub fn reading_time_minutes(words: usize) -> usize {
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

/// Returns the prefix of `text` that ends with its `limit`-th word, or `None` if
/// `text` has no more than `limit` words. The cut never falls inside a word and
/// whitespace between the kept words is left untouched.
#[must_use]
pub fn preview(text: &str, limit: usize) -> Option<&str> {
    let mut words = 0;
    let mut in_word = false;
    let mut cut = None;

    for (index, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if in_word && words == limit {
                cut = Some(index);
            }
            in_word = false;
        } else if !in_word {
            if cut.is_some() {
                return cut.map(|end| &text[..end]);
            }
            in_word = true;
            words += 1;
        }
    }

    None
}
