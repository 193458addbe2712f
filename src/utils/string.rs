//! String helpers shared by the normalizer, the extractor and the composer.

/// Capitalize the first character of a string, leaving the rest untouched.
///
/// # Example
/// ```
/// use transask::utils::string::to_sentence_case;
/// assert_eq!(to_sentence_case("paris is in France."), "Paris is in France.");
/// assert_eq!(to_sentence_case(""), "");
/// ```
pub fn to_sentence_case(string: &str) -> String {
    let mut chars = string.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The first two whitespace-separated words of a string, empty when absent.
#[inline]
pub fn leading_words(string: &str) -> (&str, &str) {
    let mut words = string.split_whitespace();
    (words.next().unwrap_or(""), words.next().unwrap_or(""))
}

/// Number of whitespace-separated words.
#[inline]
pub fn word_count(string: &str) -> usize {
    string.split_whitespace().count()
}

/// Case-insensitive membership of `word` in a word table.
pub fn is_one_of(word: &str, table: &[String]) -> bool {
    table.iter().any(|entry| entry.eq_ignore_ascii_case(word))
}

/// If `string` starts with `prefix` (ASCII case-insensitive) and the prefix ends on a word boundary,
/// returns the rest of the string with leading whitespace removed.
pub fn strip_word_prefix<'a>(string: &'a str, prefix: &str) -> Option<&'a str> {
    let prefix = prefix.trim();
    if prefix.is_empty() || string.len() < prefix.len() || !string.is_char_boundary(prefix.len()) {
        return None;
    }
    let (head, rest) = string.split_at(prefix.len());
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest.trim_start()),
        Some(_) => None,
    }
}

/// Byte offset of the first occurrence of `needle` in `haystack` that starts and ends on word boundaries,
/// compared ASCII case-insensitively.
pub fn find_word_sequence(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.trim();
    if needle.is_empty() {
        return None;
    }
    let lower_haystack = haystack.to_ascii_lowercase();
    let lower_needle = needle.to_ascii_lowercase();
    lower_haystack
        .match_indices(lower_needle.as_str())
        .map(|(idx, _)| idx)
        .find(|&idx| {
            let before = lower_haystack[..idx].chars().next_back();
            let after = lower_haystack[idx + lower_needle.len()..].chars().next();
            !before.map_or(false, char::is_alphanumeric) && !after.map_or(false, char::is_alphanumeric)
        })
}
