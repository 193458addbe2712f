//! # Query Normalization
//! Rewrites colloquial input into a canonical query led by a question word or a modal verb.
//!
//! Normalization is a small rewrite-rule engine. Punctuation is stripped once, then each round applies the first
//! matching rule:
//!
//! 1. led by a modal: canonical, e.g. `Is Paris the capital of France`
//! 2. led by a question word: canonical, except `how come ...` which becomes `why is ...` / `why are ...`
//! 3. led by a paraphrase alias such as `tell me about`: becomes `What is ...`
//! 4. a question word later on: the preface before it is dropped
//! 5. anything else is unrecognized
//!
//! Every rewrite produces a query led by a question word, so the next round settles it. The number of rounds is
//! still capped by [PatternTables::max_rewrites](crate::patterns::PatternTables::max_rewrites).

use log::{trace, warn};

use crate::patterns::Patterns;

/// Outcome of one rewrite round.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Rewrite {
    Canonical,
    Rewritten(String),
    Unrecognized,
}

/// Normalizes raw input into canonical queries.
#[derive(Debug, Clone, Copy)]
pub struct QueryNormalizer<'a> {
    patterns: &'a Patterns,
}

impl<'a> QueryNormalizer<'a> {
    pub fn new(patterns: &'a Patterns) -> Self {
        Self { patterns }
    }

    /// Strip punctuation and rewrite `input` into a canonical query.
    ///
    /// Returns `None` when no question word or modal can be found to normalize around.
    ///
    /// # Example
    /// ```
    /// use transask::normalize::QueryNormalizer;
    /// use transask::patterns::Patterns;
    /// let patterns = Patterns::default();
    /// let normalizer = QueryNormalizer::new(&patterns);
    /// assert_eq!(Some("What is Paris".to_string()), normalizer.querify("tell me about Paris"));
    /// assert_eq!(Some("where is it".to_string()), normalizer.querify("speaking of paris, where is it?"));
    /// assert_eq!(None, normalizer.querify("talk about france"));
    /// ```
    pub fn querify(&self, input: &str) -> Option<String> {
        let mut query = self.patterns.strip_punctuation(input);
        let max_rewrites = self.patterns.tables.max_rewrites;
        for round in 0..=max_rewrites {
            match self.rewrite(&query) {
                Rewrite::Canonical => return Some(query),
                Rewrite::Unrecognized => return None,
                Rewrite::Rewritten(next) => {
                    trace!("querify round {}: \"{}\" -> \"{}\"", round, query, next);
                    query = next;
                }
            }
        }
        warn!("querify gave up after {} rewrites, last query: \"{}\"", max_rewrites, query);
        None
    }

    fn rewrite(&self, query: &str) -> Rewrite {
        let words: Vec<&str> = query.split_whitespace().collect();
        let Some(first) = words.first() else {
            return Rewrite::Unrecognized;
        };

        if self.patterns.is_modal(first) {
            return Rewrite::Canonical;
        }

        if self.patterns.is_wh_word(first) {
            if first.eq_ignore_ascii_case("how") && words.get(1).map_or(false, |w| w.eq_ignore_ascii_case("come")) {
                let verb = match words.get(2) {
                    Some(third) if self.patterns.is_article(third) => "is",
                    _ => "are",
                };
                return Rewrite::Rewritten(join_led_by(&format!("why {}", verb), &words[2..]));
            }
            return Rewrite::Canonical;
        }

        for alias in self.patterns.aliases() {
            let alias_words: Vec<&str> = alias.split_whitespace().collect();
            let is_led_by_alias = !alias_words.is_empty()
                && words.len() >= alias_words.len()
                && words.iter().zip(&alias_words).all(|(w, a)| w.eq_ignore_ascii_case(a));
            if is_led_by_alias {
                return Rewrite::Rewritten(join_led_by("What is", &words[alias_words.len()..]));
            }
        }

        match words.iter().position(|w| self.patterns.is_wh_word(w)) {
            Some(idx) => Rewrite::Rewritten(words[idx..].join(" ")),
            None => Rewrite::Unrecognized,
        }
    }
}

fn join_led_by(lead: &str, rest: &[&str]) -> String {
    if rest.is_empty() {
        lead.to_string()
    } else {
        format!("{} {}", lead, rest.join(" "))
    }
}

#[cfg(test)]
mod test_normalize {
    use super::QueryNormalizer;
    use crate::patterns::{PatternTables, Patterns};

    fn querify(input: &str) -> Option<String> {
        let patterns = Patterns::default();
        QueryNormalizer::new(&patterns).querify(input)
    }

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_canonical_queries_are_kept() {
        assert_eq!(some("Is Paris the capital of France"), querify("Is Paris the capital of France?"));
        assert_eq!(some("Were  they   here"), querify("Were  they   here?"));
        assert_eq!(some("what is Paris known for"), querify("what is Paris known for?"));
        assert_eq!(some("What about society"), querify("What about society?"));
    }

    #[test]
    fn test_how_come() {
        assert_eq!(some("why is the sky blue"), querify("how come the sky blue?"));
        assert_eq!(some("why is a cat furry"), querify("How come a cat furry"));
        assert_eq!(some("why are cats purring"), querify("how come cats purring"));
        assert_eq!(some("how comes"), querify("how comes"));
    }

    #[test]
    fn test_aliases() {
        assert_eq!(some("What is Paris"), querify("tell me about Paris"));
        assert_eq!(some("What is paris"), querify("talk to me about paris"));
        assert_eq!(some("What is John"), querify("identify John"));
        assert_eq!(some("What is the tower"), querify("Show me the tower!"));
        assert_eq!(some("What is a joke"), querify("tell me a joke"));
        assert_eq!(some("What is"), querify("identify"));
    }

    #[test]
    fn test_preface_is_dropped() {
        assert_eq!(some("what is it famous for"), querify("since we're talking about Paris, what is it famous for?"));
        assert_eq!(some("where is it"), querify("speaking of paris where is it"));
        assert_eq!(some("what was it built for"), querify("regarding the Eiffel Tower, what was it built for?"));
        assert_eq!(some("why is the sky blue"), querify("so how come the sky blue"));
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(None, querify("talk about france"));
        assert_eq!(None, querify("hello there"));
        assert_eq!(None, querify("?!"));
        assert_eq!(None, querify(""));
    }

    #[test]
    fn test_idempotence() {
        let inputs = [
            "tell me about Paris", "how come the sky blue", "speaking of paris where is it", "Is it?",
            "so how come cats purr", "what is Paris", "identify the Eiffel Tower",
        ];
        for input in inputs {
            let once = querify(input).unwrap();
            assert_eq!(Some(once.clone()), querify(&once), "input: {}", input);
        }
    }

    #[test]
    fn test_paraphrase_equivalence() {
        assert_eq!(querify("tell me about Paris"), querify("What is Paris?"));
    }

    #[test]
    fn test_rewrite_guard() {
        let tables = PatternTables {
            max_rewrites: 1,
            ..PatternTables::default()
        };
        let patterns = Patterns::new(tables).unwrap();
        let normalizer = QueryNormalizer::new(&patterns);
        assert_eq!(some("What is Paris"), normalizer.querify("tell me about Paris"));
        // preface then "how come" needs two rewrites
        assert_eq!(None, normalizer.querify("well how come cats purr"));
    }
}
