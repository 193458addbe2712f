//! # Patterns
//! The fixed lexical tables that drive query normalization and phrase extraction.
//!
//! [PatternTables] is plain, serializable data. It can be built with [Default] or loaded from JSON via
//! [PatternTables::from_json], where any missing field falls back to its default.
//!
//! [Patterns] is the compiled, immutable form of the tables. It is built once with [Patterns::new] and shared
//! (usually behind an `Arc`) by every component of an agent, so no matcher state is global or mutable.

use anyhow::Result;
use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::patterns::errors::InvalidPatternTables;
use crate::utils::string::is_one_of;

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Lexical tables used by the normalizer and the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternTables {
    /// Question words that can lead a canonical query.
    pub wh_words: Vec<String>,
    /// Modal and auxiliary verbs that can lead a canonical query.
    pub modals: Vec<String>,
    /// Articles recovered in front of noun phrases.
    pub articles: Vec<String>,
    /// Every character that is stripped from the input before anything else happens.
    pub punctuation: String,
    /// Leading phrases that are paraphrases of "What is".
    pub aliases: Vec<String>,
    /// Upper bound of rewrites `querify` may apply to one input.
    pub max_rewrites: usize,
}

impl Default for PatternTables {
    fn default() -> Self {
        Self {
            wh_words: words(&["who", "what", "when", "how", "where", "why"]),
            modals: words(&[
                "is", "am", "are", "was", "has", "have", "had", "must", "may", "might", "were", "will",
                "shall", "can", "could", "would", "should", "ought", "does", "did",
            ]),
            articles: words(&["a", "an", "the"]),
            punctuation: ".,/#!$%?“”^&*;:{}=_`~()".to_string(),
            aliases: words(&["show me", "tell me", "identify", "tell me about", "talk to me about"]),
            max_rewrites: 8,
        }
    }
}

impl PatternTables {
    /// Load tables from a JSON object. Fields that are absent keep their default values.
    ///
    /// # Example
    /// ```
    /// use transask::patterns::PatternTables;
    /// let tables = PatternTables::from_json(r#"{"aliases": ["describe"]}"#).unwrap();
    /// assert_eq!(tables.aliases, vec!["describe".to_string()]);
    /// assert_eq!(tables.max_rewrites, 8);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let tables = serde_json::from_str(json)?;
        Ok(tables)
    }
}

/// Compiled, immutable form of [PatternTables].
#[derive(Debug, Clone)]
#[readonly::make]
pub struct Patterns {
    /// The tables these patterns were compiled from, readonly
    #[readonly]
    pub tables: PatternTables,
    punctuation_re: Option<Regex>,
    /// Aliases ordered longest first so "tell me about" wins over "tell me"
    aliases_by_len: Vec<String>,
}

/// Compiled default tables.
///
/// The default tables pass every check of [Patterns::new] and every punctuation character is escaped before
/// compiling, so compiling them cannot fail.
impl Default for Patterns {
    fn default() -> Self {
        Patterns::new(PatternTables::default()).expect("default pattern tables are valid")
    }
}

impl Patterns {
    /// Compile the tables. Fails when the tables cannot drive a normalizer at all.
    pub fn new(tables: PatternTables) -> Result<Self> {
        if tables.wh_words.is_empty() {
            return Err(InvalidPatternTables::new("wh_words", "at least one question word is required").into());
        }
        if tables.max_rewrites == 0 {
            return Err(InvalidPatternTables::new("max_rewrites", "must be greater than zero").into());
        }
        if tables.modals.is_empty() {
            warn!("No modal verbs configured, queries led by a modal will be treated as prefaced questions");
        }
        let punctuation_re = if tables.punctuation.is_empty() {
            None
        } else {
            Some(punctuation_class(&tables.punctuation)
                .map_err(|e| InvalidPatternTables::new("punctuation", e.to_string()))?)
        };
        let aliases_by_len = sort_aliases(&tables.aliases);
        Ok(Self {
            tables,
            punctuation_re,
            aliases_by_len,
        })
    }

    /// Remove every punctuation character and trim the result.
    pub fn strip_punctuation(&self, input: &str) -> String {
        match &self.punctuation_re {
            Some(re) => re.replace_all(input, "").trim().to_string(),
            None => input.trim().to_string(),
        }
    }

    #[inline]
    pub fn is_wh_word(&self, word: &str) -> bool {
        is_one_of(word, &self.tables.wh_words)
    }

    #[inline]
    pub fn is_modal(&self, word: &str) -> bool {
        is_one_of(word, &self.tables.modals)
    }

    #[inline]
    pub fn is_article(&self, word: &str) -> bool {
        is_one_of(word, &self.tables.articles)
    }

    /// Paraphrase aliases, longest first.
    pub fn aliases(&self) -> impl Iterator<Item=&str> {
        self.aliases_by_len.iter().map(String::as_str)
    }
}

fn punctuation_class(punctuation: &str) -> std::result::Result<Regex, regex::Error> {
    let class: String = punctuation.chars().map(|c| regex::escape(&c.to_string())).collect();
    Regex::new(&format!("[{}]", class))
}

fn sort_aliases(aliases: &[String]) -> Vec<String> {
    let mut sorted = aliases.to_vec();
    sorted.sort_by(|a, b| b.split_whitespace().count().cmp(&a.split_whitespace().count()));
    sorted
}

pub mod errors {
    use std::error::Error;
    use std::fmt;
    use std::fmt::Formatter;

    /// Error when pattern tables cannot be compiled into [Patterns](crate::patterns::Patterns).
    #[derive(Debug, Clone)]
    pub struct InvalidPatternTables {
        pub field: String,
        pub reason: String,
    }

    impl InvalidPatternTables {
        pub(crate) fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
            Self {
                field: field.into(),
                reason: reason.into(),
            }
        }
    }

    impl fmt::Display for InvalidPatternTables {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(f, "InvalidPatternTables: field = {}, reason = {}", self.field, self.reason)
        }
    }

    impl Error for InvalidPatternTables {}
}
