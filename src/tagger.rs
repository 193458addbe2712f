//! # Tagger
//! Part-of-speech tagging is an external capability: given a sentence, a tagger returns the words of the sentence
//! in order, each annotated with a Penn Treebank tag and a normalized form.
//!
//! Anything implementing [Tag] can be plugged into an agent, including plain closures.
//! [LexiconTagger] is a small deterministic rule tagger for when no external tagger is at hand.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// A word of a sentence with its grammatical tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    /// Surface form as it appears in the sentence
    pub value: String,
    /// Normalized (lemma-like) form
    pub normal: String,
    /// Penn Treebank tag code, see [pos]
    pub pos: String,
}

impl TaggedToken {
    pub fn new(value: impl Into<String>, normal: impl Into<String>, pos: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            normal: normal.into(),
            pos: pos.into(),
        }
    }

    /// Human readable label of the tag, if it is a known Penn Treebank code.
    pub fn label(&self) -> Option<&'static str> {
        pos::describe(&self.pos)
    }
}

/// Tokens of one sentence, in word order.
pub type TagSequence = Vec<TaggedToken>;

/// Trait for tagging a sentence.
pub trait Tag {
    fn tag(&self, sentence: &str) -> TagSequence;
}

/// Blanket impl of Tag for Fn(&str) -> TagSequence.
impl<F> Tag for F where F: Fn(&str) -> TagSequence {
    fn tag(&self, sentence: &str) -> TagSequence {
        self(sentence)
    }
}

/// Penn Treebank tag codes and predicates over them.
pub mod pos {
    use std::collections::HashMap;
    use lazy_static::lazy_static;

    pub const PROPER_NOUN: &str = "NNP";
    pub const NOUN: &str = "NN";
    pub const PERSONAL_PRONOUN: &str = "PRP";
    pub const ADJECTIVE: &str = "JJ";
    pub const PRESENT_VERB: &str = "VBP";
    pub const PAST_PARTICIPLE: &str = "VBN";

    lazy_static! {
        /// Tag code to label
        static ref LABELS: HashMap<&'static str, &'static str> = HashMap::from([
            ("CC", "Coordinating conjunction"),
            ("CD", "Cardinal number"),
            ("DT", "Determiner"),
            ("EX", "Existential there"),
            ("FW", "Foreign word"),
            ("IN", "Preposition or subordinating conjunction"),
            ("JJ", "Adjective"),
            ("JJR", "Adjective, comparative"),
            ("JJS", "Adjective, superlative"),
            ("LS", "List item marker"),
            ("MD", "Modal"),
            ("NN", "Noun, singular or mass"),
            ("NNS", "Noun, plural"),
            ("NNP", "Proper noun, singular"),
            ("NNPS", "Proper noun, plural"),
            ("PDT", "Predeterminer"),
            ("POS", "Possessive ending"),
            ("PRP", "Personal pronoun"),
            ("PRP$", "Possessive pronoun"),
            ("RB", "Adverb"),
            ("RBR", "Adverb, comparative"),
            ("RBS", "Adverb, superlative"),
            ("RP", "Particle"),
            ("SYM", "Symbol"),
            ("TO", "to"),
            ("UH", "Interjection"),
            ("VB", "Verb, base form"),
            ("VBD", "Verb, past tense"),
            ("VBG", "Verb, gerund or present participle"),
            ("VBN", "Verb, past participle"),
            ("VBP", "Verb, non-3rd person singular present"),
            ("VBZ", "Verb, 3rd person singular present"),
            ("WDT", "Wh-determiner"),
            ("WP", "Wh-pronoun"),
            ("WP$", "Possessive wh-pronoun"),
            ("WRB", "Wh-adverb"),
        ]);
    }

    pub fn describe(tag: &str) -> Option<&'static str> {
        LABELS.get(tag).copied()
    }

    /// `NNP` and `NNPS`
    #[inline]
    pub fn is_proper_noun(tag: &str) -> bool {
        tag.starts_with(PROPER_NOUN)
    }

    /// Any tag beginning with `NN`, proper nouns included
    #[inline]
    pub fn is_noun(tag: &str) -> bool {
        tag.starts_with(NOUN)
    }

    #[inline]
    pub fn is_personal_pronoun(tag: &str) -> bool {
        tag == PERSONAL_PRONOUN
    }

    /// Tags that can carry the focus of a question: adjectives, non-3rd person present verbs and past participles
    #[inline]
    pub fn is_descriptive(tag: &str) -> bool {
        tag.starts_with(ADJECTIVE) || tag == PRESENT_VERB || tag == PAST_PARTICIPLE
    }
}

lazy_static! {
    /// Closed-class words, lower-cased
    static ref CLOSED_CLASS: HashMap<&'static str, &'static str> = {
        let groups: [(&str, &[&str]); 19] = [
            ("DT", &["the", "a", "an", "this", "that", "these", "those", "every", "each", "some", "any", "no", "all", "another"]),
            ("PRP", &["i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them", "myself", "yourself", "itself"]),
            ("PRP$", &["my", "your", "his", "her", "its", "our", "their"]),
            ("WP", &["what", "who", "whom"]),
            ("WP$", &["whose"]),
            ("WDT", &["which"]),
            ("WRB", &["where", "when", "how", "why"]),
            ("MD", &["can", "could", "will", "would", "shall", "should", "may", "might", "must", "ought"]),
            ("VBZ", &["is", "has", "does"]),
            ("VBP", &["am", "are", "have", "do"]),
            ("VBD", &["was", "were", "had", "did"]),
            ("VB", &["be"]),
            ("VBN", &["been", "done", "known", "built", "made", "seen", "given", "taken"]),
            ("VBG", &["being"]),
            ("IN", &["of", "in", "on", "at", "by", "for", "with", "about", "from", "into", "since", "as", "than",
                "like", "over", "under", "after", "before", "because", "if", "near", "through", "during", "regarding"]),
            ("TO", &["to"]),
            ("CC", &["and", "or", "but", "nor", "yet"]),
            ("RB", &["not", "very", "also", "too", "so", "just", "only", "often", "never", "always"]),
            ("EX", &["there"]),
        ];
        groups.iter()
            .flat_map(|(tag, words)| words.iter().map(move |w| (*w, *tag)))
            .collect()
    };

    /// Frequent adjectives the suffix rules miss
    static ref COMMON_ADJECTIVES: HashSet<&'static str> = HashSet::from([
        "good", "bad", "new", "old", "big", "small", "large", "great", "main", "popular", "famous",
        "unique", "historic", "important", "long", "short", "high", "low", "early", "late", "young",
        "many", "much", "other", "same", "different", "first", "last", "blue", "red", "green",
    ]);
}

const ADJECTIVE_SUFFIXES: [&str; 8] = ["ous", "ful", "ive", "able", "ible", "less", "ical", "ish"];

/// A deterministic rule tagger.
///
/// Words are tagged by, in order: the user lexicon, a built-in closed-class lexicon, numbers (`CD`),
/// capitalization (`NNP`), a short list of common adjectives, suffix heuristics and finally `NN`. The normal form is the lower-cased word.
///
/// # Example
/// ```
/// use transask::tagger::{LexiconTagger, Tag};
/// let tags = LexiconTagger::default().tag("where is Paris");
/// let pos: Vec<&str> = tags.iter().map(|t| t.pos.as_str()).collect();
/// assert_eq!(pos, vec!["WRB", "VBZ", "NNP"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LexiconTagger {
    lexicon: HashMap<String, String>,
}

impl LexiconTagger {
    /// Create a tagger whose lexicon overrides the built-in rules. Keys are matched case-insensitively.
    pub fn with_lexicon(lexicon: HashMap<String, String>) -> Self {
        let lexicon = lexicon.into_iter()
            .map(|(word, tag)| (word.to_lowercase(), tag))
            .collect();
        Self { lexicon }
    }

    /// Add or replace a lexicon entry.
    pub fn insert(&mut self, word: impl AsRef<str>, tag: impl Into<String>) -> &mut Self {
        self.lexicon.insert(word.as_ref().to_lowercase(), tag.into());
        self
    }

    fn tag_word(&self, word: &str, lower: &str) -> String {
        if let Some(tag) = self.lexicon.get(lower) {
            return tag.clone();
        }
        if let Some(tag) = CLOSED_CLASS.get(lower) {
            return tag.to_string();
        }
        if lower.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') && lower.chars().any(|c| c.is_ascii_digit()) {
            return "CD".to_string();
        }
        if word.chars().next().map_or(false, char::is_uppercase) {
            return pos::PROPER_NOUN.to_string();
        }
        if COMMON_ADJECTIVES.contains(lower) {
            return pos::ADJECTIVE.to_string();
        }
        let tag = if lower.len() > 4 && lower.ends_with("ing") {
            "VBG"
        } else if lower.len() > 3 && lower.ends_with("ed") {
            pos::PAST_PARTICIPLE
        } else if lower.len() > 3 && lower.ends_with("ly") {
            "RB"
        } else if ADJECTIVE_SUFFIXES.iter().any(|s| lower.len() > s.len() + 1 && lower.ends_with(s)) {
            pos::ADJECTIVE
        } else if lower.len() > 3 && lower.ends_with('s') && !["ss", "us", "is"].iter().any(|s| lower.ends_with(s)) {
            "NNS"
        } else {
            pos::NOUN
        };
        tag.to_string()
    }
}

impl Tag for LexiconTagger {
    fn tag(&self, sentence: &str) -> TagSequence {
        sentence.split_whitespace()
            .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
            .filter(|word| !word.is_empty())
            .map(|word| {
                let lower = word.to_lowercase();
                let pos = self.tag_word(word, &lower);
                TaggedToken::new(word, lower, pos)
            })
            .collect()
    }
}
