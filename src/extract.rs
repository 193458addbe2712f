//! # Phrase Extraction
//! Scans the tag sequence of a query for the pieces an answer prompt is made of:
//!
//! * the **noun phrase**, the subject the answer is about, e.g. `the tuatara`
//! * the **positional phrase**, the verb the completion continues from, e.g. `is located`
//! * the **focus keyword**, a descriptive word or secondary noun used to rank completions, e.g. `popular`

use crate::patterns::Patterns;
use crate::tagger::{pos, Tag, TaggedToken};
use crate::utils::string::{find_word_sequence, leading_words};

/// Subject used when a query has no noun or pronoun.
pub const DEFAULT_SUBJECT: &str = "It";

/// Second-person subject the agent answers with when it is addressed in the first person.
const ADDRESSED_SUBJECT: &str = "you";

/// Verb paired with [ADDRESSED_SUBJECT].
const ADDRESSED_VERB: &str = "are";

const LOCATION_SUFFIX: &str = "located";

const FIRST_PERSON: &str = "I";

/// A contiguous run of matching tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Run<'t> {
    start: usize,
    words: Vec<&'t str>,
}

/// Fold state of a run scan: the last completed run and the run under construction.
#[derive(Debug, Default)]
struct RunScan<'t> {
    completed: Option<Run<'t>>,
    current: Option<Run<'t>>,
}

impl<'t> RunScan<'t> {
    fn step(mut self, idx: usize, token: &'t TaggedToken, matches: bool) -> Self {
        if matches {
            match self.current.as_mut() {
                Some(run) => run.words.push(token.value.as_str()),
                None => self.current = Some(Run { start: idx, words: vec![token.value.as_str()] }),
            }
        } else if self.current.is_some() {
            // a run ends and replaces any earlier one
            self.completed = self.current.take();
        }
        self
    }

    fn finish(self) -> Option<Run<'t>> {
        self.current.or(self.completed)
    }
}

/// The last contiguous run of tokens whose tag satisfies `matches`.
fn last_run<'t>(tokens: &'t [TaggedToken], matches: impl Fn(&str) -> bool) -> Option<Run<'t>> {
    tokens.iter()
        .enumerate()
        .fold(RunScan::default(), |scan, (idx, token)| scan.step(idx, token, matches(&token.pos)))
        .finish()
}

/// Recover an article stripped by tag-based extraction.
///
/// Looks at the word right before the first occurrence of `token` in `sequence` and, if it is an article,
/// returns `token` prefixed with it. Otherwise `token` is returned trimmed.
///
/// # Example
/// ```
/// use transask::extract::prepend_article;
/// use transask::patterns::Patterns;
/// let patterns = Patterns::default();
/// assert_eq!("the tuatara", prepend_article("what is the tuatara", "tuatara", &patterns));
/// assert_eq!("Paris", prepend_article("where is Paris", "Paris", &patterns));
/// ```
pub fn prepend_article(sequence: &str, token: &str, patterns: &Patterns) -> String {
    let token = token.trim();
    let leading_word = find_word_sequence(sequence, token)
        .and_then(|idx| sequence[..idx].split_whitespace().next_back());
    match leading_word {
        Some(article) if patterns.is_article(article) => format!("{} {}", article, token),
        _ => token.to_string(),
    }
}

/// Extracts phrases from queries with a tagger and a set of patterns.
#[derive(Debug, Clone, Copy)]
pub struct PhraseExtractor<'a, T: Tag> {
    tagger: &'a T,
    patterns: &'a Patterns,
}

impl<'a, T: Tag> PhraseExtractor<'a, T> {
    pub fn new(tagger: &'a T, patterns: &'a Patterns) -> Self {
        Self { tagger, patterns }
    }

    /// The subject of a query.
    ///
    /// Tries, in order, the last run of proper nouns, the last run of nouns and the first personal pronoun.
    /// Falls back to [DEFAULT_SUBJECT]. A query about "you" yields an empty phrase, and a query in the first
    /// person ("I", "am") is pivoted to "you" since the agent answers as the one addressed.
    pub fn noun_phrase(&self, query: &str) -> String {
        let tokens = self.tagger.tag(query);
        let run = last_run(&tokens, pos::is_proper_noun)
            .or_else(|| last_run(&tokens, pos::is_noun));
        let phrase = match run {
            Some(run) => prepend_article(query, &run.words.join(" "), self.patterns),
            None => match tokens.iter().find(|t| pos::is_personal_pronoun(&t.pos)) {
                Some(pronoun) if pronoun.normal.eq_ignore_ascii_case(ADDRESSED_SUBJECT) => return String::new(),
                Some(pronoun) => pronoun.normal.trim().to_string(),
                None => DEFAULT_SUBJECT.to_string(),
            },
        };
        let first_person = phrase.to_uppercase() == "I"
            || tokens.iter().take(2).any(|t| t.value.eq_ignore_ascii_case("am"));
        if first_person {
            ADDRESSED_SUBJECT.to_string()
        } else {
            phrase
        }
    }

    /// The verb a completion should continue from, empty when the query has none in a leading position.
    pub fn positional_phrase(&self, query: &str) -> String {
        if self.tagger.tag(query).is_empty() {
            return String::new();
        }
        let (first, second) = leading_words(query);
        let mut cursor = if self.patterns.is_wh_word(first) {
            second.to_string()
        } else if self.patterns.is_modal(first) {
            // only capitalized because it opened the sentence
            first.to_lowercase()
        } else {
            String::new()
        };
        if first.eq_ignore_ascii_case("am") || second.eq_ignore_ascii_case("am") || second.eq_ignore_ascii_case("i") {
            cursor = ADDRESSED_VERB.to_string();
        }
        if first.eq_ignore_ascii_case("where") {
            if !cursor.is_empty() {
                cursor.push(' ');
            }
            cursor.push_str(LOCATION_SUFFIX);
        }
        cursor
    }

    /// The word completions are ranked by.
    ///
    /// A second noun phrase after the subject wins, otherwise the first adjective, non-3rd person present verb
    /// or past participle after the subject. Empty when there is neither.
    pub fn focus(&self, query: &str) -> String {
        let noun = self.noun_phrase(query);
        let rest = match find_word_sequence(query, &noun) {
            Some(idx) => &query[idx + noun.trim().len()..],
            // a pivoted subject is not in the query, its first person form is
            None => match find_word_sequence(query, FIRST_PERSON) {
                Some(idx) => &query[idx + FIRST_PERSON.len()..],
                None => query,
            },
        };
        let rest = rest.trim();
        if rest.is_empty() {
            return String::new();
        }
        let next_noun = self.noun_phrase(rest);
        if !next_noun.is_empty() && next_noun != DEFAULT_SUBJECT && next_noun != noun {
            return next_noun;
        }
        self.tagger.tag(rest)
            .into_iter()
            .find(|t| pos::is_descriptive(&t.pos))
            .map(|t| t.value)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod test_extract {
    use super::{last_run, prepend_article, PhraseExtractor, DEFAULT_SUBJECT};
    use crate::patterns::Patterns;
    use crate::tagger::{pos, LexiconTagger, TagSequence, TaggedToken};

    fn noun_phrase(query: &str) -> String {
        let patterns = Patterns::default();
        PhraseExtractor::new(&LexiconTagger::default(), &patterns).noun_phrase(query)
    }

    fn positional_phrase(query: &str) -> String {
        let patterns = Patterns::default();
        PhraseExtractor::new(&LexiconTagger::default(), &patterns).positional_phrase(query)
    }

    fn focus(query: &str) -> String {
        let patterns = Patterns::default();
        PhraseExtractor::new(&LexiconTagger::default(), &patterns).focus(query)
    }

    #[test]
    fn test_run_scan_keeps_latest_run() {
        let tokens: TagSequence = [("New", "NNP"), ("York", "NNP"), ("or", "CC"), ("Paris", "NNP"), ("today", "NN")]
            .iter()
            .map(|(w, p)| TaggedToken::new(*w, w.to_lowercase(), *p))
            .collect();
        let run = last_run(&tokens, pos::is_proper_noun).unwrap();
        assert_eq!(3, run.start);
        assert_eq!(vec!["Paris"], run.words);

        let run = last_run(&tokens[..2], pos::is_proper_noun).unwrap();
        assert_eq!(vec!["New", "York"], run.words);
        assert!(last_run(&tokens, pos::is_personal_pronoun).is_none());
    }

    #[test]
    fn test_noun_phrase_proper_nouns() {
        assert_eq!("Paris", noun_phrase("where is Paris"));
        assert_eq!("New York", noun_phrase("is New York considered a great city"));
        // a broken then resumed run keeps only the later fragment
        assert_eq!("Paris", noun_phrase("is New York bigger than Paris"));
        assert_eq!("the Eiffel Tower", noun_phrase("When was the Eiffel Tower built"));
    }

    #[test]
    fn test_noun_phrase_common_nouns_and_articles() {
        assert_eq!("the tuatara", noun_phrase("What is something unique about the tuatara"));
        assert_eq!("a cat", noun_phrase("what is a cat"));
        assert_eq!("paris home", noun_phrase("what is paris home to"));
    }

    #[test]
    fn test_noun_phrase_pronouns() {
        assert_eq!("he", noun_phrase("what could he have done"));
        assert_eq!("", noun_phrase("what are you"));
        assert_eq!("you", noun_phrase("what am I doing"));
        assert_eq!("you", noun_phrase("am I right"));
    }

    #[test]
    fn test_noun_phrase_default() {
        assert_eq!(DEFAULT_SUBJECT, noun_phrase("what is this"));
        let patterns = Patterns::default();
        let tagger = |sentence: &str| -> TagSequence {
            sentence.split_whitespace().map(|w| TaggedToken::new(w, w, "RB")).collect()
        };
        assert_eq!("It", PhraseExtractor::new(&tagger, &patterns).noun_phrase("so very often"));
    }

    #[test]
    fn test_positional_phrase() {
        assert_eq!("is located", positional_phrase("where is Paris"));
        assert_eq!("was", positional_phrase("what was Paris the capital of"));
        assert_eq!("is", positional_phrase("Is Paris the capital of France"));
        assert_eq!("are", positional_phrase("what am I doing"));
        assert_eq!("are", positional_phrase("am I right"));
        assert_eq!("are", positional_phrase("what are you"));
        assert_eq!("", positional_phrase("Paris in spring"));
        assert_eq!("", positional_phrase(""));
        assert_eq!("located", positional_phrase("where"));
    }

    #[test]
    fn test_focus() {
        assert_eq!("known", focus("what is Paris known for"));
        assert_eq!("the capital", focus("what is Paris the capital of"));
        assert_eq!("popular", focus("why is Paris popular"));
        assert_eq!("", focus("where is Paris"));
        assert_eq!("", focus("what am I doing"));
        assert_eq!("right", focus("am I right"));
        assert_eq!("have", focus("what do cats have"));
    }

    #[test]
    fn test_prepend_article() {
        let patterns = Patterns::default();
        assert_eq!("a destination", prepend_article("is it a destination", "destination", &patterns));
        assert_eq!("The tower", prepend_article("The tower", "tower", &patterns));
        assert_eq!("tower", prepend_article("then tower", "tower", &patterns));
        assert_eq!("tower", prepend_article("no match here", "tower", &patterns));
    }
}
