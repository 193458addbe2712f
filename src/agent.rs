//! # Chat Agent
//! The entry point: validates raw input, normalizes it into a canonical query, composes the answer and formats it.
//!
//! An agent keeps no memory between questions. Its tagger, provider and patterns are only read, so an agent can be
//! shared between threads as long as its tagger and provider can.

use std::sync::Arc;

use anyhow::Result;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng, SeedableRng};

use crate::completion::{AsyncComplete, Complete};
use crate::compose::{AnswerComposer, Reply, Sentinel};
use crate::extract::PhraseExtractor;
use crate::normalize::QueryNormalizer;
use crate::patterns::Patterns;
use crate::tagger::Tag;
use crate::utils::string::{leading_words, to_sentence_case, word_count};

/// Word that marks input as the continuation of an earlier sentence.
const CONTINUATION: &str = "and";

/// A question answering agent in front of a completion provider.
///
/// # Example
/// ```
/// use transask::agent::ChatAgent;
/// use transask::completion::CorpusCompletions;
/// use transask::tagger::LexiconTagger;
///
/// let corpus = CorpusCompletions::from_text("Paris is located in northern France.");
/// let agent = ChatAgent::new(LexiconTagger::default(), corpus);
/// assert_eq!("Paris is located in northern France.", agent.ask("where is Paris?").unwrap());
/// ```
pub struct ChatAgent<T: Tag, C> {
    tagger: T,
    provider: C,
    patterns: Arc<Patterns>,
}

impl<T: Tag, C> ChatAgent<T, C> {
    /// Create an agent with the default patterns.
    pub fn new(tagger: T, provider: C) -> Self {
        Self::with_patterns(tagger, provider, Arc::new(Patterns::default()))
    }

    pub fn with_patterns(tagger: T, provider: C, patterns: Arc<Patterns>) -> Self {
        Self {
            tagger,
            provider,
            patterns,
        }
    }

    pub fn tagger(&self) -> &T {
        &self.tagger
    }

    pub fn provider(&self) -> &C {
        &self.provider
    }

    pub fn patterns(&self) -> &Patterns {
        &self.patterns
    }

    /// The canonical query of `input`, `None` if it has no question structure.
    pub fn querify(&self, input: &str) -> Option<String> {
        QueryNormalizer::new(&self.patterns).querify(input)
    }

    /// Validate raw input and normalize it.
    fn screen(&self, input: &str) -> std::result::Result<String, Sentinel> {
        let stripped = self.patterns.strip_punctuation(input);
        let (first_word, _) = leading_words(&stripped);
        if word_count(&stripped) < 2 || first_word.eq_ignore_ascii_case(CONTINUATION) {
            return Err(Sentinel::InsufficientInput);
        }
        let query = self.querify(&stripped).ok_or(Sentinel::InvalidCommand)?;
        debug!("ask \"{}\" as \"{}\"", input, query);
        Ok(query)
    }

    fn composer(&self) -> AnswerComposer<'_, T, C> {
        AnswerComposer::new(PhraseExtractor::new(&self.tagger, &self.patterns), &self.provider)
    }
}

impl<T: Tag, C: Complete> ChatAgent<T, C> {
    /// Answer a question. Recognized failures are answered with their [Sentinel] message.
    ///
    /// Only errors of the provider are returned as errors.
    pub fn ask(&self, input: &str) -> Result<String> {
        self.ask_with_rng(input, &mut thread_rng())
    }

    /// Same as [ChatAgent::ask] with a given random source for picking among candidates.
    pub fn ask_with_rng<R: Rng + ?Sized>(&self, input: &str, rng: &mut R) -> Result<String> {
        self.respond_with_rng(input, rng).map(|reply| reply.to_string())
    }

    /// Answer a question, keeping sentinels apart from answers.
    pub fn respond(&self, input: &str) -> Result<Reply> {
        self.respond_with_rng(input, &mut thread_rng())
    }

    pub fn respond_with_rng<R: Rng + ?Sized>(&self, input: &str, rng: &mut R) -> Result<Reply> {
        let query = match self.screen(input) {
            Ok(query) => query,
            Err(sentinel) => return Ok(sentinel.into()),
        };
        let reply = self.composer().transform(&query, rng)?;
        Ok(reply.map_answer(|answer| to_sentence_case(&answer)))
    }

    /// Chat without question handling: the input, stripped of punctuation, is completed as it is.
    ///
    /// Returns `None` when the provider has no completion for it.
    pub fn chat(&self, input: &str) -> Result<Option<String>> {
        self.chat_with_rng(input, &mut thread_rng())
    }

    /// Same as [ChatAgent::chat] with a given random source.
    pub fn chat_with_rng<R: Rng + ?Sized>(&self, input: &str, rng: &mut R) -> Result<Option<String>> {
        let prompt = self.patterns.strip_punctuation(input);
        if prompt.is_empty() {
            return Ok(None);
        }
        let completions = Complete::complete(&self.provider, &prompt)?.completions;
        let usable: Vec<&String> = completions.iter().filter(|c| !c.trim().is_empty()).collect();
        Ok(usable.choose(rng).map(|c| c.to_string()))
    }
}

impl<T: Tag, C: AsyncComplete> ChatAgent<T, C> {
    /// Same as [ChatAgent::ask], awaiting the provider.
    pub async fn ask_async(&self, input: &str) -> Result<String> {
        let mut rng = StdRng::from_entropy();
        self.respond_async_with_rng(input, &mut rng).await.map(|reply| reply.to_string())
    }

    pub async fn respond_async_with_rng<R: Rng + ?Sized>(&self, input: &str, rng: &mut R) -> Result<Reply> {
        let query = match self.screen(input) {
            Ok(query) => query,
            Err(sentinel) => return Ok(sentinel.into()),
        };
        let reply = self.composer().transform_async(&query, rng).await?;
        Ok(reply.map_answer(|answer| to_sentence_case(&answer)))
    }
}

#[cfg(test)]
mod test_agent {
    use std::cell::RefCell;
    use std::sync::Arc;
    use std::thread;

    use futures::future::join_all;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::ChatAgent;
    use crate::completion::CorpusCompletions;
    use crate::compose::{Reply, Sentinel};
    use crate::patterns::{PatternTables, Patterns};
    use crate::tagger::LexiconTagger;

    const PARIS: &str = "Paris is the capital of France. Paris is located in northern France. \
        Paris is known for the Eiffel Tower. The Eiffel Tower was built for the 1889 World's Fair. \
        Paris is a popular destination for tourists. Paris is home to the Louvre.";

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_insufficient_input_never_completes() {
        let calls = RefCell::new(0);
        let provider = |_: &str| -> Vec<String> {
            *calls.borrow_mut() += 1;
            strings(&["something."])
        };
        let agent = ChatAgent::new(LexiconTagger::default(), provider);
        for input in ["", "hello", "Paris?", "  ?! ", "why", "and so what", "And then?"] {
            assert_eq!(Sentinel::InsufficientInput.message(), agent.ask(input).unwrap(), "input: {}", input);
        }
        assert_eq!(0, *calls.borrow());
    }

    #[test]
    fn test_invalid_command() {
        let agent = ChatAgent::new(LexiconTagger::default(), |_: &str| -> Vec<String> { vec![] });
        assert_eq!(Reply::Sentinel(Sentinel::InvalidCommand), agent.respond("talk about france").unwrap());
    }

    #[test]
    fn test_self_reference() {
        let agent = ChatAgent::new(LexiconTagger::default(), |_: &str| -> Vec<String> { strings(&["a robot."]) });
        assert_eq!(Sentinel::SelfReference.message(), agent.ask("what are you").unwrap());
        assert_eq!(Sentinel::SelfReference.message(), agent.ask("Who are you?").unwrap());
    }

    #[test]
    fn test_where_scenario() {
        let provider = |prompt: &str| -> Vec<String> {
            if prompt == "Paris is located" {
                strings(&["Paris is located in France."])
            } else {
                vec![]
            }
        };
        let agent = ChatAgent::new(LexiconTagger::default(), provider);
        assert_eq!("Paris is located in France.", agent.ask("where is Paris?").unwrap());
    }

    #[test]
    fn test_no_training_data() {
        let agent = ChatAgent::new(LexiconTagger::default(), |_: &str| -> Vec<String> { vec![] });
        assert_eq!(Sentinel::NoTrainingData.message(), agent.ask("what is the tuatara?").unwrap());
    }

    #[test]
    fn test_sentence_case() {
        let provider = |prompt: &str| -> Vec<String> {
            if prompt == "the tuatara is" {
                strings(&["a reptile native to New Zealand."])
            } else {
                vec![]
            }
        };
        let agent = ChatAgent::new(LexiconTagger::default(), provider);
        assert_eq!("The tuatara is a reptile native to New Zealand.", agent.ask("what is the tuatara?").unwrap());
    }

    #[test]
    fn test_first_person_pivot() {
        let provider = |prompt: &str| -> Vec<String> {
            if prompt == "you are" {
                strings(&["asking questions."])
            } else {
                vec![]
            }
        };
        let agent = ChatAgent::new(LexiconTagger::default(), provider);
        assert_eq!("You are asking questions.", agent.ask("what am I doing?").unwrap());
    }

    #[test]
    fn test_with_corpus() {
        let agent = ChatAgent::new(LexiconTagger::default(), CorpusCompletions::from_text(PARIS));
        let mut rng = StepRng::new(0, 0);
        assert_eq!("Paris is the capital of France.", agent.ask_with_rng("tell me about Paris", &mut rng).unwrap());
        assert_eq!("Paris is known for the Eiffel Tower.", agent.ask_with_rng("what is Paris known for?", &mut rng).unwrap());
        // the pronoun subject has no data of its own and where questions do not fall back
        assert_eq!(Sentinel::NoTrainingData.message(),
                   agent.ask_with_rng("speaking of Paris, where is it located?", &mut rng).unwrap());
        assert_eq!("The Eiffel Tower was built for the 1889 World's Fair.",
                   agent.ask_with_rng("regarding the Eiffel Tower, when was the Eiffel Tower built?", &mut rng).unwrap());
    }

    #[test]
    fn test_custom_patterns() {
        let tables = PatternTables::from_json(r#"{"aliases": ["describe"]}"#).unwrap();
        let agent = ChatAgent::with_patterns(
            LexiconTagger::default(),
            CorpusCompletions::from_text(PARIS),
            Arc::new(Patterns::new(tables).unwrap()),
        );
        assert_eq!(Some("What is Paris".to_string()), agent.querify("describe Paris"));
        assert_eq!(None, agent.querify("tell me about Paris"));
        assert!(agent.respond("describe Paris").unwrap().is_answer());
    }

    #[test]
    fn test_chat() {
        let agent = ChatAgent::new(LexiconTagger::default(), CorpusCompletions::from_text(PARIS));
        assert_eq!(Some("to the Louvre.".to_string()), agent.chat("Paris is home").unwrap());
        assert_eq!(None, agent.chat("London is").unwrap());
        assert_eq!(None, agent.chat("?").unwrap());
    }

    #[test]
    fn test_chat_with_rng() {
        let agent = ChatAgent::new(LexiconTagger::default(), CorpusCompletions::from_text(PARIS));
        let mut rng = StepRng::new(0, 0);
        assert_eq!(Some("the capital of France.".to_string()), agent.chat_with_rng("Paris is", &mut rng).unwrap());
        let mut rng = StdRng::seed_from_u64(7);
        let first = agent.chat_with_rng("Paris is", &mut rng).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(first, agent.chat_with_rng("Paris is", &mut rng).unwrap());
    }

    #[test]
    fn test_concurrent_asks() {
        let agent = Arc::new(ChatAgent::new(LexiconTagger::default(), CorpusCompletions::from_text(PARIS)));
        thread::scope(|scope| {
            for _ in 0..4 {
                let agent = Arc::clone(&agent);
                scope.spawn(move || {
                    assert_eq!("Paris is located in northern France.", agent.ask("where is Paris").unwrap());
                });
            }
        });
    }

    #[tokio::test]
    async fn test_ask_async() {
        let agent = ChatAgent::new(LexiconTagger::default(), CorpusCompletions::from_text(PARIS));
        assert_eq!("Paris is located in northern France.", agent.ask_async("where is Paris?").await.unwrap());
        assert_eq!(Sentinel::InsufficientInput.message(), agent.ask_async("Paris").await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_ask_async() {
        let agent = ChatAgent::new(LexiconTagger::default(), CorpusCompletions::from_text(PARIS));
        let questions = ["where is Paris?", "what is Paris known for?", "and then?", "talk about france"];
        let answers = join_all(questions.iter().map(|q| agent.ask_async(q))).await;
        let answers: Vec<String> = answers.into_iter().map(|a| a.unwrap()).collect();
        assert_eq!("Paris is located in northern France.", answers[0]);
        assert_eq!("Paris is known for the Eiffel Tower.", answers[1]);
        assert_eq!(Sentinel::InsufficientInput.message(), answers[2]);
        assert_eq!(Sentinel::InvalidCommand.message(), answers[3]);
    }
}
