//! # Answer Composition
//! Turns a canonical query into an answer sentence with the help of a completion provider.
//!
//! A query is first turned into an [AnswerPlan]: the prompts to try in order and the focus keyword. The prompts are
//! sent to the provider one after the other until one of them gets usable completions. Those completions are
//! narrowed to the ones mentioning the focus keyword, if any do, and one of them is picked at random and appended
//! to the prompt that produced it.
//!
//! For example, `where is Paris` plans the single prompt `Paris is located`, and a completion `in France.` makes
//! the answer `Paris is located in France.`

use std::fmt;
use std::fmt::Formatter;

use anyhow::Result;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::completion::{AsyncComplete, Complete, Completions};
use crate::extract::PhraseExtractor;
use crate::tagger::Tag;
use crate::utils::string::{leading_words, strip_word_prefix, word_count};

/// A recognized failure, answered with a fixed message rather than raised as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentinel {
    /// Fewer than two words, or the input continues a sentence ("and ...")
    InsufficientInput,
    /// No question structure could be found
    InvalidCommand,
    /// The question is about the agent itself
    SelfReference,
    /// The provider had nothing to say after every fallback
    NoTrainingData,
}

impl Sentinel {
    /// The fixed, displayable message of the sentinel.
    pub fn message(&self) -> &'static str {
        match self {
            Sentinel::InsufficientInput => "Could you ask me a complete question?",
            Sentinel::InvalidCommand => "I don't understand what you are asking.",
            Sentinel::SelfReference => "I'm a language model, I can only tell you what I have read.",
            Sentinel::NoTrainingData => "I'm not able to respond to that coherently due to lack of training data.",
        }
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of answering a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Answer(String),
    Sentinel(Sentinel),
}

impl Reply {
    pub fn is_answer(&self) -> bool {
        matches!(self, Reply::Answer(_))
    }

    /// Map the answer text, leaving sentinels untouched.
    pub fn map_answer(self, f: impl FnOnce(String) -> String) -> Self {
        match self {
            Reply::Answer(answer) => Reply::Answer(f(answer)),
            sentinel => sentinel,
        }
    }
}

impl From<Sentinel> for Reply {
    fn from(sentinel: Sentinel) -> Self {
        Reply::Sentinel(sentinel)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Answer(answer) => f.write_str(answer),
            Reply::Sentinel(sentinel) => write!(f, "{}", sentinel),
        }
    }
}

/// The prompts to try for a query, best first, and how to finish the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerPlan {
    /// Prompts in fallback order
    pub stages: Vec<String>,
    /// Keyword that narrows the candidates, may be empty
    pub focus: String,
    /// Whether the answer is spliced as "<prompt> <focus> because <completion>"
    pub is_why: bool,
}

impl AnswerPlan {
    /// Compose the answer from the prompt that produced `candidates`.
    ///
    /// Candidates mentioning the focus keyword are preferred. A candidate that already starts with the prompt
    /// does not repeat it.
    pub fn answer<R: Rng + ?Sized>(&self, prompt: &str, candidates: &[String], rng: &mut R) -> Reply {
        let focused: Vec<&String> = candidates.iter()
            .filter(|c| !self.focus.is_empty() && c.contains(self.focus.as_str()))
            .collect();
        let chosen = if focused.is_empty() {
            candidates.choose(rng)
        } else {
            focused.choose(rng).copied()
        };
        let Some(chosen) = chosen else {
            return Sentinel::NoTrainingData.into();
        };
        debug!("chose \"{}\" out of {} candidates ({} focused)", chosen, candidates.len(), focused.len());

        let prompt = prompt.trim();
        let completion = strip_word_prefix(chosen, prompt).unwrap_or(chosen).trim();
        let mut answer = prompt.to_string();
        if self.is_why {
            if !self.focus.is_empty() {
                answer.push(' ');
                answer.push_str(&self.focus);
            }
            answer.push_str(" because");
        }
        if !completion.is_empty() {
            answer.push(' ');
            answer.push_str(completion);
        }
        Reply::Answer(answer.trim().to_string())
    }
}

/// Completions that carry words.
fn usable(completions: Completions) -> Vec<String> {
    completions.completions
        .into_iter()
        .filter(|c| !c.trim().is_empty())
        .collect()
}

/// Composes answers from an extractor and a completion provider.
pub struct AnswerComposer<'a, T: Tag, C: ?Sized> {
    extractor: PhraseExtractor<'a, T>,
    provider: &'a C,
}

impl<'a, T: Tag, C: ?Sized> AnswerComposer<'a, T, C> {
    pub fn new(extractor: PhraseExtractor<'a, T>, provider: &'a C) -> Self {
        Self { extractor, provider }
    }

    /// Plan the prompts for a query, or the sentinel it resolves to without asking the provider.
    pub fn plan(&self, query: &str) -> std::result::Result<AnswerPlan, Sentinel> {
        let noun_phrase = self.extractor.noun_phrase(query);
        if noun_phrase.is_empty() {
            return Err(Sentinel::SelfReference);
        }
        let positional_phrase = self.extractor.positional_phrase(query);
        let (first_word, _) = leading_words(query);

        let mut stages = vec![format!("{} {}", noun_phrase, positional_phrase).trim().to_string()];
        if !first_word.eq_ignore_ascii_case("where") {
            stages.push(noun_phrase);
        }
        if word_count(query) == 1 {
            stages.push(first_word.to_string());
        }
        // a repeated prompt is asked again, the provider may answer differently
        stages.retain(|stage| !stage.is_empty());

        let focus = self.extractor.focus(query);
        debug!("focus \"{}\"", focus);
        Ok(AnswerPlan {
            stages,
            focus,
            is_why: first_word.eq_ignore_ascii_case("why"),
        })
    }
}

impl<'a, T: Tag, C: Complete + ?Sized> AnswerComposer<'a, T, C> {
    /// Answer a canonical query.
    ///
    /// Returns a [Reply::Sentinel] for recognized failures. Errors of the provider are returned as they are.
    pub fn transform<R: Rng + ?Sized>(&self, query: &str, rng: &mut R) -> Result<Reply> {
        let plan = match self.plan(query) {
            Ok(plan) => plan,
            Err(sentinel) => return Ok(sentinel.into()),
        };
        for (stage, prompt) in plan.stages.iter().enumerate() {
            debug!("{} \"{}\" ...", if stage == 0 { "complete" } else { "fallback" }, prompt);
            let candidates = usable(Complete::complete(self.provider, prompt)?);
            if !candidates.is_empty() {
                return Ok(plan.answer(prompt, &candidates, rng));
            }
        }
        Ok(Sentinel::NoTrainingData.into())
    }
}

impl<'a, T: Tag, C: AsyncComplete + ?Sized> AnswerComposer<'a, T, C> {
    /// Same as [AnswerComposer::transform], awaiting the provider.
    pub async fn transform_async<R: Rng + ?Sized>(&self, query: &str, rng: &mut R) -> Result<Reply> {
        let plan = match self.plan(query) {
            Ok(plan) => plan,
            Err(sentinel) => return Ok(sentinel.into()),
        };
        for (stage, prompt) in plan.stages.iter().enumerate() {
            debug!("{} \"{}\" ...", if stage == 0 { "complete" } else { "fallback" }, prompt);
            let candidates = usable(AsyncComplete::complete(self.provider, prompt).await?);
            if !candidates.is_empty() {
                return Ok(plan.answer(prompt, &candidates, rng));
            }
        }
        Ok(Sentinel::NoTrainingData.into())
    }
}
