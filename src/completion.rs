//! # Completion Providers
//! A completion provider is the statistical engine behind an agent: given a prompt, it returns candidate
//! continuations. Providers are treated as read-only once constructed, so one provider can serve concurrent
//! requests.
//!
//! Implement [Complete] for a blocking provider or [AsyncComplete] for one that awaits, e.g. a remote service.
//! Every `Complete + Sync` is also an `AsyncComplete`.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utils::string::find_word_sequence;

//TODO: when async fn in trait can be boxed without a macro, remove async_trait macro

/// Candidate continuations of a prompt, best first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completions {
    pub completions: Vec<String>,
}

impl From<Vec<String>> for Completions {
    fn from(completions: Vec<String>) -> Self {
        Self { completions }
    }
}

/// Trait for completing a prompt.
pub trait Complete {
    fn complete(&self, prompt: &str) -> Result<Completions>;
}

/// Blanket impl of Complete for Fn(&str) -> Vec<String>.
impl<F> Complete for F where F: Fn(&str) -> Vec<String> {
    fn complete(&self, prompt: &str) -> Result<Completions> {
        Ok(self(prompt).into())
    }
}

/// Async version of Complete trait.
#[async_trait]
pub trait AsyncComplete {
    async fn complete(&self, prompt: &str) -> Result<Completions>;
}

/// Blanket impl of AsyncComplete for Complete trait.
#[async_trait]
impl<T: Complete + Sync> AsyncComplete for T {
    async fn complete(&self, prompt: &str) -> Result<Completions> {
        Complete::complete(self, prompt)
    }
}

/// Configuration of [CorpusCompletions].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Maximum number of completions returned for one prompt
    pub max_completions: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            max_completions: 10,
        }
    }
}

/// A provider backed by a fixed set of sentences.
///
/// The completions of a prompt are the continuations that follow the prompt wherever it occurs in a sentence,
/// matched case-insensitively on word boundaries, in corpus order and without duplicates.
///
/// # Example
/// ```
/// use transask::completion::{Complete, CorpusCompletions};
/// let corpus = CorpusCompletions::from_text("Paris is located in France. Paris is home to the Louvre.");
/// let completions = corpus.complete("paris is").unwrap().completions;
/// assert_eq!(completions, vec!["located in France.", "home to the Louvre."]);
/// ```
#[derive(Debug, Clone, Default)]
#[readonly::make]
pub struct CorpusCompletions {
    /// The sentences of the corpus, readonly
    #[readonly]
    pub sentences: Vec<String>,
    #[readonly]
    pub config: CorpusConfig,
}

impl CorpusCompletions {
    /// Build a corpus from running text with the default configuration.
    pub fn from_text(text: &str) -> Self {
        Self::from_documents([text], CorpusConfig::default())
    }

    /// Build a corpus from several documents.
    pub fn from_documents<'d>(documents: impl IntoIterator<Item=&'d str>, config: CorpusConfig) -> Self {
        let sentences = documents.into_iter()
            .flat_map(split_sentences)
            .collect();
        Self { sentences, config }
    }

    /// Number of sentences in the corpus.
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

impl Complete for CorpusCompletions {
    fn complete(&self, prompt: &str) -> Result<Completions> {
        let prompt = prompt.trim();
        let mut completions: Vec<String> = Vec::new();
        if prompt.is_empty() {
            return Ok(completions.into());
        }
        for sentence in &self.sentences {
            if completions.len() >= self.config.max_completions {
                break;
            }
            let continuation = find_word_sequence(sentence, prompt)
                .map(|idx| sentence[idx + prompt.len()..].trim())
                .filter(|c| !c.is_empty());
            if let Some(continuation) = continuation {
                if !completions.iter().any(|c| c == continuation) {
                    completions.push(continuation.to_string());
                }
            }
        }
        Ok(completions.into())
    }
}

/// Split text into trimmed sentences, keeping the terminating punctuation.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        current.push(c);
        if matches!(c, '.' | '!' | '?' | '\n') {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }
    let rest = current.trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }
    sentences
}
