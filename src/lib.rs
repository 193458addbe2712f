//! # transask
//!
//! Rule-based question answering on top of a completion provider, written in Rust
//!
//! **Note: `transask` is now a WIP, so the APIs are subject to change.**
//!
//! ## Usage
//! As for now, `transask` is not released on crates.io. To use it, add a dependency in `Cargo.toml`
//! ```toml
//! transask = { git = "https://github.com/ifsheldon/transask.git", branch = "main"}
//! ```
//!
//! ```
//! use transask::agent::ChatAgent;
//! use transask::completion::CorpusCompletions;
//! use transask::tagger::LexiconTagger;
//!
//! let corpus = CorpusCompletions::from_text("The tuatara is a reptile native to New Zealand.");
//! let agent = ChatAgent::new(LexiconTagger::default(), corpus);
//! assert_eq!("The tuatara is a reptile native to New Zealand.", agent.ask("tell me about the tuatara").unwrap());
//! ```
//!
//! ## Concepts and Design
//! A completion provider only continues text. `transask` turns a question into a prompt the provider can continue,
//! so that the continuation reads as an answer. The whole pipeline is rules over part-of-speech tags, with no model
//! of its own. Every step is a plain function of its input, so each of them can be used and tested on its own.
//!
//! ### Patterns
//!
//! The word tables the rules are made of: question words, modal verbs, articles, punctuation and paraphrase aliases.
//! They are data, see [`PatternTables`](crate::patterns::PatternTables), and can be loaded from JSON.
//!
//! ### Tagger
//!
//! Anything that implements [`Tag`](crate::tagger::Tag), which turns a sentence into tokens with Penn Treebank
//! tags. [`LexiconTagger`](crate::tagger::LexiconTagger) is a small lexicon and suffix based tagger. Closures work too.
//!
//! ### Query
//!
//! Raw input is normalized into a canonical query led by a question word or a modal verb, e.g. `tell me about Paris`
//! becomes `What is Paris`. See [`QueryNormalizer`](crate::normalize::QueryNormalizer).
//!
//! ### Phrases
//!
//! The noun phrase, positional phrase and focus keyword of a query, see
//! [`PhraseExtractor`](crate::extract::PhraseExtractor). `where is Paris` has the noun phrase `Paris` and the
//! positional phrase `is located`, which together make the prompt `Paris is located`.
//!
//! ### Completion Provider
//!
//! Anything that implements [`Complete`](crate::completion::Complete) or
//! [`AsyncComplete`](crate::completion::AsyncComplete). [`CorpusCompletions`](crate::completion::CorpusCompletions)
//! completes prompts from a fixed set of sentences.
//!
//! ### Agent
//!
//! [`ChatAgent`](crate::agent::ChatAgent) puts everything together. Questions it cannot handle are answered with a
//! fixed [`Sentinel`](crate::compose::Sentinel) message instead of an error. Only provider errors are errors.
//!
//! ## License
//!
//! `transask` will always remain free under Apache license.

pub mod patterns;
pub mod tagger;
pub mod extract;
pub mod normalize;
pub mod completion;
pub mod compose;
pub mod agent;
pub mod utils;
