//! Sentence splitting, part-of-speech tagging and named-entity spans.
//!
//! The generator only ever talks to the [`Annotator`] trait. The built-in
//! implementation is [`RuleAnnotator`]; tests plug in scripted annotators.

pub mod lexicon;
pub mod rules;

use std::ops::Range;
use std::sync::Arc;

use crate::error::AnnotateError;

pub use lexicon::Lexicon;
pub use rules::RuleAnnotator;

/// Universal Dependencies part-of-speech tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
}

impl PartOfSpeech {
    /// Common or proper noun; the fallback answer candidates.
    pub fn is_nominal(self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::Propn)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    Person,
    Organization,
    Location,
    Date,
    Quantity,
    Misc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub pos: PartOfSpeech,
    /// Byte range of the token in the annotated text.
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub text: String,
    pub tokens: Vec<Token>,
}

impl Sentence {
    /// Number of whitespace-separated words, punctuation included.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

/// Output of an [`Annotator`] for one piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedText {
    pub sentences: Vec<Sentence>,
    /// Entity spans over the whole text, in order of appearance.
    pub entities: Vec<Entity>,
}

impl AnnotatedText {
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.sentences.iter().flat_map(|s| s.tokens.iter())
    }

    /// Text of every NOUN / PROPN token, in order, duplicates kept.
    pub fn nominal_tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens()
            .filter(|t| t.pos.is_nominal())
            .map(|t| t.text.as_str())
    }
}

/// Annotates raw text. Implementations are created once and shared between
/// requests, so they must not mutate themselves while annotating.
pub trait Annotator: Send + Sync {
    fn annotate(&self, text: &str) -> Result<AnnotatedText, AnnotateError>;
}

impl<T: Annotator + ?Sized> Annotator for Arc<T> {
    fn annotate(&self, text: &str) -> Result<AnnotatedText, AnnotateError> {
        (**self).annotate(text)
    }
}
