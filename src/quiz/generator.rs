use std::collections::HashSet;
use std::sync::Arc;

use log::debug;
use rand::seq::{index, SliceRandom};
use rand::Rng;

use crate::annotate::Annotator;
use crate::error::AnnotateError;
use crate::quiz::{choice_label, Question};

/// Placeholder that replaces the answer in the question stem.
pub const BLANK: &str = "______";

pub const DEFAULT_QUESTIONS: usize = 5;

// Sentences need more words than this to become questions
const MIN_WORDS: usize = 4;
const MAX_DISTRACTORS: usize = 3;

/// The process-wide generator handed to the web and bot surfaces.
pub type SharedGenerator = Arc<McqGenerator<Arc<dyn Annotator>>>;

/// Turns text into fill-in-the-blank multiple-choice questions.
///
/// The annotator is loaded once and passed in; the random source is passed to
/// every call, so a seeded rng gives reproducible quizzes.
pub struct McqGenerator<A> {
    annotator: A,
}

impl<A: Annotator> McqGenerator<A> {
    pub fn new(annotator: A) -> Self {
        Self { annotator }
    }

    /// Generates at most `num_questions` questions, one per randomly chosen
    /// sentence of more than four words. Sentences without an answer
    /// candidate are skipped, so the result may be shorter than requested.
    pub fn generate<R>(
        &self,
        text: &str,
        num_questions: usize,
        rng: &mut R,
    ) -> Result<Vec<Question>, AnnotateError>
    where
        R: Rng + ?Sized,
    {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let doc = self.annotator.annotate(text)?;
        let sentences: Vec<&str> = doc
            .sentences
            .iter()
            .filter(|s| s.word_count() > MIN_WORDS)
            .map(|s| s.text.as_str())
            .collect();
        let entities = distinct(doc.entities.iter().map(|e| e.text.as_str()));
        let nouns = distinct(doc.nominal_tokens());

        let num_questions = num_questions.min(sentences.len());
        debug!(
            "{} of {} sentences eligible, {} entities, generating {} questions",
            sentences.len(),
            doc.sentences.len(),
            entities.len(),
            num_questions
        );
        if num_questions == 0 {
            return Ok(Vec::new());
        }

        let mut picked = index::sample(rng, sentences.len(), num_questions).into_vec();
        picked.shuffle(rng);

        let mut questions = Vec::with_capacity(num_questions);
        for i in picked {
            let sentence = sentences[i];

            let sentence_doc = self.annotator.annotate(sentence)?;
            let mut candidates: Vec<&str> = sentence_doc
                .entities
                .iter()
                .map(|e| e.text.as_str())
                .collect();
            if candidates.is_empty() {
                candidates = sentence_doc.nominal_tokens().collect();
            }

            let Some(&correct) = candidates.choose(rng) else {
                debug!("No answer candidate in {:?}, skipping", sentence);
                continue;
            };

            let stem = sentence.replacen(correct, BLANK, 1);

            let mut distractors = without(&entities, correct);
            if distractors.len() < MAX_DISTRACTORS {
                distractors = without(&nouns, correct);
            }
            distractors.shuffle(rng);
            distractors.truncate(MAX_DISTRACTORS);

            // The distractors are already in random order, so a uniform
            // insert position shuffles the whole choice set.
            let position = rng.gen_range(0..=distractors.len());
            distractors.insert(position, correct);
            let choices = distractors.into_iter().map(str::to_string).collect();

            questions.push(Question::new(stem, choices, choice_label(position)));
        }

        Ok(questions)
    }
}

/// Order-preserving dedup.
fn distinct<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(*item)).collect()
}

/// Exact string subtraction: "New York" does not remove "New York City".
fn without<'a>(pool: &[&'a str], answer: &str) -> Vec<&'a str> {
    pool.iter().copied().filter(|item| *item != answer).collect()
}
