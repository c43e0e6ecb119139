use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use log::{debug, info};
use rs_conllu::UPOS;

use crate::annotate::PartOfSpeech;
use crate::error::LexiconError;

/// Word form -> most frequent part of speech, learned from a tagged corpus.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    tags: HashMap<String, PartOfSpeech>,
}

impl Lexicon {
    /// Loads a CoNLL-U treebank (e.g. UD English EWT) and keeps the most
    /// frequent UPOS tag of every lowercased form.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let mut skipped = 0usize;
        let mut tagged = Vec::new();
        for sentence in rs_conllu::parse_file(file) {
            // A malformed sentence shouldn't throw away the whole treebank
            let sentence = match sentence {
                Ok(sentence) => sentence,
                Err(_) => {
                    skipped += 1;
                    continue;
                }
            };
            for token in sentence.tokens {
                if let Some(pos) = token.upos.as_ref().map(from_upos) {
                    tagged.push((token.form, pos));
                }
            }
        }
        if skipped > 0 {
            debug!("Skipped {} malformed sentences in {}", skipped, path.display());
        }

        let lexicon = Self::from_tagged(tagged);
        if lexicon.is_empty() {
            return Err(LexiconError::Empty(path.display().to_string()));
        }
        info!("Loaded lexicon of {} forms from {}", lexicon.len(), path.display());
        Ok(lexicon)
    }

    /// Builds the lexicon from (form, tag) observations. On a tie the tag
    /// seen first wins.
    pub fn from_tagged<I, S>(observations: I) -> Self
    where
        I: IntoIterator<Item = (S, PartOfSpeech)>,
        S: AsRef<str>,
    {
        let mut counts: HashMap<String, Vec<(PartOfSpeech, u32)>> = HashMap::new();
        for (form, pos) in observations {
            let form = form.as_ref().trim().to_lowercase();
            if form.is_empty() {
                continue;
            }
            let seen = counts.entry(form).or_default();
            match seen.iter_mut().find(|(p, _)| *p == pos) {
                Some((_, count)) => *count += 1,
                None => seen.push((pos, 1)),
            }
        }

        let tags = counts
            .into_iter()
            .filter_map(|(form, seen)| {
                let mut best: Option<(PartOfSpeech, u32)> = None;
                for (pos, count) in seen {
                    if best.map_or(true, |(_, best_count)| count > best_count) {
                        best = Some((pos, count));
                    }
                }
                best.map(|(pos, _)| (form, pos))
            })
            .collect();

        Self { tags }
    }

    pub fn lookup(&self, word: &str) -> Option<PartOfSpeech> {
        self.tags.get(&word.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

fn from_upos(upos: &UPOS) -> PartOfSpeech {
    match upos {
        UPOS::ADJ => PartOfSpeech::Adj,
        UPOS::ADP => PartOfSpeech::Adp,
        UPOS::ADV => PartOfSpeech::Adv,
        UPOS::AUX => PartOfSpeech::Aux,
        UPOS::CCONJ => PartOfSpeech::Cconj,
        UPOS::DET => PartOfSpeech::Det,
        UPOS::INTJ => PartOfSpeech::Intj,
        UPOS::NOUN => PartOfSpeech::Noun,
        UPOS::NUM => PartOfSpeech::Num,
        UPOS::PART => PartOfSpeech::Part,
        UPOS::PRON => PartOfSpeech::Pron,
        UPOS::PROPN => PartOfSpeech::Propn,
        UPOS::PUNCT => PartOfSpeech::Punct,
        UPOS::SCONJ => PartOfSpeech::Sconj,
        UPOS::SYM => PartOfSpeech::Sym,
        UPOS::VERB => PartOfSpeech::Verb,
        UPOS::X => PartOfSpeech::X,
    }
}
