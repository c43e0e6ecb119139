use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::annotate::{
    AnnotatedText, Annotator, Entity, EntityLabel, Lexicon, PartOfSpeech, Sentence, Token,
};
use crate::error::AnnotateError;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:[.,:]\d+)*\b|(?:\p{Lu}\.){2,}|\w+(?:[-'’]\w+)*|[^\w\s]")
        .expect("valid regex")
});

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "each", "every", "some", "any", "no",
    "all", "both", "either", "neither", "another", "such", "much", "many", "few", "several",
];
const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "my", "your",
    "his", "its", "our", "their", "mine", "yours", "hers", "ours", "theirs", "myself",
    "yourself", "himself", "herself", "itself", "ourselves", "themselves", "who", "whom",
    "whose", "which", "what", "something", "anything", "nothing", "everything", "someone",
    "anyone", "everyone", "nobody",
];
const ADPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "to", "from", "up", "down",
    "over", "under", "around", "among", "across", "behind", "beyond", "near", "since", "until",
    "upon", "within", "without", "via", "per", "throughout", "towards", "toward", "onto",
    "despite", "except", "along", "beside", "besides", "inside", "outside",
];
const COORDINATORS: &[&str] = &["and", "or", "but", "nor", "yet", "&"];
const SUBORDINATORS: &[&str] = &[
    "because", "although", "though", "while", "if", "unless", "whereas", "whether", "than",
    "once", "when", "where", "whenever", "wherever",
];
const AUXILIARIES: &[&str] = &[
    "is", "am", "are", "was", "were", "be", "been", "being", "has", "have", "had", "do",
    "does", "did", "will", "would", "shall", "should", "can", "could", "may", "might", "must",
];
const PARTICLES: &[&str] = &["not", "n't", "'s", "’s"];
const ADVERBS: &[&str] = &[
    "very", "also", "too", "often", "never", "always", "just", "only", "then", "now", "here",
    "there", "however", "still", "already", "soon", "again", "almost", "even", "ever", "once",
    "quite", "rather", "so", "thus", "therefore", "well",
];
const INTERJECTIONS: &[&str] = &["oh", "wow", "hello", "hey", "yes", "alas"];

// Irregular verb forms the suffix rules would miss.
const COMMON_VERBS: &[&str] = &[
    "make", "made", "take", "took", "taken", "give", "gave", "given", "go", "went", "gone",
    "see", "saw", "seen", "know", "knew", "known", "get", "got", "say", "said", "come", "came",
    "find", "found", "think", "thought", "become", "became", "begin", "began", "begun", "grow",
    "grew", "grown", "write", "wrote", "written", "build", "built", "lead", "led", "hold",
    "held", "bring", "brought", "leave", "left", "win", "won", "fall", "fell", "rise", "rose",
    "keep", "kept", "meet", "met", "run", "ran", "teach", "taught", "tell", "told",
];
const COMMON_ADJECTIVES: &[&str] = &[
    "new", "old", "good", "bad", "great", "small", "large", "big", "long", "short", "high",
    "low", "little", "young", "important", "early", "late", "major", "first", "last", "other",
    "same", "different", "own", "real", "full", "free", "true", "main", "whole", "quick",
    "slow", "lazy", "brown", "red", "green", "blue", "white", "black",
];

const MONTHS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december", "monday", "tuesday", "wednesday", "thursday", "friday",
    "saturday", "sunday",
];
const ORGANIZATION_WORDS: &[&str] = &[
    "inc", "corp", "corporation", "company", "co", "ltd", "llc", "university", "institute",
    "association", "bank", "party", "church", "museum", "council", "agency", "foundation",
    "college", "school", "society", "group", "committee", "ministry", "department", "academy",
    "army", "navy",
];
// Head words that make a proper-noun run a place, e.g. "White House".
const PLACE_WORDS: &[&str] = &[
    "city", "river", "mountain", "mountains", "lake", "island", "islands", "ocean", "sea",
    "valley", "street", "avenue", "square", "park", "bridge", "county", "state", "states",
    "republic", "kingdom", "house", "palace", "tower", "hall", "desert", "bay", "coast",
];
const PLACE_PREFIXES: &[&str] = &[
    "new", "san", "santa", "los", "las", "saint", "fort", "port", "mount", "north", "south",
    "east", "west",
];
const LOCATIVE_PREPOSITIONS: &[&str] = &[
    "in", "at", "from", "to", "near", "across", "into", "throughout", "towards", "toward",
];
// Lowercase words allowed inside a proper-noun run, e.g. "University of Oxford".
const ENTITY_CONNECTORS: &[&str] = &["of", "the", "de", "van", "von", "der", "la", "&"];
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "vs", "etc", "fig", "no", "vol",
    "approx", "dept", "est", "gen", "gov", "inc", "ltd", "co", "corp",
];

/// Rule-based English annotator: regex tokenisation, punctuation-driven
/// sentence splitting, closed-class and suffix tagging, and proper-noun runs
/// as entities. An optional [`Lexicon`] takes priority over the suffix rules.
#[derive(Debug, Clone, Default)]
pub struct RuleAnnotator {
    lexicon: Option<Lexicon>,
}

impl RuleAnnotator {
    pub fn new(lexicon: Option<Lexicon>) -> Self {
        Self { lexicon }
    }
}

impl Annotator for RuleAnnotator {
    fn annotate(&self, text: &str) -> Result<AnnotatedText, AnnotateError> {
        let raw = tokenize(text);
        let mut annotated = AnnotatedText::default();

        for range in split_sentences(text, &raw) {
            let words = &raw[range];
            let (Some(first), Some(last)) = (words.first(), words.last()) else {
                continue;
            };
            let tokens = self.tag(text, words);
            annotated.entities.extend(find_entities(text, &tokens));
            annotated.sentences.push(Sentence {
                text: text[first.start..last.end].to_string(),
                tokens,
            });
        }

        Ok(annotated)
    }
}

/// Token byte ranges over `text`. Possessive `'s` is split off its word.
fn tokenize(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    for m in TOKEN_RE.find_iter(text) {
        let word = m.as_str();
        let possessive = ["'s", "'S", "’s", "’S"]
            .iter()
            .find(|suffix| word.len() > suffix.len() && word.ends_with(*suffix));
        match possessive {
            Some(suffix) => {
                let split = m.end() - suffix.len();
                spans.push(m.start()..split);
                spans.push(split..m.end());
            }
            None => spans.push(m.range()),
        }
    }
    spans
}

/// Groups token indices into sentences.
fn split_sentences(text: &str, tokens: &[Range<usize>]) -> Vec<Range<usize>> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for i in 0..tokens.len() {
        let Some(next) = tokens.get(i + 1) else {
            break;
        };
        let gap = &text[tokens[i].end..next.start];

        let paragraph_break = gap.matches('\n').count() >= 2;
        let terminal = ends_sentence(text, tokens, i)
            && !gap.is_empty()
            && text[next.clone()]
                .chars()
                .next()
                .is_some_and(|c| c.is_uppercase() || c.is_ascii_digit() || is_opening_quote(c));

        if paragraph_break || terminal {
            sentences.push(start..i + 1);
            start = i + 1;
        }
    }
    if start < tokens.len() {
        sentences.push(start..tokens.len());
    }
    sentences
}

/// True when token `i` closes a sentence: a terminal mark, possibly followed
/// by closing quotes or brackets that belong to the same sentence.
fn ends_sentence(text: &str, tokens: &[Range<usize>], i: usize) -> bool {
    let mut j = i;
    while is_closing(&text[tokens[j].clone()]) {
        if j == 0 || tokens[j - 1].end != tokens[j].start {
            return false;
        }
        j -= 1;
    }

    match &text[tokens[j].clone()] {
        "!" | "?" => true,
        "." => {
            if j == 0 || tokens[j - 1].end != tokens[j].start {
                return true;
            }
            let previous = &text[tokens[j - 1].clone()];
            let is_initial = previous.chars().count() == 1
                && previous.chars().all(|c| c.is_alphabetic());
            !is_initial && !ABBREVIATIONS.contains(&previous.to_lowercase().as_str())
        }
        _ => false,
    }
}

fn is_closing(token: &str) -> bool {
    matches!(token, "\"" | "'" | ")" | "]" | "”" | "’" | "»")
}

fn is_opening_quote(c: char) -> bool {
    matches!(c, '"' | '\'' | '“' | '‘' | '(' | '«')
}

impl RuleAnnotator {
    fn tag(&self, text: &str, spans: &[Range<usize>]) -> Vec<Token> {
        let first_word = spans
            .iter()
            .position(|s| text[s.clone()].chars().any(|c| c.is_alphanumeric()));

        spans
            .iter()
            .enumerate()
            .map(|(i, span)| {
                let word = &text[span.clone()];
                let next = spans.get(i + 1).map(|s| &text[s.clone()]);
                let pos = self.tag_word(word, Some(i) == first_word, next);
                Token {
                    text: word.to_string(),
                    pos,
                    span: span.clone(),
                }
            })
            .collect()
    }

    fn tag_word(&self, word: &str, sentence_initial: bool, next: Option<&str>) -> PartOfSpeech {
        if !word.chars().any(|c| c.is_alphanumeric()) {
            return if word.chars().all(|c| c.is_ascii_punctuation() && !"$%+<=>#@^|~".contains(c))
                || "“”‘’«»…–—".contains(word)
            {
                PartOfSpeech::Punct
            } else {
                PartOfSpeech::Sym
            };
        }
        if word.chars().next().is_some_and(|c| c.is_ascii_digit())
            && word.chars().all(|c| c.is_ascii_digit() || ".,:".contains(c))
        {
            return PartOfSpeech::Num;
        }
        if is_dotted_acronym(word) {
            return PartOfSpeech::Propn;
        }

        let lower = word.to_lowercase();
        let capitalized = is_capitalized(word);

        // "May" in the middle of a sentence is the month, not the auxiliary
        if capitalized && !sentence_initial && MONTHS.contains(&lower.as_str()) {
            return PartOfSpeech::Propn;
        }
        if let Some(pos) = closed_class(&lower) {
            return pos;
        }
        if is_all_caps(word) {
            return PartOfSpeech::Propn;
        }
        if capitalized && !sentence_initial {
            return PartOfSpeech::Propn;
        }
        if capitalized
            && next.is_some_and(|n| is_capitalized(n) && closed_class(&n.to_lowercase()).is_none())
        {
            return PartOfSpeech::Propn;
        }
        if let Some(pos) = self.lexicon.as_ref().and_then(|l| l.lookup(&lower)) {
            return pos;
        }
        open_class(&lower)
    }
}

/// "U.S.", "D.C.": kept as one token, and its dots never end a sentence.
fn is_dotted_acronym(word: &str) -> bool {
    word.len() >= 4
        && word.ends_with('.')
        && word
            .split_terminator('.')
            .all(|part| part.chars().count() == 1 && part.chars().all(|c| c.is_uppercase()))
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_uppercase())
}

fn closed_class(lower: &str) -> Option<PartOfSpeech> {
    let lists: [(&[&str], PartOfSpeech); 9] = [
        (DETERMINERS, PartOfSpeech::Det),
        (PRONOUNS, PartOfSpeech::Pron),
        (AUXILIARIES, PartOfSpeech::Aux),
        (ADPOSITIONS, PartOfSpeech::Adp),
        (COORDINATORS, PartOfSpeech::Cconj),
        (SUBORDINATORS, PartOfSpeech::Sconj),
        (PARTICLES, PartOfSpeech::Part),
        (ADVERBS, PartOfSpeech::Adv),
        (INTERJECTIONS, PartOfSpeech::Intj),
    ];
    lists
        .iter()
        .find(|(words, _)| words.contains(&lower))
        .map(|(_, pos)| *pos)
}

fn open_class(lower: &str) -> PartOfSpeech {
    if COMMON_VERBS.contains(&lower) {
        return PartOfSpeech::Verb;
    }
    if COMMON_ADJECTIVES.contains(&lower) {
        return PartOfSpeech::Adj;
    }

    let len = lower.chars().count();
    if len > 4 && lower.ends_with("ly") {
        return PartOfSpeech::Adv;
    }
    if (len > 5 && lower.ends_with("ing"))
        || (len > 4 && lower.ends_with("ed"))
        || lower.ends_with("ize")
        || lower.ends_with("ify")
    {
        return PartOfSpeech::Verb;
    }
    if len > 5
        && ["ous", "ful", "ive", "able", "ible", "less", "ical"]
            .iter()
            .any(|suffix| lower.ends_with(suffix))
    {
        return PartOfSpeech::Adj;
    }
    PartOfSpeech::Noun
}

/// Proper-noun runs and numbers within one tagged sentence.
fn find_entities(text: &str, tokens: &[Token]) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i].pos {
            PartOfSpeech::Num => {
                let label = if is_year(&tokens[i].text) {
                    EntityLabel::Date
                } else {
                    EntityLabel::Quantity
                };
                entities.push(Entity {
                    text: tokens[i].text.clone(),
                    label,
                });
                i += 1;
            }
            PartOfSpeech::Propn => {
                let end = proper_run_end(tokens, i);
                let end = absorb_date(tokens, i, end);
                let label = entity_label(tokens, i, end);
                entities.push(Entity {
                    text: text[tokens[i].span.start..tokens[end].span.end].to_string(),
                    label,
                });
                i = end + 1;
            }
            _ => i += 1,
        }
    }
    entities
}

/// Index of the last token of the proper-noun run starting at `start`.
fn proper_run_end(tokens: &[Token], start: usize) -> usize {
    let mut end = start;
    let mut j = start + 1;
    while j < tokens.len() {
        if tokens[j].pos == PartOfSpeech::Propn {
            end = j;
            j += 1;
            continue;
        }
        let mut k = j;
        while k < tokens.len()
            && tokens[k].pos != PartOfSpeech::Propn
            && ENTITY_CONNECTORS.contains(&tokens[k].text.to_lowercase().as_str())
        {
            k += 1;
        }
        if k > j && k < tokens.len() && tokens[k].pos == PartOfSpeech::Propn {
            end = k;
            j = k + 1;
            continue;
        }
        break;
    }
    end
}

/// Extends a lone month name over a following day and/or year,
/// e.g. "March 14, 1879".
fn absorb_date(tokens: &[Token], start: usize, end: usize) -> usize {
    if start != end || !MONTHS.contains(&tokens[start].text.to_lowercase().as_str()) {
        return end;
    }
    let mut last = end;
    let mut j = end + 1;
    while j < tokens.len() {
        match (tokens[j].pos, tokens[j].text.as_str()) {
            (PartOfSpeech::Num, _) => {
                last = j;
                j += 1;
            }
            (PartOfSpeech::Punct, ",")
                if tokens.get(j + 1).is_some_and(|t| t.pos == PartOfSpeech::Num) =>
            {
                j += 1;
            }
            _ => break,
        }
    }
    last
}

fn entity_label(tokens: &[Token], start: usize, end: usize) -> EntityLabel {
    let run = &tokens[start..=end];
    let lowered: Vec<String> = run.iter().map(|t| t.text.to_lowercase()).collect();

    if lowered.iter().any(|w| MONTHS.contains(&w.as_str())) {
        return EntityLabel::Date;
    }
    if lowered
        .iter()
        .any(|w| ORGANIZATION_WORDS.contains(&w.trim_end_matches('.')))
    {
        return EntityLabel::Organization;
    }

    let previous = start
        .checked_sub(1)
        .map(|i| tokens[i].text.to_lowercase())
        .unwrap_or_default();
    let names_a_place = lowered
        .last()
        .is_some_and(|w| PLACE_WORDS.contains(&w.as_str()))
        || (run.len() > 1 && PLACE_PREFIXES.contains(&lowered[0].as_str()));
    if names_a_place || LOCATIVE_PREPOSITIONS.contains(&previous.as_str()) {
        return EntityLabel::Location;
    }

    if run.len() == 1 && (is_dotted_acronym(&run[0].text) || is_all_caps(&run[0].text)) {
        return EntityLabel::Organization;
    }

    // A person is a bare name acting as the subject: "Albert Einstein developed"
    let acts = tokens
        .get(end + 1)
        .is_some_and(|t| matches!(t.pos, PartOfSpeech::Verb | PartOfSpeech::Aux));
    if run.len() > 1
        && acts
        && !DETERMINERS.contains(&previous.as_str())
        && run
            .iter()
            .all(|t| t.pos == PartOfSpeech::Propn && !is_dotted_acronym(&t.text))
    {
        return EntityLabel::Person;
    }
    EntityLabel::Misc
}

fn is_all_caps(word: &str) -> bool {
    word.chars().count() > 1 && word.chars().all(|c| c.is_uppercase())
}

fn is_year(number: &str) -> bool {
    number.len() == 4
        && number
            .parse::<u32>()
            .is_ok_and(|year| (1000..=2100).contains(&year))
}
