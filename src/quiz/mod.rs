pub mod generator;

pub use generator::{McqGenerator, SharedGenerator, BLANK};

/// A generated quiz, as kept by the bot while the user answers it.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Quiz {
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }
}

/// One multiple-choice question: a sentence with a blanked span, up to four
/// choices and the letter of the correct one.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub stem: String,
    pub choices: Vec<String>,
    pub correct_label: char,
}

impl Question {
    pub fn new(stem: String, choices: Vec<String>, correct_label: char) -> Self {
        Self {
            stem,
            choices,
            correct_label,
        }
    }

    pub fn correct_choice(&self) -> Option<&str> {
        label_index(self.correct_label)
            .and_then(|i| self.choices.get(i))
            .map(String::as_str)
    }

    pub fn labelled_choices(&self) -> impl Iterator<Item = (char, &str)> {
        self.choices
            .iter()
            .enumerate()
            .map(|(i, choice)| (choice_label(i), choice.as_str()))
    }

    /// Accepts either the text of the correct choice or its letter
    /// ("b", "B)", "(B)"), case-insensitively. The text is checked first, so a
    /// one-character choice such as "5" is matched as text.
    pub fn is_correct(&self, answer: &str) -> bool {
        let answer = answer.trim();
        if self
            .correct_choice()
            .is_some_and(|choice| choice.eq_ignore_ascii_case(answer))
        {
            return true;
        }

        let letter = answer.trim_start_matches('(').trim_end_matches([')', '.']);
        let mut chars = letter.chars();
        matches!(
            (chars.next(), chars.next()),
            (Some(c), None) if c.to_ascii_uppercase() == self.correct_label
        )
    }
}

/// 0 -> 'A', 1 -> 'B', ...
pub fn choice_label(index: usize) -> char {
    (b'A' + index as u8) as char
}

fn label_index(label: char) -> Option<usize> {
    label
        .is_ascii_uppercase()
        .then(|| (label as u8 - b'A') as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question::new(
            "______ developed the theory of relativity in Germany.".to_string(),
            vec![
                "Germany".to_string(),
                "Albert Einstein".to_string(),
                "theory".to_string(),
            ],
            'B',
        )
    }

    #[test]
    fn labels_follow_positions() {
        assert_eq!(choice_label(0), 'A');
        assert_eq!(choice_label(3), 'D');
        let labels: Vec<char> = question().labelled_choices().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!['A', 'B', 'C']);
    }

    #[test]
    fn correct_choice_is_found_by_label() {
        assert_eq!(question().correct_choice(), Some("Albert Einstein"));

        let mut broken = question();
        broken.correct_label = 'D';
        assert_eq!(broken.correct_choice(), None);
    }

    #[test]
    fn answers_by_letter_or_text() {
        let q = question();
        assert!(q.is_correct("B"));
        assert!(q.is_correct(" b "));
        assert!(q.is_correct("(B)"));
        assert!(q.is_correct("B)"));
        assert!(q.is_correct("albert einstein"));
        assert!(!q.is_correct("A"));
        assert!(!q.is_correct("Germany"));
        assert!(!q.is_correct(""));
    }

    #[test]
    fn one_character_choices_match_as_text() {
        let q = Question::new(
            "The team scored ______ goals.".to_string(),
            vec!["12".to_string(), "5".to_string(), "3".to_string()],
            'B',
        );
        assert!(q.is_correct("5"));
        assert!(q.is_correct("B"));
        assert!(!q.is_correct("3"));
        assert!(!q.is_correct("C"));
    }
}
