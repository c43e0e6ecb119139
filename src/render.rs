//! HTML for the web pages and the bot's messages.

use std::fmt::Write;

use teloxide::utils::html;

use crate::quiz::Question;

/// Options offered by the question-count selector.
pub const QUESTION_COUNTS: [usize; 6] = [1, 3, 5, 10, 15, 20];

const BOOTSTRAP_CSS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";

/// Attribute-safe escaping for the web pages. Telegram messages go through
/// `teloxide::utils::html::escape` instead.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<link rel=\"stylesheet\" href=\"{BOOTSTRAP_CSS}\">\n\
         </head>\n<body>\n<div class=\"container py-4\">\n{body}</div>\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

/// The upload / text form.
pub fn index_page(default_questions: usize) -> String {
    let mut options = String::new();
    for count in QUESTION_COUNTS {
        let selected = if count == default_questions { " selected" } else { "" };
        // Writing to a String can't fail
        let _ = writeln!(options, "<option value=\"{count}\"{selected}>{count}</option>");
    }
    if !QUESTION_COUNTS.contains(&default_questions) {
        let _ = writeln!(
            options,
            "<option value=\"{default_questions}\" selected>{default_questions}</option>"
        );
    }

    let body = format!(
        "<h1 class=\"mb-4\">Multiple-choice question generator</h1>\n\
         <form method=\"post\" action=\"/\" enctype=\"multipart/form-data\">\n\
         <div class=\"mb-3\">\n<label class=\"form-label\" for=\"files\">Upload PDF or TXT files</label>\n\
         <input class=\"form-control\" type=\"file\" id=\"files\" name=\"files[]\" accept=\".pdf,.txt\" multiple>\n</div>\n\
         <div class=\"mb-3\">\n<label class=\"form-label\" for=\"text\">Or paste text</label>\n\
         <textarea class=\"form-control\" id=\"text\" name=\"text\" rows=\"10\"></textarea>\n</div>\n\
         <div class=\"mb-3\">\n<label class=\"form-label\" for=\"num_questions\">Number of questions</label>\n\
         <select class=\"form-select\" id=\"num_questions\" name=\"num_questions\">\n{options}</select>\n</div>\n\
         <button class=\"btn btn-primary\" type=\"submit\">Generate</button>\n</form>\n"
    );
    page("MCQ generator", &body)
}

/// Index-numbered questions with lettered choices. The correct letter is kept
/// in `data-answer` and in a collapsed reveal.
pub fn mcqs_page(questions: &[Question]) -> String {
    let mut body = String::from("<h1 class=\"mb-4\">Generated questions</h1>\n");

    if questions.is_empty() {
        body.push_str(
            "<div class=\"alert alert-warning\">No questions could be generated from this \
             text. Try a longer text with complete sentences.</div>\n",
        );
    }

    for (i, question) in questions.iter().enumerate() {
        let _ = write!(
            body,
            "<div class=\"card mb-3 question\" data-answer=\"{answer}\">\n<div class=\"card-body\">\n\
             <h5 class=\"card-title\">Question {number}</h5>\n<p class=\"card-text\">{stem}</p>\n\
             <ul class=\"list-unstyled\">\n",
            answer = question.correct_label,
            number = i + 1,
            stem = escape_html(&question.stem),
        );
        for (label, choice) in question.labelled_choices() {
            let _ = writeln!(body, "<li>({label}) {}</li>", escape_html(choice));
        }
        let _ = write!(
            body,
            "</ul>\n<details><summary>Show answer</summary>Correct answer: {}</details>\n\
             </div>\n</div>\n",
            question.correct_label
        );
    }

    body.push_str("<a class=\"btn btn-secondary\" href=\"/\">Generate more</a>\n");
    page("Generated questions", &body)
}

pub fn error_page(status: u16, message: &str) -> String {
    let body = format!(
        "<h1 class=\"mb-4\">Error {status}</h1>\n<div class=\"alert alert-danger\">{}</div>\n\
         <a class=\"btn btn-secondary\" href=\"/\">Back</a>\n",
        escape_html(message)
    );
    page("Error", &body)
}

/// Telegram message (HTML parse mode) for the `number`-th question, 1-based.
pub fn question_message(number: usize, total: usize, question: &Question) -> String {
    let mut text = format!(
        "<b>Question {number}/{total}</b>\n\n{}\n",
        html::escape(&question.stem)
    );
    for (label, choice) in question.labelled_choices() {
        let _ = write!(text, "\n<b>{label})</b> {}", html::escape(choice));
    }
    text
}
