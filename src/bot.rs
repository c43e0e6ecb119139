//! Telegram front end: send text or a document, pick a count, answer the quiz.

use std::sync::Arc;

use log::{debug, info};
use teloxide::{
    dispatching::{dialogue::InMemStorage, UpdateHandler},
    net::Download,
    prelude::*,
    types::{ChatAction, KeyboardButton, KeyboardMarkup, KeyboardRemove, ParseMode},
    utils::html,
};

use crate::config::Config;
use crate::extract::{extract_upload_lossy, UploadKind};
use crate::quiz::{self, SharedGenerator};
use crate::render;

type QuizDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerError = Box<dyn std::error::Error + Send + Sync>;
type HandlerResult = Result<(), HandlerError>;

#[derive(Clone, Default)]
pub enum State {
    #[default]
    Start,
    ReceiveSource,
    ReceiveAmountOfQuestions {
        text: String,
    },
    Quiz {
        quiz: quiz::Quiz,
        question_number: usize,
        score: usize,
    },
}

/// Largest document the bot will download, in bytes.
#[derive(Clone, Copy)]
struct UploadLimit(usize);

/// Runs the dispatcher until Ctrl-C. Reads `TELOXIDE_TOKEN` from the environment.
pub async fn run(generator: SharedGenerator, config: Arc<Config>) {
    info!("Starting quiz bot...");
    let bot = Bot::from_env();

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![
            InMemStorage::<State>::new(),
            generator,
            UploadLimit(config.max_upload_bytes)
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn schema() -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .enter_dialogue::<Message, InMemStorage<State>, State>()
        .branch(dptree::case![State::Start].endpoint(start))
        .branch(dptree::case![State::ReceiveSource].endpoint(receive_source))
        .branch(
            dptree::case![State::ReceiveAmountOfQuestions { text }]
                .endpoint(receive_amount_of_questions),
        )
        .branch(
            dptree::case![State::Quiz {
                quiz,
                question_number,
                score
            }]
            .endpoint(run_quiz),
        )
}

const GREETING_TEXT: &str = "Hi! I turn any text into a multiple-choice quiz. \
    Send me some text, or a .pdf or .txt document.";
const SEND_SOURCE_TEXT: &str = "Send me some text, or a .pdf or .txt document.";
const QUESTION_COUNTS: [&str; 4] = ["1", "3", "5", "10"];

async fn start(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT).await?;

    dialogue.update(State::ReceiveSource).await?;
    Ok(())
}

async fn receive_source(
    bot: Bot,
    dialogue: QuizDialogue,
    limit: UploadLimit,
    msg: Message,
) -> HandlerResult {
    let text = if let Some(document) = msg.document() {
        let file_name = document.file_name.clone().unwrap_or_default();
        if UploadKind::from_file_name(&file_name).is_none() {
            bot.send_message(msg.chat.id, "I can only read .pdf and .txt documents.")
                .await?;
            return Ok(());
        }
        if document.file.size as usize > limit.0 {
            bot.send_message(msg.chat.id, "This document is too large for me.")
                .await?;
            return Ok(());
        }

        // Extraction can take a while; the typing indicator is a nicety only
        let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;

        let file = bot.get_file(&document.file.id).await?;
        let mut data = Vec::new();
        bot.download_file(&file.path, &mut data).await?;
        debug!("Downloaded {} ({} bytes)", file_name, data.len());

        tokio::task::spawn_blocking(move || extract_upload_lossy(&file_name, &data)).await?
    } else if let Some(text) = msg.text() {
        text.to_string()
    } else {
        bot.send_message(msg.chat.id, SEND_SOURCE_TEXT).await?;
        return Ok(());
    };

    if text.trim().is_empty() {
        bot.send_message(
            msg.chat.id,
            "I couldn't read any text from that. Please try something else.",
        )
        .await?;
        return Ok(());
    }

    let keyboard = KeyboardMarkup::new(
        QUESTION_COUNTS
            .iter()
            .map(|count| vec![KeyboardButton::new(*count)])
            .collect::<Vec<_>>(),
    );
    bot.send_message(msg.chat.id, "How many questions?")
        .reply_markup(keyboard)
        .await?;

    dialogue
        .update(State::ReceiveAmountOfQuestions { text })
        .await?;
    Ok(())
}

async fn receive_amount_of_questions(
    generator: SharedGenerator,
    bot: Bot,
    dialogue: QuizDialogue,
    text: String,
    msg: Message,
) -> HandlerResult {
    let amount = match msg.text().map(|t| t.trim().parse::<usize>()) {
        Some(Ok(amount)) => amount,
        _ => {
            bot.send_message(msg.chat.id, "Please enter a number").await?;
            return Ok(());
        }
    };
    if amount == 0 {
        bot.send_message(msg.chat.id, "The number of questions can't be 0")
            .await?;
        return Ok(());
    }

    let questions = tokio::task::spawn_blocking(move || {
        generator.generate(&text, amount, &mut rand::thread_rng())
    })
    .await??;
    info!(
        "Generated {} of {} requested questions for chat {}",
        questions.len(),
        amount,
        msg.chat.id.0
    );

    if questions.is_empty() {
        bot.send_message(
            msg.chat.id,
            "I couldn't make any questions from that text. Try a longer text with complete sentences.",
        )
        .reply_markup(KeyboardRemove::new())
        .await?;
        dialogue.update(State::ReceiveSource).await?;
        return Ok(());
    }

    bot.send_message(
        msg.chat.id,
        format!("Great! I've got {} questions. Let's start!", questions.len()),
    )
    .reply_markup(KeyboardMarkup::new(vec![vec![KeyboardButton::new("Go!")]]))
    .await?;

    dialogue
        .update(State::Quiz {
            quiz: quiz::Quiz::new(questions),
            question_number: 0,
            score: 0,
        })
        .await?;
    Ok(())
}

async fn run_quiz(
    bot: Bot,
    dialogue: QuizDialogue,
    (quiz, question_number, score): (quiz::Quiz, usize, usize),
    msg: Message,
) -> HandlerResult {
    let mut current_score = score;

    // Judge the answer to the question sent last time
    if let Some(question) = question_number
        .checked_sub(1)
        .and_then(|i| quiz.questions.get(i))
    {
        let answer = msg.text().unwrap_or_default();
        if question.is_correct(answer) {
            bot.send_message(msg.chat.id, "Correct!").await?;
            current_score += 1;
        } else {
            let correct = question.correct_choice().unwrap_or_default();
            bot.send_message(
                msg.chat.id,
                format!(
                    "Wrong! The correct answer is <b>{})</b> {}",
                    question.correct_label,
                    html::escape(correct)
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;
        }
    }

    let Some(question) = quiz.questions.get(question_number) else {
        let quiz_score = format!(
            "The quiz is over! You answered {} of {} questions correctly.\n\n{}",
            current_score,
            quiz.questions.len(),
            SEND_SOURCE_TEXT
        );
        bot.send_message(msg.chat.id, quiz_score)
            .reply_markup(KeyboardRemove::new())
            .await?;

        dialogue.update(State::ReceiveSource).await?;
        return Ok(());
    };

    let labels = question
        .labelled_choices()
        .map(|(label, _)| KeyboardButton::new(label.to_string()))
        .collect::<Vec<_>>();

    bot.send_message(
        msg.chat.id,
        render::question_message(question_number + 1, quiz.questions.len(), question),
    )
    .parse_mode(ParseMode::Html)
    .reply_markup(KeyboardMarkup::new(vec![labels]))
    .await?;

    dialogue
        .update(State::Quiz {
            quiz,
            question_number: question_number + 1,
            score: current_score,
        })
        .await?;
    Ok(())
}
