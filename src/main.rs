use std::sync::Arc;

use dotenv::dotenv;
use log::{info, warn};
use mcq_generator::{
    annotate::{Annotator, Lexicon, RuleAnnotator},
    bot,
    config::Config,
    quiz::{McqGenerator, SharedGenerator},
    web,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let dotenv_loaded = dotenv().is_ok();
    pretty_env_logger::init();
    if !dotenv_loaded {
        info!("No .env file found, using the process environment");
    }

    let config = Arc::new(Config::from_env()?);
    info!(
        "Loaded configuration: {}:{}, {} questions by default",
        config.host, config.port, config.default_questions
    );

    // The annotator is loaded once and shared by every request
    let lexicon = match &config.lexicon_path {
        Some(path) => Some(Lexicon::from_path(path)?),
        None => {
            info!("No LEXICON_PATH set, tagging with built-in rules only");
            None
        }
    };
    let annotator: Arc<dyn Annotator> = Arc::new(RuleAnnotator::new(lexicon));
    let generator: SharedGenerator = Arc::new(McqGenerator::new(annotator));

    if config.telegram_enabled {
        // Both stop on Ctrl-C
        let (served, ()) = tokio::join!(
            web::serve(config.clone(), generator.clone()),
            bot::run(generator, config)
        );
        served?;
    } else {
        warn!("TELOXIDE_TOKEN is not set, the Telegram bot is disabled");
        web::serve(config, generator).await?;
    }
    Ok(())
}
