use thiserror::Error;

/// Failure reported by a text annotator. The generator never produces one
/// itself, it only passes these through to the caller.
#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("Annotator failed: {0}")]
    Failed(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("PDF parsing error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Text file is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lexicon file {0} contains no tagged tokens")]
    Empty(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}
