/// Fatal errors raised while converting a document
///
/// Malformed Markdown never produces an error: every construct degrades to a
/// literal rendering. Only the cases below abort a parse.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("input is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("nesting depth exceeded the limit of {limit}")]
    RecursionLimitExceeded { limit: usize },

    #[error("failed to parse options: {0}")]
    Config(#[from] toml::de::Error),

    #[error("unknown block type: {0}")]
    UnknownBlockType(String),
}

pub type Result<T> = std::result::Result<T, Error>;
