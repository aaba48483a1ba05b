use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Pattern error: {0}")]
    Pattern(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Handler error: {0}")]
    Handler(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
