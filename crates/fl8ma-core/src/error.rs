use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("config error: {0}")]
    Config(String),

    #[error("community error: {0}")]
    Community(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
