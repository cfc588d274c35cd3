/// Core error type for the originality check bot.
///
/// Adapter crates map their specific failures into this type so handlers can
/// decide consistently what is user-facing and what is fatal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("document extraction failed: {0}")]
    Extraction(String),

    #[error("plagiarism service error: {0}")]
    Vendor(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
