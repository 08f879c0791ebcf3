use std::io;

#[derive(thiserror::Error, Debug)]
pub enum SniffError {
    #[error("config error: {0}")]
    Config(String),
    #[error("db error: {0}")]
    Db(String),
    #[error("document error: {0}")]
    Document(String),
    #[error("json error: {0}")]
    Json(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<rusqlite::Error> for SniffError {
    fn from(err: rusqlite::Error) -> Self {
        SniffError::Db(err.to_string())
    }
}

impl From<serde_json::Error> for SniffError {
    fn from(err: serde_json::Error) -> Self {
        SniffError::Json(err.to_string())
    }
}
