use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid content in {}: {message}", path.display())]
    InvalidContent { path: PathBuf, message: String },

    #[error("Duplicate content record: slug '{slug}' in language '{language}'")]
    DuplicateRecord { slug: String, language: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidContent {
            path: PathBuf::from("content/en/hello.md"),
            message: "missing title".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("content/en/hello.md"));
        assert!(display.contains("missing title"));

        let err = Error::DuplicateRecord {
            slug: "hello".to_string(),
            language: "en".to_string(),
        };
        assert!(err.to_string().contains("'hello'"));
        assert!(err.to_string().contains("'en'"));
    }
}
