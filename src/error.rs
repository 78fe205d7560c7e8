use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to download corpus from {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("corpus is empty")]
    EmptyCorpus,

    #[error("corpus of {len} characters is too short for windows of length {window_len}")]
    CorpusTooShort { len: usize, window_len: usize },

    #[error("character {0:?} is not part of the vocabulary")]
    UnknownCharacter(char),

    #[error("index {index} is outside of a vocabulary of size {size}")]
    UnknownIndex { index: u32, size: usize },

    #[error("window length and step must be positive (length {len}, step {step})")]
    InvalidWindow { len: usize, step: usize },

    #[error("temperature must be positive and finite, got {0}")]
    InvalidTemperature(f64),

    #[error("invalid probability distribution: {0}")]
    InvalidDistribution(String),

    #[error("seed text is empty")]
    EmptySeed,

    #[error("tensor data error: {0}")]
    Tensor(String),

    #[error("record error: {0}")]
    Record(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::UnknownCharacter('§');
        assert!(err.to_string().contains("'§'"));

        let err = Error::CorpusTooShort {
            len: 3,
            window_len: 40,
        };
        assert!(err.to_string().contains("too short"));

        let err = Error::InvalidTemperature(-1.0);
        assert!(err.to_string().contains("-1"));

        let err = Error::io(
            "data/corpus.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("data/corpus.txt"));
    }
}
