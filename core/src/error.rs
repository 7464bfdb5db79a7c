//! Error types for libsteno-core.
//!
//! The translation engine itself is total over valid input and never returns
//! errors; these types cover stroke notation, dictionary stores and
//! configuration files.

use thiserror::Error;

/// Why a piece of stroke notation could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrokeParseError {
    #[error("empty stroke")]
    Empty,

    #[error("unrecognized key {0:?}")]
    UnrecognizedKey(char),

    #[error("key {0:?} is duplicated or out of steno order")]
    OutOfOrder(char),

    #[error("trailing hyphen")]
    TrailingHyphen,
}

/// Errors raised by dictionary stores, configuration and tooling helpers.
#[derive(Debug, Error)]
pub enum StenoError {
    #[error("invalid stroke notation {input:?}: {source}")]
    Stroke {
        input: String,
        #[source]
        source: StrokeParseError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("fst error: {0}")]
    Fst(#[from] fst::Error),

    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("database error: {0}")]
    Database(#[from] redb::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("compiled dictionary is corrupt: {0}")]
    Corrupt(String),

    #[error("translator worker panicked")]
    WorkerPanicked,
}

impl StenoError {
    pub(crate) fn stroke(input: &str, source: StrokeParseError) -> Self {
        StenoError::Stroke {
            input: input.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StenoError>;
