//! Errors raised while loading or interpreting a palette.

use std::fmt;
use std::path::PathBuf;

use crate::token::{Mode, TokenKey};

/// Keys of one mode that are missing or not recognized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyReport {
    pub mode: Mode,
    pub keys: Vec<String>,
}

impl fmt::Display for KeyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.mode, self.keys.join(", "))
    }
}

fn join_reports(reports: &[KeyReport]) -> String {
    reports.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Malformed or unreadable authoritative data.
#[derive(Debug, thiserror::Error)]
pub enum PaletteError {
    #[error("palette is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("palette is missing keys ({})", join_reports(.0))]
    MissingKeys(Vec<KeyReport>),

    #[error("palette has unknown keys ({})", join_reports(.0))]
    UnknownKeys(Vec<KeyReport>),

    #[error("{mode}.{key}: {reason}")]
    InvalidToken {
        mode: Mode,
        key: TokenKey,
        reason: String,
    },

    #[error("{mode}.{key}: anchor must be an OKLCH color, found {found:?}")]
    InvalidAnchor {
        mode: Mode,
        key: TokenKey,
        found: String,
    },
}
