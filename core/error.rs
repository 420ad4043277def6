use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("TOML Parsing Error: {0}")]
    TomlParse(String),

    #[error("File Read Error: Path '{path}', Error: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Write Error: Path '{path}', Error: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory Creation Error: Path '{path}', Error: {source}")]
    DirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("WalkDir Error: {0}")]
    WalkDir(String),

    #[error("Duplicate {kind} {rank}: declared by both '{first}' and '{second}'")]
    DuplicateRank {
        kind: RankKind,
        rank: u32,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Invalid rank '{value}' in '{path}': ranks must be positive integers")]
    InvalidRank { path: PathBuf, value: String },
}

/// Which ordering namespace a rank collision happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankKind {
    Rank,
    Expose,
}

impl std::fmt::Display for RankKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankKind::Rank => f.write_str("RANK"),
            RankKind::Expose => f.write_str("EXPOSE"),
        }
    }
}

impl From<walkdir::Error> for AppError {
    fn from(err: walkdir::Error) -> Self {
        AppError::WalkDir(err.to_string())
    }
}
