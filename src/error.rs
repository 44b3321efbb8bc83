use std::path::PathBuf;

use thiserror::Error;

use crate::parse::Category;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while reading enrichment tables or testing GO terms
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed line: {0}")]
    MalformedLine(String),

    #[error("unknown category `{0}` (expected DAS or DGE)")]
    UnknownCategory(String),

    #[error("attempt to add {category} data twice for {go_id}")]
    DuplicateCategory { category: Category, go_id: String },

    #[error("all paired differences are zero")]
    DegenerateTest,

    #[error("paired difference is not finite ({0})")]
    NonFiniteDifference(f64),

    #[error("paired samples differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },

    #[error("no paired observations")]
    EmptySample,

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("line {line}: {source}")]
    AtLine { line: usize, source: Box<Error> },

    #[error("{}: {source}", .path.display())]
    InFile { path: PathBuf, source: Box<Error> },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the innermost error, stripping file and line context
    pub fn root(&self) -> &Error {
        match self {
            Error::AtLine { source, .. } | Error::InFile { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn in_file(path: impl Into<PathBuf>, source: Error) -> Self {
        Error::InFile {
            path: path.into(),
            source: Box::new(source),
        }
    }
}
