use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::position::ShaderFileRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShaderDiagnosticSeverity {
    Error,
    Warning,
    Information,
    Hint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderDiagnostic {
    pub severity: ShaderDiagnosticSeverity,
    pub error: String,
    pub range: ShaderFileRange,
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("unknown document {0}")]
    UnknownDocument(Url),
    #[error("failed to read {path}: {source}")]
    IoErr {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid path {0}")]
    InvalidPath(String),
}

impl ShaderError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ShaderError::IoErr {
            path: path.into(),
            source,
        }
    }
}
