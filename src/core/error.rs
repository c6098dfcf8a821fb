//! Error types for nrql-chart.

use std::{fmt, path::PathBuf};
use thiserror::Error;

/// The pipeline step an invocation is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadingConfig,
    Querying,
    Parsing,
    Downloading,
    Writing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::LoadingConfig => "configuration",
            Stage::Querying => "query",
            Stage::Parsing => "parsing",
            Stage::Downloading => "download",
            Stage::Writing => "write",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// The wrapper for the error kind, with an optional hint.
#[derive(Debug)]
pub struct ChartError {
    kind: ChartErrorKind,
    hint: Option<String>,
}

/// All types of errors that can occur while fetching a chart.
#[derive(Error, Debug)]
pub enum ChartErrorKind {
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration file {path} is malformed: {reason}")]
    ConfigMalformed { path: PathBuf, reason: String },

    #[error("Authentication rejected by provider (HTTP {status}): {message}")]
    AuthenticationError { status: u16, message: String },

    #[error("Query rejected by provider: {message}")]
    QueryError { message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Unexpected response shape: {reason}")]
    UnexpectedResponseShape { reason: String },

    #[error("Failed to download chart image from {url}: {reason}")]
    DownloadError { url: String, reason: String },

    #[error("Failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ChartErrorKind {
    /// The stage an error of this kind originates from
    pub fn stage(&self) -> Stage {
        match self {
            ChartErrorKind::ConfigNotFound { .. } | ChartErrorKind::ConfigMalformed { .. } => {
                Stage::LoadingConfig
            }
            ChartErrorKind::AuthenticationError { .. }
            | ChartErrorKind::QueryError { .. }
            | ChartErrorKind::NetworkError(_) => Stage::Querying,
            ChartErrorKind::UnexpectedResponseShape { .. } => Stage::Parsing,
            ChartErrorKind::DownloadError { .. } => Stage::Downloading,
            ChartErrorKind::WriteError { .. } => Stage::Writing,
        }
    }
}

impl ChartError {
    /// Attaches a hint to the error
    pub fn with_hint(mut self, hint: Option<impl Into<String>>) -> Self {
        if let Some(hint) = hint {
            self.hint = Some(hint.into());
        }
        self
    }

    pub fn kind(&self) -> &ChartErrorKind {
        &self.kind
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn stage(&self) -> Stage {
        self.kind.stage()
    }
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage failed: {}", self.stage(), self.kind)?;
        if let Some(hint_text) = &self.hint {
            write!(f, " ({hint_text})")?;
        }

        Ok(())
    }
}

impl std::error::Error for ChartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Convert Error into ChartErrorKind
impl<E> From<E> for ChartError
where
    ChartErrorKind: From<E>,
{
    fn from(error: E) -> Self {
        ChartError {
            kind: ChartErrorKind::from(error),
            hint: None,
        }
    }
}

/// A convenient result type for nrql-chart
pub type Result<T> = std::result::Result<T, ChartError>;
