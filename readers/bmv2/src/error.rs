// Copyright 2022 Oxide Computer Company

use p4info::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("malformed document: {0}")]
    MalformedDocument(#[from] serde_json::Error),

    #[error("{context}: `{key}` {problem}")]
    MissingOrInvalidField {
        context: String,
        key: String,
        problem: Problem,
    },

    #[error(
        "{context}: name `{prefix}.{suffix}` does not fit in {capacity} bytes"
    )]
    NameCompositionOverflow {
        context: String,
        prefix: String,
        suffix: String,
        capacity: usize,
    },

    /// The store given to [`crate::read_into`] refused the committed model.
    #[error("store rejected entry: {0}")]
    Store(#[from] StoreError),
}

/// What is wrong with a member of the document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    #[error("is missing")]
    Missing,

    #[error("is not {0}")]
    Expected(&'static str),

    #[error("refers to unknown {kind} `{name}`")]
    Unresolved { kind: &'static str, name: String },

    #[error("has unsupported match type `{0}`")]
    UnsupportedMatchType(String),

    #[error("has {0} entries, more than identifiers can address")]
    TooMany(usize),
}

/// Coarse status code for a reader failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    ConfigReaderError,
    BufferError,
    StoreError,
}

impl ReaderError {
    pub(crate) fn invalid(
        context: impl Into<String>,
        key: impl Into<String>,
        problem: Problem,
    ) -> Self {
        Self::MissingOrInvalidField {
            context: context.into(),
            key: key.into(),
            problem,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Self::MalformedDocument(_) | Self::MissingOrInvalidField { .. } => {
                Status::ConfigReaderError
            }
            Self::NameCompositionOverflow { .. } => Status::BufferError,
            Self::Store(_) => Status::StoreError,
        }
    }

    /// The problem behind a `MissingOrInvalidField` error.
    pub fn problem(&self) -> Option<&Problem> {
        match self {
            Self::MissingOrInvalidField { problem, .. } => Some(problem),
            _ => None,
        }
    }
}
