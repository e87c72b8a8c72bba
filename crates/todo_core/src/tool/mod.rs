//! Tool-invocation surface for agent callers.
//!
//! # Responsibility
//! - Describe the available tools (`catalog`).
//! - Turn an untyped `{name, arguments}` call into a typed request before it
//!   reaches the store (`request`).
//! - Execute typed requests and wrap results in the text/data envelope
//!   (`dispatch`).
//!
//! # Invariants
//! - Argument maps never reach the store; only typed requests do.
//! - Failures are returned as error envelopes, never panics.

use crate::service::todo_store::{ErrorKind, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod catalog;
pub mod dispatch;
pub mod request;

/// Tool-layer failure.
#[derive(Debug)]
pub enum ToolError {
    UnknownTool(String),
    InvalidArguments { tool: String, message: String },
    Store(StoreError),
    Encode(serde_json::Error),
}

impl ToolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownTool(_) | Self::InvalidArguments { .. } => ErrorKind::Validation,
            Self::Store(err) => err.kind(),
            Self::Encode(_) => ErrorKind::Storage,
        }
    }
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTool(name) => write!(f, "unknown tool: {name}"),
            Self::InvalidArguments { tool, message } => {
                write!(f, "invalid arguments for {tool}: {message}")
            }
            Self::Store(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode tool result: {err}"),
        }
    }
}

impl Error for ToolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::UnknownTool(_) | Self::InvalidArguments { .. } => None,
        }
    }
}

impl From<StoreError> for ToolError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}
