use std::result::Result as StdResult;

use thiserror::Error;

use crate::{NodeId, WidgetId};

/// Result type for frond operations.
pub type Result<T> = StdResult<T, Error>;

/// Parse error marker type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
#[error("{message}")]
pub struct ParseError {
    /// Parse error message, optionally including location.
    message: String,
}

impl ParseError {
    /// Construct a parse error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Construct a parse error with optional offset information.
    pub fn with_offset(message: impl Into<String>, offset: Option<usize>) -> Self {
        let message = message.into();
        let message = match offset {
            Some(offset) => format!("{message} (offset {offset})"),
            None => message,
        };
        Self { message }
    }
}

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// A node id does not refer to a live element.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// A widget id does not refer to a connected widget.
    #[error("widget not found: {0:?}")]
    WidgetNotFound(WidgetId),

    /// A widget was borrowed while already in use further up the call stack.
    #[error("widget {0:?} is already borrowed")]
    ReentrantWidgetBorrow(WidgetId),

    /// A required child element is absent from a widget's markup.
    #[error("{widget}: missing required element {selector}")]
    MissingElement {
        /// Widget that failed to attach.
        widget: String,
        /// Selector that matched nothing.
        selector: String,
    },

    /// Widget downcast failed.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("parse error: {0}")]
    /// Parsing failure.
    Parse(#[source] ParseError),

    /// Persistent storage failure.
    #[error("storage: {0}")]
    Storage(String),

    /// Configuration load failure.
    #[error("config: {0}")]
    Config(String),

    /// URL construction failure.
    #[error("url: {0}")]
    Url(String),

    #[error("invalid: {0}")]
    /// Invalid input error.
    Invalid(String),

    #[error("internal: {0}")]
    /// Internal error.
    Internal(String),
}

impl Error {
    /// Shorthand for a missing required element.
    pub fn missing(widget: impl Into<String>, selector: impl Into<String>) -> Self {
        Self::MissingElement {
            widget: widget.into(),
            selector: selector.into(),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Self::Url(e.to_string())
    }
}
