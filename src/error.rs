//! Error types for the scene engine
//!
//! Every failure carries a stable machine-readable code (see [`EngineError::code`])
//! so callers can branch on it without parsing messages.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while editing a scene
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Missing or malformed command arguments, tagged with the tool's code
    #[error("{message}")]
    InvalidArguments { code: &'static str, message: String },

    /// A command addressed a label that does not exist
    #[error("object '{label}' not found")]
    NotFound { label: String },

    /// A command tried to create an object under a taken label
    #[error("label '{label}' already exists")]
    DuplicateLabel { label: String },

    /// Scene creation was requested on a populated scene without reset intent
    #[error("scene already contains {count} object(s); edit it or pass reset=true")]
    EditOnly { count: usize },

    #[error("nothing to undo")]
    UndoEmpty,

    #[error("nothing to redo")]
    RedoEmpty,

    /// The references given to scale-to-touch determine no boundary
    #[error("cannot resolve a touch boundary for '{target}': {reason}")]
    UnderSpecified { target: String, reason: String },

    /// The tool exists but cannot serve this request
    #[error("tool '{tool}' is unavailable: {reason}")]
    ToolUnavailable { tool: String, reason: String },

    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    /// A loaded scene snapshot is unusable
    #[error("invalid scene: {reason}")]
    InvalidScene { reason: String },

    /// Label generation ran out of candidates
    #[error("no free label for '{base}'")]
    LabelSpace { base: String },

    /// Failure surfaced on behalf of the caller
    #[error("{message}")]
    Reported { code: String, message: String },
}

impl EngineError {
    /// Create an argument error for a tool-specific code such as `E_ARGS_ALIGN`
    pub fn invalid_args(code: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            code,
            message: message.into(),
        }
    }

    /// Create a missing-object error
    pub fn not_found(label: impl Into<String>) -> Self {
        Self::NotFound {
            label: label.into(),
        }
    }

    /// Create a duplicate-label error
    pub fn duplicate(label: impl Into<String>) -> Self {
        Self::DuplicateLabel {
            label: label.into(),
        }
    }

    /// Create an under-specified touch error
    pub fn under_specified(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnderSpecified {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Stable error code for this failure
    pub fn code(&self) -> &str {
        match self {
            Self::InvalidArguments { code, .. } => *code,
            Self::NotFound { .. } => "E_NOT_FOUND",
            Self::DuplicateLabel { .. } => "E_DUPLICATE_LABEL",
            Self::EditOnly { .. } => "E_EDIT_ONLY",
            Self::UndoEmpty => "E_UNDO_EMPTY",
            Self::RedoEmpty => "E_REDO_EMPTY",
            Self::UnderSpecified { .. } => "E_UNDER_SPECIFIED",
            Self::ToolUnavailable { .. } => "E_TOOL_UNAVAILABLE",
            Self::UnknownTool(_) => "E_TOOL_UNKNOWN",
            Self::InvalidScene { .. } => "E_INVALID_SCENE",
            Self::LabelSpace { .. } => "E_LABEL_SPACE",
            Self::Reported { code, .. } => code.as_str(),
        }
    }

    /// Convert into the serializable failure payload
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// Failure payload returned for an aborted batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    #[serde(rename = "error_code")]
    pub code: String,
    #[serde(rename = "error_message")]
    pub message: String,
}

impl From<EngineError> for ErrorReport {
    fn from(err: EngineError) -> Self {
        err.report()
    }
}
