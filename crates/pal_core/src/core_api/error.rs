use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    /// An input file does not exist.
    NotFound,
    Io,
    /// The save export lacks one of the top-level collections.
    MalformedSave,
    /// A record lacks a field the resolvers need, or holds the wrong type.
    MissingField,
    /// The name reference dataset could not be decoded.
    ReferenceData,
    GuildNotFound,
    SlotContainerNotFound,
    UnknownCreatureCode,
    Write,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
    /// Dotted path of the offending field for `MissingField` errors.
    pub field: Option<String>,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    pub fn missing_field(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            code: CoreErrorCode::MissingField,
            message: format!("missing field {path}"),
            field: Some(path),
        }
    }

    pub fn wrong_type(path: impl Into<String>, expected: &str) -> Self {
        let path = path.into();
        Self {
            code: CoreErrorCode::MissingField,
            message: format!("field {path} is not {expected}"),
            field: Some(path),
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for CoreError {}
