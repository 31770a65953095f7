use std::fmt;

use crate::types::SourceLocation;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{code}: {message}{}", LocationSuffix(.location.as_ref()))]
pub struct GamebookError {
    pub code: String,
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl GamebookError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            location: None,
        }
    }

    pub fn with_location(
        code: impl Into<String>,
        message: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            location: Some(location),
        }
    }
}

struct LocationSuffix<'a>(Option<&'a SourceLocation>);

impl fmt::Display for LocationSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(location) => write!(f, " (line {}, column {})", location.line, location.column),
            None => Ok(()),
        }
    }
}
