//! Error types for xsd-validator
//!
//! Setup failures (a schema or document that cannot be read at all, or a
//! document whose root element the schema does not declare) are reported
//! through [`Error`]. Problems found while walking a document are never
//! fatal; they live in [`crate::validators::exceptions`] and end up as
//! strings in a [`crate::validators::ValidationResult`].

use std::fmt;
use thiserror::Error;

/// Result type alias using the crate's setup [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal error for a schema build or a validation call
#[derive(Error, Debug)]
pub enum Error {
    /// Schema text is not well-formed or is not an XSD document
    #[error("failed to parse XSD: {0}")]
    SchemaParse(#[from] ParseError),

    /// XML document is not well-formed
    #[error("failed to parse XML: {0}")]
    XmlParse(String),

    /// Document root does not match any top-level schema element
    #[error("root element '{{{namespace}}}{name}' not defined in schema")]
    UnknownRoot {
        /// Resolved namespace of the document root (empty if none)
        namespace: String,
        /// Local name of the document root
        name: String,
    },

    /// A configured processing limit was exceeded
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error while reading an input stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// XML Schema parsing error
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Location in the schema text (`line:column`)
    pub location: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, " (at {})", loc)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<roxmltree::Error> for ParseError {
    fn from(err: roxmltree::Error) -> Self {
        let pos = err.pos();
        ParseError::new(err.to_string()).with_location(format!("{}:{}", pos.row, pos.col))
    }
}
