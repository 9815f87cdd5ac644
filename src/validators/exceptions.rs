//! XSD Validation Exceptions
//!
//! Non-fatal errors produced while checking a document. Their `Display`
//! output is the exact message that ends up in a
//! [`super::ValidationResult`].

use thiserror::Error;

use super::patterns::PatternError;

/// A value failed its declared type or one of its restriction facets
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    /// Value is not in the lexical space of a built-in type
    #[error("invalid {type_name} value: {value}")]
    InvalidLexical {
        /// Built-in type name as used in the message
        type_name: &'static str,
        /// Offending value
        value: String,
    },

    /// `positiveInteger` value that does not parse as an integer
    #[error("invalid positive integer value: {0}")]
    InvalidPositiveInteger(String),

    /// `positiveInteger` value that is zero or negative
    #[error("value must be positive, got {0}")]
    NotPositive(i64),

    /// Type name is neither built in nor a named simple type
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Named simple type that has no restriction to check against
    #[error("simple type {0} has no restriction")]
    InvalidSimpleType(String),

    /// Restriction chain longer than the configured limit
    #[error("type {0} exceeds the maximum restriction depth")]
    TypeChainTooDeep(String),

    /// `length` facet violated
    #[error("length must be exactly {expected}, got {actual}")]
    LengthMismatch {
        /// Required length
        expected: usize,
        /// Actual number of characters
        actual: usize,
    },

    /// `minLength` facet violated
    #[error("length must be at least {min}, got {actual}")]
    TooShort {
        /// Minimum length
        min: usize,
        /// Actual number of characters
        actual: usize,
    },

    /// `maxLength` facet violated
    #[error("length must be at most {max}, got {actual}")]
    TooLong {
        /// Maximum length
        max: usize,
        /// Actual number of characters
        actual: usize,
    },

    /// `minInclusive` facet violated
    #[error("value must be >= {bound}, got {actual}")]
    BelowMinInclusive {
        /// Bound from the schema
        bound: f64,
        /// Parsed value
        actual: f64,
    },

    /// `maxInclusive` facet violated
    #[error("value must be <= {bound}, got {actual}")]
    AboveMaxInclusive {
        /// Bound from the schema
        bound: f64,
        /// Parsed value
        actual: f64,
    },

    /// `minExclusive` facet violated
    #[error("value must be > {bound}, got {actual}")]
    NotAboveMinExclusive {
        /// Bound from the schema
        bound: f64,
        /// Parsed value
        actual: f64,
    },

    /// `maxExclusive` facet violated
    #[error("value must be < {bound}, got {actual}")]
    NotBelowMaxExclusive {
        /// Bound from the schema
        bound: f64,
        /// Parsed value
        actual: f64,
    },

    /// A `pattern` facet could not be compiled
    #[error("invalid pattern: {}", .0.pattern)]
    InvalidPattern(PatternError),

    /// A `pattern` facet did not match the whole value
    #[error("value does not match pattern: {0}")]
    PatternMismatch(String),

    /// Value is not one of the `enumeration` facets
    #[error("value must be one of the enumerated values")]
    NotEnumerated,
}

/// A structural or content violation found while walking a document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContentError {
    /// `ref` names no top-level element
    #[error("referenced element not found: {0}")]
    UnresolvedRef(String),

    /// Node name or namespace disagrees with its declaration
    #[error(
        "element name or namespace mismatch: expected '{{{expected_namespace}}}{expected_name}', got '{{{actual_namespace}}}{actual_name}'"
    )]
    NameMismatch {
        /// Namespace attribute of the declaration (empty if none)
        expected_namespace: String,
        /// Declared name
        expected_name: String,
        /// Resolved namespace of the node
        actual_namespace: String,
        /// Local name of the node
        actual_name: String,
    },

    /// Text content failed its type check
    #[error("invalid content in element '{element}': {source}")]
    InvalidContent {
        /// Local name of the element
        element: String,
        /// What was wrong with the value
        source: ValueError,
    },

    /// Attribute value failed its type check
    #[error("attribute '{attribute}': {source}")]
    InvalidAttribute {
        /// Attribute key
        attribute: String,
        /// What was wrong with the value
        source: ValueError,
    },

    /// Attribute not declared on the complex type
    #[error("unexpected attribute '{0}'")]
    UnexpectedAttribute(String),

    /// Required attribute absent from the node
    #[error("missing required attribute '{0}'")]
    MissingRequiredAttribute(String),

    /// Child not declared in the sequence
    #[error("unexpected element '{0}'")]
    UnexpectedElement(String),

    /// Sequence member seen fewer times than `minOccurs`
    #[error("element '{name}' occurs {count} times, minimum required is {min}")]
    TooFewOccurrences {
        /// Declared element name
        name: String,
        /// Observed count
        count: u32,
        /// Required minimum
        min: u32,
    },

    /// Sequence member seen more times than `maxOccurs`
    #[error("element '{name}' occurs {count} times, maximum allowed is {max}")]
    TooManyOccurrences {
        /// Declared element name
        name: String,
        /// Observed count
        count: u32,
        /// Allowed maximum
        max: u32,
    },

    /// Child matches none of the choice alternatives
    #[error("element '{0}' is not a valid choice")]
    InvalidChoiceMember(String),

    /// Choice matched fewer times than its own `minOccurs`
    #[error("choice group occurs {count} times, minimum required is {min}")]
    ChoiceTooFew {
        /// Matched alternatives
        count: u32,
        /// Required minimum
        min: u32,
    },

    /// Choice matched more times than its own `maxOccurs`
    #[error("choice group occurs {count} times, maximum allowed is {max}")]
    ChoiceTooMany {
        /// Matched alternatives
        count: u32,
        /// Allowed maximum
        max: u32,
    },

    /// Document nested deeper than the configured limit
    #[error("maximum nesting depth {limit} exceeded at element '{element}'")]
    DepthExceeded {
        /// Local name of the element that was not descended into
        element: String,
        /// Configured limit
        limit: usize,
    },
}
