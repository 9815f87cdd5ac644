//! # xsd-validator
//!
//! Validate XML documents against XML Schema (XSD) definitions and report
//! every structural and content violation found, not just the first.
//!
//! ## Features
//!
//! - Element, complex and simple type declarations, `ref`s and namespaces
//! - Sequences and choices with occurrence bounds
//! - Built-in type checks and restriction facets (length, bounds,
//!   pattern, enumeration)
//! - Concurrent use of one validator across threads
//! - Configurable limits for untrusted input
//!
//! ## Example
//!
//! ```rust
//! use xsd_validator::Validator;
//!
//! let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
//!     <xs:element name="priority">
//!         <xs:simpleType>
//!             <xs:restriction base="xs:string">
//!                 <xs:enumeration value="high"/>
//!                 <xs:enumeration value="low"/>
//!             </xs:restriction>
//!         </xs:simpleType>
//!     </xs:element>
//! </xs:schema>"#;
//!
//! let validator = Validator::from_string(xsd)?;
//! let result = validator.validate_string("<priority>urgent</priority>")?;
//! assert!(!result.valid);
//! assert_eq!(
//!     result.errors,
//!     vec!["invalid content in element 'priority': value must be one of the enumerated values"]
//! );
//! # Ok::<(), xsd_validator::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod documents;
pub mod error;
pub mod limits;
pub mod namespaces;
pub mod output;
pub mod validators;

// Re-exports for convenience
pub use error::{Error, ParseError, Result};
pub use limits::Limits;
pub use output::OutputFormat;
pub use validators::{ValidationResult, Validator};

/// Version of the xsd-validator library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XSD 1.0 namespace
pub const XSD_NAMESPACE: &str = validators::XSD_NAMESPACE;

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
