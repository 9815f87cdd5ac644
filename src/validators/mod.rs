//! XML Schema validators
//!
//! Schema model and parsing, built-in type and facet checks, the pattern
//! cache, and the structural walk that ties them together.

pub mod attributes;
pub mod builtins;
pub mod document_validation;
pub mod exceptions;
pub mod facets;
pub mod parsing;
pub mod particles;
pub mod patterns;
pub mod schemas;
pub mod validation;

// Re-exports
pub use builtins::{BuiltinType, XSD_NAMESPACE};
pub use exceptions::{ContentError, ValueError};
pub use parsing::parse_schema;
pub use particles::Occurs;
pub use patterns::{PatternCache, PatternError};
pub use schemas::{
    AttributeDecl, AttributeType, AttributeUse, Choice, ComplexType, ContentModel, ElementContent,
    ElementDecl, FormDefault, ListType, Restriction, Schema, Sequence, SimpleDerivation,
    SimpleType, TypeLookup, UnionType,
};
pub use validation::{ValidationResult, Validator};
