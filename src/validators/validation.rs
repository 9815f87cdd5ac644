//! XML Validation entry points
//!
//! [`Validator`] owns a parsed schema, the compiled-pattern cache and the
//! processing limits. It is built once and can validate any number of
//! documents, from any number of threads.

use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::builtins::BuiltinType;
use super::exceptions::ValueError;
use super::facets::check_facets;
use super::parsing::parse_schema;
use super::patterns::PatternCache;
use super::schemas::{Restriction, Schema, TypeLookup};
use crate::documents::Document;
use crate::error::{Error, ParseError, Result};
use crate::limits::Limits;

/// Outcome of validating one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True when no violation was found
    pub valid: bool,
    /// What was validated; the root element name unless replaced
    #[serde(rename = "filename")]
    pub subject: String,
    /// Violation messages in the order they were found
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Result for `subject` with the given violations
    pub fn new(subject: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            subject: subject.into(),
            errors,
        }
    }

    /// Replace the subject, e.g. with the path of the validated file
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Check if the document was valid
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Schema-driven XML validator
#[derive(Debug)]
pub struct Validator {
    schema: Schema,
    patterns: PatternCache,
    limits: Limits,
}

impl Validator {
    /// Wrap an already built schema
    pub fn from_schema(schema: Schema) -> Self {
        Self {
            schema,
            patterns: PatternCache::new(),
            limits: Limits::default(),
        }
    }

    /// Parse schema text with default limits
    pub fn from_string(xsd: &str) -> Result<Self> {
        Self::from_string_with_limits(xsd, Limits::default())
    }

    /// Parse schema text, enforcing `limits` on the schema and on every document
    pub fn from_string_with_limits(xsd: &str, limits: Limits) -> Result<Self> {
        let schema = parse_schema(xsd, &limits)?;
        Ok(Self::from_schema(schema).with_limits(limits))
    }

    /// Parse schema bytes (UTF-8)
    pub fn from_bytes(xsd: &[u8]) -> Result<Self> {
        Self::from_bytes_with_limits(xsd, Limits::default())
    }

    /// Parse schema bytes (UTF-8) with the given limits
    pub fn from_bytes_with_limits(xsd: &[u8], limits: Limits) -> Result<Self> {
        limits.check_schema_size(xsd.len())?;
        let text = std::str::from_utf8(xsd)
            .map_err(|e| ParseError::new(format!("schema is not valid UTF-8: {}", e)))?;
        Self::from_string_with_limits(text, limits)
    }

    /// Read and parse a schema from a stream
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_limits(reader, Limits::default())
    }

    /// Read and parse a schema from a stream with the given limits
    pub fn from_reader_with_limits<R: Read>(reader: R, limits: Limits) -> Result<Self> {
        let buf = read_bounded(reader, limits.max_schema_size)?;
        Self::from_bytes_with_limits(&buf, limits)
    }

    /// Replace the processing limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// The parsed schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Active processing limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Compiled `pattern` facets seen so far
    pub fn pattern_cache(&self) -> &PatternCache {
        &self.patterns
    }

    /// Validate a document given as text
    pub fn validate_string(&self, xml: &str) -> Result<ValidationResult> {
        self.validate_bytes(xml.as_bytes())
    }

    /// Validate a document given as bytes
    pub fn validate_bytes(&self, xml: &[u8]) -> Result<ValidationResult> {
        let doc = Document::parse_with_limits(xml, &self.limits)?;
        self.validate_document(&doc)
    }

    /// Read a document from a stream and validate it
    pub fn validate_reader<R: Read>(&self, reader: R) -> Result<ValidationResult> {
        let buf = read_bounded(reader, self.limits.max_xml_size)?;
        self.validate_bytes(&buf)
    }

    /// Validate an already parsed document
    ///
    /// Fails only when the root element has no matching top-level
    /// declaration; every other problem is reported in the result.
    pub fn validate_document(&self, doc: &Document) -> Result<ValidationResult> {
        let root = &doc.root;
        let decl = self
            .schema
            .find_root(root.local_name(), root.namespace())
            .ok_or_else(|| Error::UnknownRoot {
                namespace: root.namespace().to_string(),
                name: root.local_name().to_string(),
            })?;

        let errors: Vec<String> = self
            .validate_element(root, decl)
            .iter()
            .map(ToString::to_string)
            .collect();

        debug!(
            root = %root.qname,
            errors = errors.len(),
            "validated document"
        );

        Ok(ValidationResult::new(root.local_name(), errors))
    }

    /// Check a value against a type name and an optional restriction
    ///
    /// Built-in names are checked lexically; any other name must be a named
    /// simple type with a restriction, whose chain is followed to a
    /// built-in base. Facets of `restriction` are only checked once the
    /// base check has passed.
    pub fn check_value(
        &self,
        value: &str,
        type_name: &str,
        restriction: Option<&Restriction>,
    ) -> std::result::Result<(), ValueError> {
        self.check_value_at(value, type_name, restriction, 0)
    }

    fn check_value_at(
        &self,
        value: &str,
        type_name: &str,
        restriction: Option<&Restriction>,
        depth: usize,
    ) -> std::result::Result<(), ValueError> {
        if depth > self.limits.max_type_depth {
            warn!(type_name, "restriction chain too deep");
            return Err(ValueError::TypeChainTooDeep(type_name.to_string()));
        }

        match self.schema.lookup_type(type_name) {
            TypeLookup::Builtin(builtin) => builtin.check(value)?,
            TypeLookup::Simple(simple) => match simple.restriction() {
                Some(inner) => self.check_value_at(value, &inner.base, Some(inner), depth + 1)?,
                None => return Err(ValueError::InvalidSimpleType(type_name.to_string())),
            },
            TypeLookup::Unknown => return Err(ValueError::UnsupportedType(type_name.to_string())),
        }

        if let Some(restriction) = restriction {
            let numeric = self
                .resolve_builtin(type_name)
                .is_some_and(BuiltinType::has_numeric_bounds);
            check_facets(value, restriction, numeric, &self.patterns)?;
        }

        Ok(())
    }

    /// Built-in type a name ultimately restricts, if any
    fn resolve_builtin(&self, type_name: &str) -> Option<BuiltinType> {
        let mut current = type_name;
        for _ in 0..=self.limits.max_type_depth {
            match self.schema.lookup_type(current) {
                TypeLookup::Builtin(builtin) => return Some(builtin),
                TypeLookup::Simple(simple) => current = &simple.restriction()?.base,
                TypeLookup::Unknown => return None,
            }
        }
        None
    }
}

/// Read at most `limit + 1` bytes so oversized input trips the size check
fn read_bounded<R: Read>(reader: R, limit: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader
        .take(limit.saturating_add(1) as u64)
        .read_to_end(&mut buf)?;
    Ok(buf)
}
