//! Processing limits
//!
//! Both the document walk and simple-type restriction chains are
//! recursive, so untrusted schemas and documents are bounded here. Exceeding
//! a size or attribute limit is a setup error; exceeding a depth limit while
//! walking is reported as a content or value error instead.

use crate::error::{Error, Result};

/// Bounds applied by a [`crate::Validator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Deepest element nesting accepted in a document (root is depth 1)
    pub max_xml_depth: usize,

    /// Largest document accepted, in bytes
    pub max_xml_size: usize,

    /// Largest schema accepted, in bytes
    pub max_schema_size: usize,

    /// Most attributes accepted on one element
    pub max_attributes: usize,

    /// Longest chain of named simple types followed through `base`
    pub max_type_depth: usize,
}

const KB: usize = 1024;
const MB: usize = 1024 * KB;

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_xml_depth: 1000,
            max_xml_size: 100 * MB,
            max_schema_size: 10 * MB,
            max_attributes: 1000,
            max_type_depth: 64,
        }
    }
}

impl Limits {
    /// Default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Tight limits for documents from untrusted sources
    pub fn strict() -> Self {
        Self {
            max_xml_depth: 100,
            max_xml_size: 10 * MB,
            max_schema_size: MB,
            max_attributes: 100,
            max_type_depth: 16,
        }
    }

    /// Loose limits for large trusted inputs
    pub fn permissive() -> Self {
        Self {
            max_xml_depth: 10_000,
            max_xml_size: 1024 * MB,
            max_schema_size: 100 * MB,
            max_attributes: 10_000,
            max_type_depth: 1024,
        }
    }

    /// Element nesting while building a document tree
    pub fn check_xml_depth(&self, depth: usize) -> Result<()> {
        exceeds("document nesting depth", depth, self.max_xml_depth)
    }

    /// Document size in bytes
    pub fn check_xml_size(&self, size: usize) -> Result<()> {
        exceeds("document size in bytes", size, self.max_xml_size)
    }

    /// Schema size in bytes
    pub fn check_schema_size(&self, size: usize) -> Result<()> {
        exceeds("schema size in bytes", size, self.max_schema_size)
    }

    /// Attribute count on a single element
    pub fn check_attributes(&self, count: usize) -> Result<()> {
        exceeds("attributes on one element", count, self.max_attributes)
    }
}

fn exceeds(what: &str, actual: usize, max: usize) -> Result<()> {
    if actual > max {
        return Err(Error::LimitExceeded(format!(
            "{} is {}, maximum is {}",
            what, actual, max
        )));
    }
    Ok(())
}
