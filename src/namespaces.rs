//! XML namespace handling
//!
//! Qualified names and in-scope prefix bindings, shared by the document tree
//! builder and by type-name lookup in the schema model. Undeclared prefixes
//! never fail: the prefix itself stands in for the namespace URI, so a
//! mismatch surfaces later as an ordinary validation error.

use crate::XML_NAMESPACE;
use std::collections::HashMap;
use std::fmt;

/// Namespace-resolved name of an element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<String>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Name in no namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Name in the given namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// Namespace URI, or the empty string when there is none
    pub fn namespace_or_empty(&self) -> &str {
        self.namespace.as_deref().unwrap_or("")
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => f.write_str(&self.local_name),
        }
    }
}

/// Split `prefix:local` into its parts
pub fn split_prefixed(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

/// Local part of a possibly prefixed name
pub fn local_part(name: &str) -> &str {
    split_prefixed(name).1
}

/// Prefix bindings in scope at one point of a document
#[derive(Debug, Clone, Default)]
pub struct NamespaceContext {
    prefixes: HashMap<String, String>,
    default_namespace: Option<String>,
}

impl NamespaceContext {
    /// Empty scope; only the `xml` prefix is bound
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to a namespace URI, shadowing any outer binding
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default namespace; an empty URI undeclares it
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        let namespace = namespace.into();
        self.default_namespace = (!namespace.is_empty()).then_some(namespace);
    }

    /// URI bound to `prefix`
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE);
        }
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Default namespace, if one is declared
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    fn uri_or_prefix<'a>(&'a self, prefix: &'a str) -> &'a str {
        self.get_namespace(prefix).unwrap_or(prefix)
    }

    /// Resolve an element name; unprefixed names take the default namespace
    pub fn resolve_element(&self, prefixed_name: &str) -> QName {
        match split_prefixed(prefixed_name) {
            (Some(prefix), local) => QName::namespaced(self.uri_or_prefix(prefix), local),
            (None, local) => QName {
                namespace: self.default_namespace.clone(),
                local_name: local.to_string(),
            },
        }
    }

    /// Key under which an attribute is stored on a node
    ///
    /// Unprefixed attributes are in no namespace and keep their bare name;
    /// prefixed ones are keyed `{uri}local`.
    pub fn attribute_key(&self, prefixed_name: &str) -> String {
        match split_prefixed(prefixed_name) {
            (Some(prefix), local) => format!("{{{}}}{}", self.uri_or_prefix(prefix), local),
            (None, local) => local.to_string(),
        }
    }
}
