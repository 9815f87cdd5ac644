//! XML Schema model
//!
//! In-memory form of the schema constructs the validator understands.
//! Built once by [`super::parsing::parse_schema`] and read-only afterwards.
//! Cross references (`ref`, `type` and `base` names) stay as strings and
//! are resolved lazily through the lookup methods on [`Schema`].

use indexmap::IndexMap;

use super::builtins::{BuiltinType, XSD_NAMESPACE};
use super::particles::Occurs;
use crate::namespaces::{local_part, split_prefixed, NamespaceContext};

/// Form default for local elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormDefault {
    /// Unqualified (default)
    #[default]
    Unqualified,
    /// Qualified
    Qualified,
}

impl FormDefault {
    /// Interpret an `elementFormDefault` value; anything but `qualified` is unqualified
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("qualified") => FormDefault::Qualified,
            _ => FormDefault::Unqualified,
        }
    }

    /// Check if qualified
    pub fn is_qualified(&self) -> bool {
        matches!(self, FormDefault::Qualified)
    }
}

/// Parsed `xs:schema` document
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// `targetNamespace` attribute
    pub target_namespace: Option<String>,
    /// `elementFormDefault` attribute
    pub element_form_default: FormDefault,
    /// Top-level element declarations in document order
    pub elements: Vec<ElementDecl>,
    /// Named complex types; the first declaration of a name wins
    pub complex_types: IndexMap<String, ComplexType>,
    /// Named simple types; the first declaration of a name wins
    pub simple_types: IndexMap<String, SimpleType>,
    /// Prefix bindings declared on the `xs:schema` element
    pub namespaces: NamespaceContext,
}

/// How a type name used in the schema resolves
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeLookup<'a> {
    /// One of the supported built-in types
    Builtin(BuiltinType),
    /// A named simple type of this schema
    Simple(&'a SimpleType),
    /// Nothing known under this name
    Unknown,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Target namespace, or the empty string
    pub fn target_namespace_or_empty(&self) -> &str {
        self.target_namespace.as_deref().unwrap_or("")
    }

    /// Namespace a declaration expects its instances to be in
    ///
    /// The declaration's own `namespace` attribute, else the target
    /// namespace, else empty.
    pub fn effective_namespace<'a>(&'a self, decl: &'a ElementDecl) -> &'a str {
        match decl.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => ns,
            _ => self.target_namespace_or_empty(),
        }
    }

    /// Top-level declaration a document root with this name must match
    pub fn find_root(&self, name: &str, namespace: &str) -> Option<&ElementDecl> {
        let unqualified_match = !self.element_form_default.is_qualified()
            && namespace == self.target_namespace_or_empty();

        self.elements.iter().find(|decl| {
            decl.name == name
                && (self.effective_namespace(decl) == namespace || unqualified_match)
        })
    }

    /// Resolve a `ref` value against the top-level elements
    ///
    /// Any prefix is dropped; only the local name is matched.
    pub fn resolve_ref(&self, reference: &str) -> Option<&ElementDecl> {
        let local = local_part(reference);
        self.elements.iter().find(|decl| decl.name == local)
    }

    /// Named complex type for an element's `type` attribute
    pub fn find_complex_type(&self, type_name: &str) -> Option<&ComplexType> {
        if self.is_xsd_prefixed(type_name) {
            return None;
        }
        self.complex_types.get(local_part(type_name))
    }

    /// Named simple type by (possibly prefixed) name
    pub fn find_simple_type(&self, type_name: &str) -> Option<&SimpleType> {
        self.simple_types.get(local_part(type_name))
    }

    /// Classify a type name used by an element, attribute or restriction
    ///
    /// A name is built in when its prefix is bound to the XSD namespace, or
    /// when it has no (or an undeclared) prefix and a built-in local name.
    /// Everything else is looked up among the named simple types.
    pub fn lookup_type(&self, type_name: &str) -> TypeLookup<'_> {
        let (prefix, local) = split_prefixed(type_name);
        let builtin = BuiltinType::from_name(local);

        let is_builtin_ns = match prefix.and_then(|p| self.namespaces.get_namespace(p)) {
            Some(ns) => ns == XSD_NAMESPACE,
            None => true,
        };

        if let (Some(builtin), true) = (builtin, is_builtin_ns) {
            return TypeLookup::Builtin(builtin);
        }

        match self.find_simple_type(local) {
            Some(simple) => TypeLookup::Simple(simple),
            None => TypeLookup::Unknown,
        }
    }

    fn is_xsd_prefixed(&self, type_name: &str) -> bool {
        match split_prefixed(type_name).0 {
            Some(prefix) => self.namespaces.get_namespace(prefix) == Some(XSD_NAMESPACE),
            None => false,
        }
    }
}

/// Element declaration, top level or local
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDecl {
    /// `name` attribute (empty for a `ref`)
    pub name: String,
    /// `namespace` override
    pub namespace: Option<String>,
    /// Raw `minOccurs` attribute
    pub min_occurs: Option<String>,
    /// Raw `maxOccurs` attribute
    pub max_occurs: Option<String>,
    /// What the element's content is checked against
    pub content: ElementContent,
}

impl ElementDecl {
    /// Declaration with the given name and content
    pub fn new(name: impl Into<String>, content: ElementContent) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            min_occurs: None,
            max_occurs: None,
            content,
        }
    }

    /// Set raw occurrence attributes
    pub fn with_occurs(mut self, min: Option<&str>, max: Option<&str>) -> Self {
        self.min_occurs = min.map(str::to_string);
        self.max_occurs = max.map(str::to_string);
        self
    }

    /// Interpreted occurrence bounds
    pub fn occurs(&self) -> Occurs {
        Occurs::from_attrs(self.min_occurs.as_deref(), self.max_occurs.as_deref())
    }

    /// Name children are matched by: `name`, or the local part of `ref`
    pub fn effective_name(&self) -> &str {
        match &self.content {
            ElementContent::Ref(reference) => local_part(reference),
            _ => &self.name,
        }
    }
}

/// The single shape that decides how an element's content is checked
///
/// When a declaration carries several of these, the first in declaration
/// order of the variants wins.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementContent {
    /// `ref` to a top-level element
    Ref(String),
    /// Inline `xs:complexType`
    Complex(ComplexType),
    /// Inline `xs:simpleType`
    Simple(SimpleType),
    /// `type` attribute naming a complex, simple or built-in type
    Named(String),
    /// No type information at all
    Empty,
}

/// Complex type definition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplexType {
    /// Type name (None for anonymous types)
    pub name: Option<String>,
    /// Declared attributes in order
    pub attributes: Vec<AttributeDecl>,
    /// Child content model
    pub content: Option<ContentModel>,
}

/// Content model of a complex type
#[derive(Debug, Clone, PartialEq)]
pub enum ContentModel {
    /// xs:sequence
    Sequence(Sequence),
    /// xs:choice
    Choice(Choice),
}

/// xs:sequence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence {
    /// Member declarations in order
    pub elements: Vec<ElementDecl>,
}

/// xs:choice
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Choice {
    /// Raw `minOccurs` of the group
    pub min_occurs: Option<String>,
    /// Raw `maxOccurs` of the group
    pub max_occurs: Option<String>,
    /// Nested choice, validated against the same children
    pub choice: Option<Box<Choice>>,
    /// Alternatives in order
    pub elements: Vec<ElementDecl>,
}

impl Choice {
    /// Interpreted occurrence bounds of the group
    pub fn occurs(&self) -> Occurs {
        Occurs::from_attrs(self.min_occurs.as_deref(), self.max_occurs.as_deref())
    }
}

/// Attribute `use`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeUse {
    /// Optional (default)
    #[default]
    Optional,
    /// Required
    Required,
}

impl AttributeUse {
    /// Interpret a `use` value; anything but `required` is optional
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("required") => AttributeUse::Required,
            _ => AttributeUse::Optional,
        }
    }
}

/// Type of an attribute declaration
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    /// `type` attribute
    Named(String),
    /// Inline `xs:simpleType`
    Inline(SimpleType),
    /// No type given; any value is accepted
    Unspecified,
}

/// Attribute declaration
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDecl {
    /// Attribute name as it appears on instances
    pub name: String,
    /// Declared type
    pub type_def: AttributeType,
    /// `use` attribute
    pub use_: AttributeUse,
    /// Default value (not applied)
    pub default: Option<String>,
    /// Fixed value (not enforced)
    pub fixed: Option<String>,
}

impl AttributeDecl {
    /// Optional attribute of the given type
    pub fn new(name: impl Into<String>, type_def: AttributeType) -> Self {
        Self {
            name: name.into(),
            type_def,
            use_: AttributeUse::Optional,
            default: None,
            fixed: None,
        }
    }

    /// Check if required
    pub fn is_required(&self) -> bool {
        self.use_ == AttributeUse::Required
    }
}

/// Simple type definition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimpleType {
    /// Type name (None for anonymous types)
    pub name: Option<String>,
    /// How the type is derived
    pub derivation: Option<SimpleDerivation>,
}

impl SimpleType {
    /// Restriction, if the type is derived by restriction
    pub fn restriction(&self) -> Option<&Restriction> {
        match &self.derivation {
            Some(SimpleDerivation::Restriction(restriction)) => Some(restriction),
            _ => None,
        }
    }
}

/// Derivation method of a simple type
#[derive(Debug, Clone, PartialEq)]
pub enum SimpleDerivation {
    /// xs:restriction
    Restriction(Restriction),
    /// xs:list (modelled, not evaluated)
    List(ListType),
    /// xs:union (modelled, not evaluated)
    Union(UnionType),
}

/// xs:restriction of a simple type
///
/// Facet values are the raw `value` attributes. Only the length family,
/// numeric bounds, `pattern` and `enumeration` are checked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Restriction {
    /// `base` attribute
    pub base: String,
    /// `pattern` facets, all of which must match
    pub patterns: Vec<String>,
    /// `enumeration` facets
    pub enumerations: Vec<String>,
    /// `length`
    pub length: Option<String>,
    /// `minLength`
    pub min_length: Option<String>,
    /// `maxLength`
    pub max_length: Option<String>,
    /// `minInclusive`
    pub min_inclusive: Option<String>,
    /// `maxInclusive`
    pub max_inclusive: Option<String>,
    /// `minExclusive`
    pub min_exclusive: Option<String>,
    /// `maxExclusive`
    pub max_exclusive: Option<String>,
    /// `whiteSpace`
    pub white_space: Option<String>,
    /// `totalDigits`
    pub total_digits: Option<String>,
    /// `fractionDigits`
    pub fraction_digits: Option<String>,
}

impl Restriction {
    /// Restriction of `base` with no facets
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ..Self::default()
        }
    }
}

/// xs:list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListType {
    /// `itemType` attribute
    pub item_type: Option<String>,
}

/// xs:union
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnionType {
    /// `memberTypes` attribute, split on whitespace
    pub member_types: Vec<String>,
    /// Inline member types
    pub simple_types: Vec<SimpleType>,
}
