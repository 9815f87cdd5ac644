//! XSD Document Parsing
//!
//! Builds a [`Schema`] from schema text. Schema components are matched by
//! local name; anything the model has no place for (annotations, imports,
//! groups, extensions) is skipped. Attribute values are stored verbatim and
//! only interpreted during validation.

use roxmltree::Node;
use tracing::{debug, trace};

use super::schemas::{
    AttributeDecl, AttributeType, AttributeUse, Choice, ComplexType, ContentModel, ElementContent,
    ElementDecl, FormDefault, ListType, Restriction, Schema, Sequence, SimpleDerivation,
    SimpleType, UnionType,
};
use crate::error::{ParseError, Result};
use crate::limits::Limits;

/// XSD element local names
mod xsd_elements {
    pub const SCHEMA: &str = "schema";
    pub const ELEMENT: &str = "element";
    pub const COMPLEX_TYPE: &str = "complexType";
    pub const SIMPLE_TYPE: &str = "simpleType";
    pub const ATTRIBUTE: &str = "attribute";
    pub const SEQUENCE: &str = "sequence";
    pub const CHOICE: &str = "choice";
    pub const RESTRICTION: &str = "restriction";
    pub const LIST: &str = "list";
    pub const UNION: &str = "union";
    // Facets
    pub const PATTERN: &str = "pattern";
    pub const ENUMERATION: &str = "enumeration";
    pub const LENGTH: &str = "length";
    pub const MIN_LENGTH: &str = "minLength";
    pub const MAX_LENGTH: &str = "maxLength";
    pub const MIN_INCLUSIVE: &str = "minInclusive";
    pub const MAX_INCLUSIVE: &str = "maxInclusive";
    pub const MIN_EXCLUSIVE: &str = "minExclusive";
    pub const MAX_EXCLUSIVE: &str = "maxExclusive";
    pub const WHITE_SPACE: &str = "whiteSpace";
    pub const TOTAL_DIGITS: &str = "totalDigits";
    pub const FRACTION_DIGITS: &str = "fractionDigits";
}

/// XSD attribute names
mod xsd_attrs {
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const REF: &str = "ref";
    pub const NAMESPACE: &str = "namespace";
    pub const TARGET_NAMESPACE: &str = "targetNamespace";
    pub const ELEMENT_FORM_DEFAULT: &str = "elementFormDefault";
    pub const MIN_OCCURS: &str = "minOccurs";
    pub const MAX_OCCURS: &str = "maxOccurs";
    pub const USE: &str = "use";
    pub const DEFAULT: &str = "default";
    pub const FIXED: &str = "fixed";
    pub const BASE: &str = "base";
    pub const VALUE: &str = "value";
    pub const ITEM_TYPE: &str = "itemType";
    pub const MEMBER_TYPES: &str = "memberTypes";
}

/// Parse schema text into a [`Schema`]
pub fn parse_schema(text: &str, limits: &Limits) -> Result<Schema> {
    limits.check_schema_size(text.len())?;

    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let doc = roxmltree::Document::parse_with_options(text, options).map_err(ParseError::from)?;
    let root = doc.root_element();

    if root.tag_name().name() != xsd_elements::SCHEMA {
        return Err(ParseError::new(format!(
            "expected schema root element, got {}",
            root.tag_name().name()
        ))
        .into());
    }

    let mut schema = Schema::new();
    parse_schema_element(&mut schema, root);

    debug!(
        target_namespace = schema.target_namespace_or_empty(),
        elements = schema.elements.len(),
        complex_types = schema.complex_types.len(),
        simple_types = schema.simple_types.len(),
        "parsed schema"
    );

    Ok(schema)
}

/// Parse the xs:schema root element
fn parse_schema_element(schema: &mut Schema, root: Node) {
    for ns in root.namespaces() {
        match ns.name() {
            Some(prefix) => schema.namespaces.add_prefix(prefix, ns.uri()),
            None => schema.namespaces.set_default_namespace(ns.uri()),
        }
    }

    schema.target_namespace = attr(root, xsd_attrs::TARGET_NAMESPACE).map(str::to_string);
    schema.element_form_default = FormDefault::parse(root.attribute(xsd_attrs::ELEMENT_FORM_DEFAULT));

    for child in root.children().filter(Node::is_element) {
        match child.tag_name().name() {
            xsd_elements::ELEMENT => schema.elements.push(parse_element_decl(child)),
            xsd_elements::COMPLEX_TYPE => {
                let complex = parse_complex_type(child);
                match complex.name.clone() {
                    Some(name) => {
                        schema.complex_types.entry(name).or_insert(complex);
                    }
                    None => debug!("skipping top-level complexType without a name"),
                }
            }
            xsd_elements::SIMPLE_TYPE => {
                let simple = parse_simple_type(child);
                match simple.name.clone() {
                    Some(name) => {
                        schema.simple_types.entry(name).or_insert(simple);
                    }
                    None => debug!("skipping top-level simpleType without a name"),
                }
            }
            other => trace!(element = other, "ignoring schema child"),
        }
    }
}

/// Parse an element declaration
fn parse_element_decl(node: Node) -> ElementDecl {
    let content = if let Some(reference) = attr(node, xsd_attrs::REF) {
        ElementContent::Ref(reference.to_string())
    } else if let Some(complex) = first_child(node, xsd_elements::COMPLEX_TYPE) {
        ElementContent::Complex(parse_complex_type(complex))
    } else if let Some(simple) = first_child(node, xsd_elements::SIMPLE_TYPE) {
        ElementContent::Simple(parse_simple_type(simple))
    } else if let Some(type_name) = attr(node, xsd_attrs::TYPE) {
        ElementContent::Named(type_name.to_string())
    } else {
        ElementContent::Empty
    };

    let mut decl = ElementDecl::new(node.attribute(xsd_attrs::NAME).unwrap_or_default(), content)
        .with_occurs(
            node.attribute(xsd_attrs::MIN_OCCURS),
            node.attribute(xsd_attrs::MAX_OCCURS),
        );
    decl.namespace = attr(node, xsd_attrs::NAMESPACE).map(str::to_string);
    decl
}

/// Parse a complex type, named or anonymous
fn parse_complex_type(node: Node) -> ComplexType {
    let attributes = node
        .children()
        .filter(|c| c.is_element() && c.tag_name().name() == xsd_elements::ATTRIBUTE)
        .map(parse_attribute_decl)
        .collect();

    // Only one content model per complex type; the first one wins
    let content = node
        .children()
        .filter(Node::is_element)
        .find_map(|c| match c.tag_name().name() {
            xsd_elements::SEQUENCE => Some(ContentModel::Sequence(parse_sequence(c))),
            xsd_elements::CHOICE => Some(ContentModel::Choice(parse_choice(c))),
            _ => None,
        });

    ComplexType {
        name: attr(node, xsd_attrs::NAME).map(str::to_string),
        attributes,
        content,
    }
}

fn parse_sequence(node: Node) -> Sequence {
    Sequence {
        elements: element_children(node),
    }
}

fn parse_choice(node: Node) -> Choice {
    Choice {
        min_occurs: node.attribute(xsd_attrs::MIN_OCCURS).map(str::to_string),
        max_occurs: node.attribute(xsd_attrs::MAX_OCCURS).map(str::to_string),
        choice: first_child(node, xsd_elements::CHOICE).map(|c| Box::new(parse_choice(c))),
        elements: element_children(node),
    }
}

fn element_children(node: Node) -> Vec<ElementDecl> {
    node.children()
        .filter(|c| c.is_element() && c.tag_name().name() == xsd_elements::ELEMENT)
        .map(parse_element_decl)
        .collect()
}

/// Parse an attribute declaration
fn parse_attribute_decl(node: Node) -> AttributeDecl {
    let type_def = if let Some(type_name) = attr(node, xsd_attrs::TYPE) {
        AttributeType::Named(type_name.to_string())
    } else if let Some(simple) = first_child(node, xsd_elements::SIMPLE_TYPE) {
        AttributeType::Inline(parse_simple_type(simple))
    } else {
        AttributeType::Unspecified
    };

    AttributeDecl {
        name: node.attribute(xsd_attrs::NAME).unwrap_or_default().to_string(),
        type_def,
        use_: AttributeUse::parse(node.attribute(xsd_attrs::USE)),
        default: node.attribute(xsd_attrs::DEFAULT).map(str::to_string),
        fixed: node.attribute(xsd_attrs::FIXED).map(str::to_string),
    }
}

/// Parse a simple type, named or anonymous
fn parse_simple_type(node: Node) -> SimpleType {
    let derivation = node
        .children()
        .filter(Node::is_element)
        .find_map(|c| match c.tag_name().name() {
            xsd_elements::RESTRICTION => Some(SimpleDerivation::Restriction(parse_restriction(c))),
            xsd_elements::LIST => Some(SimpleDerivation::List(ListType {
                item_type: attr(c, xsd_attrs::ITEM_TYPE).map(str::to_string),
            })),
            xsd_elements::UNION => Some(SimpleDerivation::Union(parse_union(c))),
            _ => None,
        });

    SimpleType {
        name: attr(node, xsd_attrs::NAME).map(str::to_string),
        derivation,
    }
}

fn parse_union(node: Node) -> UnionType {
    UnionType {
        member_types: node
            .attribute(xsd_attrs::MEMBER_TYPES)
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default(),
        simple_types: node
            .children()
            .filter(|c| c.is_element() && c.tag_name().name() == xsd_elements::SIMPLE_TYPE)
            .map(parse_simple_type)
            .collect(),
    }
}

/// Parse an xs:restriction and its facets
fn parse_restriction(node: Node) -> Restriction {
    let mut restriction = Restriction::new(node.attribute(xsd_attrs::BASE).unwrap_or_default());

    for facet in node.children().filter(Node::is_element) {
        let value = facet.attribute(xsd_attrs::VALUE);
        let slot = match facet.tag_name().name() {
            xsd_elements::PATTERN => {
                restriction.patterns.push(value.unwrap_or_default().to_string());
                continue;
            }
            xsd_elements::ENUMERATION => {
                restriction.enumerations.push(value.unwrap_or_default().to_string());
                continue;
            }
            xsd_elements::LENGTH => &mut restriction.length,
            xsd_elements::MIN_LENGTH => &mut restriction.min_length,
            xsd_elements::MAX_LENGTH => &mut restriction.max_length,
            xsd_elements::MIN_INCLUSIVE => &mut restriction.min_inclusive,
            xsd_elements::MAX_INCLUSIVE => &mut restriction.max_inclusive,
            xsd_elements::MIN_EXCLUSIVE => &mut restriction.min_exclusive,
            xsd_elements::MAX_EXCLUSIVE => &mut restriction.max_exclusive,
            xsd_elements::WHITE_SPACE => &mut restriction.white_space,
            xsd_elements::TOTAL_DIGITS => &mut restriction.total_digits,
            xsd_elements::FRACTION_DIGITS => &mut restriction.fraction_digits,
            other => {
                trace!(facet = other, "ignoring restriction child");
                continue;
            }
        };

        if slot.is_none() {
            *slot = value.filter(|v| !v.is_empty()).map(str::to_string);
        }
    }

    restriction
}

/// Non-empty attribute value
fn attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name).filter(|v| !v.is_empty())
}

fn first_child<'a, 'input>(node: Node<'a, 'input>, local_name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == local_name)
}
