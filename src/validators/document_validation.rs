//! Document Validation
//!
//! Walks a document tree in lock-step with element declarations, checking
//! names, attributes, text content and child content models. Every
//! violation is collected; the walk only stops descending into a node whose
//! name or namespace does not match its declaration.

use std::collections::HashMap;

use crate::documents::Element;

use super::exceptions::{ContentError, ValueError};
use super::schemas::{Choice, ComplexType, ContentModel, ElementContent, ElementDecl, Sequence};
use super::validation::Validator;

impl Validator {
    /// Validate a node against an element declaration
    pub fn validate_element(&self, node: &Element, decl: &ElementDecl) -> Vec<ContentError> {
        let mut errors = Vec::new();
        self.walk_element(node, decl, 1, &mut errors);
        errors
    }

    fn walk_element(
        &self,
        node: &Element,
        decl: &ElementDecl,
        depth: usize,
        errors: &mut Vec<ContentError>,
    ) {
        if depth > self.limits().max_xml_depth {
            errors.push(ContentError::DepthExceeded {
                element: node.local_name().to_string(),
                limit: self.limits().max_xml_depth,
            });
            return;
        }

        let decl = match self.resolve_decl(decl) {
            Ok(resolved) => resolved,
            Err(err) => {
                errors.push(err);
                return;
            }
        };

        if !self.matches_decl(node, decl) {
            errors.push(ContentError::NameMismatch {
                expected_namespace: decl.namespace.clone().unwrap_or_default(),
                expected_name: decl.name.clone(),
                actual_namespace: node.namespace().to_string(),
                actual_name: node.local_name().to_string(),
            });
            return;
        }

        let complex = self.complex_type_of(decl);

        if let Some(complex) = complex {
            errors.extend(self.validate_attributes(&node.attributes, &complex.attributes));
        }

        if !node.text.is_empty() {
            if let Err(source) = self.check_content(&node.text, decl) {
                errors.push(ContentError::InvalidContent {
                    element: node.local_name().to_string(),
                    source,
                });
            }
        }

        match complex.and_then(|c| c.content.as_ref()) {
            Some(ContentModel::Sequence(sequence)) => {
                self.walk_sequence(&node.children, sequence, depth, errors)
            }
            Some(ContentModel::Choice(choice)) => {
                self.walk_choice(&node.children, choice, depth, errors)
            }
            None => {}
        }
    }

    /// Children are matched by name; document order is not enforced
    fn walk_sequence(
        &self,
        children: &[Element],
        sequence: &Sequence,
        depth: usize,
        errors: &mut Vec<ContentError>,
    ) {
        let expected: HashMap<&str, &ElementDecl> = sequence
            .elements
            .iter()
            .map(|decl| (decl.effective_name(), decl))
            .collect();
        let mut counts: HashMap<&str, u32> = HashMap::new();

        for child in children {
            match expected.get(child.local_name()) {
                Some(&decl) => {
                    *counts.entry(decl.effective_name()).or_default() += 1;
                    self.walk_element(child, decl, depth + 1, errors);
                }
                None => errors.push(ContentError::UnexpectedElement(
                    child.local_name().to_string(),
                )),
            }
        }

        for decl in &sequence.elements {
            let name = decl.effective_name();
            let occurs = decl.occurs();
            let count = counts.get(name).copied().unwrap_or(0);

            if occurs.is_missing(count) {
                errors.push(ContentError::TooFewOccurrences {
                    name: name.to_string(),
                    count,
                    min: occurs.min,
                });
            }
            if let Some(max) = occurs.max.filter(|_| occurs.is_exceeded(count)) {
                errors.push(ContentError::TooManyOccurrences {
                    name: name.to_string(),
                    count,
                    max,
                });
            }
        }
    }

    /// Each child must match one alternative; matches are counted against the group bounds
    fn walk_choice(
        &self,
        children: &[Element],
        choice: &Choice,
        depth: usize,
        errors: &mut Vec<ContentError>,
    ) {
        let occurs = choice.occurs();

        if let Some(nested) = &choice.choice {
            self.walk_choice(children, nested, depth, errors);
        }

        let mut matched = 0u32;
        if !choice.elements.is_empty() {
            for child in children {
                let mut found = false;
                for alternative in &choice.elements {
                    let alternative = match self.resolve_decl(alternative) {
                        Ok(resolved) => resolved,
                        Err(err) => {
                            errors.push(err);
                            continue;
                        }
                    };

                    if self.matches_decl(child, alternative) {
                        found = true;
                        matched += 1;
                        self.walk_element(child, alternative, depth + 1, errors);
                        break;
                    }
                }

                if !found {
                    errors.push(ContentError::InvalidChoiceMember(
                        child.local_name().to_string(),
                    ));
                }
            }
        }

        if occurs.is_missing(matched) {
            errors.push(ContentError::ChoiceTooFew {
                count: matched,
                min: occurs.min,
            });
        }
        if let Some(max) = occurs.max.filter(|_| occurs.is_exceeded(matched)) {
            errors.push(ContentError::ChoiceTooMany {
                count: matched,
                max,
            });
        }
    }

    /// Follow `ref` declarations to the top-level element they name
    fn resolve_decl<'a>(&'a self, decl: &'a ElementDecl) -> Result<&'a ElementDecl, ContentError> {
        let mut current = decl;
        for _ in 0..=self.limits().max_type_depth {
            match &current.content {
                ElementContent::Ref(reference) => {
                    current = self
                        .schema()
                        .resolve_ref(reference)
                        .ok_or_else(|| ContentError::UnresolvedRef(reference.clone()))?;
                }
                _ => return Ok(current),
            }
        }
        match &current.content {
            ElementContent::Ref(reference) => Err(ContentError::UnresolvedRef(reference.clone())),
            _ => Ok(current),
        }
    }

    /// Name always has to agree; namespace only under `elementFormDefault="qualified"`
    fn matches_decl(&self, node: &Element, decl: &ElementDecl) -> bool {
        if node.local_name() != decl.name {
            return false;
        }
        let schema = self.schema();
        !schema.element_form_default.is_qualified()
            || node.namespace() == schema.effective_namespace(decl)
    }

    fn complex_type_of<'a>(&'a self, decl: &'a ElementDecl) -> Option<&'a ComplexType> {
        match &decl.content {
            ElementContent::Complex(complex) => Some(complex),
            ElementContent::Named(type_name) => self.schema().find_complex_type(type_name),
            _ => None,
        }
    }

    fn check_content(&self, text: &str, decl: &ElementDecl) -> Result<(), ValueError> {
        match &decl.content {
            ElementContent::Simple(simple) => match simple.restriction() {
                Some(restriction) => self.check_value(text, &restriction.base, Some(restriction)),
                None => Ok(()),
            },
            ElementContent::Named(type_name) => self.check_value(text, type_name, None),
            _ => Ok(()),
        }
    }
}
