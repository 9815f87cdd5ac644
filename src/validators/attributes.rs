//! Attribute validation
//!
//! Matches the attributes present on a node against the attribute
//! declarations of its complex type.

use indexmap::IndexMap;

use super::exceptions::{ContentError, ValueError};
use super::schemas::{AttributeDecl, AttributeType};
use super::validation::Validator;

impl Validator {
    /// Validate a node's attributes against declared ones
    ///
    /// Present attributes are reported in document order, missing required
    /// ones afterwards in declaration order.
    pub(crate) fn validate_attributes(
        &self,
        present: &IndexMap<String, String>,
        declared: &[AttributeDecl],
    ) -> Vec<ContentError> {
        let mut errors = Vec::new();

        for (name, value) in present {
            match declared.iter().find(|decl| &decl.name == name) {
                Some(decl) => {
                    if let Err(source) = self.check_attribute_value(value, decl) {
                        errors.push(ContentError::InvalidAttribute {
                            attribute: name.clone(),
                            source,
                        });
                    }
                }
                None => errors.push(ContentError::UnexpectedAttribute(name.clone())),
            }
        }

        errors.extend(
            declared
                .iter()
                .filter(|decl| decl.is_required() && !present.contains_key(&decl.name))
                .map(|decl| ContentError::MissingRequiredAttribute(decl.name.clone())),
        );

        errors
    }

    fn check_attribute_value(&self, value: &str, decl: &AttributeDecl) -> Result<(), ValueError> {
        match &decl.type_def {
            AttributeType::Named(type_name) => self.check_value(value, type_name, None),
            AttributeType::Inline(simple) => match simple.restriction() {
                Some(restriction) => self.check_value(value, &restriction.base, Some(restriction)),
                None => Ok(()),
            },
            AttributeType::Unspecified => Ok(()),
        }
    }
}
