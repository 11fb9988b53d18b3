//! Contains the definition of [`ConstraintDeclaration`].

use std::{collections::BTreeMap, sync::Arc};

use getset::Getters;

use crate::{
    attribute::{AttributeValue, APPLIES_TO},
    ConstraintKind,
};

/// One concrete use of a constraint kind at a declaration site.
///
/// A multi-valued declaration (e.g. `Size.List`) wraps several declarations
/// of the same kind; its parts are full declarations on their own.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Getters)]
pub struct ConstraintDeclaration {
    /// The kind of the declared constraint.
    #[get = "pub"]
    kind: ConstraintKind,

    /// The attribute values given explicitly by the declaration.
    #[get = "pub"]
    attributes: BTreeMap<String, AttributeValue>,

    multi_valued: bool,

    /// The wrapped declarations of a multi-valued wrapper, in declaration
    /// order. Always empty for an ordinary declaration.
    #[get = "pub"]
    parts: Arc<[ConstraintDeclaration]>,
}

impl ConstraintDeclaration {
    /// Creates a declaration of the given kind without explicit attributes.
    #[must_use]
    pub fn new(kind: impl Into<ConstraintKind>) -> Self {
        Self {
            kind: kind.into(),
            attributes: BTreeMap::new(),
            multi_valued: false,
            parts: Arc::from([]),
        }
    }

    /// Creates a multi-valued wrapper declaration holding `parts`.
    #[must_use]
    pub fn multi_valued(
        kind: impl Into<ConstraintKind>,
        parts: impl IntoIterator<Item = Self>,
    ) -> Self {
        Self {
            kind: kind.into(),
            attributes: BTreeMap::new(),
            multi_valued: true,
            parts: parts.into_iter().collect(),
        }
    }

    /// Returns `true` if the declaration is a multi-valued wrapper.
    #[must_use]
    pub const fn is_multi_valued(&self) -> bool { self.multi_valued }

    /// Sets an explicit attribute value.
    #[must_use]
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        value: AttributeValue,
    ) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Gets the explicit value of the attribute named `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Gets the explicit `validationAppliesTo` value.
    #[must_use]
    pub fn applies_to(&self) -> Option<&AttributeValue> {
        self.attribute(APPLIES_TO)
    }
}
