//! Contains the metadata of constraint kinds and their validator
//! implementations, as supplied by the providers.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use applica_type_catalog::TypeDescriptor;

use crate::{
    attribute::{
        AttributeDefinition, AttributeType, AttributeValue, APPLIES_TO, GROUPS,
        MESSAGE, PAYLOAD,
    },
    declaration::ConstraintDeclaration,
    target::ValidationTarget,
    ConstraintKind,
};

/// A validator implementation as the validator catalog provider knows it.
///
/// The accepted type is `None` when the provider couldn't determine which
/// value type the implementation is bound to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValidatorImplementation {
    /// The name of the implementation.
    pub name: String,

    /// The value type the implementation validates.
    pub accepted_type: Option<TypeDescriptor>,

    /// The targets the implementation declares to support.
    pub targets: BTreeSet<ValidationTarget>,
}

impl ValidatorImplementation {
    /// Creates an implementation validating the annotated element.
    #[must_use]
    pub fn new(name: impl Into<String>, accepted_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            accepted_type: Some(accepted_type),
            targets: BTreeSet::from([ValidationTarget::AnnotatedElement]),
        }
    }

    /// Creates an implementation validating the parameters of a callable.
    #[must_use]
    pub fn cross_parameter(
        name: impl Into<String>,
        accepted_type: TypeDescriptor,
    ) -> Self {
        Self {
            targets: BTreeSet::from([ValidationTarget::Parameters]),
            ..Self::new(name, accepted_type)
        }
    }

    /// Creates an implementation whose accepted type binding is unknown.
    #[must_use]
    pub fn unbound(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accepted_type: None,
            targets: BTreeSet::from([ValidationTarget::AnnotatedElement]),
        }
    }

    /// Replaces the supported targets.
    #[must_use]
    pub fn with_targets(
        mut self,
        targets: impl IntoIterator<Item = ValidationTarget>,
    ) -> Self {
        self.targets = targets.into_iter().collect();
        self
    }
}

/// The declaration-site metadata of a constraint kind: its attributes, the
/// declarations it is composed of, and its validator implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindDefinition {
    /// The kind being defined.
    pub kind: ConstraintKind,

    /// The attributes declared by the kind, by name.
    pub attributes: BTreeMap<String, AttributeDefinition>,

    /// The composing declarations, in declaration order.
    pub composing: Vec<ConstraintDeclaration>,

    /// The validator implementations of the kind.
    pub validators: Arc<[ValidatorImplementation]>,
}

impl KindDefinition {
    /// Creates a definition without attributes, composition, or validators.
    #[must_use]
    pub fn new(kind: impl Into<ConstraintKind>) -> Self {
        Self {
            kind: kind.into(),
            attributes: BTreeMap::new(),
            composing: Vec::new(),
            validators: Arc::from([]),
        }
    }

    /// Declares the `message`, `groups`, and `payload` attributes every
    /// constraint kind carries.
    #[must_use]
    pub fn with_standard_attributes(self) -> Self {
        let message =
            AttributeValue::String(format!("{{constraints.{}.message}}", self.kind));

        self.with_attribute(
            AttributeDefinition::new(MESSAGE, AttributeType::String)
                .with_default(message),
        )
        .with_attribute(
            AttributeDefinition::new(
                GROUPS,
                AttributeType::Array(Box::new(AttributeType::Type)),
            )
            .with_default(AttributeValue::Array(Vec::new())),
        )
        .with_attribute(
            AttributeDefinition::new(
                PAYLOAD,
                AttributeType::Array(Box::new(AttributeType::Type)),
            )
            .with_default(AttributeValue::Array(Vec::new())),
        )
    }

    /// Declares an attribute, replacing a previous one of the same name.
    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeDefinition) -> Self {
        self.attributes.insert(attribute.name.clone(), attribute);
        self
    }

    /// Appends a composing declaration.
    #[must_use]
    pub fn composed_of(mut self, declaration: ConstraintDeclaration) -> Self {
        self.composing.push(declaration);
        self
    }

    /// Appends validator implementations.
    #[must_use]
    pub fn validated_by(
        mut self,
        validators: impl IntoIterator<Item = ValidatorImplementation>,
    ) -> Self {
        self.validators =
            self.validators.iter().cloned().chain(validators).collect();
        self
    }

    /// Gets the declared `validationAppliesTo` attribute.
    #[must_use]
    pub fn applies_to(&self) -> Option<&AttributeDefinition> {
        self.attributes.get(APPLIES_TO)
    }
}
