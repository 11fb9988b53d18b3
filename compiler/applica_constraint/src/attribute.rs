//! Contains the attributes declared by constraint kinds and the values
//! supplied by declarations.

use applica_type_catalog::{TypeCatalog, TypeDescriptor};
use enum_as_inner::EnumAsInner;

use crate::target::ConstraintTarget;

/// The attribute selecting the target of a dual-target constraint.
pub const APPLIES_TO: &str = "validationAppliesTo";

/// The attribute holding the message template.
pub const MESSAGE: &str = "message";

/// The attribute holding the validation groups.
pub const GROUPS: &str = "groups";

/// The attribute holding the payload types.
pub const PAYLOAD: &str = "payload";

/// The attributes every constraint kind must declare.
pub const REQUIRED: [&str; 3] = [MESSAGE, GROUPS, PAYLOAD];

/// The type of an attribute declared by a constraint kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner)]
#[allow(missing_docs)]
pub enum AttributeType {
    String,
    Integer,
    Boolean,
    ConstraintTarget,
    Type,
    Array(Box<AttributeType>),
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => f.write_str("String"),
            Self::Integer => f.write_str("int"),
            Self::Boolean => f.write_str("boolean"),
            Self::ConstraintTarget => f.write_str("ConstraintTarget"),
            Self::Type => f.write_str("Class"),
            Self::Array(element) => write!(f, "{element}[]"),
        }
    }
}

/// A value given to an attribute, either by a declaration or as the default
/// of an [`AttributeDefinition`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner)]
#[allow(missing_docs)]
pub enum AttributeValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Target(ConstraintTarget),
    Type(TypeDescriptor),
    Array(Vec<AttributeValue>),
}

impl AttributeValue {
    /// Checks whether the value inhabits the attribute type.
    #[must_use]
    pub fn conforms_to(&self, ty: &AttributeType) -> bool {
        match (self, ty) {
            (Self::String(_), AttributeType::String)
            | (Self::Integer(_), AttributeType::Integer)
            | (Self::Boolean(_), AttributeType::Boolean)
            | (Self::Target(_), AttributeType::ConstraintTarget)
            | (Self::Type(_), AttributeType::Type) => true,

            (Self::Array(values), AttributeType::Array(element)) => {
                values.iter().all(|x| x.conforms_to(element))
            }

            _ => false,
        }
    }

    /// Returns a value that displays `self` with the type names of the
    /// catalog.
    #[must_use]
    pub const fn display<'a>(
        &'a self,
        catalog: &'a TypeCatalog,
    ) -> DisplayValue<'a> {
        DisplayValue { value: self, catalog }
    }
}

/// Displays an [`AttributeValue`] in declaration form.
#[derive(Debug, Clone, Copy)]
pub struct DisplayValue<'a> {
    value: &'a AttributeValue,
    catalog: &'a TypeCatalog,
}

impl std::fmt::Display for DisplayValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value {
            AttributeValue::String(value) => write!(f, "{value:?}"),
            AttributeValue::Integer(value) => write!(f, "{value}"),
            AttributeValue::Boolean(value) => write!(f, "{value}"),
            AttributeValue::Target(target) => write!(f, "{target}"),
            AttributeValue::Type(ty) => {
                write!(f, "{}.class", self.catalog.display(ty))
            }
            AttributeValue::Array(values) => {
                f.write_str("{")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value.display(self.catalog))?;
                }
                f.write_str("}")
            }
        }
    }
}

/// An attribute declared by a constraint kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeDefinition {
    /// The name of the attribute.
    pub name: String,

    /// The declared type of the attribute.
    pub ty: AttributeType,

    /// The value used when a declaration doesn't supply one.
    pub default: Option<AttributeValue>,
}

impl AttributeDefinition {
    /// Creates an attribute without a default value.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: AttributeType) -> Self {
        Self { name: name.into(), ty, default: None }
    }

    /// Sets the default value of the attribute.
    #[must_use]
    pub fn with_default(mut self, default: AttributeValue) -> Self {
        self.default = Some(default);
        self
    }

    /// The conventional `validationAppliesTo` attribute defaulting to
    /// [`ConstraintTarget::Implicit`].
    #[must_use]
    pub fn applies_to() -> Self {
        Self::new(APPLIES_TO, AttributeType::ConstraintTarget)
            .with_default(AttributeValue::Target(ConstraintTarget::Implicit))
    }
}
