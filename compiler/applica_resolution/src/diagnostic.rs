//! Contains the diagnostic types related to the resolution process.

use applica_constraint::{
    attribute::{AttributeType, AttributeValue, APPLIES_TO},
    ConstraintKind, ValidationTarget,
};
use applica_diagnostic::{Diagnostic, Report};
use applica_type_catalog::{TypeCatalog, TypeDescriptor};
use derive_new::new;
use enum_as_inner::EnumAsInner;

use crate::UnresolvableReason;

/// A kind supporting both validation targets doesn't declare the
/// `validationAppliesTo` attribute.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct MissingAppliesToAttribute {
    /// The ill-formed kind.
    pub kind: ConstraintKind,
}

impl Report<&TypeCatalog> for MissingAppliesToAttribute {
    fn report(&self, _: &TypeCatalog) -> Diagnostic {
        Diagnostic::error(format!(
            "`@{}` has validators for both the annotated element and the \
             parameters but doesn't declare the `{APPLIES_TO}` attribute",
            self.kind
        ))
        .with_help(format!(
            "declare `ConstraintTarget {APPLIES_TO}() default \
             ConstraintTarget.IMPLICIT`"
        ))
    }
}

/// The `validationAppliesTo` attribute of a kind doesn't default to
/// `IMPLICIT`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct InvalidAppliesToDefault {
    /// The ill-formed kind.
    pub kind: ConstraintKind,

    /// The declared default, if any.
    pub found: Option<AttributeValue>,
}

impl Report<&TypeCatalog> for InvalidAppliesToDefault {
    fn report(&self, catalog: &TypeCatalog) -> Diagnostic {
        let diagnostic = Diagnostic::error(format!(
            "the `{APPLIES_TO}` attribute of `@{}` must default to `IMPLICIT`",
            self.kind
        ));

        match &self.found {
            Some(found) => diagnostic
                .with_related(format!("found `{}`", found.display(catalog))),
            None => diagnostic.with_related("the attribute has no default"),
        }
    }
}

/// The `validationAppliesTo` attribute of a kind isn't a constraint target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct InvalidAppliesToType {
    /// The ill-formed kind.
    pub kind: ConstraintKind,

    /// The declared type of the attribute.
    pub found: AttributeType,
}

impl Report<&TypeCatalog> for InvalidAppliesToType {
    fn report(&self, _: &TypeCatalog) -> Diagnostic {
        Diagnostic::error(format!(
            "the `{APPLIES_TO}` attribute of `@{}` must be of type \
             `{}`, but is `{}`",
            self.kind,
            AttributeType::ConstraintTarget,
            self.found
        ))
    }
}

/// A kind supporting only one validation target declares the
/// `validationAppliesTo` attribute.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct UnexpectedAppliesToAttribute {
    /// The ill-formed kind.
    pub kind: ConstraintKind,

    /// The only target the kind supports.
    pub target: ValidationTarget,
}

impl Report<&TypeCatalog> for UnexpectedAppliesToAttribute {
    fn report(&self, _: &TypeCatalog) -> Diagnostic {
        Diagnostic::error(format!(
            "`@{}` declares the `{APPLIES_TO}` attribute but only supports \
             the `{}` target",
            self.kind, self.target
        ))
        .with_help("remove the attribute")
    }
}

/// A kind lacks one of the attributes every constraint must declare.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct MissingRequiredAttribute {
    /// The ill-formed kind.
    pub kind: ConstraintKind,

    /// The name of the missing attribute.
    pub attribute: String,
}

impl Report<&TypeCatalog> for MissingRequiredAttribute {
    fn report(&self, _: &TypeCatalog) -> Diagnostic {
        Diagnostic::error(format!(
            "`@{}` doesn't declare the required `{}` attribute",
            self.kind, self.attribute
        ))
    }
}

/// A violation of the structural rules of a constraint kind, found once per
/// kind regardless of where the kind is used.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumAsInner,
    derive_more::From,
)]
#[allow(missing_docs)]
pub enum StructuralError {
    MissingAppliesToAttribute(MissingAppliesToAttribute),
    InvalidAppliesToDefault(InvalidAppliesToDefault),
    InvalidAppliesToType(InvalidAppliesToType),
    UnexpectedAppliesToAttribute(UnexpectedAppliesToAttribute),
    MissingRequiredAttribute(MissingRequiredAttribute),
}

impl StructuralError {
    /// Gets the kind the error is about.
    #[must_use]
    pub fn kind(&self) -> &ConstraintKind {
        match self {
            Self::MissingAppliesToAttribute(error) => &error.kind,
            Self::InvalidAppliesToDefault(error) => &error.kind,
            Self::InvalidAppliesToType(error) => &error.kind,
            Self::UnexpectedAppliesToAttribute(error) => &error.kind,
            Self::MissingRequiredAttribute(error) => &error.kind,
        }
    }
}

impl Report<&TypeCatalog> for StructuralError {
    fn report(&self, catalog: &TypeCatalog) -> Diagnostic {
        match self {
            Self::MissingAppliesToAttribute(error) => error.report(catalog),
            Self::InvalidAppliesToDefault(error) => error.report(catalog),
            Self::InvalidAppliesToType(error) => error.report(catalog),
            Self::UnexpectedAppliesToAttribute(error) => error.report(catalog),
            Self::MissingRequiredAttribute(error) => error.report(catalog),
        }
    }
}

/// No validator of the kind accepts the element type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct NotApplicable {
    /// The kind whose validators reject the type: the declaration's own
    /// kind, or the first failing kind it is composed of.
    pub kind: ConstraintKind,

    /// The type of the decorated element.
    pub element_type: TypeDescriptor,
}

impl Report<&TypeCatalog> for NotApplicable {
    fn report(&self, catalog: &TypeCatalog) -> Diagnostic {
        Diagnostic::error(format!(
            "`@{}` is not applicable to the type `{}`",
            self.kind,
            catalog.display(&self.element_type)
        ))
        .with_help(
            "the constraint and its composing constraints need a validator \
             accepting the type or one of its supertypes",
        )
    }
}

/// More than one equally specific validator accepts the element type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct AmbiguousValidators {
    /// The kind whose validators compete: the declaration's own kind, or the
    /// first failing kind it is composed of.
    pub kind: ConstraintKind,

    /// The type of the decorated element.
    pub element_type: TypeDescriptor,

    /// The names of the competing validators of the kind.
    pub validators: Vec<String>,
}

impl Report<&TypeCatalog> for AmbiguousValidators {
    fn report(&self, catalog: &TypeCatalog) -> Diagnostic {
        let mut diagnostic = Diagnostic::error(format!(
            "the validators of `@{}` are ambiguous for the type `{}`",
            self.kind,
            catalog.display(&self.element_type)
        ));

        for validator in &self.validators {
            diagnostic =
                diagnostic.with_related(format!("`{validator}` applies"));
        }

        diagnostic
    }
}

/// The validation target of a declaration can't be determined.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct UnresolvedTarget {
    /// The kind of the declaration.
    pub kind: ConstraintKind,

    /// Why the target can't be determined.
    pub reason: UnresolvableReason,
}

impl Report<&TypeCatalog> for UnresolvedTarget {
    fn report(&self, _: &TypeCatalog) -> Diagnostic {
        let kind = &self.kind;

        match self.reason {
            UnresolvableReason::MissingAppliesTo => Diagnostic::error(format!(
                "can't tell whether `@{kind}` applies to the annotated element \
                 or to the parameters"
            ))
            .with_help(format!("`@{kind}` must declare `{APPLIES_TO}`")),

            UnresolvableReason::AmbiguousImplicitTarget => {
                Diagnostic::error(format!(
                    "the implicit target of `@{kind}` is ambiguous on a \
                     callable with parameters and a return value"
                ))
                .with_help(format!(
                    "set `{APPLIES_TO}` to `RETURN_VALUE` or `PARAMETERS`"
                ))
            }

            UnresolvableReason::InvalidAppliesToValue => {
                Diagnostic::error(format!(
                    "the `{APPLIES_TO}` value of `@{kind}` is not a \
                     constraint target"
                ))
            }
        }
    }
}

/// More than one validator of the kind supports the parameters target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct AmbiguousCrossParameterValidators {
    /// The kind of the declaration.
    pub kind: ConstraintKind,

    /// The names of the cross-parameter validators.
    pub validators: Vec<String>,
}

impl Report<&TypeCatalog> for AmbiguousCrossParameterValidators {
    fn report(&self, _: &TypeCatalog) -> Diagnostic {
        let mut diagnostic = Diagnostic::error(format!(
            "`@{}` has more than one cross-parameter validator",
            self.kind
        ));

        for validator in &self.validators {
            diagnostic = diagnostic.with_related(format!("`{validator}`"));
        }

        diagnostic
    }
}

/// The cross-parameter validator of the kind doesn't accept the untyped
/// aggregate of the parameters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct InvalidCrossParameterType {
    /// The kind of the declaration.
    pub kind: ConstraintKind,

    /// The name of the cross-parameter validator.
    pub validator: String,

    /// The type the validator accepts.
    pub accepted_type: TypeDescriptor,
}

impl Report<&TypeCatalog> for InvalidCrossParameterType {
    fn report(&self, catalog: &TypeCatalog) -> Diagnostic {
        Diagnostic::error(format!(
            "the cross-parameter validator `{}` of `@{}` accepts `{}`",
            self.validator,
            self.kind,
            catalog.display(&self.accepted_type)
        ))
        .with_help("cross-parameter validators must accept `Object` or `Object[]`")
    }
}

/// A constraint targeting the parameters is placed on a site without
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct CrossParameterWithoutParameters {
    /// The kind of the declaration.
    pub kind: ConstraintKind,
}

impl Report<&TypeCatalog> for CrossParameterWithoutParameters {
    fn report(&self, _: &TypeCatalog) -> Diagnostic {
        Diagnostic::error(format!(
            "`@{}` targets the parameters of an element without parameters",
            self.kind
        ))
    }
}

/// The kind of a declaration is neither defined nor validated.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct UnknownConstraintKind {
    /// The unknown kind.
    pub kind: ConstraintKind,
}

impl Report<&TypeCatalog> for UnknownConstraintKind {
    fn report(&self, _: &TypeCatalog) -> Diagnostic {
        Diagnostic::error(format!("`@{}` is not a known constraint", self.kind))
    }
}

/// A declaration gives a value to an attribute its kind doesn't declare.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct UnknownAttribute {
    /// The kind of the declaration.
    pub kind: ConstraintKind,

    /// The name of the undeclared attribute.
    pub attribute: String,
}

impl Report<&TypeCatalog> for UnknownAttribute {
    fn report(&self, _: &TypeCatalog) -> Diagnostic {
        Diagnostic::warning(format!(
            "`@{}` declares no attribute `{}`; the value is ignored",
            self.kind, self.attribute
        ))
    }
}

/// A declaration gives an attribute a value of the wrong type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct InvalidAttributeValue {
    /// The kind of the declaration.
    pub kind: ConstraintKind,

    /// The name of the attribute.
    pub attribute: String,

    /// The type the kind declares for the attribute.
    pub expected: AttributeType,

    /// The value given by the declaration.
    pub found: AttributeValue,
}

impl Report<&TypeCatalog> for InvalidAttributeValue {
    fn report(&self, catalog: &TypeCatalog) -> Diagnostic {
        Diagnostic::error(format!(
            "the `{}` attribute of `@{}` expects a value of type `{}`, found \
             `{}`",
            self.attribute,
            self.kind,
            self.expected,
            self.found.display(catalog)
        ))
    }
}

/// An issue of one use of a constraint at a declaration site.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumAsInner,
    derive_more::From,
)]
#[allow(missing_docs)]
pub enum Error {
    NotApplicable(NotApplicable),
    AmbiguousValidators(AmbiguousValidators),
    UnresolvedTarget(UnresolvedTarget),
    AmbiguousCrossParameterValidators(AmbiguousCrossParameterValidators),
    InvalidCrossParameterType(InvalidCrossParameterType),
    CrossParameterWithoutParameters(CrossParameterWithoutParameters),
    UnknownConstraintKind(UnknownConstraintKind),
    UnknownAttribute(UnknownAttribute),
    InvalidAttributeValue(InvalidAttributeValue),
}

impl Report<&TypeCatalog> for Error {
    fn report(&self, catalog: &TypeCatalog) -> Diagnostic {
        match self {
            Self::NotApplicable(error) => error.report(catalog),
            Self::AmbiguousValidators(error) => error.report(catalog),
            Self::UnresolvedTarget(error) => error.report(catalog),
            Self::AmbiguousCrossParameterValidators(error) => {
                error.report(catalog)
            }
            Self::InvalidCrossParameterType(error) => error.report(catalog),
            Self::CrossParameterWithoutParameters(error) => {
                error.report(catalog)
            }
            Self::UnknownConstraintKind(error) => error.report(catalog),
            Self::UnknownAttribute(error) => error.report(catalog),
            Self::InvalidAttributeValue(error) => error.report(catalog),
        }
    }
}
