//! Decides which validators apply to a constraint declaration and which
//! target the declaration validates.
//!
//! The [`Resolver`] answers its questions from three shared, lazily
//! populated caches: the [`ValidatorRegistry`] (descriptors per kind), the
//! [`CompositionGraph`] (composing declarations per kind), and its own
//! cache of structural errors per kind. Every cache publishes a key at most
//! once; the resolver can be shared between threads by reference.
//!
//! Resolution outcomes are values. Only violations of the collaborators'
//! invariants are returned as [`InternalError`].

use std::{collections::BTreeSet, sync::Arc};

use applica_constraint::{
    attribute::{AttributeType, AttributeValue, APPLIES_TO, REQUIRED},
    ConstraintDeclaration, ConstraintKind, ConstraintTarget, KindDefinition,
    Site, ValidationTarget,
};
use applica_handler::Handler;
use applica_type_catalog::{TypeCatalog, TypeDescriptor};
use dashmap::{mapref::entry::Entry, DashMap};
use enum_as_inner::EnumAsInner;

pub mod ambiguity;
pub mod composition;
pub mod diagnostic;
pub mod error;
pub mod registry;

pub use ambiguity::AmbiguityPolicy;
pub use composition::CompositionGraph;
pub use diagnostic::{Error, StructuralError};
pub use error::InternalError;
pub use registry::{ValidatorDescriptor, ValidatorRegistry};

/// The outcome of checking a declaration against an element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResolutionResult {
    /// Exactly one most specific validator applies.
    Allowed,

    /// No validator applies.
    Disallowed,

    /// Several equally specific validators apply.
    Ambiguous,
}

/// The descriptor-level outcome of selecting a validator for an element
/// type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner)]
pub enum Selection {
    /// The most specific validator.
    Unique(ValidatorDescriptor),

    /// The equally specific validators competing for the element type.
    Ambiguous(Vec<ValidatorDescriptor>),

    /// No validator accepts the element type.
    NotFound,
}

/// Why the validation target of a declaration can't be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnresolvableReason {
    /// The kind supports both targets but neither the declaration nor the
    /// kind supplies a `validationAppliesTo` value.
    MissingAppliesTo,

    /// The target is implicit but the site is a callable with both
    /// parameters and a return value.
    AmbiguousImplicitTarget,

    /// The `validationAppliesTo` value isn't a constraint target.
    InvalidAppliesToValue,
}

/// The validation target of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner)]
pub enum TargetResolution {
    /// The declaration validates this target.
    Resolved(ValidationTarget),

    /// The target can't be determined.
    Unresolvable(UnresolvableReason),
}

/// Answers applicability and validation-target questions about constraint
/// declarations.
///
/// Every operation examines the kinds it touches; the first examination of
/// a kind runs its structural checks and reports the violations to the
/// handler. A kind is reported once per resolver, even when examined by
/// several threads at the same time.
pub struct Resolver<'a> {
    catalog: &'a TypeCatalog,
    registry: &'a ValidatorRegistry,
    graph: &'a CompositionGraph,
    handler: &'a dyn Handler<StructuralError>,
    structural: DashMap<ConstraintKind, Arc<[StructuralError]>>,
}

impl std::fmt::Debug for Resolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("registry", self.registry)
            .field("graph", self.graph)
            .field("structural", &self.structural)
            .finish_non_exhaustive()
    }
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over the given caches, reporting structural errors
    /// to `handler`.
    #[must_use]
    pub fn new(
        catalog: &'a TypeCatalog,
        registry: &'a ValidatorRegistry,
        graph: &'a CompositionGraph,
        handler: &'a dyn Handler<StructuralError>,
    ) -> Self {
        Self { catalog, registry, graph, handler, structural: DashMap::new() }
    }

    /// Gets the type catalog the resolver works with.
    #[must_use]
    pub const fn catalog(&self) -> &'a TypeCatalog { self.catalog }

    /// Checks whether the declaration, together with everything it is
    /// composed of, has exactly one most specific validator for the element
    /// type.
    ///
    /// Composing declarations are checked first, in declaration order; the
    /// first one that isn't [`ResolutionResult::Allowed`] decides the
    /// result. A kind without validators of its own is allowed when it is
    /// composed of at least one declaration.
    ///
    /// # Errors
    ///
    /// Returns [`InternalError::CyclicComposition`] if the declaration is
    /// transitively composed of its own kind, or any error of the registry
    /// and the composition graph.
    pub fn check_applicability(
        &self,
        declaration: &ConstraintDeclaration,
        element_type: &TypeDescriptor,
    ) -> Result<ResolutionResult, InternalError> {
        self.applicability(declaration, element_type).map(|(result, _)| result)
    }

    /// Same as [`Self::check_applicability`] but also returns the kind whose
    /// own validators decided the result: the declaration's kind, or the
    /// kind of the first failing composing declaration.
    fn applicability(
        &self,
        declaration: &ConstraintDeclaration,
        element_type: &TypeDescriptor,
    ) -> Result<(ResolutionResult, ConstraintKind), InternalError> {
        self.check_applicability_on_path(
            declaration,
            element_type,
            &mut Vec::new(),
        )
    }

    fn check_applicability_on_path(
        &self,
        declaration: &ConstraintDeclaration,
        element_type: &TypeDescriptor,
        active: &mut Vec<ConstraintKind>,
    ) -> Result<(ResolutionResult, ConstraintKind), InternalError> {
        let kind = declaration.kind();
        self.examine(kind)?;

        // the parts of a wrapper share its kind
        if declaration.is_multi_valued() {
            return self.check_applicability_of(declaration, element_type, active);
        }

        if let Some(position) = active.iter().position(|x| x == kind) {
            let mut cycle = active[position..].to_vec();
            cycle.push(kind.clone());

            return Err(InternalError::CyclicComposition(cycle));
        }

        active.push(kind.clone());
        let result = self.check_applicability_of(declaration, element_type, active);
        active.pop();

        result
    }

    fn check_applicability_of(
        &self,
        declaration: &ConstraintDeclaration,
        element_type: &TypeDescriptor,
        active: &mut Vec<ConstraintKind>,
    ) -> Result<(ResolutionResult, ConstraintKind), InternalError> {
        let kind = declaration.kind();
        let children = self.graph.direct_composing_declarations(declaration)?;

        for child in children.iter() {
            let (result, decided_by) =
                self.check_applicability_on_path(child, element_type, active)?;

            if result != ResolutionResult::Allowed {
                log::trace!(
                    "`@{kind}` on `{}`: composing `@{decided_by}` is {result:?}",
                    self.catalog.display(element_type),
                );
                return Ok((result, decided_by));
            }
        }

        let descriptors = self.registry.lookup(kind)?;
        let narrowed = self.narrow(&descriptors, element_type);

        let result = match narrowed.len() {
            0 if descriptors.is_empty() && !children.is_empty() => {
                ResolutionResult::Allowed
            }
            0 => ResolutionResult::Disallowed,
            1 => ResolutionResult::Allowed,
            _ => ResolutionResult::Ambiguous,
        };

        log::trace!(
            "`@{kind}` on `{}` is {result:?}",
            self.catalog.display(element_type)
        );

        Ok((result, kind.clone()))
    }

    /// Gets the most specific accepted types among the descriptors accepting
    /// the element type.
    fn narrow(
        &self,
        descriptors: &[ValidatorDescriptor],
        element_type: &TypeDescriptor,
    ) -> BTreeSet<TypeDescriptor> {
        let matched = descriptors
            .iter()
            .filter(|x| self.catalog.is_assignable(element_type, &x.accepted_type))
            .map(|x| x.accepted_type.clone())
            .collect::<BTreeSet<_>>();

        AmbiguityPolicy::new(self.catalog).keep_most_specific(&matched)
    }

    /// Selects the validator of the kind that evaluates the element type.
    ///
    /// Looks at the validators of the kind itself only, not at its composing
    /// declarations. When several validators accept the single most specific
    /// type, the one registered first is selected.
    ///
    /// # Errors
    ///
    /// See [`ValidatorRegistry::lookup`].
    pub fn select_validator(
        &self,
        kind: &ConstraintKind,
        element_type: &TypeDescriptor,
    ) -> Result<Selection, InternalError> {
        self.examine(kind)?;

        let descriptors = self.registry.lookup(kind)?;
        let narrowed = self.narrow(&descriptors, element_type);
        let mut winners =
            descriptors.iter().filter(|x| narrowed.contains(&x.accepted_type));

        Ok(match narrowed.len() {
            0 => Selection::NotFound,
            1 => winners.next().cloned().map_or(Selection::NotFound, Selection::Unique),
            _ => Selection::Ambiguous(winners.cloned().collect()),
        })
    }

    /// Gets the union of the targets supported by the validators of the
    /// kind; a kind whose validators declare no target validates the
    /// annotated element.
    ///
    /// # Errors
    ///
    /// See [`ValidatorRegistry::lookup`].
    pub fn get_supported_validation_targets(
        &self,
        kind: &ConstraintKind,
    ) -> Result<BTreeSet<ValidationTarget>, InternalError> {
        self.examine(kind)?;
        self.supported_targets(kind)
    }

    fn supported_targets(
        &self,
        kind: &ConstraintKind,
    ) -> Result<BTreeSet<ValidationTarget>, InternalError> {
        let mut targets = self
            .registry
            .lookup(kind)?
            .iter()
            .flat_map(|x| x.targets.iter().copied())
            .collect::<BTreeSet<_>>();

        if targets.is_empty() {
            targets.insert(ValidationTarget::AnnotatedElement);
        }

        Ok(targets)
    }

    /// Determines which target the declaration validates at the site.
    ///
    /// A kind with a single supported target always validates it. Otherwise
    /// the `validationAppliesTo` value of the declaration, or the kind's
    /// default for it, decides; `IMPLICIT` is inferred from the shape of the
    /// site.
    ///
    /// # Errors
    ///
    /// See [`ValidatorRegistry::lookup`].
    pub fn resolve_validation_target(
        &self,
        site: &Site,
        declaration: &ConstraintDeclaration,
    ) -> Result<TargetResolution, InternalError> {
        let kind = declaration.kind();
        self.examine(kind)?;

        let targets = self.supported_targets(kind)?;
        if let (1, Some(target)) = (targets.len(), targets.first()) {
            return Ok(TargetResolution::Resolved(*target));
        }

        let value = declaration.applies_to().cloned().or_else(|| {
            self.graph
                .definition(kind)
                .and_then(|x| x.applies_to().and_then(|x| x.default.clone()))
        });

        Ok(match value {
            None => {
                TargetResolution::Unresolvable(UnresolvableReason::MissingAppliesTo)
            }
            Some(AttributeValue::Target(ConstraintTarget::Parameters)) => {
                TargetResolution::Resolved(ValidationTarget::Parameters)
            }
            Some(AttributeValue::Target(ConstraintTarget::ReturnValue)) => {
                TargetResolution::Resolved(ValidationTarget::AnnotatedElement)
            }
            Some(AttributeValue::Target(ConstraintTarget::Implicit)) => {
                Self::infer_target(site)
            }
            Some(_) => TargetResolution::Unresolvable(
                UnresolvableReason::InvalidAppliesToValue,
            ),
        })
    }

    fn infer_target(site: &Site) -> TargetResolution {
        if site.parameters().is_empty() {
            TargetResolution::Resolved(ValidationTarget::AnnotatedElement)
        } else if site.returns_void() {
            TargetResolution::Resolved(ValidationTarget::Parameters)
        } else {
            TargetResolution::Unresolvable(
                UnresolvableReason::AmbiguousImplicitTarget,
            )
        }
    }

    /// Checks the validators of the kind that support the parameters target:
    /// at most one may exist, and it must accept the untyped aggregate.
    ///
    /// # Errors
    ///
    /// See [`ValidatorRegistry::lookup`].
    pub fn check_cross_parameter_types(
        &self,
        kind: &ConstraintKind,
    ) -> Result<ResolutionResult, InternalError> {
        self.examine(kind)?;

        let descriptors = self.registry.lookup(kind)?;
        let cross_parameter = Self::cross_parameter(&descriptors);

        Ok(match cross_parameter.as_slice() {
            [] => ResolutionResult::Allowed,
            [descriptor] => {
                if self.catalog.is_untyped_aggregate(&descriptor.accepted_type) {
                    ResolutionResult::Allowed
                } else {
                    ResolutionResult::Disallowed
                }
            }
            _ => ResolutionResult::Ambiguous,
        })
    }

    /// Checks the explicit attribute values of the declaration against the
    /// attributes its kind declares. `validationAppliesTo` is left to target
    /// resolution.
    fn diagnose_attributes(
        definition: &KindDefinition,
        declaration: &ConstraintDeclaration,
        errors: &mut Vec<Error>,
    ) {
        use crate::diagnostic::{InvalidAttributeValue, UnknownAttribute};

        let kind = declaration.kind();

        for (name, value) in declaration.attributes() {
            if name == APPLIES_TO {
                continue;
            }

            match definition.attributes.get(name) {
                None => errors.push(
                    UnknownAttribute::new(kind.clone(), name.clone()).into(),
                ),

                Some(attribute) if !value.conforms_to(&attribute.ty) => errors
                    .push(
                        InvalidAttributeValue::new(
                            kind.clone(),
                            name.clone(),
                            attribute.ty.clone(),
                            value.clone(),
                        )
                        .into(),
                    ),

                Some(_) => {}
            }
        }
    }

    fn cross_parameter(
        descriptors: &[ValidatorDescriptor],
    ) -> Vec<&ValidatorDescriptor> {
        descriptors
            .iter()
            .filter(|x| x.supports(ValidationTarget::Parameters))
            .collect()
    }

    /// Gets the structural errors of the kind, running the structural checks
    /// on the first examination.
    ///
    /// The errors are reported to the handler by the examination that
    /// publishes them and never again.
    ///
    /// # Errors
    ///
    /// See [`ValidatorRegistry::lookup`].
    pub fn well_formedness(
        &self,
        kind: &ConstraintKind,
    ) -> Result<Arc<[StructuralError]>, InternalError> {
        if let Some(errors) = self.structural.get(kind) {
            return Ok(errors.value().clone());
        }

        let errors: Arc<[_]> = self.structural_errors(kind)?.into();

        let published = match self.structural.entry(kind.clone()) {
            Entry::Occupied(entry) => return Ok(entry.get().clone()),
            Entry::Vacant(entry) => entry.insert(errors).value().clone(),
        };

        for error in published.iter() {
            log::warn!("`@{kind}` is ill-formed: {error:?}");
            self.handler.receive(error.clone());
        }

        Ok(published)
    }

    fn examine(&self, kind: &ConstraintKind) -> Result<(), InternalError> {
        self.well_formedness(kind).map(|_| ())
    }

    fn structural_errors(
        &self,
        kind: &ConstraintKind,
    ) -> Result<Vec<StructuralError>, InternalError> {
        use crate::diagnostic::{
            InvalidAppliesToDefault, InvalidAppliesToType,
            MissingAppliesToAttribute, MissingRequiredAttribute,
            UnexpectedAppliesToAttribute,
        };

        let Some(definition) = self.graph.definition(kind) else {
            return Ok(Vec::new());
        };

        let targets = self.supported_targets(kind)?;
        let mut errors = Vec::new();

        match (targets.len(), definition.applies_to()) {
            (1, None) => {}

            (1, Some(_)) => {
                if let Some(target) = targets.first() {
                    errors.push(
                        UnexpectedAppliesToAttribute::new(kind.clone(), *target)
                            .into(),
                    );
                }
            }

            (_, None) => {
                errors.push(MissingAppliesToAttribute::new(kind.clone()).into());
            }

            (_, Some(attribute)) => {
                if attribute.ty != AttributeType::ConstraintTarget {
                    errors.push(
                        InvalidAppliesToType::new(
                            kind.clone(),
                            attribute.ty.clone(),
                        )
                        .into(),
                    );
                } else if attribute.default
                    != Some(AttributeValue::Target(ConstraintTarget::Implicit))
                {
                    errors.push(
                        InvalidAppliesToDefault::new(
                            kind.clone(),
                            attribute.default.clone(),
                        )
                        .into(),
                    );
                }
            }
        }

        for attribute in REQUIRED {
            if !definition.attributes.contains_key(attribute) {
                errors.push(
                    MissingRequiredAttribute::new(
                        kind.clone(),
                        attribute.to_string(),
                    )
                    .into(),
                );
            }
        }

        Ok(errors)
    }

    /// Enumerates every issue of the declaration at the site.
    ///
    /// The parts of a multi-valued wrapper are diagnosed one by one.
    ///
    /// # Errors
    ///
    /// Any [`InternalError`] aborts the diagnosis.
    pub fn diagnose(
        &self,
        site: &Site,
        declaration: &ConstraintDeclaration,
    ) -> Result<Vec<Error>, InternalError> {
        let mut errors = Vec::new();
        self.diagnose_into(site, declaration, &mut errors)?;

        Ok(errors)
    }

    fn diagnose_into(
        &self,
        site: &Site,
        declaration: &ConstraintDeclaration,
        errors: &mut Vec<Error>,
    ) -> Result<(), InternalError> {
        use crate::diagnostic::{
            AmbiguousCrossParameterValidators, AmbiguousValidators,
            CrossParameterWithoutParameters, InvalidCrossParameterType,
            NotApplicable, UnknownConstraintKind, UnresolvedTarget,
        };

        if declaration.is_multi_valued() {
            for part in declaration.parts().iter() {
                self.diagnose_into(site, part, errors)?;
            }

            return Ok(());
        }

        let kind = declaration.kind();
        let definition = self.graph.definition(kind);

        if definition.is_none() && self.registry.lookup(kind)?.is_empty() {
            errors.push(UnknownConstraintKind::new(kind.clone()).into());
            return Ok(());
        }

        if let Some(definition) = definition {
            Self::diagnose_attributes(&definition, declaration, errors);
        }

        match self.resolve_validation_target(site, declaration)? {
            TargetResolution::Unresolvable(reason) => {
                errors.push(UnresolvedTarget::new(kind.clone(), reason).into());
            }

            TargetResolution::Resolved(ValidationTarget::AnnotatedElement) => {
                let element_type = site.element_type();
                let (result, decided_by) =
                    self.applicability(declaration, element_type)?;

                match result {
                    ResolutionResult::Allowed => {}

                    ResolutionResult::Disallowed => errors.push(
                        NotApplicable::new(decided_by, element_type.clone())
                            .into(),
                    ),

                    ResolutionResult::Ambiguous => {
                        let selection =
                            self.select_validator(&decided_by, element_type)?;
                        let validators = match selection {
                            Selection::Ambiguous(descriptors) => descriptors
                                .into_iter()
                                .map(|x| x.validator)
                                .collect(),
                            Selection::Unique(_) | Selection::NotFound => {
                                Vec::new()
                            }
                        };

                        errors.push(
                            AmbiguousValidators::new(
                                decided_by,
                                element_type.clone(),
                                validators,
                            )
                            .into(),
                        );
                    }
                }
            }

            TargetResolution::Resolved(ValidationTarget::Parameters) => {
                if site.parameters().is_empty() {
                    errors.push(
                        CrossParameterWithoutParameters::new(kind.clone()).into(),
                    );
                    return Ok(());
                }

                let descriptors = self.registry.lookup(kind)?;
                let cross_parameter = Self::cross_parameter(&descriptors);

                match self.check_cross_parameter_types(kind)? {
                    ResolutionResult::Allowed => {}

                    ResolutionResult::Ambiguous => errors.push(
                        AmbiguousCrossParameterValidators::new(
                            kind.clone(),
                            cross_parameter
                                .iter()
                                .map(|x| x.validator.clone())
                                .collect(),
                        )
                        .into(),
                    ),

                    ResolutionResult::Disallowed => {
                        errors.extend(cross_parameter.first().map(|x| {
                            Error::from(InvalidCrossParameterType::new(
                                kind.clone(),
                                x.validator.clone(),
                                x.accepted_type.clone(),
                            ))
                        }));
                    }
                }
            }
        }

        Ok(())
    }
}
