//! Contains the definition of [`ValidatorRegistry`].

use std::{collections::BTreeSet, sync::Arc};

use applica_constraint::{
    builtin, ConstraintKind, KindDefinition, ValidationTarget,
    ValidatorImplementation, ValidatorProvider,
};
use applica_type_catalog::{TypeCatalog, TypeDescriptor};
use dashmap::{mapref::entry::Entry, DashMap};

use crate::error::InternalError;

/// One validator implementation bound to the value type it accepts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValidatorDescriptor {
    /// The kind the validator evaluates.
    pub kind: ConstraintKind,

    /// The name of the validator implementation.
    pub validator: String,

    /// The erased value type the validator accepts.
    pub accepted_type: TypeDescriptor,

    /// The validation targets the validator supports.
    pub targets: BTreeSet<ValidationTarget>,
}

impl ValidatorDescriptor {
    /// Binds an implementation supplied by the validator provider.
    ///
    /// # Errors
    ///
    /// Returns [`InternalError::UnboundValidatorType`] if the provider
    /// couldn't determine the accepted type of the implementation.
    pub fn bind(
        kind: &ConstraintKind,
        implementation: &ValidatorImplementation,
    ) -> Result<Self, InternalError> {
        let accepted_type = implementation.accepted_type.as_ref().ok_or_else(
            || InternalError::UnboundValidatorType {
                kind: kind.clone(),
                validator: implementation.name.clone(),
            },
        )?;

        Ok(Self {
            kind: kind.clone(),
            validator: implementation.name.clone(),
            accepted_type: accepted_type.erase(),
            targets: implementation.targets.clone(),
        })
    }

    /// Returns `true` if the validator supports the given target.
    #[must_use]
    pub fn supports(&self, target: ValidationTarget) -> bool {
        self.targets.contains(&target)
    }
}

/// Maps constraint kinds to the descriptors of their validators.
///
/// The descriptor list of a kind is published once and never changes
/// afterwards, whether it was registered explicitly or computed from the
/// [`ValidatorProvider`] on the first lookup.
pub struct ValidatorRegistry {
    provider: Arc<dyn ValidatorProvider>,
    descriptors: DashMap<ConstraintKind, Arc<[ValidatorDescriptor]>>,
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("descriptors", &self.descriptors)
            .finish_non_exhaustive()
    }
}

impl ValidatorRegistry {
    /// Creates a registry that computes descriptor lists lazily from the
    /// given provider.
    #[must_use]
    pub fn new(provider: Arc<dyn ValidatorProvider>) -> Self {
        Self { provider, descriptors: DashMap::new() }
    }

    /// Creates a registry with the built-in constraint kinds registered
    /// eagerly.
    ///
    /// # Errors
    ///
    /// See [`Self::with_definitions`].
    pub fn with_builtins(
        provider: Arc<dyn ValidatorProvider>,
        catalog: &TypeCatalog,
    ) -> Result<Self, InternalError> {
        Self::with_definitions(provider, builtin::definitions(catalog))
    }

    /// Creates a registry with the validators of the given definitions
    /// registered eagerly; the first definition of a kind wins.
    ///
    /// # Errors
    ///
    /// Returns [`InternalError::UnboundValidatorType`] if a validator of a
    /// definition has no bound accepted type.
    pub fn with_definitions(
        provider: Arc<dyn ValidatorProvider>,
        definitions: impl IntoIterator<Item = KindDefinition>,
    ) -> Result<Self, InternalError> {
        let registry = Self::new(provider);

        for definition in definitions {
            let descriptors = definition
                .validators
                .iter()
                .map(|x| ValidatorDescriptor::bind(&definition.kind, x))
                .collect::<Result<Vec<_>, _>>()?;

            registry.register(definition.kind, descriptors);
        }

        Ok(registry)
    }

    /// Registers the descriptor list of a kind.
    ///
    /// # Returns
    ///
    /// Returns `false` and keeps the existing list if the kind already has
    /// one.
    pub fn register(
        &self,
        kind: ConstraintKind,
        descriptors: impl IntoIterator<Item = ValidatorDescriptor>,
    ) -> bool {
        match self.descriptors.entry(kind) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(descriptors.into_iter().collect());
                true
            }
        }
    }

    /// Gets the descriptor list of the kind, computing and publishing it
    /// from the provider on the first access.
    ///
    /// A kind unknown to the provider has no descriptors.
    ///
    /// # Errors
    ///
    /// See [`ValidatorDescriptor::bind`].
    pub fn lookup(
        &self,
        kind: &ConstraintKind,
    ) -> Result<Arc<[ValidatorDescriptor]>, InternalError> {
        if let Some(descriptors) = self.descriptors.get(kind) {
            return Ok(descriptors.value().clone());
        }

        let descriptors = match self.provider.validators(kind) {
            Some(implementations) => implementations
                .iter()
                .map(|x| ValidatorDescriptor::bind(kind, x))
                .collect::<Result<Arc<[_]>, _>>()?,
            None => Arc::from([]),
        };

        Ok(match self.descriptors.entry(kind.clone()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                log::debug!(
                    "published {} validator descriptor(s) of `@{kind}`",
                    descriptors.len()
                );
                entry.insert(descriptors).value().clone()
            }
        })
    }
}

#[cfg(test)]
mod test;
