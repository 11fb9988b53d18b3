//! Contains the definition of [`ConstraintTable`].

use std::{collections::HashMap, sync::Arc};

use applica_type_catalog::TypeCatalog;

use crate::{
    builtin, ConstraintKind, DeclarationProvider, KindDefinition,
    ValidatorImplementation, ValidatorProvider,
};

/// An in-memory table of constraint kind definitions.
///
/// Implements both [`DeclarationProvider`] and [`ValidatorProvider`].
#[derive(Debug, Clone, Default)]
pub struct ConstraintTable {
    definitions: HashMap<ConstraintKind, Arc<KindDefinition>>,
}

impl ConstraintTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Creates a table holding the built-in constraint kinds whose accepted
    /// types are declared in the catalog.
    #[must_use]
    pub fn with_builtins(catalog: &TypeCatalog) -> Self {
        let mut table = Self::new();

        for definition in builtin::definitions(catalog) {
            table.insert(definition);
        }

        table
    }

    /// Inserts a definition.
    ///
    /// # Returns
    ///
    /// Returns `false` and keeps the existing definition if the kind is
    /// already defined.
    pub fn insert(&mut self, definition: KindDefinition) -> bool {
        match self.definitions.entry(definition.kind.clone()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(Arc::new(definition));
                true
            }
        }
    }

    /// Returns the number of defined kinds.
    #[must_use]
    pub fn len(&self) -> usize { self.definitions.len() }

    /// Returns `true` if no kind is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.definitions.is_empty() }
}

impl DeclarationProvider for ConstraintTable {
    fn definition(&self, kind: &ConstraintKind) -> Option<Arc<KindDefinition>> {
        self.definitions.get(kind).cloned()
    }
}

impl ValidatorProvider for ConstraintTable {
    fn validators(
        &self,
        kind: &ConstraintKind,
    ) -> Option<Arc<[ValidatorImplementation]>> {
        self.definitions.get(kind).map(|x| x.validators.clone())
    }
}
