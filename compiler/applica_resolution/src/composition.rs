//! Contains the definition of [`CompositionGraph`].

use std::sync::Arc;

use applica_constraint::{
    ConstraintDeclaration, ConstraintKind, DeclarationProvider, KindDefinition,
};
use dashmap::{mapref::entry::Entry, DashMap};

use crate::error::InternalError;

/// Maps constraint declarations to the declarations they are directly
/// composed of.
///
/// Composition is a property of the kind, so the children are cached per
/// kind. The parts of a multi-valued wrapper are a property of the instance
/// and are never cached.
pub struct CompositionGraph {
    provider: Arc<dyn DeclarationProvider>,
    children: DashMap<ConstraintKind, Arc<[ConstraintDeclaration]>>,
}

impl std::fmt::Debug for CompositionGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositionGraph")
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

impl CompositionGraph {
    /// Creates a graph over the definitions of the given provider.
    #[must_use]
    pub fn new(provider: Arc<dyn DeclarationProvider>) -> Self {
        Self { provider, children: DashMap::new() }
    }

    /// Gets the definition of the kind from the declaration provider.
    #[must_use]
    pub fn definition(&self, kind: &ConstraintKind) -> Option<Arc<KindDefinition>> {
        self.provider.definition(kind)
    }

    /// Gets the declarations `declaration` is directly composed of, in
    /// declaration order: the parts of a multi-valued wrapper, or else the
    /// composing declarations of its kind.
    ///
    /// # Errors
    ///
    /// Returns [`InternalError::UnresolvedComposingConstraint`] if the kind
    /// is composed of a kind the provider doesn't define.
    pub fn direct_composing_declarations(
        &self,
        declaration: &ConstraintDeclaration,
    ) -> Result<Arc<[ConstraintDeclaration]>, InternalError> {
        if declaration.is_multi_valued() {
            return Ok(declaration.parts().clone());
        }

        let kind = declaration.kind();

        if let Some(children) = self.children.get(kind) {
            return Ok(children.value().clone());
        }

        let children: Arc<[_]> = match self.provider.definition(kind) {
            Some(definition) => {
                for composing in &definition.composing {
                    if self.provider.definition(composing.kind()).is_none() {
                        return Err(InternalError::UnresolvedComposingConstraint {
                            kind: kind.clone(),
                            composing: composing.kind().clone(),
                        });
                    }
                }

                definition.composing.iter().cloned().collect()
            }
            None => Arc::from([]),
        };

        Ok(match self.children.entry(kind.clone()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                log::debug!(
                    "published {} composing declaration(s) of `@{kind}`",
                    children.len()
                );
                entry.insert(children).value().clone()
            }
        })
    }
}
