//! Narrows a set of matched types down to the most specific ones.

use std::collections::BTreeSet;

use applica_type_catalog::{TypeCatalog, TypeDescriptor};
use derive_new::new;

/// Keeps the most specific types of a candidate set according to the subtype
/// order of a [`TypeCatalog`].
///
/// One survivor means the candidates resolve unambiguously; several
/// survivors are unrelated siblings that tie.
#[derive(Debug, Clone, Copy, new)]
pub struct AmbiguityPolicy<'a> {
    catalog: &'a TypeCatalog,
}

impl AmbiguityPolicy<'_> {
    /// Returns `true` if `sub` is assignable to `sup` but not the other way
    /// around.
    #[must_use]
    pub fn is_strict_subtype(
        &self,
        sub: &TypeDescriptor,
        sup: &TypeDescriptor,
    ) -> bool {
        self.catalog.is_assignable(sub, sup)
            && !self.catalog.is_assignable(sup, sub)
    }

    /// Removes every candidate that has a strict subtype among the other
    /// candidates.
    ///
    /// The result is a subset of `candidates` in which no member is a strict
    /// subtype of another.
    #[must_use]
    pub fn keep_most_specific(
        &self,
        candidates: &BTreeSet<TypeDescriptor>,
    ) -> BTreeSet<TypeDescriptor> {
        candidates
            .iter()
            .filter(|candidate| {
                !candidates.iter().any(|other| {
                    other != *candidate
                        && self.is_strict_subtype(other, candidate)
                })
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod test;
