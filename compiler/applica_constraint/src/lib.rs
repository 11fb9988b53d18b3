//! The data model of constraint declarations and the collaborator interfaces
//! that supply their metadata.
//!
//! A [`ConstraintKind`] is the stable identity of a constraint such as
//! `Size`. Its [`definition::KindDefinition`] describes the attributes it
//! declares, the declarations it is composed of, and the validator
//! implementations able to evaluate it. Definitions reach the resolver
//! through the [`DeclarationProvider`] and [`ValidatorProvider`] traits; the
//! [`table::ConstraintTable`] implements both over in-memory definitions.

use std::sync::Arc;

use derive_more::Display;

pub mod attribute;
pub mod builtin;
pub mod declaration;
pub mod definition;
pub mod site;
pub mod table;
pub mod target;

pub use declaration::ConstraintDeclaration;
pub use definition::{KindDefinition, ValidatorImplementation};
pub use site::{Signature, Site};
pub use table::ConstraintTable;
pub use target::{ConstraintTarget, ValidationTarget};

/// The stable identity of a constraint, e.g. `Size` or `Pattern`.
///
/// Cloning is cheap; the name is shared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub struct ConstraintKind(Arc<str>);

impl ConstraintKind {
    /// Creates a kind with the given name.
    #[must_use]
    pub fn new(name: &str) -> Self { Self(Arc::from(name)) }

    /// Gets the name of the kind.
    #[must_use]
    pub fn name(&self) -> &str { &self.0 }
}

impl From<&str> for ConstraintKind {
    fn from(value: &str) -> Self { Self::new(value) }
}

impl From<String> for ConstraintKind {
    fn from(value: String) -> Self { Self(Arc::from(value)) }
}

/// Supplies the declaration-site metadata of constraint kinds.
pub trait DeclarationProvider: Send + Sync {
    /// Gets the definition of the kind, or `None` if the kind is unknown.
    fn definition(&self, kind: &ConstraintKind) -> Option<Arc<KindDefinition>>;
}

/// Supplies the validator implementations of constraint kinds.
pub trait ValidatorProvider: Send + Sync {
    /// Gets the validator implementations of the kind, or `None` if the kind
    /// is unknown.
    fn validators(
        &self,
        kind: &ConstraintKind,
    ) -> Option<Arc<[ValidatorImplementation]>>;
}

#[cfg(test)]
mod test;
