//! Contains the definition of [`InternalError`].

use applica_constraint::ConstraintKind;

/// An invariant violation of the metadata collaborators.
///
/// These errors mean the providers handed out corrupted or incompatible
/// metadata; the operation that discovered one is aborted since any result
/// it could produce would be meaningless.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error,
)]
#[allow(missing_docs)]
pub enum InternalError {
    #[error(
        "the accepted type of the validator `{validator}` of `@{kind}` is \
         unbound"
    )]
    UnboundValidatorType { kind: ConstraintKind, validator: String },

    #[error(
        "`@{kind}` is composed of `@{composing}`, which has no definition"
    )]
    UnresolvedComposingConstraint {
        kind: ConstraintKind,
        composing: ConstraintKind,
    },

    #[error("the composition of constraints forms a cycle: {}", cycle(.0))]
    CyclicComposition(Vec<ConstraintKind>),
}

fn cycle(kinds: &[ConstraintKind]) -> String {
    kinds.iter().map(|x| format!("@{x}")).collect::<Vec<_>>().join(" -> ")
}
