//! Contains the validation target enumerations.

/// What a constraint validates once it has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValidationTarget {
    /// The constraint validates the decorated value itself (a field, a
    /// parameter, or the return value of a callable).
    AnnotatedElement,

    /// The constraint validates the aggregate of a callable's parameters.
    Parameters,
}

impl std::fmt::Display for ValidationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AnnotatedElement => f.write_str("ANNOTATED_ELEMENT"),
            Self::Parameters => f.write_str("PARAMETERS"),
        }
    }
}

/// The value domain of the `validationAppliesTo` attribute: how a declaration
/// of a dual-target constraint tells which target it means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstraintTarget {
    /// The target is inferred from the shape of the declaration site.
    Implicit,

    /// The constraint applies to the return value of the callable.
    ReturnValue,

    /// The constraint applies to the parameters of the callable.
    Parameters,
}

impl ConstraintTarget {
    /// All the constraint targets.
    pub const ALL: [Self; 3] = [Self::Implicit, Self::ReturnValue, Self::Parameters];

    /// The spelling used in declarations.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Implicit => "IMPLICIT",
            Self::ReturnValue => "RETURN_VALUE",
            Self::Parameters => "PARAMETERS",
        }
    }

    /// Looks up the constraint target spelled `name`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|x| x.name() == name)
    }
}

impl std::fmt::Display for ConstraintTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
