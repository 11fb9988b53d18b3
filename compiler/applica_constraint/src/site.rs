//! Contains the shapes of the sites a declaration can be placed on.

use applica_type_catalog::TypeDescriptor;
use enum_as_inner::EnumAsInner;

/// The signature of a callable declaration site.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Signature {
    /// The parameter types in declaration order.
    pub parameters: Vec<TypeDescriptor>,

    /// The return type; constructors return their declaring type.
    pub return_type: TypeDescriptor,
}

/// The element a constraint declaration decorates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner)]
pub enum Site {
    /// A plain value: a field, a local, or a single parameter.
    Value(TypeDescriptor),

    /// A method or constructor.
    Callable(Signature),
}

impl Site {
    /// Creates a callable site.
    #[must_use]
    pub const fn callable(
        parameters: Vec<TypeDescriptor>,
        return_type: TypeDescriptor,
    ) -> Self {
        Self::Callable(Signature { parameters, return_type })
    }

    /// The type of the decorated value: the value type itself, or the return
    /// type of a callable.
    #[must_use]
    pub const fn element_type(&self) -> &TypeDescriptor {
        match self {
            Self::Value(ty) => ty,
            Self::Callable(signature) => &signature.return_type,
        }
    }

    /// Returns the parameters of the site; empty for a value site.
    #[must_use]
    pub fn parameters(&self) -> &[TypeDescriptor] {
        match self {
            Self::Value(_) => &[],
            Self::Callable(signature) => &signature.parameters,
        }
    }

    /// Returns `true` if the site is a callable returning nothing.
    #[must_use]
    pub const fn returns_void(&self) -> bool {
        matches!(
            self,
            Self::Callable(Signature { return_type: TypeDescriptor::Void, .. })
        )
    }
}
