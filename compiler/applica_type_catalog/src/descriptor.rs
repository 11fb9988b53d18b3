//! Contains the definition of [`TypeDescriptor`] and its building blocks.

use enum_as_inner::EnumAsInner;

use crate::TypeID;

/// The primitive (non-reference) types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Primitive {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
}

impl Primitive {
    /// All the primitive types.
    pub const ALL: [Self; 8] = [
        Self::Boolean,
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Char,
    ];

    /// The keyword spelling of the primitive type.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Char => "char",
        }
    }

    /// Looks up the primitive type spelled by `keyword`.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|x| x.keyword() == keyword)
    }
}

/// A generic argument of a [`Declared`] type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner)]
pub enum TypeArgument {
    /// The unbounded wildcard `?`; matches any argument.
    Wildcard,

    /// A concrete type argument.
    Type(TypeDescriptor),
}

impl TypeArgument {
    /// Checks whether `self`, as the argument of an assignment target,
    /// accepts `argument` from the source. Type arguments are invariant.
    #[must_use]
    pub fn contains(&self, argument: &Self) -> bool {
        match self {
            Self::Wildcard => true,
            Self::Type(_) => self == argument,
        }
    }
}

/// A type introduced by a type definition of the catalog, possibly with
/// generic arguments bound.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Declared {
    /// The definition the type refers to.
    pub id: TypeID,

    /// The generic arguments; empty for a raw (or non-generic) type.
    pub arguments: Vec<TypeArgument>,
}

impl Declared {
    /// Creates a raw declared type.
    #[must_use]
    pub const fn raw(id: TypeID) -> Self { Self { id, arguments: Vec::new() } }

    /// Returns `true` if no generic argument is bound.
    #[must_use]
    pub fn is_raw(&self) -> bool { self.arguments.is_empty() }
}

/// An opaque, immutable handle describing a type known to a
/// [`crate::TypeCatalog`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner)]
pub enum TypeDescriptor {
    /// A class or interface type.
    Declared(Declared),

    /// An array of the component type.
    Array(Box<TypeDescriptor>),

    /// A primitive type.
    Primitive(Primitive),

    /// The absence of a value, used as the return type of callables that
    /// return nothing.
    Void,
}

impl TypeDescriptor {
    /// Creates a raw declared type descriptor.
    #[must_use]
    pub const fn declared(id: TypeID) -> Self { Self::Declared(Declared::raw(id)) }

    /// Creates an array whose components are `self`.
    #[must_use]
    pub fn array_of(self) -> Self { Self::Array(Box::new(self)) }

    /// Returns `true` if values of this type are references (declared types
    /// and arrays).
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Declared(_) | Self::Array(_))
    }

    /// Strips every generic argument binding, including the ones of array
    /// components.
    #[must_use]
    pub fn erase(&self) -> Self {
        match self {
            Self::Declared(declared) => Self::declared(declared.id),
            Self::Array(component) => component.erase().array_of(),
            Self::Primitive(primitive) => Self::Primitive(*primitive),
            Self::Void => Self::Void,
        }
    }
}

impl From<Primitive> for TypeDescriptor {
    fn from(value: Primitive) -> Self { Self::Primitive(value) }
}

impl From<Declared> for TypeDescriptor {
    fn from(value: Declared) -> Self { Self::Declared(value) }
}
