//! The type-hierarchy oracle consulted by the constraint resolver.
//!
//! A [`TypeCatalog`] is an explicit, enumerable description of the types of
//! the host program: every definition lists its direct supertypes and the
//! catalog answers assignability, supertype and erasure queries over
//! [`TypeDescriptor`]s. The catalog is immutable once built and can be shared
//! freely between threads.

use std::collections::{BTreeSet, HashMap};

use getset::{CopyGetters, Getters};

pub mod builder;
pub mod descriptor;
pub mod parse;
pub mod standard;

pub use builder::{BuildError, TypeCatalogBuilder};
pub use descriptor::{Declared, Primitive, TypeArgument, TypeDescriptor};

/// Identifies a [`TypeDefinition`] within a [`TypeCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeID(usize);

impl TypeID {
    /// Returns the index of the definition in the catalog.
    #[must_use]
    pub const fn index(self) -> usize { self.0 }
}

/// A class or interface definition of the host program.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct TypeDefinition {
    /// The ID of the definition.
    #[get_copy = "pub"]
    id: TypeID,

    /// The name of the definition.
    #[get = "pub"]
    name: String,

    /// The number of generic parameters the definition declares.
    #[get_copy = "pub"]
    arity: usize,

    /// The explicitly declared direct supertypes.
    #[get = "pub"]
    parents: Vec<TypeID>,
}

/// The type-hierarchy oracle. See the [crate-level](crate) documentation.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    definitions: Vec<TypeDefinition>,
    ids_by_name: HashMap<String, TypeID>,

    // transitive supertypes of each definition, excluding itself
    ancestors: Vec<BTreeSet<TypeID>>,

    root: Option<TypeID>,
    boxing: HashMap<Primitive, TypeID>,
    array_supertypes: Vec<TypeID>,
}

impl TypeCatalog {
    /// Gets the ID of the definition with the given name.
    #[must_use]
    pub fn get_id(&self, name: &str) -> Option<TypeID> {
        self.ids_by_name.get(name).copied()
    }

    /// Gets the definition with the given ID.
    #[must_use]
    pub fn get(&self, id: TypeID) -> Option<&TypeDefinition> {
        self.definitions.get(id.0)
    }

    /// Returns every definition of the catalog.
    pub fn definitions(&self) -> impl ExactSizeIterator<Item = &TypeDefinition> {
        self.definitions.iter()
    }

    /// Creates a raw descriptor of the definition with the given name.
    #[must_use]
    pub fn declared(&self, name: &str) -> Option<TypeDescriptor> {
        self.get_id(name).map(TypeDescriptor::declared)
    }

    /// Returns the wrapper type the primitive boxes into.
    #[must_use]
    pub fn boxed(&self, primitive: Primitive) -> Option<TypeDescriptor> {
        self.boxing.get(&primitive).copied().map(TypeDescriptor::declared)
    }

    /// Checks if the definition `sub` is `sup` or one of its transitive
    /// subtypes.
    #[must_use]
    pub fn is_subtype_definition(&self, sub: TypeID, sup: TypeID) -> bool {
        sub == sup
            || self.ancestors.get(sub.0).is_some_and(|x| x.contains(&sup))
    }

    /// Checks if a value of type `from` may stand in for type `to`.
    #[must_use]
    pub fn is_assignable(&self, from: &TypeDescriptor, to: &TypeDescriptor) -> bool {
        if from == to {
            return true;
        }

        match (from, to) {
            (TypeDescriptor::Declared(from), TypeDescriptor::Declared(to)) => {
                self.is_declared_assignable(from, to)
            }

            (TypeDescriptor::Primitive(primitive), _) => self
                .boxed(*primitive)
                .is_some_and(|boxed| self.is_assignable(&boxed, to)),

            (TypeDescriptor::Array(from), TypeDescriptor::Array(to)) => {
                from.is_reference()
                    && to.is_reference()
                    && self.is_assignable(from, to)
            }

            (TypeDescriptor::Array(_), TypeDescriptor::Declared(to)) => {
                to.arguments.iter().all(|x| x.is_wildcard())
                    && self
                        .array_supertypes
                        .iter()
                        .any(|x| self.is_subtype_definition(*x, to.id))
            }

            _ => false,
        }
    }

    fn is_declared_assignable(&self, from: &Declared, to: &Declared) -> bool {
        if !self.is_subtype_definition(from.id, to.id) {
            return false;
        }

        if to.is_raw() {
            return true;
        }

        if from.id == to.id {
            // raw to parameterized is an unchecked conversion
            return from.is_raw()
                || (from.arguments.len() == to.arguments.len()
                    && to
                        .arguments
                        .iter()
                        .zip(&from.arguments)
                        .all(|(to, from)| to.contains(from)));
        }

        // arguments are not substituted through the supertype chain
        to.arguments.iter().all(TypeArgument::is_wildcard)
    }

    /// Returns the direct supertypes of `ty` (single level).
    #[must_use]
    pub fn supertypes(&self, ty: &TypeDescriptor) -> Vec<TypeDescriptor> {
        match ty {
            TypeDescriptor::Declared(declared) => self
                .get(declared.id)
                .map(|definition| {
                    builder::direct_parents(definition, self.root)
                        .into_iter()
                        .map(TypeDescriptor::declared)
                        .collect()
                })
                .unwrap_or_default(),

            TypeDescriptor::Array(component) => match &**component {
                TypeDescriptor::Declared(declared)
                    if Some(declared.id) != self.root =>
                {
                    self.supertypes(component)
                        .into_iter()
                        .map(TypeDescriptor::array_of)
                        .collect()
                }

                TypeDescriptor::Array(_) => self
                    .supertypes(component)
                    .into_iter()
                    .map(TypeDescriptor::array_of)
                    .collect(),

                _ => self
                    .array_supertypes
                    .iter()
                    .copied()
                    .map(TypeDescriptor::declared)
                    .collect(),
            },

            TypeDescriptor::Primitive(_) | TypeDescriptor::Void => Vec::new(),
        }
    }

    /// Strips the generic-parameter binding, returning the raw type.
    #[must_use]
    pub fn erase(&self, ty: &TypeDescriptor) -> TypeDescriptor {
        let erased = ty.erase();
        debug_assert!(self.contains(&erased));
        erased
    }

    /// Checks whether every definition `ty` refers to belongs to the catalog.
    #[must_use]
    pub fn contains(&self, ty: &TypeDescriptor) -> bool {
        match ty {
            TypeDescriptor::Declared(declared) => {
                declared.id.0 < self.definitions.len()
                    && declared.arguments.iter().all(|argument| match argument {
                        TypeArgument::Wildcard => true,
                        TypeArgument::Type(ty) => self.contains(ty),
                    })
            }
            TypeDescriptor::Array(component) => self.contains(component),
            TypeDescriptor::Primitive(_) | TypeDescriptor::Void => true,
        }
    }

    /// Checks whether `ty` is the untyped aggregate: the raw root type or an
    /// array of it. Cross-parameter validators receive every parameter of a
    /// callable packed into a value of this type.
    #[must_use]
    pub fn is_untyped_aggregate(&self, ty: &TypeDescriptor) -> bool {
        let Some(root) = self.root else {
            return false;
        };

        match ty {
            TypeDescriptor::Declared(declared) => declared.id == root,
            TypeDescriptor::Array(component) => {
                component.as_declared().is_some_and(|x| x.id == root && x.is_raw())
            }
            TypeDescriptor::Primitive(_) | TypeDescriptor::Void => false,
        }
    }

    /// Returns a value that displays `ty` with the names of this catalog.
    #[must_use]
    pub const fn display<'a>(&'a self, ty: &'a TypeDescriptor) -> DisplayType<'a> {
        DisplayType { catalog: self, ty }
    }
}

/// Displays a [`TypeDescriptor`] in source form, e.g. `Map<String, ?>[]`.
#[derive(Debug, Clone, Copy)]
pub struct DisplayType<'a> {
    catalog: &'a TypeCatalog,
    ty: &'a TypeDescriptor,
}

impl std::fmt::Display for DisplayType<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.ty {
            TypeDescriptor::Declared(declared) => {
                match self.catalog.get(declared.id) {
                    Some(definition) => f.write_str(&definition.name)?,
                    None => write!(f, "{{unknown#{}}}", declared.id.0)?,
                }

                if declared.is_raw() {
                    return Ok(());
                }

                f.write_str("<")?;
                for (index, argument) in declared.arguments.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }

                    match argument {
                        TypeArgument::Wildcard => f.write_str("?")?,
                        TypeArgument::Type(ty) => {
                            write!(f, "{}", self.catalog.display(ty))?;
                        }
                    }
                }
                f.write_str(">")
            }
            TypeDescriptor::Array(component) => {
                write!(f, "{}[]", self.catalog.display(component))
            }
            TypeDescriptor::Primitive(primitive) => {
                f.write_str(primitive.keyword())
            }
            TypeDescriptor::Void => f.write_str("void"),
        }
    }
}

#[cfg(test)]
mod test;
