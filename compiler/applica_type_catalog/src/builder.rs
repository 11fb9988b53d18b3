//! Contains the [`TypeCatalogBuilder`] used to assemble a [`TypeCatalog`].

use std::collections::{BTreeSet, HashMap};

use crate::{Primitive, TypeCatalog, TypeDefinition, TypeID};

/// An error returned by [`TypeCatalogBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error)]
#[allow(missing_docs)]
pub enum BuildError {
    #[error("the type `{0}` is declared more than once")]
    DuplicateType(String),

    #[error("the type `{name}` referenced by `{referenced_by}` is not declared")]
    UnknownType {
        /// The name that couldn't be resolved.
        name: String,

        /// What referred to the name.
        referenced_by: String,
    },

    #[error("the type hierarchy is cyclic: {}", .0.join(" -> "))]
    CyclicHierarchy(Vec<String>),
}

#[derive(Debug, Clone)]
struct Declaration {
    name: String,
    arity: usize,
    parents: Vec<String>,
}

/// Assembles a [`TypeCatalog`] from an explicit description of every type
/// and its direct supertypes.
///
/// Names are resolved and the transitive supertype closure is computed once
/// in [`Self::build`].
#[derive(Debug, Clone, Default)]
pub struct TypeCatalogBuilder {
    declarations: Vec<Declaration>,
    root: Option<String>,
    boxing: Vec<(Primitive, String)>,
    array_supertypes: Vec<String>,
}

impl TypeCatalogBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Declares a non-generic type with its direct supertypes.
    pub fn declare<'a>(
        &mut self,
        name: impl Into<String>,
        parents: impl IntoIterator<Item = &'a str>,
    ) -> &mut Self {
        self.declare_generic(name, 0, parents)
    }

    /// Declares a type with `arity` generic parameters and its direct
    /// supertypes.
    pub fn declare_generic<'a>(
        &mut self,
        name: impl Into<String>,
        arity: usize,
        parents: impl IntoIterator<Item = &'a str>,
    ) -> &mut Self {
        self.declarations.push(Declaration {
            name: name.into(),
            arity,
            parents: parents.into_iter().map(str::to_owned).collect(),
        });
        self
    }

    /// Sets the root type: the implicit supertype of every declared type
    /// without explicit parents.
    pub fn root(&mut self, name: impl Into<String>) -> &mut Self {
        self.root = Some(name.into());
        self
    }

    /// Declares the wrapper type a primitive boxes into.
    pub fn boxing(
        &mut self,
        primitive: Primitive,
        name: impl Into<String>,
    ) -> &mut Self {
        self.boxing.push((primitive, name.into()));
        self
    }

    /// Declares a type every array type is assignable to.
    pub fn array_supertype(&mut self, name: impl Into<String>) -> &mut Self {
        self.array_supertypes.push(name.into());
        self
    }

    /// Resolves the names and builds the catalog.
    ///
    /// # Errors
    ///
    /// See [`BuildError`] for more information.
    pub fn build(&self) -> Result<TypeCatalog, BuildError> {
        let mut ids_by_name = HashMap::new();

        for (index, declaration) in self.declarations.iter().enumerate() {
            if ids_by_name
                .insert(declaration.name.clone(), TypeID(index))
                .is_some()
            {
                return Err(BuildError::DuplicateType(
                    declaration.name.clone(),
                ));
            }
        }

        let resolve = |name: &str, referenced_by: &str| {
            ids_by_name.get(name).copied().ok_or_else(|| {
                BuildError::UnknownType {
                    name: name.to_owned(),
                    referenced_by: referenced_by.to_owned(),
                }
            })
        };

        let root = self
            .root
            .as_deref()
            .map(|name| resolve(name, "the root declaration"))
            .transpose()?;

        let mut definitions = Vec::with_capacity(self.declarations.len());
        for (index, declaration) in self.declarations.iter().enumerate() {
            let parents = declaration
                .parents
                .iter()
                .map(|parent| resolve(parent, &declaration.name))
                .collect::<Result<Vec<_>, _>>()?;

            definitions.push(TypeDefinition {
                id: TypeID(index),
                name: declaration.name.clone(),
                arity: declaration.arity,
                parents,
            });
        }

        let boxing = self
            .boxing
            .iter()
            .map(|(primitive, name)| {
                Ok((*primitive, resolve(name, primitive.keyword())?))
            })
            .collect::<Result<HashMap<_, _>, BuildError>>()?;

        let array_supertypes = self
            .array_supertypes
            .iter()
            .map(|name| resolve(name, "the array supertypes"))
            .collect::<Result<Vec<_>, _>>()?;

        let ancestors = compute_ancestors(&definitions, root)?;

        log::debug!(
            "built type catalog with {} types (root: {:?})",
            definitions.len(),
            self.root
        );

        Ok(TypeCatalog {
            definitions,
            ids_by_name,
            ancestors,
            root,
            boxing,
            array_supertypes,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Computes the transitive supertypes of every definition (excluding the
/// definition itself), including the implicit root parent.
fn compute_ancestors(
    definitions: &[TypeDefinition],
    root: Option<TypeID>,
) -> Result<Vec<BTreeSet<TypeID>>, BuildError> {
    fn visit(
        id: TypeID,
        definitions: &[TypeDefinition],
        root: Option<TypeID>,
        marks: &mut [Mark],
        ancestors: &mut [BTreeSet<TypeID>],
        path: &mut Vec<TypeID>,
    ) -> Result<(), BuildError> {
        match marks[id.0] {
            Mark::Done => return Ok(()),
            Mark::Visiting => {
                let start = path.iter().position(|x| *x == id).unwrap_or(0);
                let mut cycle = path[start..]
                    .iter()
                    .map(|x| definitions[x.0].name.clone())
                    .collect::<Vec<_>>();
                cycle.push(definitions[id.0].name.clone());

                return Err(BuildError::CyclicHierarchy(cycle));
            }
            Mark::Unvisited => {}
        }

        marks[id.0] = Mark::Visiting;
        path.push(id);

        let mut result = BTreeSet::new();
        for parent in direct_parents(&definitions[id.0], root) {
            visit(parent, definitions, root, marks, ancestors, path)?;

            result.insert(parent);
            result.extend(ancestors[parent.0].iter().copied());
        }

        path.pop();
        marks[id.0] = Mark::Done;
        ancestors[id.0] = result;

        Ok(())
    }

    let mut marks = vec![Mark::Unvisited; definitions.len()];
    let mut ancestors = vec![BTreeSet::new(); definitions.len()];
    let mut path = Vec::new();

    for definition in definitions {
        visit(
            definition.id,
            definitions,
            root,
            &mut marks,
            &mut ancestors,
            &mut path,
        )?;
    }

    Ok(ancestors)
}

/// The declared parents of the definition, or the root if there are none.
pub(crate) fn direct_parents(
    definition: &TypeDefinition,
    root: Option<TypeID>,
) -> Vec<TypeID> {
    match root {
        Some(root) if definition.parents.is_empty() && definition.id != root => {
            vec![root]
        }
        _ => definition.parents.clone(),
    }
}
