//! Contains the serialized form of the model files the driver checks.
//!
//! A model is a RON document declaring the types of the host program, the
//! custom constraint kinds, and the sites constraints are placed on. Types
//! are spelled in source form (`List<String>`, `int[]`) and resolved against
//! the catalog when the model is lowered.
//!
//! ```ron
//! (
//!     types: [(name: "Email", parents: ["CharSequence"])],
//!     kinds: [
//!         (
//!             name: "Checked",
//!             composed_of: [(kind: "NotNull")],
//!             validators: [(name: "CheckedValidator", accepts: Some("Email"))],
//!         ),
//!     ],
//!     sites: [
//!         (
//!             name: "User.email",
//!             site: Value("Email"),
//!             constraints: [(kind: "Checked")],
//!         ),
//!     ],
//! )
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The root of a model file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Model {
    /// Overrides the root type of the catalog.
    #[serde(default)]
    pub root: Option<String>,

    /// The types of the host program.
    #[serde(default)]
    pub types: Vec<TypeModel>,

    /// The custom constraint kinds.
    #[serde(default)]
    pub kinds: Vec<KindModel>,

    /// The sites to check.
    #[serde(default)]
    pub sites: Vec<SiteModel>,
}

/// A type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeModel {
    /// The unique name of the type.
    pub name: String,

    /// The number of generic parameters.
    #[serde(default)]
    pub arity: usize,

    /// The names of the direct supertypes.
    #[serde(default)]
    pub parents: Vec<String>,
}

/// A custom constraint kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindModel {
    /// The name of the kind.
    pub name: String,

    /// Whether the `message`, `groups`, and `payload` attributes are
    /// declared implicitly.
    #[serde(default = "yes")]
    pub standard_attributes: bool,

    /// The attributes declared in addition to the standard ones.
    #[serde(default)]
    pub attributes: Vec<AttributeModel>,

    /// The composing declarations.
    #[serde(default)]
    pub composed_of: Vec<DeclarationModel>,

    /// The validator implementations.
    #[serde(default)]
    pub validators: Vec<ValidatorModel>,
}

const fn yes() -> bool { true }

/// An attribute declared by a kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeModel {
    /// The name of the attribute.
    pub name: String,

    /// The type of the attribute.
    pub ty: AttributeTypeModel,

    /// The default value.
    #[serde(default)]
    pub default: Option<ValueModel>,
}

/// The type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum AttributeTypeModel {
    String,
    Integer,
    Boolean,
    ConstraintTarget,
    Type,
    Array(Box<AttributeTypeModel>),
}

/// An attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueModel {
    /// A string.
    String(String),

    /// An integer.
    Integer(i64),

    /// A boolean.
    Boolean(bool),

    /// A constraint target spelled `IMPLICIT`, `RETURN_VALUE`, or
    /// `PARAMETERS`.
    Target(String),

    /// A type in source form.
    Type(String),

    /// An array of values.
    Array(Vec<ValueModel>),
}

/// A validation target.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[allow(missing_docs)]
pub enum TargetModel {
    AnnotatedElement,
    Parameters,
}

/// A validator implementation of a kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorModel {
    /// The name of the implementation.
    pub name: String,

    /// The accepted type in source form; `None` leaves it unbound.
    #[serde(default)]
    pub accepts: Option<String>,

    /// The supported targets.
    #[serde(default = "annotated_element")]
    pub targets: Vec<TargetModel>,
}

fn annotated_element() -> Vec<TargetModel> { vec![TargetModel::AnnotatedElement] }

/// A use of a constraint kind.
///
/// A declaration with parts is a multi-valued wrapper of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationModel {
    /// The kind of the declaration.
    pub kind: String,

    /// The explicit attribute values.
    #[serde(default)]
    pub attributes: BTreeMap<String, ValueModel>,

    /// The wrapped declarations.
    #[serde(default)]
    pub parts: Vec<DeclarationModel>,
}

/// The shape of a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeModel {
    /// A field, a local, or a single parameter of the given type.
    Value(String),

    /// A method or a constructor.
    Callable {
        /// The parameter types.
        #[serde(default)]
        parameters: Vec<String>,

        /// The return type; `void` for none.
        returns: String,
    },
}

/// A site and the constraints placed on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteModel {
    /// The display name of the site, e.g. `User.email`.
    pub name: String,

    /// The shape of the site.
    pub site: ShapeModel,

    /// The declarations placed on the site.
    #[serde(default)]
    pub constraints: Vec<DeclarationModel>,
}
