//! Lowers a [`Model`] into the domain types of the resolver.

use applica_constraint::{
    attribute::{AttributeDefinition, AttributeType, AttributeValue},
    ConstraintDeclaration, ConstraintTarget, KindDefinition, Site,
    ValidationTarget, ValidatorImplementation,
};
use applica_type_catalog::{TypeCatalog, TypeCatalogBuilder, TypeDescriptor};

use crate::{
    model::{
        AttributeTypeModel, DeclarationModel, KindModel, Model, ShapeModel,
        SiteModel, TargetModel, ValueModel,
    },
    Error,
};

/// Builds the catalog of the model's types, on top of the standard library
/// when `standard` is set.
///
/// # Errors
///
/// Returns [`Error::Build`] if the declared types don't form a hierarchy.
pub fn catalog(model: &Model, standard: bool) -> Result<TypeCatalog, Error> {
    let mut builder = if standard {
        TypeCatalogBuilder::standard()
    } else {
        TypeCatalogBuilder::new()
    };

    for ty in &model.types {
        builder.declare_generic(
            ty.name.clone(),
            ty.arity,
            ty.parents.iter().map(String::as_str),
        );
    }

    if let Some(root) = &model.root {
        builder.root(root.clone());
    }

    Ok(builder.build()?)
}

fn ty(
    catalog: &TypeCatalog,
    source: &str,
    context: impl FnOnce() -> String,
) -> Result<TypeDescriptor, Error> {
    catalog.parse(source).map_err(|error| Error::Type {
        source_text: source.to_owned(),
        context: context(),
        error,
    })
}

fn attribute_type(model: &AttributeTypeModel) -> AttributeType {
    match model {
        AttributeTypeModel::String => AttributeType::String,
        AttributeTypeModel::Integer => AttributeType::Integer,
        AttributeTypeModel::Boolean => AttributeType::Boolean,
        AttributeTypeModel::ConstraintTarget => AttributeType::ConstraintTarget,
        AttributeTypeModel::Type => AttributeType::Type,
        AttributeTypeModel::Array(element) => {
            AttributeType::Array(Box::new(attribute_type(element)))
        }
    }
}

/// Lowers an attribute value; types are resolved against the catalog.
///
/// # Errors
///
/// Returns [`Error::Type`] for an unknown type and
/// [`Error::UnknownConstraintTarget`] for a misspelled target.
pub fn value(
    catalog: &TypeCatalog,
    model: &ValueModel,
    context: &str,
) -> Result<AttributeValue, Error> {
    Ok(match model {
        ValueModel::String(value) => AttributeValue::String(value.clone()),
        ValueModel::Integer(value) => AttributeValue::Integer(*value),
        ValueModel::Boolean(value) => AttributeValue::Boolean(*value),
        ValueModel::Target(name) => AttributeValue::Target(
            ConstraintTarget::from_name(name)
                .ok_or_else(|| Error::UnknownConstraintTarget(name.clone()))?,
        ),
        ValueModel::Type(source) => {
            AttributeValue::Type(ty(catalog, source, || context.to_owned())?)
        }
        ValueModel::Array(values) => AttributeValue::Array(
            values
                .iter()
                .map(|x| value(catalog, x, context))
                .collect::<Result<_, _>>()?,
        ),
    })
}

/// Lowers a declaration; a declaration with parts becomes a multi-valued
/// wrapper.
///
/// # Errors
///
/// See [`value`].
pub fn declaration(
    catalog: &TypeCatalog,
    model: &DeclarationModel,
) -> Result<ConstraintDeclaration, Error> {
    if !model.parts.is_empty() {
        let parts = model
            .parts
            .iter()
            .map(|x| declaration(catalog, x))
            .collect::<Result<Vec<_>, _>>()?;

        return Ok(ConstraintDeclaration::multi_valued(
            model.kind.as_str(),
            parts,
        ));
    }

    let mut declaration = ConstraintDeclaration::new(model.kind.as_str());

    for (name, attribute) in &model.attributes {
        let context = format!("the attribute `{name}` of `@{}`", model.kind);
        declaration = declaration
            .with_attribute(name.clone(), value(catalog, attribute, &context)?);
    }

    Ok(declaration)
}

/// Lowers a custom constraint kind.
///
/// # Errors
///
/// Returns [`Error::Type`] if an accepted type or an attribute value names an
/// unknown type.
pub fn definition(
    catalog: &TypeCatalog,
    model: &KindModel,
) -> Result<KindDefinition, Error> {
    let mut definition = KindDefinition::new(model.name.as_str());

    if model.standard_attributes {
        definition = definition.with_standard_attributes();
    }

    for attribute in &model.attributes {
        let context =
            format!("the default of `{}` of `@{}`", attribute.name, model.name);
        let mut lowered =
            AttributeDefinition::new(attribute.name.clone(), attribute_type(&attribute.ty));

        if let Some(default) = &attribute.default {
            lowered = lowered.with_default(value(catalog, default, &context)?);
        }

        definition = definition.with_attribute(lowered);
    }

    for composing in &model.composed_of {
        definition = definition.composed_of(declaration(catalog, composing)?);
    }

    let validators = model
        .validators
        .iter()
        .map(|validator| -> Result<ValidatorImplementation, Error> {
            let targets = validator.targets.iter().map(|x| match x {
                TargetModel::AnnotatedElement => ValidationTarget::AnnotatedElement,
                TargetModel::Parameters => ValidationTarget::Parameters,
            });

            Ok(match &validator.accepts {
                Some(source) => ValidatorImplementation::new(
                    validator.name.clone(),
                    ty(catalog, source, || {
                        format!("the validator `{}`", validator.name)
                    })?,
                ),
                None => ValidatorImplementation::unbound(validator.name.clone()),
            }
            .with_targets(targets))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(definition.validated_by(validators))
}

/// Lowers a site together with the declarations placed on it.
///
/// # Errors
///
/// Returns [`Error::Type`] if the shape names an unknown type, or any error
/// of [`declaration`].
pub fn site(
    catalog: &TypeCatalog,
    model: &SiteModel,
) -> Result<(Site, Vec<ConstraintDeclaration>), Error> {
    let context = || format!("the site `{}`", model.name);

    let site = match &model.site {
        ShapeModel::Value(source) => Site::Value(ty(catalog, source, context)?),
        ShapeModel::Callable { parameters, returns } => Site::callable(
            parameters
                .iter()
                .map(|x| ty(catalog, x, context))
                .collect::<Result<_, _>>()?,
            ty(catalog, returns, context)?,
        ),
    };

    let declarations = model
        .constraints
        .iter()
        .map(|x| declaration(catalog, x))
        .collect::<Result<_, _>>()?;

    Ok((site, declarations))
}
