use applica_type_catalog::{
    Primitive, TypeCatalog, TypeCatalogBuilder, TypeDescriptor,
};

use crate::{
    attribute::{AttributeDefinition, AttributeType, AttributeValue, REQUIRED},
    builtin, ConstraintDeclaration, ConstraintKind, ConstraintTable,
    ConstraintTarget, DeclarationProvider, KindDefinition, Site,
    ValidationTarget, ValidatorImplementation, ValidatorProvider,
};

#[test]
fn first_insert_wins() {
    let catalog = TypeCatalog::standard();
    let string = catalog.declared("String").unwrap();

    let mut table = ConstraintTable::new();
    assert!(table.insert(
        KindDefinition::new("Custom")
            .validated_by([ValidatorImplementation::new("First", string.clone())])
    ));
    assert!(!table.insert(
        KindDefinition::new("Custom")
            .validated_by([ValidatorImplementation::new("Second", string)])
    ));

    let validators = table.validators(&ConstraintKind::new("Custom")).unwrap();
    assert_eq!(validators.len(), 1);
    assert_eq!(validators[0].name, "First");
    assert_eq!(table.len(), 1);
}

#[test]
fn unknown_kind() {
    let table = ConstraintTable::new();
    let kind = ConstraintKind::new("Unknown");

    assert!(table.is_empty());
    assert!(table.definition(&kind).is_none());
    assert!(table.validators(&kind).is_none());
}

#[test]
fn builtin_size() {
    let catalog = TypeCatalog::standard();
    let table = ConstraintTable::with_builtins(&catalog);

    let validators =
        table.validators(&ConstraintKind::new(builtin::SIZE)).unwrap();
    let accepted = validators
        .iter()
        .filter_map(|x| x.accepted_type.as_ref())
        .map(|x| catalog.display(x).to_string())
        .collect::<Vec<_>>();

    for expected in ["CharSequence", "Collection", "Map", "Object[]", "int[]"] {
        assert!(
            accepted.iter().any(|x| x == expected),
            "missing `{expected}` in {accepted:?}"
        );
    }

    assert!(validators
        .iter()
        .any(|x| x.name == "SizeValidatorForArraysOfInt"));
    assert!(validators
        .iter()
        .all(|x| x.targets == [ValidationTarget::AnnotatedElement].into()));
}

#[test]
fn builtins_declare_required_attributes() {
    let catalog = TypeCatalog::standard();
    let table = ConstraintTable::with_builtins(&catalog);

    let kinds = builtin::definitions(&catalog)
        .into_iter()
        .map(|x| x.kind)
        .collect::<Vec<_>>();

    assert!(!table.is_empty());
    assert_eq!(table.len(), kinds.len());

    for kind in kinds {
        let definition = table.definition(&kind).unwrap();

        for attribute in REQUIRED {
            assert!(
                definition.attributes.contains_key(attribute),
                "`{kind}` lacks `{attribute}`"
            );
        }

        assert!(definition.applies_to().is_none());
        assert!(!definition.validators.is_empty(), "`{kind}` has no validators");
    }
}

#[test]
fn parameter_script_assert_is_cross_parameter() {
    let catalog = TypeCatalog::standard();
    let table = ConstraintTable::with_builtins(&catalog);

    let validators = table
        .validators(&ConstraintKind::new(builtin::PARAMETER_SCRIPT_ASSERT))
        .unwrap();

    assert_eq!(validators.len(), 1);
    assert_eq!(validators[0].targets, [ValidationTarget::Parameters].into());
    assert!(catalog
        .is_untyped_aggregate(validators[0].accepted_type.as_ref().unwrap()));
}

#[test]
fn builtins_skip_undeclared_types() {
    let catalog = TypeCatalogBuilder::new().build().unwrap();
    let table = ConstraintTable::with_builtins(&catalog);

    let validators =
        table.validators(&ConstraintKind::new(builtin::SIZE)).unwrap();

    // only the primitive arrays survive without a standard library
    assert_eq!(validators.len(), 8);
    assert!(validators.iter().all(|x| {
        x.accepted_type.as_ref().is_some_and(|x| {
            x.as_array().is_some_and(|x| x.as_primitive().is_some())
        })
    }));
}

#[test]
fn attribute_conformance() {
    let catalog = TypeCatalog::standard();
    let string = catalog.declared("String").unwrap();

    assert!(AttributeValue::Integer(1).conforms_to(&AttributeType::Integer));
    assert!(!AttributeValue::Integer(1).conforms_to(&AttributeType::String));
    assert!(AttributeValue::Target(ConstraintTarget::Implicit)
        .conforms_to(&AttributeType::ConstraintTarget));
    assert!(!AttributeValue::String("IMPLICIT".to_string())
        .conforms_to(&AttributeType::ConstraintTarget));

    let classes = AttributeType::Array(Box::new(AttributeType::Type));
    assert!(AttributeValue::Array(Vec::new()).conforms_to(&classes));
    assert!(AttributeValue::Array(vec![AttributeValue::Type(string.clone())])
        .conforms_to(&classes));
    assert!(!AttributeValue::Array(vec![
        AttributeValue::Type(string),
        AttributeValue::Boolean(true),
    ])
    .conforms_to(&classes));
}

#[test]
fn attribute_display() {
    let catalog = TypeCatalog::standard();
    let string = catalog.declared("String").unwrap();

    let value = AttributeValue::Array(vec![
        AttributeValue::Type(string),
        AttributeValue::String("a".to_string()),
        AttributeValue::Target(ConstraintTarget::ReturnValue),
    ]);

    assert_eq!(
        value.display(&catalog).to_string(),
        "{String.class, \"a\", RETURN_VALUE}"
    );
    assert_eq!(
        AttributeType::Array(Box::new(AttributeType::Type)).to_string(),
        "Class[]"
    );
}

#[test]
fn constraint_target_names() {
    for target in ConstraintTarget::ALL {
        assert_eq!(ConstraintTarget::from_name(target.name()), Some(target));
    }

    assert_eq!(ConstraintTarget::from_name("BOTH"), None);
}

#[test]
fn standard_attributes() {
    let definition = KindDefinition::new("Custom").with_standard_attributes();

    assert_eq!(
        definition.attributes["message"].default,
        Some(AttributeValue::String("{constraints.Custom.message}".to_string()))
    );
    assert_eq!(
        definition.attributes["groups"].default,
        Some(AttributeValue::Array(Vec::new()))
    );

    let definition = definition.with_attribute(AttributeDefinition::applies_to());
    assert_eq!(
        definition.applies_to().and_then(|x| x.default.clone()),
        Some(AttributeValue::Target(ConstraintTarget::Implicit))
    );
}

#[test]
fn declarations() {
    let declaration = ConstraintDeclaration::new("Size")
        .with_attribute("min", AttributeValue::Integer(1))
        .with_attribute(
            "validationAppliesTo",
            AttributeValue::Target(ConstraintTarget::Parameters),
        );

    assert_eq!(declaration.kind().name(), "Size");
    assert_eq!(declaration.attribute("min"), Some(&AttributeValue::Integer(1)));
    assert_eq!(
        declaration.applies_to(),
        Some(&AttributeValue::Target(ConstraintTarget::Parameters))
    );
    assert!(!declaration.is_multi_valued());
    assert!(declaration.parts().is_empty());

    let wrapper = ConstraintDeclaration::multi_valued("Size", [
        declaration.clone(),
        ConstraintDeclaration::new("Size"),
    ]);

    assert!(wrapper.is_multi_valued());
    assert_eq!(wrapper.parts().len(), 2);
    assert_eq!(wrapper.parts()[0], declaration);
}

#[test]
fn sites() {
    let catalog = TypeCatalog::standard();
    let string = catalog.declared("String").unwrap();

    let value = Site::Value(string.clone());
    assert_eq!(value.element_type(), &string);
    assert!(value.parameters().is_empty());
    assert!(!value.returns_void());

    let setter = Site::callable(
        vec![string.clone(), Primitive::Int.into()],
        TypeDescriptor::Void,
    );
    assert_eq!(setter.parameters().len(), 2);
    assert!(setter.returns_void());

    let getter = Site::callable(Vec::new(), string.clone());
    assert_eq!(getter.element_type(), &string);
    assert!(!getter.returns_void());
}
