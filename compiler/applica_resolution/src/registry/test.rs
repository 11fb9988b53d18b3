use std::sync::Arc;

use applica_constraint::{
    builtin, ConstraintKind, ConstraintTable, KindDefinition, ValidationTarget,
    ValidatorImplementation,
};
use applica_type_catalog::TypeCatalog;

use crate::{InternalError, ValidatorDescriptor, ValidatorRegistry};

fn descriptor(
    catalog: &TypeCatalog,
    kind: &str,
    validator: &str,
    accepted_type: &str,
) -> ValidatorDescriptor {
    ValidatorDescriptor {
        kind: ConstraintKind::new(kind),
        validator: validator.to_string(),
        accepted_type: catalog.parse(accepted_type).unwrap(),
        targets: [ValidationTarget::AnnotatedElement].into(),
    }
}

#[test]
fn first_registration_wins() {
    let catalog = TypeCatalog::standard();
    let registry = ValidatorRegistry::new(Arc::new(ConstraintTable::new()));
    let kind = ConstraintKind::new("Custom");

    assert!(registry.register(kind.clone(), [descriptor(
        &catalog, "Custom", "First", "String"
    )]));
    assert!(!registry.register(kind.clone(), [descriptor(
        &catalog, "Custom", "Second", "Object"
    )]));

    let descriptors = registry.lookup(&kind).unwrap();
    assert_eq!(descriptors.len(), 1);
    assert_eq!(descriptors[0].validator, "First");
}

#[test]
fn lookup_binds_lazily_and_erases() {
    let catalog = TypeCatalog::standard();
    let mut table = ConstraintTable::new();
    table.insert(KindDefinition::new("Custom").validated_by([
        ValidatorImplementation::new(
            "ForList",
            catalog.parse("List<String>").unwrap(),
        ),
        ValidatorImplementation::cross_parameter(
            "ForParameters",
            catalog.parse("Object[]").unwrap(),
        ),
    ]));

    let registry = ValidatorRegistry::new(Arc::new(table));
    let kind = ConstraintKind::new("Custom");

    let descriptors = registry.lookup(&kind).unwrap();
    assert_eq!(descriptors.len(), 2);
    assert_eq!(descriptors[0].accepted_type, catalog.parse("List").unwrap());
    assert!(descriptors[0].supports(ValidationTarget::AnnotatedElement));
    assert!(!descriptors[0].supports(ValidationTarget::Parameters));
    assert!(descriptors[1].supports(ValidationTarget::Parameters));

    // the published list is shared by later lookups
    assert!(Arc::ptr_eq(&descriptors, &registry.lookup(&kind).unwrap()));

    // and can't be replaced
    assert!(!registry.register(kind, []));
}

#[test]
fn unknown_kind_has_no_descriptors() {
    let registry = ValidatorRegistry::new(Arc::new(ConstraintTable::new()));

    assert!(registry
        .lookup(&ConstraintKind::new("Unknown"))
        .unwrap()
        .is_empty());
}

#[test]
fn unbound_validator_type() {
    let mut table = ConstraintTable::new();
    table.insert(
        KindDefinition::new("Custom")
            .validated_by([ValidatorImplementation::unbound("Mystery")]),
    );

    let registry = ValidatorRegistry::new(Arc::new(table));

    assert_eq!(
        registry.lookup(&ConstraintKind::new("Custom")),
        Err(InternalError::UnboundValidatorType {
            kind: ConstraintKind::new("Custom"),
            validator: "Mystery".to_string(),
        })
    );
}

#[test]
fn builtins_are_registered_eagerly() {
    let catalog = TypeCatalog::standard();

    // the provider knows nothing; the descriptors come from registration
    let registry = ValidatorRegistry::with_builtins(
        Arc::new(ConstraintTable::new()),
        &catalog,
    )
    .unwrap();

    let size = registry.lookup(&ConstraintKind::new(builtin::SIZE)).unwrap();
    assert!(size.iter().any(|x| x.validator == "SizeValidatorForCharSequence"));

    let custom = descriptor(&catalog, builtin::SIZE, "Custom", "String");
    assert!(!registry.register(ConstraintKind::new(builtin::SIZE), [custom]));
}

#[test]
fn eager_registration_rejects_unbound_validators() {
    let catalog = TypeCatalog::standard();
    let definitions = || {
        [
            KindDefinition::new("Known").validated_by([
                ValidatorImplementation::new(
                    "ForString",
                    catalog.parse("String").unwrap(),
                ),
            ]),
            KindDefinition::new("Opaque").validated_by([
                ValidatorImplementation::new(
                    "ForObject",
                    catalog.parse("Object").unwrap(),
                ),
                ValidatorImplementation::unbound("Mystery"),
            ]),
        ]
    };

    assert_eq!(
        ValidatorRegistry::with_definitions(
            Arc::new(ConstraintTable::new()),
            definitions(),
        )
        .err(),
        Some(InternalError::UnboundValidatorType {
            kind: ConstraintKind::new("Opaque"),
            validator: "Mystery".to_string(),
        })
    );

    let registry = ValidatorRegistry::with_definitions(
        Arc::new(ConstraintTable::new()),
        definitions().into_iter().take(1),
    )
    .unwrap();
    assert_eq!(registry.lookup(&ConstraintKind::new("Known")).unwrap().len(), 1);
}

#[test]
fn concurrent_lookups_publish_one_list() {
    let catalog = TypeCatalog::standard();
    let mut table = ConstraintTable::new();
    table.insert(KindDefinition::new("Custom").validated_by([
        ValidatorImplementation::new("ForString", catalog.parse("String").unwrap()),
    ]));

    let registry = ValidatorRegistry::new(Arc::new(table));
    let kind = ConstraintKind::new("Custom");

    let lists = std::thread::scope(|scope| {
        let handles = (0..8)
            .map(|_| scope.spawn(|| registry.lookup(&kind).unwrap()))
            .collect::<Vec<_>>();

        handles.into_iter().map(|x| x.join().unwrap()).collect::<Vec<_>>()
    });

    let published = registry.lookup(&kind).unwrap();
    assert!(lists.iter().all(|x| Arc::ptr_eq(x, &published)));
}
