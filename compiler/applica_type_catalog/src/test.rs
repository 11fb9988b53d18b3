use proptest::{prelude::*, sample::select};

use crate::{
    parse::ParseError, BuildError, Primitive, TypeCatalog, TypeCatalogBuilder,
    TypeDescriptor,
};

fn parse(catalog: &TypeCatalog, source: &str) -> TypeDescriptor {
    catalog.parse(source).unwrap()
}

#[test]
fn declared_assignability() {
    let catalog = TypeCatalog::standard();

    let assignable = [
        ("String", "CharSequence"),
        ("String", "Object"),
        ("ArrayList", "Collection"),
        ("ArrayList<String>", "List<?>"),
        ("ArrayList<String>", "Collection"),
        ("List<String>", "List<?>"),
        ("List", "List<String>"),
        ("TreeMap<String, Integer>", "Map"),
        ("Integer", "Number"),
        ("Integer", "Comparable"),
    ];

    for (from, to) in assignable {
        assert!(
            catalog.is_assignable(&parse(&catalog, from), &parse(&catalog, to)),
            "{from} should be assignable to {to}"
        );
    }

    let not_assignable = [
        ("Object", "String"),
        ("CharSequence", "String"),
        ("List<String>", "List<Integer>"),
        ("HashMap", "Collection"),
        ("Set", "List"),
        // arguments are not carried through the supertype chain
        ("ArrayList<String>", "List<Integer>"),
    ];

    for (from, to) in not_assignable {
        assert!(
            !catalog.is_assignable(&parse(&catalog, from), &parse(&catalog, to)),
            "{from} should not be assignable to {to}"
        );
    }
}

#[test]
fn primitive_boxing() {
    let catalog = TypeCatalog::standard();
    let int = TypeDescriptor::Primitive(Primitive::Int);

    assert!(catalog.is_assignable(&int, &int));
    assert!(catalog.is_assignable(&int, &parse(&catalog, "Integer")));
    assert!(catalog.is_assignable(&int, &parse(&catalog, "Number")));
    assert!(!catalog.is_assignable(&int, &parse(&catalog, "Long")));
    assert!(!catalog.is_assignable(&int, &parse(&catalog, "long")));

    // no unboxing
    assert!(!catalog.is_assignable(&parse(&catalog, "Integer"), &int));
}

#[test]
fn array_assignability() {
    let catalog = TypeCatalog::standard();

    assert!(catalog.is_assignable(
        &parse(&catalog, "String[]"),
        &parse(&catalog, "Object[]")
    ));
    assert!(catalog
        .is_assignable(&parse(&catalog, "int[]"), &parse(&catalog, "Object")));
    assert!(catalog.is_assignable(
        &parse(&catalog, "int[]"),
        &parse(&catalog, "Cloneable")
    ));
    assert!(!catalog.is_assignable(
        &parse(&catalog, "int[]"),
        &parse(&catalog, "Object[]")
    ));
    assert!(!catalog.is_assignable(
        &parse(&catalog, "int[]"),
        &parse(&catalog, "long[]")
    ));
    assert!(!catalog.is_assignable(
        &parse(&catalog, "Object[]"),
        &parse(&catalog, "String[]")
    ));
    assert!(!catalog.is_assignable(
        &parse(&catalog, "String[]"),
        &parse(&catalog, "CharSequence")
    ));
}

#[test]
fn array_construction() {
    let catalog = TypeCatalog::standard();
    let string = parse(&catalog, "String");
    let strings = string.clone().array_of();

    assert_eq!(strings, parse(&catalog, "String[]"));
    assert_eq!(strings.clone().array_of(), parse(&catalog, "String[][]"));

    // the variant accessors live alongside the constructor
    assert_eq!(strings.as_array().map(|x| &**x), Some(&string));
    assert_eq!(strings.into_array(), Ok(Box::new(string.clone())));
    assert_eq!(string.clone().into_array(), Err(string));
}

#[test]
fn void_is_only_assignable_to_void() {
    let catalog = TypeCatalog::standard();

    assert!(catalog.is_assignable(&TypeDescriptor::Void, &TypeDescriptor::Void));
    assert!(!catalog
        .is_assignable(&TypeDescriptor::Void, &parse(&catalog, "Object")));
}

#[test]
fn direct_supertypes() {
    let catalog = TypeCatalog::standard();

    let names = |source: &str| {
        catalog
            .supertypes(&parse(&catalog, source))
            .iter()
            .map(|x| catalog.display(x).to_string())
            .collect::<Vec<_>>()
    };

    assert_eq!(names("String"), [
        "CharSequence",
        "Comparable",
        "Serializable"
    ]);
    assert_eq!(names("CharSequence"), ["Object"]);
    assert!(names("Object").is_empty());
    assert_eq!(names("ArrayList<String>"), [
        "List",
        "Cloneable",
        "Serializable"
    ]);
    assert_eq!(names("String[]"), [
        "CharSequence[]",
        "Comparable[]",
        "Serializable[]"
    ]);
    assert_eq!(names("Object[]"), ["Object", "Cloneable", "Serializable"]);
    assert_eq!(names("int[]"), ["Object", "Cloneable", "Serializable"]);
    assert!(names("int").is_empty());
}

#[test]
fn erasure() {
    let catalog = TypeCatalog::standard();

    assert_eq!(
        catalog.erase(&parse(&catalog, "Map<String, List<Integer>>")),
        parse(&catalog, "Map")
    );
    assert_eq!(
        catalog.erase(&parse(&catalog, "List<String>[]")),
        parse(&catalog, "List[]")
    );
    assert_eq!(catalog.erase(&parse(&catalog, "int")), parse(&catalog, "int"));
}

#[test]
fn untyped_aggregate() {
    let catalog = TypeCatalog::standard();

    assert!(catalog.is_untyped_aggregate(&parse(&catalog, "Object")));
    assert!(catalog.is_untyped_aggregate(&parse(&catalog, "Object[]")));
    assert!(!catalog.is_untyped_aggregate(&parse(&catalog, "Object[][]")));
    assert!(!catalog.is_untyped_aggregate(&parse(&catalog, "String[]")));
}

#[test]
fn display_round_trips_source_spelling() {
    let catalog = TypeCatalog::standard();

    for source in ["Map<String, ?>[]", "List<int[]>", "void", "char[][]"] {
        assert_eq!(catalog.display(&parse(&catalog, source)).to_string(), source);
    }
}

#[test]
fn parse_errors() {
    let catalog = TypeCatalog::standard();

    assert_eq!(
        catalog.parse("Strin"),
        Err(ParseError::UnknownType("Strin".to_string()))
    );
    assert_eq!(
        catalog.parse("Map<String>"),
        Err(ParseError::ArityMismatch {
            name: "Map".to_string(),
            expected: 2,
            found: 1
        })
    );
    assert_eq!(
        catalog.parse("List<int>"),
        Err(ParseError::InvalidArgument("int".to_string()))
    );
    assert_eq!(catalog.parse("List<"), Err(ParseError::UnexpectedEnd));
    assert!(matches!(
        catalog.parse("void[]"),
        Err(ParseError::UnexpectedCharacter { found: '[', .. })
    ));
    assert!(matches!(
        catalog.parse("String String"),
        Err(ParseError::UnexpectedCharacter { found: 'S', .. })
    ));
}

#[test]
fn build_errors() {
    assert_eq!(
        TypeCatalogBuilder::new().declare("A", []).declare("A", []).build().err(),
        Some(BuildError::DuplicateType("A".to_string()))
    );

    assert_eq!(
        TypeCatalogBuilder::new().declare("A", ["B"]).build().err(),
        Some(BuildError::UnknownType {
            name: "B".to_string(),
            referenced_by: "A".to_string()
        })
    );

    assert_eq!(
        TypeCatalogBuilder::new()
            .declare("A", ["B"])
            .declare("B", ["C"])
            .declare("C", ["A"])
            .build()
            .err(),
        Some(BuildError::CyclicHierarchy(vec![
            "A".to_string(),
            "B".to_string(),
            "C".to_string(),
            "A".to_string()
        ]))
    );
}

#[test]
fn catalog_without_root() {
    let catalog = TypeCatalogBuilder::new()
        .declare("Shape", [])
        .declare("Circle", ["Shape"])
        .build()
        .unwrap();

    assert!(catalog.supertypes(&parse(&catalog, "Shape")).is_empty());
    assert!(catalog
        .is_assignable(&parse(&catalog, "Circle"), &parse(&catalog, "Shape")));
    assert!(!catalog.is_untyped_aggregate(&parse(&catalog, "Shape")));
    assert!(catalog.boxed(Primitive::Int).is_none());
}

fn standard_type() -> impl Strategy<Value = TypeDescriptor> {
    let catalog = TypeCatalog::standard();
    let names = catalog
        .definitions()
        .map(|x| x.name().clone())
        .collect::<Vec<_>>();

    (select(names), any::<bool>()).prop_map(move |(name, array)| {
        let ty = catalog.declared(&name).unwrap();

        if array {
            ty.array_of()
        } else {
            ty
        }
    })
}

proptest! {
    #[test]
    fn assignability_is_a_partial_order(
        a in standard_type(),
        b in standard_type(),
        c in standard_type(),
    ) {
        let catalog = TypeCatalog::standard();

        prop_assert!(catalog.is_assignable(&a, &a));

        if catalog.is_assignable(&a, &b) && catalog.is_assignable(&b, &a) {
            prop_assert_eq!(&a, &b);
        }

        if catalog.is_assignable(&a, &b) && catalog.is_assignable(&b, &c) {
            prop_assert!(catalog.is_assignable(&a, &c));
        }
    }

    #[test]
    fn direct_supertypes_are_assignable_targets(ty in standard_type()) {
        let catalog = TypeCatalog::standard();

        for supertype in catalog.supertypes(&ty) {
            prop_assert!(catalog.is_assignable(&ty, &supertype));
            prop_assert!(!catalog.is_assignable(&supertype, &ty));
        }
    }
}
