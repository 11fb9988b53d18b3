use std::collections::BTreeSet;

use applica_type_catalog::{TypeCatalog, TypeDescriptor};
use proptest::{prelude::*, sample::subsequence};

use crate::AmbiguityPolicy;

fn types(catalog: &TypeCatalog, names: &[&str]) -> BTreeSet<TypeDescriptor> {
    names.iter().map(|x| catalog.parse(x).unwrap()).collect()
}

#[test]
fn subtype_wins_over_supertype() {
    let catalog = TypeCatalog::standard();
    let policy = AmbiguityPolicy::new(&catalog);

    assert_eq!(
        policy.keep_most_specific(&types(&catalog, &["Object", "String"])),
        types(&catalog, &["String"])
    );
}

#[test]
fn siblings_survive() {
    let catalog = TypeCatalog::standard();
    let policy = AmbiguityPolicy::new(&catalog);

    assert_eq!(
        policy.keep_most_specific(&types(&catalog, &[
            "Collection",
            "Set",
            "List"
        ])),
        types(&catalog, &["List", "Set"])
    );
}

#[test]
fn chain_collapses_to_the_bottom() {
    let catalog = TypeCatalog::standard();
    let policy = AmbiguityPolicy::new(&catalog);

    assert_eq!(
        policy.keep_most_specific(&types(&catalog, &[
            "Object",
            "Iterable",
            "Collection",
            "List",
            "ArrayList",
        ])),
        types(&catalog, &["ArrayList"])
    );
}

#[test]
fn arrays() {
    let catalog = TypeCatalog::standard();
    let policy = AmbiguityPolicy::new(&catalog);

    assert_eq!(
        policy.keep_most_specific(&types(&catalog, &[
            "Object",
            "Object[]",
            "CharSequence[]",
        ])),
        types(&catalog, &["CharSequence[]"])
    );
    assert_eq!(
        policy.keep_most_specific(&types(&catalog, &["Object[]", "int[]"])),
        types(&catalog, &["Object[]", "int[]"])
    );
}

#[test]
fn empty_and_single() {
    let catalog = TypeCatalog::standard();
    let policy = AmbiguityPolicy::new(&catalog);

    assert!(policy.keep_most_specific(&BTreeSet::new()).is_empty());
    assert_eq!(
        policy.keep_most_specific(&types(&catalog, &["Map"])),
        types(&catalog, &["Map"])
    );
}

#[test]
fn strict_subtype() {
    let catalog = TypeCatalog::standard();
    let policy = AmbiguityPolicy::new(&catalog);
    let string = catalog.parse("String").unwrap();
    let sequence = catalog.parse("CharSequence").unwrap();

    assert!(policy.is_strict_subtype(&string, &sequence));
    assert!(!policy.is_strict_subtype(&sequence, &string));
    assert!(!policy.is_strict_subtype(&string, &string));
}

const POOL: [&str; 20] = [
    "Object",
    "Serializable",
    "Cloneable",
    "Comparable",
    "CharSequence",
    "String",
    "Number",
    "Integer",
    "Iterable",
    "Collection",
    "List",
    "Set",
    "SortedSet",
    "ArrayList",
    "HashSet",
    "Map",
    "HashMap",
    "Object[]",
    "String[]",
    "int[]",
];

proptest! {
    #[test]
    fn narrowing_yields_an_antichain_subset(
        names in subsequence(POOL.to_vec(), 0..=POOL.len())
    ) {
        let catalog = TypeCatalog::standard();
        let policy = AmbiguityPolicy::new(&catalog);
        let candidates = types(&catalog, &names);

        let narrowed = policy.keep_most_specific(&candidates);

        prop_assert!(narrowed.is_subset(&candidates));
        prop_assert_eq!(narrowed.is_empty(), candidates.is_empty());

        for a in &narrowed {
            for b in &narrowed {
                prop_assert!(!policy.is_strict_subtype(a, b));
            }
        }

        // every dropped candidate is covered by a more specific survivor
        for dropped in candidates.difference(&narrowed) {
            prop_assert!(narrowed
                .iter()
                .any(|x| policy.is_strict_subtype(x, dropped)));
        }
    }
}
