//! The standard library types every host program starts with.

use crate::{Primitive, TypeCatalog, TypeCatalogBuilder};

/// The name of the root type.
pub const OBJECT: &str = "Object";

impl TypeCatalogBuilder {
    /// Creates a builder pre-populated with the standard library: the root
    /// type, the primitive wrappers, the text, number, collection, map and
    /// temporal types.
    #[must_use]
    pub fn standard() -> Self {
        let mut builder = Self::new();

        builder
            .declare(OBJECT, [])
            .root(OBJECT)
            .declare("Serializable", [])
            .declare("Cloneable", [])
            .declare_generic("Comparable", 1, [])
            .array_supertype(OBJECT)
            .array_supertype("Cloneable")
            .array_supertype("Serializable");

        // text
        builder
            .declare("CharSequence", [])
            .declare("String", ["CharSequence", "Comparable", "Serializable"])
            .declare("StringBuilder", ["CharSequence", "Serializable"]);

        // numbers and wrappers
        builder
            .declare("Number", ["Serializable"])
            .declare("Boolean", ["Comparable", "Serializable"])
            .declare("Character", ["Comparable", "Serializable"]);
        for wrapper in
            ["Byte", "Short", "Integer", "Long", "Float", "Double"]
                .into_iter()
                .chain(["BigInteger", "BigDecimal"])
        {
            builder.declare(wrapper, ["Number", "Comparable"]);
        }

        for (primitive, wrapper) in [
            (Primitive::Boolean, "Boolean"),
            (Primitive::Byte, "Byte"),
            (Primitive::Short, "Short"),
            (Primitive::Int, "Integer"),
            (Primitive::Long, "Long"),
            (Primitive::Float, "Float"),
            (Primitive::Double, "Double"),
            (Primitive::Char, "Character"),
        ] {
            builder.boxing(primitive, wrapper);
        }

        // collections
        builder
            .declare_generic("Iterable", 1, [])
            .declare_generic("Collection", 1, ["Iterable"])
            .declare_generic("List", 1, ["Collection"])
            .declare_generic("Set", 1, ["Collection"])
            .declare_generic("SortedSet", 1, ["Set"])
            .declare_generic("Queue", 1, ["Collection"])
            .declare_generic("Deque", 1, ["Queue"])
            .declare_generic("ArrayList", 1, [
                "List",
                "Cloneable",
                "Serializable",
            ])
            .declare_generic("LinkedList", 1, [
                "List",
                "Deque",
                "Cloneable",
                "Serializable",
            ])
            .declare_generic("HashSet", 1, ["Set", "Cloneable", "Serializable"])
            .declare_generic("TreeSet", 1, [
                "SortedSet",
                "Cloneable",
                "Serializable",
            ]);

        // maps
        builder
            .declare_generic("Map", 2, [])
            .declare_generic("SortedMap", 2, ["Map"])
            .declare_generic("HashMap", 2, ["Map", "Cloneable", "Serializable"])
            .declare_generic("TreeMap", 2, [
                "SortedMap",
                "Cloneable",
                "Serializable",
            ]);

        // time
        builder
            .declare("Date", ["Serializable", "Cloneable", "Comparable"])
            .declare("Calendar", ["Serializable", "Cloneable", "Comparable"])
            .declare("TemporalAccessor", [])
            .declare("Temporal", ["TemporalAccessor"]);
        for temporal in [
            "Instant",
            "LocalDate",
            "LocalDateTime",
            "LocalTime",
            "OffsetDateTime",
            "ZonedDateTime",
        ] {
            builder.declare(temporal, ["Temporal", "Comparable", "Serializable"]);
        }

        builder.declare_generic("Optional", 1, []);

        builder
    }
}

impl TypeCatalog {
    /// Creates a catalog containing only the standard library.
    #[must_use]
    pub fn standard() -> Self {
        TypeCatalogBuilder::standard()
            .build()
            .expect("the standard library should be well-formed")
    }
}
