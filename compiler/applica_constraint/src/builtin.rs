//! The built-in constraint kinds and their validator implementations.
//!
//! Built-in validators accepting a type the catalog doesn't declare are left
//! out, so a catalog without the standard library yields fewer (or no)
//! validators for the affected kinds.

use applica_type_catalog::{TypeCatalog, TypeDescriptor};

use crate::{
    attribute::{AttributeDefinition, AttributeType, AttributeValue},
    definition::{KindDefinition, ValidatorImplementation},
};

/// `NotNull`: the value must not be null.
pub const NOT_NULL: &str = "NotNull";
/// `Null`: the value must be null.
pub const NULL: &str = "Null";
/// `AssertTrue`: the value must be `true`.
pub const ASSERT_TRUE: &str = "AssertTrue";
/// `AssertFalse`: the value must be `false`.
pub const ASSERT_FALSE: &str = "AssertFalse";
/// `Min`: the number must be at least the given value.
pub const MIN: &str = "Min";
/// `Max`: the number must be at most the given value.
pub const MAX: &str = "Max";
/// `DecimalMin`: the number must be at least the given decimal.
pub const DECIMAL_MIN: &str = "DecimalMin";
/// `DecimalMax`: the number must be at most the given decimal.
pub const DECIMAL_MAX: &str = "DecimalMax";
/// `Digits`: the number must fit the given precision.
pub const DIGITS: &str = "Digits";
/// `Positive`: the number must be strictly positive.
pub const POSITIVE: &str = "Positive";
/// `PositiveOrZero`: the number must be positive or zero.
pub const POSITIVE_OR_ZERO: &str = "PositiveOrZero";
/// `Negative`: the number must be strictly negative.
pub const NEGATIVE: &str = "Negative";
/// `NegativeOrZero`: the number must be negative or zero.
pub const NEGATIVE_OR_ZERO: &str = "NegativeOrZero";
/// `Size`: the length of the value must be within bounds.
pub const SIZE: &str = "Size";
/// `NotEmpty`: the value must not be empty.
pub const NOT_EMPTY: &str = "NotEmpty";
/// `NotBlank`: the text must contain a non-whitespace character.
pub const NOT_BLANK: &str = "NotBlank";
/// `Pattern`: the text must match the regular expression.
pub const PATTERN: &str = "Pattern";
/// `Email`: the text must be an email address.
pub const EMAIL: &str = "Email";
/// `Past`: the instant must be in the past.
pub const PAST: &str = "Past";
/// `PastOrPresent`: the instant must be in the past or present.
pub const PAST_OR_PRESENT: &str = "PastOrPresent";
/// `Future`: the instant must be in the future.
pub const FUTURE: &str = "Future";
/// `FutureOrPresent`: the instant must be in the future or present.
pub const FUTURE_OR_PRESENT: &str = "FutureOrPresent";
/// `ScriptAssert`: a script evaluated against the whole value.
pub const SCRIPT_ASSERT: &str = "ScriptAssert";
/// `ParameterScriptAssert`: a script evaluated against the parameters.
pub const PARAMETER_SCRIPT_ASSERT: &str = "ParameterScriptAssert";

const NUMBERS: [&str; 6] =
    ["BigDecimal", "BigInteger", "Byte", "Short", "Integer", "Long"];

const SIZED: [&str; 4] = ["CharSequence", "Collection", "Map", "Object[]"];

const PRIMITIVE_ARRAYS: [&str; 8] = [
    "boolean[]",
    "byte[]",
    "short[]",
    "int[]",
    "long[]",
    "float[]",
    "double[]",
    "char[]",
];

const TEMPORALS: [&str; 8] = [
    "Date",
    "Calendar",
    "Instant",
    "LocalDate",
    "LocalDateTime",
    "LocalTime",
    "OffsetDateTime",
    "ZonedDateTime",
];

/// Creates one validator implementation per accepted type spelled in
/// `accepted_types`, named `<kind>ValidatorFor<Type>`.
fn validators(
    catalog: &TypeCatalog,
    kind: &str,
    accepted_types: impl IntoIterator<Item = &'static str>,
) -> Vec<ValidatorImplementation> {
    accepted_types
        .into_iter()
        .filter_map(|source| {
            let accepted_type = match catalog.parse(source) {
                Ok(ty) => ty,
                Err(error) => {
                    log::debug!("skipping built-in `{kind}` validator: {error}");
                    return None;
                }
            };

            Some(ValidatorImplementation::new(
                format!(
                    "{kind}ValidatorFor{}",
                    validator_suffix(&accepted_type, catalog)
                ),
                accepted_type,
            ))
        })
        .collect()
}

fn validator_suffix(ty: &TypeDescriptor, catalog: &TypeCatalog) -> String {
    match ty {
        TypeDescriptor::Array(component) => {
            let mut component = validator_suffix(component, catalog);
            if let Some(first) = component.get_mut(..1) {
                first.make_ascii_uppercase();
            }
            format!("ArraysOf{component}")
        }
        _ => catalog.display(ty).to_string(),
    }
}

fn kind(name: &str) -> KindDefinition {
    KindDefinition::new(name).with_standard_attributes()
}

fn with_value(definition: KindDefinition, ty: AttributeType) -> KindDefinition {
    definition.with_attribute(AttributeDefinition::new("value", ty))
}

/// Creates the built-in constraint kind definitions.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn definitions(catalog: &TypeCatalog) -> Vec<KindDefinition> {
    let mut definitions = Vec::new();

    for name in [NOT_NULL, NULL] {
        definitions
            .push(kind(name).validated_by(validators(catalog, name, ["Object"])));
    }

    for name in [ASSERT_TRUE, ASSERT_FALSE] {
        definitions
            .push(kind(name).validated_by(validators(catalog, name, ["Boolean"])));
    }

    for name in [MIN, MAX] {
        definitions.push(
            with_value(kind(name), AttributeType::Integer).validated_by(
                validators(
                    catalog,
                    name,
                    NUMBERS.into_iter().chain(["Number", "CharSequence"]),
                ),
            ),
        );
    }

    for name in [DECIMAL_MIN, DECIMAL_MAX] {
        definitions.push(
            with_value(kind(name), AttributeType::String)
                .with_attribute(
                    AttributeDefinition::new("inclusive", AttributeType::Boolean)
                        .with_default(AttributeValue::Boolean(true)),
                )
                .validated_by(validators(
                    catalog,
                    name,
                    NUMBERS.into_iter().chain(["Number", "CharSequence"]),
                )),
        );
    }

    definitions.push(
        kind(DIGITS)
            .with_attribute(AttributeDefinition::new(
                "integer",
                AttributeType::Integer,
            ))
            .with_attribute(AttributeDefinition::new(
                "fraction",
                AttributeType::Integer,
            ))
            .validated_by(validators(catalog, DIGITS, [
                "Number",
                "CharSequence",
            ])),
    );

    for name in [POSITIVE, POSITIVE_OR_ZERO, NEGATIVE, NEGATIVE_OR_ZERO] {
        definitions.push(kind(name).validated_by(validators(
            catalog,
            name,
            NUMBERS.into_iter().chain(["Number"]),
        )));
    }

    definitions.push(
        kind(SIZE)
            .with_attribute(
                AttributeDefinition::new("min", AttributeType::Integer)
                    .with_default(AttributeValue::Integer(0)),
            )
            .with_attribute(
                AttributeDefinition::new("max", AttributeType::Integer)
                    .with_default(AttributeValue::Integer(i64::from(i32::MAX))),
            )
            .validated_by(validators(
                catalog,
                SIZE,
                SIZED.into_iter().chain(PRIMITIVE_ARRAYS),
            )),
    );

    definitions.push(kind(NOT_EMPTY).validated_by(validators(
        catalog,
        NOT_EMPTY,
        SIZED.into_iter().chain(PRIMITIVE_ARRAYS),
    )));

    definitions.push(
        kind(NOT_BLANK)
            .validated_by(validators(catalog, NOT_BLANK, ["CharSequence"])),
    );

    definitions.push(
        kind(PATTERN)
            .with_attribute(AttributeDefinition::new(
                "regexp",
                AttributeType::String,
            ))
            .validated_by(validators(catalog, PATTERN, ["CharSequence"])),
    );

    definitions.push(
        kind(EMAIL)
            .with_attribute(
                AttributeDefinition::new("regexp", AttributeType::String)
                    .with_default(AttributeValue::String(".*".to_string())),
            )
            .validated_by(validators(catalog, EMAIL, ["CharSequence"])),
    );

    for name in [PAST, PAST_OR_PRESENT, FUTURE, FUTURE_OR_PRESENT] {
        definitions
            .push(kind(name).validated_by(validators(catalog, name, TEMPORALS)));
    }

    definitions.push(
        kind(SCRIPT_ASSERT)
            .with_attribute(AttributeDefinition::new("lang", AttributeType::String))
            .with_attribute(AttributeDefinition::new(
                "script",
                AttributeType::String,
            ))
            .validated_by(validators(catalog, SCRIPT_ASSERT, ["Object"])),
    );

    definitions.push(
        kind(PARAMETER_SCRIPT_ASSERT)
            .with_attribute(AttributeDefinition::new("lang", AttributeType::String))
            .with_attribute(AttributeDefinition::new(
                "script",
                AttributeType::String,
            ))
            .validated_by(
                catalog.parse("Object[]").ok().map(|ty| {
                    ValidatorImplementation::cross_parameter(
                        "ParameterScriptAssertValidator",
                        ty,
                    )
                }),
            ),
    );

    definitions
}
