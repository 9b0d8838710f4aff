//! GraphQL type token mapping.
//!
//! Pure functions turning ORM field kinds and association cardinalities into
//! the type strings understood by the GraphQL bundle's YAML schema format.

use crate::metadata::{Cardinality, FieldKind};

/// Separator between namespace segments of an entity identifier.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Base GraphQL scalar for a field kind, or `None` when the kind has no mapping.
pub fn base_scalar(kind: &FieldKind) -> Option<&'static str> {
    match kind {
        FieldKind::Boolean => Some("Boolean"),
        FieldKind::Integer | FieldKind::SmallInt => Some("Int"),
        FieldKind::Decimal | FieldKind::Float => Some("Float"),
        FieldKind::String | FieldKind::Text | FieldKind::Json | FieldKind::Date => Some("String"),
        FieldKind::Unsupported(_) => None,
    }
}

/// Map a scalar field to its type token.
///
/// Non-nullable fields get the `!` marker. Unsupported kinds yield `None`
/// and it is up to the caller to decide what to emit for them.
pub fn map_field_type(kind: &FieldKind, nullable: bool) -> Option<String> {
    base_scalar(kind).map(|scalar| {
        if nullable {
            scalar.to_string()
        } else {
            format!("{}!", scalar)
        }
    })
}

/// Map an association to its type token.
///
/// `target` is the namespace-stripped target entity name. The list brackets
/// wrap the already sanitised name.
pub fn map_relation_type(target: &str, cardinality: Cardinality) -> String {
    let name = type_name(target);
    if cardinality.is_collection() {
        format!("[{}]", name)
    } else {
        name
    }
}

/// Turn a namespaced identifier into a schema-safe GraphQL type name.
pub fn type_name(name: &str) -> String {
    name.replace(NAMESPACE_SEPARATOR, "_")
}

/// Strip the first matching entity namespace from `name`.
///
/// A prefix only matches when it is followed by the namespace separator, so
/// `App\Ent` never strips anything from `App\Entity\User`.
pub fn strip_namespace<'a, S: AsRef<str>>(name: &'a str, prefixes: &[S]) -> &'a str {
    prefixes
        .iter()
        .find_map(|prefix| {
            name.strip_prefix(prefix.as_ref())
                .and_then(|rest| rest.strip_prefix(NAMESPACE_SEPARATOR))
        })
        .unwrap_or(name)
}
