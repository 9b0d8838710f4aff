//! Entity metadata: descriptors and the read-only source they come from.
//!
//! The generator only needs a narrow view of the ORM mapping, expressed by
//! [`MetadataSource`]. [`MetadataDump`] implements it over a JSON or YAML
//! export of the mapping.

mod dump;

pub use dump::MetadataDump;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to read metadata file '{path}': {message}")]
    ReadFailed { path: String, message: String },

    #[error("Failed to parse metadata file '{path}': {message}")]
    ParseFailed { path: String, message: String },

    #[error("Unknown entity '{entity}'")]
    UnknownEntity { entity: String },

    #[error("Invalid cardinality '{code}' for association '{entity}::{association}'")]
    InvalidCardinality {
        entity: String,
        association: String,
        code: String,
    },
}

/// Primitive ORM column kind.
///
/// Kinds outside the mapped set are kept verbatim so they can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    Boolean,
    Integer,
    SmallInt,
    Decimal,
    Float,
    String,
    Text,
    Json,
    Date,
    Unsupported(String),
}

impl FieldKind {
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::Boolean => "boolean",
            FieldKind::Integer => "integer",
            FieldKind::SmallInt => "smallint",
            FieldKind::Decimal => "decimal",
            FieldKind::Float => "float",
            FieldKind::String => "string",
            FieldKind::Text => "text",
            FieldKind::Json => "json",
            FieldKind::Date => "date",
            FieldKind::Unsupported(raw) => raw,
        }
    }
}

impl From<String> for FieldKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "boolean" => FieldKind::Boolean,
            "integer" => FieldKind::Integer,
            "smallint" => FieldKind::SmallInt,
            "decimal" => FieldKind::Decimal,
            "float" => FieldKind::Float,
            "string" => FieldKind::String,
            "text" => FieldKind::Text,
            "json" => FieldKind::Json,
            "date" => FieldKind::Date,
            _ => FieldKind::Unsupported(raw),
        }
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Association cardinality, keyed by the codes used in metadata exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ToOneOwning = 1,
    ToOneInverse = 2,
    ToManyOwning = 3,
    ToManyInverse = 4,
}

impl Cardinality {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Cardinality::ToOneOwning),
            2 => Some(Cardinality::ToOneInverse),
            3 => Some(Cardinality::ToManyOwning),
            4 => Some(Cardinality::ToManyInverse),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "to_one_owning" => Some(Cardinality::ToOneOwning),
            "to_one_inverse" => Some(Cardinality::ToOneInverse),
            "to_many_owning" => Some(Cardinality::ToManyOwning),
            "to_many_inverse" => Some(Cardinality::ToManyInverse),
            _ => None,
        }
    }

    /// Whether the association points at many target entities.
    pub fn is_collection(self) -> bool {
        matches!(self, Cardinality::ToManyOwning | Cardinality::ToManyInverse)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDescriptor {
    pub name: String,
    pub target_entity: String,
    pub cardinality: Cardinality,
}

/// A mapped entity with its fields and relations, in mapping order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub id: String,
    pub fields: Vec<FieldDescriptor>,
    pub relations: Vec<RelationDescriptor>,
}

/// Read-only view over the ORM mapping.
pub trait MetadataSource {
    /// Fully-qualified identifiers of all mapped entities.
    fn list_entities(&self) -> Vec<String>;

    fn fields_of(&self, entity: &str) -> Result<Vec<FieldDescriptor>, MetadataError>;

    fn relations_of(&self, entity: &str) -> Result<Vec<RelationDescriptor>, MetadataError>;

    /// Configured entity namespaces, in lookup order.
    fn namespace_prefixes(&self) -> Vec<String>;

    /// Assemble the full descriptor for one entity.
    fn describe(&self, entity: &str) -> Result<EntityDescriptor, MetadataError> {
        Ok(EntityDescriptor {
            id: entity.to_string(),
            fields: self.fields_of(entity)?,
            relations: self.relations_of(entity)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("boolean", FieldKind::Boolean)]
    #[case("smallint", FieldKind::SmallInt)]
    #[case("json", FieldKind::Json)]
    #[case("datetime_immutable", FieldKind::Unsupported("datetime_immutable".to_string()))]
    fn test_field_kind_from_string(#[case] raw: &str, #[case] expected: FieldKind) {
        let kind = FieldKind::from(raw.to_string());
        assert_eq!(kind, expected);
        assert_eq!(kind.as_str(), raw);
    }

    #[test]
    fn test_field_kind_deserializes_from_string() {
        let kind: FieldKind = serde_json::from_str("\"decimal\"").unwrap();
        assert_eq!(kind, FieldKind::Decimal);
    }

    #[rstest]
    #[case(1, false)]
    #[case(2, false)]
    #[case(3, true)]
    #[case(4, true)]
    fn test_cardinality_codes(#[case] code: i64, #[case] collection: bool) {
        let cardinality = Cardinality::from_code(code).unwrap();
        assert_eq!(cardinality as i64, code);
        assert_eq!(cardinality.is_collection(), collection);
    }

    #[rstest]
    #[case(0)]
    #[case(5)]
    #[case(8)]
    fn test_cardinality_rejects_unknown_codes(#[case] code: i64) {
        assert_eq!(Cardinality::from_code(code), None);
    }

    #[test]
    fn test_cardinality_names() {
        assert_eq!(
            Cardinality::from_name("to_many_inverse"),
            Some(Cardinality::ToManyInverse)
        );
        assert_eq!(Cardinality::from_name("many_to_many"), None);
    }
}
