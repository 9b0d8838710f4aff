//! File-backed metadata source.
//!
//! A metadata dump is an export of the ORM mapping, either JSON or YAML
//! (picked by file extension):
//!
//! ```json
//! {
//!   "entity_namespaces": ["App\\Entity"],
//!   "entities": [
//!     {
//!       "name": "App\\Entity\\User",
//!       "fields": [{"name": "active", "type": "boolean", "nullable": false}],
//!       "associations": [{"name": "orders", "target_entity": "App\\Entity\\Order", "type": 3}]
//!     }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{
    Cardinality, EntityDescriptor, FieldDescriptor, FieldKind, MetadataError, MetadataSource,
    RelationDescriptor,
};

#[derive(Debug, Deserialize)]
struct RawDump {
    #[serde(default)]
    entity_namespaces: Vec<String>,
    #[serde(default)]
    entities: Vec<RawEntity>,
}

#[derive(Debug, Deserialize)]
struct RawEntity {
    name: String,
    #[serde(default)]
    fields: Vec<RawField>,
    #[serde(default)]
    associations: Vec<RawAssociation>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    name: String,
    #[serde(rename = "type")]
    kind: FieldKind,
    #[serde(default)]
    nullable: bool,
}

#[derive(Debug, Deserialize)]
struct RawAssociation {
    name: String,
    target_entity: String,
    #[serde(rename = "type")]
    cardinality: RawCardinality,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCardinality {
    Code(i64),
    Name(String),
}

impl RawCardinality {
    fn resolve(&self) -> Option<Cardinality> {
        match self {
            RawCardinality::Code(code) => Cardinality::from_code(*code),
            RawCardinality::Name(name) => Cardinality::from_name(name),
        }
    }

    fn describe(&self) -> String {
        match self {
            RawCardinality::Code(code) => code.to_string(),
            RawCardinality::Name(name) => name.clone(),
        }
    }
}

/// Entity metadata loaded from an exported mapping file.
///
/// Cardinalities are validated on load, so every descriptor handed out is
/// well-formed.
#[derive(Debug, Clone, Default)]
pub struct MetadataDump {
    namespaces: Vec<String>,
    entities: Vec<EntityDescriptor>,
}

impl MetadataDump {
    /// Load a dump from disk. `.yaml`/`.yml` files are parsed as YAML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let content = fs::read_to_string(path).map_err(|e| MetadataError::ReadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let raw: RawDump = if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| MetadataError::ParseFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| MetadataError::ParseFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        };

        Self::from_raw(raw)
    }

    #[cfg(test)]
    pub fn from_json_str(content: &str) -> Result<Self, MetadataError> {
        let raw: RawDump = serde_json::from_str(content).map_err(|e| MetadataError::ParseFailed {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        Self::from_raw(raw)
    }

    /// Replace the dump's entity namespaces.
    pub fn with_namespaces(mut self, namespaces: Vec<String>) -> Self {
        self.namespaces = namespaces;
        self
    }

    fn from_raw(raw: RawDump) -> Result<Self, MetadataError> {
        let mut entities = Vec::with_capacity(raw.entities.len());

        for entity in raw.entities {
            let fields = entity
                .fields
                .into_iter()
                .map(|f| FieldDescriptor {
                    name: f.name,
                    kind: f.kind,
                    nullable: f.nullable,
                })
                .collect();

            let mut relations = Vec::with_capacity(entity.associations.len());
            for assoc in entity.associations {
                let cardinality =
                    assoc
                        .cardinality
                        .resolve()
                        .ok_or_else(|| MetadataError::InvalidCardinality {
                            entity: entity.name.clone(),
                            association: assoc.name.clone(),
                            code: assoc.cardinality.describe(),
                        })?;
                relations.push(RelationDescriptor {
                    name: assoc.name,
                    target_entity: assoc.target_entity,
                    cardinality,
                });
            }

            entities.push(EntityDescriptor {
                id: entity.name,
                fields,
                relations,
            });
        }

        Ok(Self {
            namespaces: raw.entity_namespaces,
            entities,
        })
    }

    fn find(&self, entity: &str) -> Result<&EntityDescriptor, MetadataError> {
        self.entities
            .iter()
            .find(|e| e.id == entity)
            .ok_or_else(|| MetadataError::UnknownEntity {
                entity: entity.to_string(),
            })
    }
}

impl MetadataSource for MetadataDump {
    fn list_entities(&self) -> Vec<String> {
        self.entities.iter().map(|e| e.id.clone()).collect()
    }

    fn fields_of(&self, entity: &str) -> Result<Vec<FieldDescriptor>, MetadataError> {
        Ok(self.find(entity)?.fields.clone())
    }

    fn relations_of(&self, entity: &str) -> Result<Vec<RelationDescriptor>, MetadataError> {
        Ok(self.find(entity)?.relations.clone())
    }

    fn namespace_prefixes(&self) -> Vec<String> {
        self.namespaces.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_temp_file, SHOP_METADATA};
    use rstest::{fixture, rstest};

    #[fixture]
    fn shop() -> MetadataDump {
        MetadataDump::from_json_str(SHOP_METADATA).expect("fixture should parse")
    }

    #[rstest]
    fn test_lists_entities_in_order(shop: MetadataDump) {
        assert_eq!(
            shop.list_entities(),
            vec![
                "App\\Entity\\User".to_string(),
                "App\\Entity\\Order".to_string(),
                "App\\Entity\\Shop\\Product".to_string(),
            ]
        );
    }

    #[rstest]
    fn test_namespaces(shop: MetadataDump) {
        assert_eq!(shop.namespace_prefixes(), vec!["App\\Entity".to_string()]);
    }

    #[rstest]
    fn test_fields_of(shop: MetadataDump) {
        let fields = shop.fields_of("App\\Entity\\User").unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].name, "active");
        assert_eq!(fields[0].kind, FieldKind::Boolean);
        assert!(!fields[0].nullable);
        assert!(fields[1].nullable);
    }

    #[rstest]
    fn test_nullable_defaults_to_false(shop: MetadataDump) {
        let fields = shop.fields_of("App\\Entity\\Order").unwrap();
        let total = fields.iter().find(|f| f.name == "total").unwrap();
        assert!(!total.nullable);
    }

    #[rstest]
    fn test_relations_of(shop: MetadataDump) {
        let relations = shop.relations_of("App\\Entity\\User").unwrap();
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].target_entity, "App\\Entity\\Order");
        assert_eq!(relations[0].cardinality, Cardinality::ToManyInverse);
    }

    #[rstest]
    fn test_named_cardinality(shop: MetadataDump) {
        let relations = shop.relations_of("App\\Entity\\Order").unwrap();
        assert_eq!(relations[0].cardinality, Cardinality::ToOneOwning);
    }

    #[rstest]
    fn test_unknown_entity(shop: MetadataDump) {
        let result = shop.fields_of("App\\Entity\\Missing");
        assert!(matches!(result, Err(MetadataError::UnknownEntity { .. })));
    }

    #[test]
    fn test_invalid_cardinality_fails_on_load() {
        let json = r#"{
            "entities": [{
                "name": "App\\Entity\\Tag",
                "associations": [{"name": "posts", "target_entity": "App\\Entity\\Post", "type": 8}]
            }]
        }"#;
        let err = MetadataDump::from_json_str(json).unwrap_err();
        match err {
            MetadataError::InvalidCardinality { entity, association, code } => {
                assert_eq!(entity, "App\\Entity\\Tag");
                assert_eq!(association, "posts");
                assert_eq!(code, "8");
            }
            other => panic!("Expected InvalidCardinality, got {other:?}"),
        }
    }

    #[test]
    fn test_with_namespaces_overrides_dump() {
        let dump = MetadataDump::from_json_str(SHOP_METADATA)
            .unwrap()
            .with_namespaces(vec!["App".to_string()]);
        assert_eq!(dump.namespace_prefixes(), vec!["App".to_string()]);
    }

    #[test]
    fn test_load_json_file() {
        let file = create_temp_file(SHOP_METADATA, ".json");
        let dump = MetadataDump::load(file.path()).unwrap();
        assert_eq!(dump.list_entities().len(), 3);
    }

    #[test]
    fn test_load_yaml_file() {
        let yaml = r#"
entity_namespaces:
  - 'App\Entity'
entities:
  - name: 'App\Entity\Tag'
    fields:
      - { name: label, type: string, nullable: true }
    associations:
      - { name: posts, target_entity: 'App\Entity\Post', type: to_many_owning }
"#;
        let file = create_temp_file(yaml, ".yaml");
        let dump = MetadataDump::load(file.path()).unwrap();
        assert_eq!(dump.list_entities(), vec!["App\\Entity\\Tag".to_string()]);
        let relations = dump.relations_of("App\\Entity\\Tag").unwrap();
        assert_eq!(relations[0].cardinality, Cardinality::ToManyOwning);
    }

    #[test]
    fn test_load_missing_file() {
        let result = MetadataDump::load(Path::new("/nonexistent/metadata.json"));
        assert!(matches!(result, Err(MetadataError::ReadFailed { .. })));
    }

    #[test]
    fn test_load_invalid_json() {
        let file = create_temp_file("{ not json", ".json");
        let result = MetadataDump::load(file.path());
        assert!(matches!(result, Err(MetadataError::ParseFailed { .. })));
    }
}
