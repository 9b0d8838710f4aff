//! Type declaration generation and YAML file output.
//!
//! Generation runs in two passes. The collect pass asks which entities to
//! generate and builds their declarations. The write pass renders each one
//! and writes it to disk, asking before replacing existing files. A failed
//! write is recorded in the report and never stops the remaining files.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::mapper::{NAMESPACE_SEPARATOR, map_field_type, map_relation_type, strip_namespace, type_name};
use crate::metadata::{EntityDescriptor, MetadataError, MetadataSource};
use crate::prompt::{ApplyAllGate, DecisionProvider, PromptError};

/// Relative location of generated types under the project root.
pub const DEFAULT_TYPES_PATH: &str = "config/graphql/types/entity";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("Failed to render type '{type_name}': {message}")]
    RenderFailed { type_name: String, message: String },

    #[error("Failed to create directory '{path}': {message}")]
    CreateDirFailed { path: String, message: String },

    #[error("Failed to save '{type_name}' in '{path}': {message}")]
    WriteFailed {
        type_name: String,
        path: String,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Object,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldType {
    /// `None` is emitted as a YAML null.
    #[serde(rename = "type")]
    pub type_token: Option<String>,
}

/// Field name to type entries, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap(Vec<(String, FieldType)>);

impl FieldMap {
    /// Insert or replace an entry. A replaced entry keeps its original position.
    pub fn insert(&mut self, name: String, field: FieldType) {
        upsert(&mut self.0, name, field);
    }

    pub fn get(&self, name: &str) -> Option<&FieldType> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, field) in &self.0 {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeConfig {
    pub fields: FieldMap,
}

/// A GraphQL object type as written to one YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDeclaration {
    #[serde(rename = "type")]
    pub kind: DeclarationKind,
    pub config: TypeConfig,
}

fn upsert<V>(entries: &mut Vec<(String, V)>, key: String, value: V) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => entries.push((key, value)),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnsupportedField {
    pub entity: String,
    pub field: String,
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteFailure {
    pub path: String,
    pub message: String,
}

/// Outcome of a generation run.
#[derive(Debug, Default, Serialize)]
pub struct GenerateReport {
    pub entities_found: usize,
    pub skipped_entities: Vec<String>,
    pub unsupported_fields: Vec<UnsupportedField>,
    pub generated_types: Vec<String>,
    pub written: Vec<String>,
    pub skipped_files: Vec<String>,
    pub failures: Vec<WriteFailure>,
}

#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Directory receiving the generated files.
    pub output_dir: PathBuf,
    /// Drop fields whose kind has no GraphQL mapping instead of writing `type: null`.
    pub skip_unsupported: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_TYPES_PATH),
            skip_unsupported: false,
        }
    }
}

/// Build the declaration for one entity.
///
/// Fields come first, then relations. Unsupported fields are pushed onto
/// `unsupported` and either mapped to `null` or dropped.
pub fn build_declaration(
    entity: &EntityDescriptor,
    prefixes: &[String],
    skip_unsupported: bool,
    unsupported: &mut Vec<UnsupportedField>,
) -> TypeDeclaration {
    let mut fields = FieldMap::default();

    for field in &entity.fields {
        let type_token = map_field_type(&field.kind, field.nullable);
        if type_token.is_none() {
            unsupported.push(UnsupportedField {
                entity: entity.id.clone(),
                field: field.name.clone(),
                kind: field.kind.to_string(),
            });
            if skip_unsupported {
                continue;
            }
        }
        fields.insert(field.name.clone(), FieldType { type_token });
    }

    for relation in &entity.relations {
        let target = strip_namespace(&relation.target_entity, prefixes);
        fields.insert(
            relation.name.clone(),
            FieldType {
                type_token: Some(map_relation_type(target, relation.cardinality)),
            },
        );
    }

    TypeDeclaration {
        kind: DeclarationKind::Object,
        config: TypeConfig { fields },
    }
}

/// Render one declaration as a standalone YAML document keyed by its type name.
pub fn render_yaml(short_name: &str, declaration: &TypeDeclaration) -> Result<String, GenerateError> {
    let name = type_name(short_name);
    let mut document = BTreeMap::new();
    document.insert(name.as_str(), declaration);
    serde_yaml::to_string(&document).map_err(|e| GenerateError::RenderFailed {
        type_name: name.clone(),
        message: e.to_string(),
    })
}

/// File path for a short entity name: each namespace segment becomes a directory.
pub fn target_path(output_dir: &Path, short_name: &str) -> PathBuf {
    let mut path = output_dir.to_path_buf();
    let mut segments = short_name.split(NAMESPACE_SEPARATOR).peekable();
    while let Some(segment) = segments.next() {
        if segments.peek().is_some() {
            path.push(segment);
        } else {
            path.push(format!("{}.yaml", segment));
        }
    }
    path
}

/// Drives one generation run over a metadata source.
pub struct Generator<'a> {
    source: &'a dyn MetadataSource,
    decisions: &'a mut dyn DecisionProvider,
    options: GeneratorOptions,
    entity_gate: ApplyAllGate,
    overwrite_gate: ApplyAllGate,
}

impl<'a> Generator<'a> {
    pub fn new(
        source: &'a dyn MetadataSource,
        decisions: &'a mut dyn DecisionProvider,
        options: GeneratorOptions,
    ) -> Self {
        Self {
            source,
            decisions,
            options,
            entity_gate: ApplyAllGate::new(),
            overwrite_gate: ApplyAllGate::new(),
        }
    }

    pub fn run(mut self) -> Result<GenerateReport, GenerateError> {
        let mut report = GenerateReport::default();
        let declarations = self.collect(&mut report)?;
        self.write_all(declarations, &mut report)?;
        Ok(report)
    }

    fn collect(
        &mut self,
        report: &mut GenerateReport,
    ) -> Result<Vec<(String, TypeDeclaration)>, GenerateError> {
        let entities = self.source.list_entities();
        let prefixes = self.source.namespace_prefixes();
        report.entities_found = entities.len();
        info!("Found {} entities", entities.len());

        let mut declarations = Vec::new();
        for entity in &entities {
            let question = format!("Generate type for {}", entity);
            if !self.entity_gate.confirm(self.decisions, &question)? {
                debug!(entity = %entity, "skipped");
                report.skipped_entities.push(entity.clone());
                continue;
            }

            let descriptor = self.source.describe(entity)?;
            let before = report.unsupported_fields.len();
            let declaration = build_declaration(
                &descriptor,
                &prefixes,
                self.options.skip_unsupported,
                &mut report.unsupported_fields,
            );
            for field in &report.unsupported_fields[before..] {
                warn!(
                    entity = %field.entity,
                    field = %field.field,
                    kind = %field.kind,
                    "unsupported field type"
                );
            }

            let short_name = strip_namespace(&descriptor.id, &prefixes).to_string();
            upsert(&mut declarations, short_name, declaration);
        }

        Ok(declarations)
    }

    fn write_all(
        &mut self,
        declarations: Vec<(String, TypeDeclaration)>,
        report: &mut GenerateReport,
    ) -> Result<(), GenerateError> {
        for (short_name, declaration) in declarations {
            let name = type_name(&short_name);
            report.generated_types.push(name.clone());
            let path = target_path(&self.options.output_dir, &short_name);
            info!("Saving {} to {}", name, path.display());

            match self.write_one(&short_name, &declaration, &path) {
                Ok(true) => {
                    info!("{} was saved in {}", name, path.display());
                    report.written.push(path.display().to_string());
                }
                Ok(false) => {
                    debug!(path = %path.display(), "kept existing file");
                    report.skipped_files.push(path.display().to_string());
                }
                Err(GenerateError::Prompt(e)) => return Err(e.into()),
                Err(e) => {
                    error!("{}", e);
                    report.failures.push(WriteFailure {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Write a single file. Returns `Ok(false)` when the operator kept the existing file.
    fn write_one(
        &mut self,
        short_name: &str,
        declaration: &TypeDeclaration,
        path: &Path,
    ) -> Result<bool, GenerateError> {
        let yaml = render_yaml(short_name, declaration)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| GenerateError::CreateDirFailed {
                path: parent.display().to_string(),
                message: e.to_string(),
            })?;
        }

        if path.exists() {
            let question = format!("{} already exist. Overwrite it", path.display());
            if !self.overwrite_gate.confirm(self.decisions, &question)? {
                return Ok(false);
            }
        }

        fs::write(path, yaml).map_err(|e| GenerateError::WriteFailed {
            type_name: type_name(short_name),
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(true)
    }
}
