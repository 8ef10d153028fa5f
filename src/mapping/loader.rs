//! Metadata loader for descriptor directories
//!
//! Every `*.json` file in the metadata directory holds either:
//! - a single entity object,
//! - an array of entity objects, or
//! - a bundle `{"entities": [...], "classes": {"Name": ["Parent", ...]}}`
//!   where `classes` declares ancestor chains of non-entity classes; either
//!   key may be omitted.
//!
//! Unknown keys are rejected at every level, so a misspelled `mappedBy`
//! fails loading instead of silently producing an owning side.
//!
//! Files are read in sorted path order so the registry enumeration order is
//! stable across runs. Any unreadable or malformed file aborts loading.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use super::errors::{MappingError, MappingResult};
use super::registry::MetadataRegistry;
use super::types::EntityMetadata;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DescriptorBundle {
    #[serde(default)]
    entities: Vec<EntityMetadata>,
    #[serde(default)]
    classes: BTreeMap<String, Vec<String>>,
}

/// Loads entity descriptors from disk into a `MetadataRegistry`.
pub struct MetadataLoader {
    metadata_dir: PathBuf,
}

impl MetadataLoader {
    pub fn new(metadata_dir: impl Into<PathBuf>) -> Self {
        Self {
            metadata_dir: metadata_dir.into(),
        }
    }

    /// Returns the metadata directory path.
    pub fn metadata_dir(&self) -> &Path {
        &self.metadata_dir
    }

    /// Loads every descriptor file into a fresh registry.
    pub fn load(&self) -> MappingResult<MetadataRegistry> {
        let mut registry = MetadataRegistry::new();
        for path in self.descriptor_files()? {
            self.load_file(&path, &mut registry)?;
        }
        Ok(registry)
    }

    /// Lists `*.json` files in sorted order.
    fn descriptor_files(&self) -> MappingResult<Vec<PathBuf>> {
        let dir = self.metadata_dir.display().to_string();

        let entries = fs::read_dir(&self.metadata_dir).map_err(|e| {
            MappingError::io(&dir, format!("Failed to read metadata directory: {}", e))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                MappingError::io(&dir, format!("Failed to read directory entry: {}", e))
            })?;

            let path = entry.path();
            if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    fn load_file(&self, path: &Path, registry: &mut MetadataRegistry) -> MappingResult<()> {
        let display = path.display().to_string();

        let content = fs::read_to_string(path)
            .map_err(|e| MappingError::io(&display, format!("Failed to read file: {}", e)))?;

        let value: Value = serde_json::from_str(&content)
            .map_err(|e| MappingError::malformed(&display, format!("Invalid JSON: {}", e)))?;

        let bundle = parse_descriptor(value).map_err(|e| MappingError::malformed(&display, e))?;

        for entity in bundle.entities {
            // Re-tag structural failures with the file they came from
            registry.register(entity).map_err(|e| match e {
                MappingError::Malformed { reason, .. } => MappingError::malformed(&display, reason),
                other => other,
            })?;
        }
        for (name, ancestors) in bundle.classes {
            registry.declare_class(name, ancestors);
        }

        Ok(())
    }
}

fn parse_descriptor(value: Value) -> Result<DescriptorBundle, serde_json::Error> {
    match value {
        Value::Array(_) => Ok(DescriptorBundle {
            entities: serde_json::from_value(value)?,
            classes: BTreeMap::new(),
        }),
        Value::Object(ref obj) if obj.contains_key("entities") || obj.contains_key("classes") => {
            serde_json::from_value(value)
        }
        _ => Ok(DescriptorBundle {
            entities: vec![serde_json::from_value(value)?],
            classes: BTreeMap::new(),
        }),
    }
}
