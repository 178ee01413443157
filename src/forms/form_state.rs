//! Form scope: owns fields and resolves references between them

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use super::field::{Field, FieldConfig, FieldHandle, FieldKind, Value};
use super::proxy_field::SELF_TARGET;
use super::resolve::Resolve;
use super::value_field::ValueField;
use crate::error::{FormError, Result};

/// One entry of a serialized form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub id: String,
    #[serde(flatten)]
    pub config: FieldConfig,
}

/// Serialized form: fields in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// A set of uniquely identified fields
#[derive(Debug, Default)]
pub struct Form {
    fields: Vec<FieldHandle>,
    index: HashMap<String, usize>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a form from its definition
    pub fn from_definition(definition: &FormDefinition) -> Result<Self> {
        let mut form = Self::new();
        for entry in &definition.fields {
            form.insert_handle(entry.kind.build(&entry.id, &entry.config))?;
        }
        tracing::debug!(fields = form.len(), "form built");
        Ok(form)
    }

    /// Parse a JSON form definition
    pub fn from_json(json: &str) -> Result<Self> {
        let definition: FormDefinition = serde_json::from_str(json)?;
        Self::from_definition(&definition)
    }

    /// Load a JSON form definition from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Add a field, rejecting duplicate identifiers
    pub fn insert(&mut self, field: impl Field + 'static) -> Result<FieldHandle> {
        self.insert_handle(Rc::new(field))
    }

    pub fn insert_handle(&mut self, field: FieldHandle) -> Result<FieldHandle> {
        let id = field.id().to_string();
        if self.index.contains_key(&id) {
            return Err(FormError::DuplicateField(id));
        }
        self.index.insert(id, self.fields.len());
        self.fields.push(field.clone());
        Ok(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, id: &str) -> Option<FieldHandle> {
        self.index.get(id).map(|&i| self.fields[i].clone())
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &FieldHandle> {
        self.fields.iter()
    }

    /// Get a field that holds its own value
    pub fn value_field(&self, id: &str) -> Option<&ValueField> {
        let &i = self.index.get(id)?;
        self.fields[i].as_value_field()
    }

    fn require(&self, id: &str) -> Result<FieldHandle> {
        self.field(id)
            .ok_or_else(|| FormError::UnknownField(id.to_string()))
    }

    /// Read a field's value by id
    pub fn value(&self, id: &str) -> Result<Option<Value>> {
        Ok(self.require(id)?.value(self))
    }

    /// Write a field's value by id
    pub fn set_value(&self, id: &str, value: impl Into<Value>) -> Result<()> {
        self.require(id)?.set_value(value.into(), self);
        Ok(())
    }

    /// Current values keyed by field id
    pub fn snapshot(&self) -> serde_json::Map<String, serde_json::Value> {
        self.fields
            .iter()
            .map(|field| {
                let value = field
                    .value(self)
                    .map(|v| v.to_json())
                    .unwrap_or(serde_json::Value::Null);
                (field.id().to_string(), value)
            })
            .collect()
    }
}

impl Resolve for Form {
    /// `#` is the requesting field, `#id` and `id` name a field in this form
    fn resolve(&self, origin: &str, path: &str) -> Option<FieldHandle> {
        let path = path.trim();
        if path.is_empty() {
            return None;
        }
        if path == SELF_TARGET {
            return self.field(origin);
        }
        let id = path.strip_prefix('#').unwrap_or(path);
        self.field(id)
    }
}
