use crate::{Result, SyncError};
use rusqlite::Connection;
use std::collections::HashMap;
use std::sync::Arc;
use synctool_models::ModelLabel;

/// How a column participates in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Scalar value, stored as-is.
    Plain,
    /// JSON document stored as TEXT; re-parsed when serializing the feed.
    Json,
    /// Relative media path; eligible for image sync.
    Image,
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

/// Operator-side declaration of a model. Columns and the primary key are
/// introspected from the live database, so only the label, the table name
/// and any non-plain fields need declaring.
#[derive(Debug, Clone)]
pub struct ModelSpec {
    pub app: String,
    pub name: String,
    pub table: Option<String>,
    pub image_fields: Vec<String>,
    pub json_fields: Vec<String>,
}

impl ModelSpec {
    pub fn new(app: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            name: name.into(),
            table: None,
            image_fields: Vec::new(),
            json_fields: Vec::new(),
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn image_field(mut self, field: impl Into<String>) -> Self {
        self.image_fields.push(field.into());
        self
    }

    pub fn json_field(mut self, field: impl Into<String>) -> Self {
        self.json_fields.push(field.into());
        self
    }

    fn table_name(&self) -> String {
        self.table
            .clone()
            .unwrap_or_else(|| format!("{}_{}", self.app, self.name))
    }
}

/// Fully-resolved model metadata.
#[derive(Debug, Clone)]
pub struct ModelDef {
    pub app_label: String,
    pub model_name: String,
    pub table: String,
    pub pk_column: String,
    pub fields: Vec<FieldDef>,
}

impl ModelDef {
    pub fn label(&self) -> ModelLabel {
        ModelLabel::new(&self.app_label, &self.model_name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn image_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.kind == FieldKind::Image)
    }

    /// Reads column metadata for `spec` from the database.
    ///
    /// The table must exist and have a single-column primary key. Declared
    /// image/json fields must name real columns.
    pub fn introspect(conn: &Connection, spec: &ModelSpec) -> Result<Self> {
        let table = spec.table_name();

        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(&table)))?;
        let mut columns: Vec<(String, bool)> = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let name: String = row.get("name")?;
            let pk: i64 = row.get("pk")?;
            columns.push((name, pk > 0));
        }

        if columns.is_empty() {
            return Err(SyncError::TableNotFound(table));
        }

        let pk_columns: Vec<&String> = columns.iter().filter(|(_, pk)| *pk).map(|(n, _)| n).collect();
        let pk_column = match pk_columns.as_slice() {
            [] => "rowid".to_string(),
            [one] => (*one).clone(),
            _ => return Err(SyncError::CompositePrimaryKey { table }),
        };

        let label = format!("{}.{}", spec.app, spec.name);
        let mut fields = Vec::new();
        for (name, is_pk) in &columns {
            if *is_pk {
                continue;
            }
            let kind = if spec.image_fields.iter().any(|f| f == name) {
                FieldKind::Image
            } else if spec.json_fields.iter().any(|f| f == name) {
                FieldKind::Json
            } else {
                FieldKind::Plain
            };
            fields.push(FieldDef {
                name: name.clone(),
                kind,
            });
        }

        // Catch config drift: a declared special field must be a column.
        for declared in spec.image_fields.iter().chain(spec.json_fields.iter()) {
            if !fields.iter().any(|f| &f.name == declared) {
                return Err(SyncError::UnknownField {
                    model: label,
                    field: declared.clone(),
                });
            }
        }

        Ok(Self {
            app_label: spec.app.clone(),
            model_name: spec.name.clone(),
            table,
            pk_column,
            fields,
        })
    }
}

/// Ordered collection of registered models, keyed by label.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    order: Vec<ModelLabel>,
    models: HashMap<ModelLabel, Arc<ModelDef>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, model: ModelDef) {
        let label = model.label();
        if !self.models.contains_key(&label) {
            self.order.push(label.clone());
        }
        self.models.insert(label, Arc::new(model));
    }

    pub fn get(&self, label: &ModelLabel) -> Result<Arc<ModelDef>> {
        self.models
            .get(label)
            .cloned()
            .ok_or_else(|| SyncError::UnknownModel(label.to_string()))
    }

    pub fn get_str(&self, label: &str) -> Result<Arc<ModelDef>> {
        self.get(&ModelLabel::parse(label)?)
    }

    /// All models, in registration order.
    pub fn models(&self) -> impl Iterator<Item = &Arc<ModelDef>> {
        self.order.iter().filter_map(|l| self.models.get(l))
    }

    /// Models of one app, in registration order. Errors if none match.
    pub fn models_for_app(&self, app: &str) -> Result<Vec<Arc<ModelDef>>> {
        let matched: Vec<Arc<ModelDef>> = self
            .models()
            .filter(|m| m.app_label == app)
            .cloned()
            .collect();

        if matched.is_empty() {
            return Err(SyncError::UnknownApp(app.to_string()));
        }

        Ok(matched)
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Quotes a SQL identifier. Table and column names come from operator
/// config and PRAGMA output, never from the feed, but quoting keeps odd
/// names (reserved words, dashes) working.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod schema_tests;
