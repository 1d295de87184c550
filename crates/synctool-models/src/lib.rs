use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Feed Records
// ============================================================================

/// Primary key value as it appears on the wire.
///
/// Integer keys are the common case; string keys (slugs, UUIDs stored as
/// text) round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pk {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for Pk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pk::Int(n) => write!(f, "{}", n),
            Pk::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One record in the sync feed.
///
/// The feed is an ordered JSON array of these objects:
/// `{"model": "<app>.<model>", "pk": <value>, "fields": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRecord {
    pub model: String,
    pub pk: Pk,
    pub fields: Map<String, Value>,
}

impl SyncRecord {
    pub fn label(&self) -> Result<ModelLabel, LabelError> {
        ModelLabel::parse(&self.model)
    }
}

// ============================================================================
// Model Labels
// ============================================================================

/// A `"<app>.<model>"` label, split into its two halves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelLabel {
    pub app: String,
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid model label '{0}': expected '<app>.<model>'")]
pub struct LabelError(pub String);

impl ModelLabel {
    pub fn new(app: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            name: name.into(),
        }
    }

    pub fn parse(label: &str) -> Result<Self, LabelError> {
        match label.split_once('.') {
            Some((app, name)) if !app.is_empty() && !name.is_empty() && !name.contains('.') => {
                Ok(Self::new(app, name))
            }
            _ => Err(LabelError(label.to_string())),
        }
    }
}

impl std::fmt::Display for ModelLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.app, self.name)
    }
}

// ============================================================================
// Error Responses
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_fixture_format() {
        let json = r#"{"model": "blog.post", "pk": 3, "fields": {"slug": "hello", "blog": 1}}"#;
        let record: SyncRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.model, "blog.post");
        assert_eq!(record.pk, Pk::Int(3));
        assert_eq!(record.fields["slug"], "hello");
        assert_eq!(record.fields["blog"], 1);
    }

    #[test]
    fn test_text_pk() {
        let json = r#"{"model": "blog.category", "pk": "rust", "fields": {}}"#;
        let record: SyncRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.pk, Pk::Text("rust".to_string()));
    }

    #[test]
    fn test_record_serializes_in_fixture_order() {
        let record = SyncRecord {
            model: "blog.post".to_string(),
            pk: Pk::Int(1),
            fields: Map::new(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"model":"blog.post","pk":1,"fields":{}}"#);
    }

    #[test]
    fn test_label_parse() {
        let label = ModelLabel::parse("blog.post").unwrap();
        assert_eq!(label.app, "blog");
        assert_eq!(label.name, "post");
        assert_eq!(label.to_string(), "blog.post");
    }

    #[test]
    fn test_label_parse_rejects_malformed() {
        assert!(ModelLabel::parse("blog").is_err());
        assert!(ModelLabel::parse("blog.").is_err());
        assert!(ModelLabel::parse(".post").is_err());
        assert!(ModelLabel::parse("a.b.c").is_err());
    }
}
