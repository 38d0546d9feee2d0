//! JSON Schema validation for documents received from the database.

use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::errors::{ClientError, ClientResult};

static DOCUMENT_SCHEMA: Lazy<Result<JSONSchema, String>> =
    Lazy::new(|| compile(include_str!("dbdocument.json")));

static POST_SCHEMA: Lazy<Result<JSONSchema, String>> =
    Lazy::new(|| compile(include_str!("post.json")));

fn compile(source: &str) -> Result<JSONSchema, String> {
    let schema: Value = serde_json::from_str(source).map_err(|err| err.to_string())?;
    JSONSchema::compile(&schema).map_err(|err| err.to_string())
}

fn check(schema: &Lazy<Result<JSONSchema, String>>, instance: &Value) -> ClientResult<()> {
    let compiled = schema
        .as_ref()
        .map_err(|err| ClientError::schema(format!("schema failed to compile: {err}")))?;

    compiled.validate(instance).map_err(|errors| {
        let joined = errors
            .map(|error| error.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        tracing::warn!(%joined, "document failed validation");
        ClientError::schema(joined)
    })
}

/// Validates a generic database document.
///
/// # Errors
/// Returns [`ClientError::Schema`] listing every violation.
pub fn validate_document(instance: &Value) -> ClientResult<()> {
    check(&DOCUMENT_SCHEMA, instance)
}

/// Validates a post document.
///
/// # Errors
/// Returns [`ClientError::Schema`] listing every violation.
pub fn validate_post(instance: &Value) -> ClientResult<()> {
    check(&POST_SCHEMA, instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta() -> Value {
        json!({
            "createdBy": "ada",
            "createdAt": 10,
            "lastModifiedBy": "ada",
            "lastModifiedAt": 10
        })
    }

    #[test]
    fn test_valid_document() {
        let doc = json!({"path": "/team", "meta": meta(), "doc": {}});
        assert!(validate_document(&doc).is_ok());
    }

    #[test]
    fn test_document_missing_meta() {
        let doc = json!({"path": "/team", "doc": {}});
        let err = validate_document(&doc).unwrap_err();
        assert!(matches!(err, ClientError::Schema { .. }));
        assert!(err.to_string().starts_with("Error with JSON validation"));
        assert!(err.to_string().contains("meta"));
    }

    #[test]
    fn test_valid_post() {
        let post = json!({
            "path": "/team/channels/general/posts/1",
            "meta": meta(),
            "doc": {
                "msg": "hi",
                "parent": "",
                "reactions": {"smile": ["bob"]},
                "extensions": {"scheduledTime": "99"}
            }
        });
        assert!(validate_post(&post).is_ok());
    }

    #[test]
    fn test_post_without_message_is_rejected() {
        let post = json!({"path": "/p", "meta": meta(), "doc": {"parent": ""}});
        assert!(validate_post(&post).is_err());
    }

    #[test]
    fn test_post_with_bad_reactions_is_rejected() {
        let post = json!({
            "path": "/p",
            "meta": meta(),
            "doc": {"msg": "x", "reactions": {"smile": [1, 2]}}
        });
        assert!(validate_post(&post).is_err());
    }
}
