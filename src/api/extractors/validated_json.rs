use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that has been both deserialized and validated. Shape errors and
/// rule violations both surface as 400 with per-field messages.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(reject)?;

        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

fn reject(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => {
            let text = e.body_text();
            let detail = text.split_once("target type: ").map(|(_, d)| d).unwrap_or(&text);
            let (field, message) = locate_field(detail);
            AppError::MalformedBody { field, message }
        }
        other => AppError::MalformedBody { field: None, message: other.body_text() },
    }
}

/// Splits serde's `path: message` rendering; root-level `missing field` errors
/// name the field inside backticks instead.
fn locate_field(detail: &str) -> (Option<String>, String) {
    let detail = detail.split(" at line ").next().unwrap_or(detail);

    if let Some(name) = detail.strip_prefix("missing field `")
        && let Some((name, _)) = name.split_once('`')
    {
        return (Some(name.to_string()), "is required".to_string());
    }

    if let Some((path, message)) = detail.split_once(": ")
        && !path.is_empty()
        && path.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'))
    {
        return (Some(path.to_string()), message.to_string());
    }

    (None, detail.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_field_reads_serde_path() {
        let (field, message) = locate_field("email: invalid type: integer `5`, expected a string at line 1 column 10");
        assert_eq!(field.as_deref(), Some("email"));
        assert_eq!(message, "invalid type: integer `5`, expected a string");
    }

    #[test]
    fn test_locate_field_handles_missing_field() {
        let (field, message) = locate_field("missing field `name` at line 1 column 2");
        assert_eq!(field.as_deref(), Some("name"));
        assert_eq!(message, "is required");
    }

    #[test]
    fn test_locate_field_leaves_root_errors_unattributed() {
        let (field, message) = locate_field("invalid type: integer `5`, expected struct RegisterRequest");
        assert!(field.is_none());
        assert!(message.starts_with("invalid type"));
    }
}
