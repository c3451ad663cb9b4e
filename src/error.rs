use async_graphql::ErrorExtensions;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CellarError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load data file '{}': {message}", path.display())]
    DataFile { path: PathBuf, message: String },

    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GraphQL error: {message}")]
    GraphQL {
        message: String,
        code: Option<String>,
    },
}

impl CellarError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CellarError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Stable code reported in GraphQL `extensions.code`.
    pub fn code(&self) -> &'static str {
        match self {
            CellarError::NotFound { .. } => "NOT_FOUND",
            CellarError::Validation(_) => "BAD_USER_INPUT",
            CellarError::Integrity(_) => "INTEGRITY_VIOLATION",
            _ => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ErrorExtensions for CellarError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

pub type Result<T> = std::result::Result<T, CellarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_variant() {
        assert_eq!(CellarError::not_found("Wine", "7").code(), "NOT_FOUND");
        assert_eq!(
            CellarError::Validation("bad".to_string()).code(),
            "BAD_USER_INPUT"
        );
        assert_eq!(
            CellarError::Config("port".to_string()).code(),
            "INTERNAL_SERVER_ERROR"
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = CellarError::not_found("Wine list", "abc");
        assert_eq!(err.to_string(), "Wine list not found: abc");
    }

    #[test]
    fn test_extend_sets_code() {
        let err = CellarError::Integrity("dangling varietal".to_string()).extend();
        let code = err
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .cloned();
        assert_eq!(
            code,
            Some(async_graphql::Value::from("INTEGRITY_VIOLATION"))
        );
    }
}
