use thiserror::Error;

use models::errors::ModelError;

/// Shown to callers in place of infrastructure failure details.
pub const INTERNAL_ERROR_MESSAGE: &str = "terjadi kesalahan pada server";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("import failed: {0}")]
    Import(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl ServiceError {
    pub fn db(err: impl std::fmt::Display) -> Self { Self::Db(err.to_string()) }

    /// Human-readable text without the variant prefix, as shown to API callers.
    pub fn message(&self) -> String {
        match self {
            ServiceError::Validation(m)
            | ServiceError::NotFound(m)
            | ServiceError::Import(m)
            | ServiceError::Db(m)
            | ServiceError::Hash(m) => m.clone(),
            ServiceError::Model(ModelError::Validation(m)) | ServiceError::Model(ModelError::Db(m)) => m.clone(),
        }
    }

    /// Caller-side mistake (bad input) rather than an infrastructure failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Validation(_) | ServiceError::Model(ModelError::Validation(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_strips_variant_prefix() {
        let e = ServiceError::NotFound("data alumni tidak ditemukan".into());
        assert_eq!(e.to_string(), "not found: data alumni tidak ditemukan");
        assert_eq!(e.message(), "data alumni tidak ditemukan");
    }

    #[test]
    fn model_validation_counts_as_validation() {
        let e: ServiceError = ModelError::Validation("nama wajib diisi".into()).into();
        assert!(e.is_validation());
        assert_eq!(e.message(), "nama wajib diisi");
        assert!(!ServiceError::Db("down".into()).is_validation());
    }
}
