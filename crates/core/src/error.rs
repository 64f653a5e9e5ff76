use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a missing row looked up by primary key.
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        Self::NotFound {
            entity,
            key: format!("with id {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_by_id_reads_naturally() {
        let err = CoreError::not_found("Customer", 7);
        assert_eq!(err.to_string(), "Customer with id 7 not found");
    }

    #[test]
    fn not_found_by_other_key() {
        let err = CoreError::NotFound {
            entity: "User",
            key: "with email a@x.com".into(),
        };
        assert_eq!(err.to_string(), "User with email a@x.com not found");
    }
}
