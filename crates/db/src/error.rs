/// Failures raised by the store itself, as opposed to business-rule errors.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// An insert or update would duplicate a value that must be unique.
    #[error("Duplicate value violates unique constraint: {constraint}")]
    UniqueViolation { constraint: &'static str },

    /// A row references a parent that does not exist.
    #[error("Referenced row does not exist: {constraint}")]
    ForeignKeyViolation { constraint: &'static str },

    /// A change would remove or invalidate a row that others still point at.
    #[error("Row is still referenced: {constraint}")]
    StillReferenced { constraint: &'static str },
}
