pub mod company;
pub mod credits;
pub mod genre;
pub mod movie;
pub mod person;
pub mod token;
pub mod user;

/// Failure of a write that callers may want to answer differently.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// A unique constraint rejected the row; carries the constraint name
    #[error("duplicate value violates {0}")]
    Conflict(String),
    #[error("{0}")]
    Failed(String),
}

impl WriteError {
    /// Logs `err` and maps unique violations to [`WriteError::Conflict`].
    pub(crate) fn from_sqlx(err: sqlx::Error, what: &str) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                tracing::info!(constraint = %constraint, "Rejected duplicate {}", what);
                return WriteError::Conflict(constraint);
            }
        }

        tracing::error!("Failed to write {}: {:?}", what, err);
        WriteError::Failed(format!("Failed to write {what}"))
    }
}

/// Escapes LIKE wildcards so user input matches literally.
pub(crate) fn like_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Trimmed, non-empty filter value.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("matrix"), "%matrix%");
        assert_eq!(like_pattern("100%_real\\"), "%100\\%\\_real\\\\%");
    }

    #[test]
    fn blank_values_are_ignored() {
        assert_eq!(non_blank(&Some("  ".to_string())), None);
        assert_eq!(non_blank(&Some(" a ".to_string())), Some("a"));
        assert_eq!(non_blank(&None), None);
    }
}
