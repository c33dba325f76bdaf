//! Error types for dropwatch

/// Result type alias using dropwatch's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for dropwatch operations
///
/// The type is `Clone` so that a memoized initialization failure can be handed
/// to every caller that asks for the pipeline afterwards. Underlying I/O and
/// parse causes are folded into the message together with the offending path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Wrong field set, field order, or field type
    #[error("schema error: field `{field}`: {reason}")]
    Schema { field: String, reason: String },

    /// Value outside a hard numeric bound, or a degenerate fitted field
    #[error("domain error: field `{field}` = {value}: {reason}")]
    Domain {
        field: String,
        value: f64,
        reason: String,
    },

    /// The model artifact could not be loaded
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// The reference dataset could not be read
    #[error("reference data unavailable: {0}")]
    ReferenceDataUnavailable(String),

    /// The classifier produced unusable output
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new schema error
    pub fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a new domain error
    pub fn domain(field: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        Self::Domain {
            field: field.into(),
            value,
            reason: reason.into(),
        }
    }

    /// Create a new model-unavailable error
    pub fn model_unavailable(msg: impl Into<String>) -> Self {
        Self::ModelUnavailable(msg.into())
    }

    /// Create a new reference-data-unavailable error
    pub fn reference_data(msg: impl Into<String>) -> Self {
        Self::ReferenceDataUnavailable(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True for field set / order violations
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    /// True for out-of-range values and zero-variance fields
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain { .. })
    }

    /// True when a startup artifact (model or reference data) could not be loaded
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::ModelUnavailable(_) | Self::ReferenceDataUnavailable(_)
        )
    }

    /// Short machine-readable name of the error kind, used as a metric label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Schema { .. } => "schema",
            Self::Domain { .. } => "domain",
            Self::ModelUnavailable(_) => "model_unavailable",
            Self::ReferenceDataUnavailable(_) => "reference_data_unavailable",
            Self::Classifier(_) => "classifier",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_context() {
        let err = Error::domain("Debtor", 2.0, "expected 0 or 1");
        assert_eq!(
            err.to_string(),
            "domain error: field `Debtor` = 2: expected 0 or 1"
        );

        let err = Error::schema("GDP", "missing");
        assert!(err.to_string().contains("`GDP`"));
    }

    #[test]
    fn test_predicates() {
        assert!(Error::schema("a", "b").is_schema());
        assert!(Error::domain("a", 1.0, "b").is_domain());
        assert!(Error::model_unavailable("gone").is_unavailable());
        assert!(Error::reference_data("gone").is_unavailable());
        assert!(!Error::config("bad").is_unavailable());
        assert_eq!(Error::classifier("nan").kind(), "classifier");
    }
}
