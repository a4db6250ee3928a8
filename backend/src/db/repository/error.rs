//! Error type shared by every repository backend.
//!
//! Each variant carries a message and an [`ErrorContext`] saying which
//! operation and record were involved. The HTTP layer maps variants to status
//! codes; see [`RepositoryError::is_client_error`].

use std::fmt;

use crate::services::crowd::CrowdLevelError;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Where a repository error happened.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// e.g. `get_hospital`, `insert_booking`
    pub operation: Option<String>,
    /// e.g. `hospital`, `booking`
    pub entity: Option<String>,
    pub entity_id: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Self::default()
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Renders as `[key=value, ...]` over the fields that are set.
impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("operation", &self.operation),
            ("entity", &self.entity),
            ("id", &self.entity_id),
            ("details", &self.details),
        ];

        f.write_str("[")?;
        let mut separator = "";
        for (key, value) in fields {
            if let Some(value) = value {
                write!(f, "{}{}={}", separator, key, value)?;
                separator = ", ";
            }
        }
        f.write_str("]")
    }
}

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
#[allow(clippy::result_large_err)]
pub enum RepositoryError {
    /// The store could not be reached.
    #[error("Connection error: {message} {context}")]
    ConnectionError {
        message: String,
        context: ErrorContext,
    },

    #[error("Query error: {message} {context}")]
    QueryError {
        message: String,
        context: ErrorContext,
    },

    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// Caller supplied something that is not a storage identifier.
    #[error("Invalid identifier: {message} {context}")]
    InvalidIdentifier {
        message: String,
        context: ErrorContext,
    },

    /// Stored data could not be interpreted after it was read.
    #[error("Data validation error: {message} {context}")]
    ValidationError {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message} {context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },

    #[error("Internal error: {message} {context}")]
    InternalError {
        message: String,
        context: ErrorContext,
    },
}

/// `name(message)` and `name_with_context(message, context)` per variant.
macro_rules! constructors {
    ($($variant:ident => $bare:ident, $with_context:ident;)+) => {
        impl RepositoryError {
            $(
                pub fn $bare(message: impl Into<String>) -> Self {
                    Self::$with_context(message, ErrorContext::default())
                }

                pub fn $with_context(message: impl Into<String>, context: ErrorContext) -> Self {
                    Self::$variant {
                        message: message.into(),
                        context,
                    }
                }
            )+
        }
    };
}

constructors! {
    ConnectionError => connection, connection_with_context;
    QueryError => query, query_with_context;
    NotFound => not_found, not_found_with_context;
    InvalidIdentifier => invalid_identifier, invalid_identifier_with_context;
    ValidationError => validation, validation_with_context;
    ConfigurationError => configuration, configuration_with_context;
    InternalError => internal, internal_with_context;
}

impl RepositoryError {
    fn parts(&self) -> (&str, &ErrorContext) {
        match self {
            Self::ConnectionError { message, context }
            | Self::QueryError { message, context }
            | Self::NotFound { message, context }
            | Self::InvalidIdentifier { message, context }
            | Self::ValidationError { message, context }
            | Self::ConfigurationError { message, context }
            | Self::InternalError { message, context } => (message.as_str(), context),
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::QueryError { context, .. }
            | Self::NotFound { context, .. }
            | Self::InvalidIdentifier { context, .. }
            | Self::ValidationError { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. } => context,
        }
    }

    /// The bare message without context.
    pub fn message(&self) -> &str {
        self.parts().0
    }

    pub fn context(&self) -> &ErrorContext {
        self.parts().1
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.context_mut().entity_id = Some(id.to_string());
        self
    }

    /// True when the caller's input caused the failure rather than the server
    /// or its data.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InvalidIdentifier { .. })
    }
}

impl From<CrowdLevelError> for RepositoryError {
    fn from(err: CrowdLevelError) -> Self {
        RepositoryError::validation_with_context(
            err.to_string(),
            ErrorContext::default().with_details("crowd_level"),
        )
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            Error::NotFound => RepositoryError::not_found("Record not found"),
            Error::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
                RepositoryError::connection_with_context(
                    info.message(),
                    ErrorContext::default().with_details("connection closed"),
                )
            }
            Error::DatabaseError(kind, info) => RepositoryError::query_with_context(
                info.message(),
                ErrorContext::default().with_details(format!("{:?}", kind)),
            ),
            Error::DeserializationError(e) | Error::SerializationError(e) => {
                RepositoryError::internal(format!("Row conversion failed: {}", e))
            }
            other => RepositoryError::query(other.to_string()),
        }
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        RepositoryError::connection_with_context(
            err.to_string(),
            ErrorContext::default().with_details("pool checkout"),
        )
    }
}
