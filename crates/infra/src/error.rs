//! Store error model.

use thiserror::Error;

use stockroom_core::{DomainError, ProductId};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation error.
///
/// - **Validation**: rejected before any write; `field` is the offending column.
/// - **NotFound / OutOfStock**: normal outcomes the caller turns into a notice.
/// - **StorageUnavailable**: the medium failed; terminal for the operation, not retried.
/// - **UnsupportedUri**: the content path does not address products, or the verb is
///   not defined for it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("product {0} not found")]
    NotFound(ProductId),

    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("unsupported content path: {0}")]
    UnsupportedUri(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    pub fn unsupported(uri: impl Into<String>) -> Self {
        Self::UnsupportedUri(uri.into())
    }

    /// The offending column for validation failures.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<DomainError> for StoreError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation { field, reason } => StoreError::Validation { field, reason },
            DomainError::InvalidId(reason) => StoreError::Validation { field: "id", reason },
            DomainError::NotFound(id) => StoreError::NotFound(id),
            DomainError::OutOfStock(id) => StoreError::OutOfStock(id),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        StoreError::StorageUnavailable(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_keep_their_meaning() {
        let id = ProductId::new(2);
        assert!(matches!(
            StoreError::from(DomainError::validation("Price", "negative")),
            StoreError::Validation { field: "Price", .. }
        ));
        assert!(matches!(StoreError::from(DomainError::not_found(id)), StoreError::NotFound(i) if i == id));
        assert!(matches!(StoreError::from(DomainError::out_of_stock(id)), StoreError::OutOfStock(i) if i == id));
        assert_eq!(StoreError::from(DomainError::invalid_id("x")).field(), Some("id"));
    }

    #[test]
    fn sqlx_errors_become_storage_unavailable() {
        let err = StoreError::from(sqlx::Error::PoolClosed);
        assert!(matches!(err, StoreError::StorageUnavailable(_)));
    }
}
