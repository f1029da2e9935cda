//! Store-specific error type.

use rfxhub_domain::error::RfxError;

/// Errors originating from the in-memory object store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A seed document could not be parsed into objects.
    #[error("invalid seed document")]
    Seed(#[from] serde_json::Error),

    /// Storing one more object would exceed the configured capacity.
    #[error("store is full ({limit} objects)")]
    CapacityExceeded { limit: usize },
}

impl StoreError {
    /// Convert into a [`RfxError::Storage`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> RfxError {
        RfxError::Storage(Box::new(self))
    }
}

impl From<StoreError> for RfxError {
    fn from(err: StoreError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_into_storage_error() {
        let err: RfxError = StoreError::CapacityExceeded { limit: 2 }.into();
        assert!(matches!(err, RfxError::Storage(_)));
        assert_eq!(
            std::error::Error::source(&err).unwrap().to_string(),
            "store is full (2 objects)"
        );
    }
}
