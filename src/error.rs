//! Error types for the gateway, the persistence layer and the task store.

use crate::task::TaskId;

/// Failures of a remote gateway call. Every variant triggers a rollback in
/// the store; none is retried automatically.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No response inside the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Non-2xx response.
    #[error("HTTP error, status {status}")]
    Http { status: u16 },

    /// 404 on a by-id call.
    #[error("todo with id {id} not found")]
    NotFound { id: TaskId },

    /// Connection-level failure (DNS, TCP, TLS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl GatewayError {
    /// HTTP status behind this error, if any. `NotFound` reports 404.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    /// Classify a [`reqwest::Error`] into the matching variant.
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Http { status: status.as_u16() }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Persistence failures. These stay inside the cache and the identity
/// tracker; callers only ever see them in logs.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not serialise value: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("write to key '{key}' rejected")]
    WriteRejected { key: String },
}

/// Problems with cached content. Turned into a cache miss or a dropped entry.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("cached value is malformed: {0}")]
    Malformed(String),

    #[error("cached task has non-positive id")]
    NonPositiveId,
}

/// Errors returned by the store's mutations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// The gateway call failed and the optimistic change was rolled back.
    #[error("remote call failed, change reverted: {0}")]
    Gateway(#[from] GatewayError),

    /// No task with this id is in the store.
    #[error("task {0} not found")]
    UnknownTask(TaskId),

    /// A task with this id is already in the store.
    #[error("task {0} already exists")]
    DuplicateId(TaskId),

    /// The remote answered but reported the delete as not done; reverted.
    #[error("remote refused to delete task {0}, change reverted")]
    DeleteRefused(TaskId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_reads_as_404() {
        assert_eq!(GatewayError::NotFound { id: 3 }.status(), Some(404));
        assert_eq!(GatewayError::Http { status: 500 }.status(), Some(500));
        assert_eq!(GatewayError::Timeout.status(), None);
    }

    #[test]
    fn test_store_error_wraps_gateway() {
        let err: StoreError = GatewayError::Timeout.into();
        assert_eq!(err, StoreError::Gateway(GatewayError::Timeout));
        assert_eq!(err.to_string(), "remote call failed, change reverted: request timed out");
    }
}
