//! Error types for stream operations.

use std::io;
use thiserror::Error;

/// Boxed error returned by a failing [`DataProducer`](crate::DataProducer).
pub type ProducerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StreamError>;

/// Errors that can occur in stream operations.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The stream cannot perform this operation at all (seek, tell, write).
    #[error("{operation} is not supported by {stream}")]
    Unsupported {
        /// Name of the rejected operation.
        operation: &'static str,
        /// Kind of stream that rejected it.
        stream: &'static str,
    },

    /// A strict write would have reached the high-water mark.
    #[error(
        "writing {requested} bytes would reach the high-water mark of {high_water_mark} \
         ({buffered} bytes already buffered)"
    )]
    CapacityExceeded {
        /// Length of the rejected write.
        requested: usize,
        /// Bytes buffered when the write was attempted.
        buffered: usize,
        /// The configured advisory limit.
        high_water_mark: usize,
    },

    /// The stream has been closed or detached.
    #[error("stream is detached")]
    Detached,

    /// The producer failed; the source error is passed through untouched.
    #[error(transparent)]
    Producer(ProducerError),
}

impl StreamError {
    pub(crate) fn unsupported(operation: &'static str, stream: &'static str) -> Self {
        Self::Unsupported { operation, stream }
    }

    /// Returns `true` if retrying later may succeed (e.g., `CapacityExceeded`).
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }

    /// Returns `true` if this error indicates the stream is permanently unusable.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Detached)
    }
}

impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> Self {
        let kind = match &err {
            StreamError::Unsupported { .. } => io::ErrorKind::Unsupported,
            StreamError::CapacityExceeded { .. } => io::ErrorKind::WouldBlock,
            StreamError::Detached => io::ErrorKind::NotConnected,
            StreamError::Producer(_) => io::ErrorKind::Other,
        };
        match err {
            StreamError::Producer(source) => io::Error::new(kind, source),
            other => io::Error::new(kind, other),
        }
    }
}
