//! A bounded, caller-owned record of failed operations.

use outline_sdf::{SdfError, SdfResult};
use thiserror::Error;
use tracing::warn;

/// Number of entries an [`ErrorLog`] keeps by default.
pub const DEFAULT_CAPACITY: usize = 32;

/// An entry in an [`ErrorLog`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoggedError {
    /// A failed operation.
    #[error(transparent)]
    Sdf(#[from] SdfError),

    /// Marker stored in the last slot once the log is saturated.
    #[error("error queue full")]
    QueueFull,
}

impl LoggedError {
    /// Check if this is the saturation marker.
    #[must_use]
    pub const fn is_queue_full(&self) -> bool {
        matches!(self, Self::QueueFull)
    }
}

/// Bounded queue of errors, popped most recent first.
///
/// The last slot is reserved: once all others are taken, the next error is
/// replaced by [`LoggedError::QueueFull`] and later errors are dropped.
///
/// # Example
///
/// ```
/// use outline::{ErrorLog, LoggedError};
/// use outline::sdf::{AnyBitmap, SdfError};
///
/// let mut log = ErrorLog::with_capacity(3);
/// assert!(log.record(AnyBitmap::new_float(4, 4, 7)).is_none());
/// assert!(log.record(AnyBitmap::new_float(4, 4, 3)).is_some());
/// log.push(SdfError::MissingInput("shape"));
/// log.push(SdfError::MissingInput("output"));
///
/// assert!(log.is_full());
/// assert_eq!(log.pop(), Some(LoggedError::QueueFull));
/// assert_eq!(log.pop(), Some(LoggedError::Sdf(SdfError::MissingInput("shape"))));
/// assert_eq!(log.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorLog {
    entries: Vec<LoggedError>,
    capacity: usize,
}

impl Default for ErrorLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ErrorLog {
    /// Create a log holding [`DEFAULT_CAPACITY`] entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log holding `capacity` entries. A capacity below one is
    /// raised to one, which holds only the saturation marker.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if the log is saturated.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Store an error.
    pub fn push(&mut self, error: impl Into<LoggedError>) {
        let error = error.into();
        let len = self.entries.len();
        if len + 1 < self.capacity {
            self.entries.push(error);
        } else if len + 1 == self.capacity {
            warn!(capacity = self.capacity, dropped = %error, "Error log saturated");
            self.entries.push(LoggedError::QueueFull);
        } else if let Some(last) = self.entries.last_mut() {
            *last = LoggedError::QueueFull;
        }
    }

    /// Pass a success through, or store the error and return `None`.
    pub fn record<T>(&mut self, result: SdfResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push(error);
                None
            }
        }
    }

    /// Remove and return the most recent entry.
    pub fn pop(&mut self) -> Option<LoggedError> {
        self.entries.pop()
    }

    /// Forget every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LoggedError> {
        self.entries.iter()
    }
}
