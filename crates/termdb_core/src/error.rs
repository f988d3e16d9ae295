//! Error types for TermDB core.

use crate::model::{EntityKind, PropertyLevel};
use crate::types::PropertyId;
use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in TermDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] termdb_storage::StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Journal payload could not be encoded or decoded.
    #[error("codec error: {message}")]
    Codec {
        /// Description of the failure.
        message: String,
    },

    /// Journal is corrupted or written by an unknown format.
    #[error("journal corruption: {message}")]
    JournalCorruption {
        /// Description of the corruption.
        message: String,
    },

    /// Checksum mismatch detected in a journal record.
    #[error("checksum mismatch: expected {expected:08x}, got {actual:08x}")]
    ChecksumMismatch {
        /// Checksum stored in the record.
        expected: u32,
        /// Checksum computed from the record bytes.
        actual: u32,
    },

    /// The store exists when it must not, or is missing when it must exist.
    #[error("invalid store: {message}")]
    InvalidFormat {
        /// Description of the problem.
        message: String,
    },

    /// The record addressed by an update or delete does not exist.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Kind of record.
        kind: EntityKind,
        /// Raw id that was looked up.
        id: u64,
    },

    /// A required field or foreign key is missing or invalid.
    #[error("validation failed: {message}")]
    Validation {
        /// Description of the failed rule.
        message: String,
    },

    /// A picklist operation was attempted on a non-picklist property, or a
    /// property type change was refused.
    #[error("type mismatch on property {property_id}: {message}")]
    TypeMismatch {
        /// The property involved.
        property_id: PropertyId,
        /// Description of the mismatch.
        message: String,
    },

    /// The owner kind does not match the property level.
    #[error("property {property_id} is {expected}-level but was used at {actual} level")]
    LevelMismatch {
        /// The property involved.
        property_id: PropertyId,
        /// Level the property is defined at.
        expected: PropertyLevel,
        /// Level that was supplied.
        actual: PropertyLevel,
    },

    /// The value is not one of the property's registered picklist values.
    #[error("'{value}' is not an allowed value of picklist property {property_id}")]
    InvalidPicklistValue {
        /// The picklist property.
        property_id: PropertyId,
        /// The rejected value.
        value: String,
    },

    /// A unique key is duplicated or a referenced record blocks the change.
    #[error("conflict: {message}")]
    Conflict {
        /// Description of the conflict.
        message: String,
    },

    /// A write was attempted on a store opened read-only.
    #[error("store is open read-only")]
    ReadOnly,
}

impl CoreError {
    /// Creates a codec error.
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    /// Creates a journal corruption error.
    pub fn journal_corruption(message: impl Into<String>) -> Self {
        Self::JournalCorruption {
            message: message.into(),
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(kind: EntityKind, id: u64) -> Self {
        Self::NotFound { kind, id }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(property_id: PropertyId, message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            property_id,
            message: message.into(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Returns true for errors caused by the caller's input rather than by
    /// the store itself.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::Validation { .. }
                | Self::TypeMismatch { .. }
                | Self::LevelMismatch { .. }
                | Self::InvalidPicklistValue { .. }
                | Self::Conflict { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_record() {
        let err = CoreError::not_found(EntityKind::Term, 7);
        assert_eq!(err.to_string(), "term 7 not found");

        let err = CoreError::LevelMismatch {
            property_id: PropertyId::new(3),
            expected: PropertyLevel::Entry,
            actual: PropertyLevel::Term,
        };
        assert_eq!(
            err.to_string(),
            "property 3 is entry-level but was used at term level"
        );
    }

    #[test]
    fn rejections_are_distinguished_from_failures() {
        assert!(CoreError::conflict("dup").is_rejection());
        assert!(!CoreError::journal_corruption("bad").is_rejection());
    }
}
