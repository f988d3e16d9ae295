//! Identifier and sequence types for TermDB.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// The placeholder id carried by models that were never stored.
            pub const UNASSIGNED: Self = Self(0);

            /// Creates an id from its raw value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the raw id value.
            #[must_use]
            pub const fn as_u64(self) -> u64 {
                self.0
            }

            /// Returns true for the placeholder id.
            #[must_use]
            pub const fn is_unassigned(self) -> bool {
                self.0 == 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(
    /// Identifier of a termbase.
    TermbaseId
);
define_id!(
    /// Identifier of a language defined in a termbase.
    LanguageId
);
define_id!(
    /// Identifier of a concept entry.
    EntryId
);
define_id!(
    /// Identifier of a language-specific term.
    TermId
);
define_id!(
    /// Identifier of a user-defined property.
    PropertyId
);
define_id!(
    /// Identifier of an allowed value of a picklist property.
    PicklistValueId
);
define_id!(
    /// Identifier of a property assignment on an entry or term.
    PropertyValueId
);

/// Sequence number for ordering commits.
///
/// Every committed write unit gets the next sequence number. Higher
/// sequence numbers indicate later commits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceNumber(pub u64);

impl SequenceNumber {
    /// Creates a new sequence number.
    #[must_use]
    pub const fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// Returns the raw sequence value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the next sequence number.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seq:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unassigned_is_zero() {
        assert!(TermId::default().is_unassigned());
        assert!(!TermId::new(1).is_unassigned());
        assert_eq!(TermId::UNASSIGNED, TermId::new(0));
    }

    #[test]
    fn ids_display_raw_value() {
        assert_eq!(EntryId::new(42).to_string(), "42");
        assert_eq!(SequenceNumber::new(5).next().to_string(), "seq:6");
    }
}
