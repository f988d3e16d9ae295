//! Termbase entity model.
//!
//! ```text
//! Termbase ─┬─ Language
//!           ├─ Entry ─┬─ Term ── PropertyValue (term level)
//!           │         └─ PropertyValue (entry level)
//!           └─ Property ─┬─ PicklistValue
//!                        └─ PropertyValue (any level)
//! ```
//!
//! Models carry their own id. A model that has not been stored yet carries
//! the unassigned id (0); `create` ignores whatever id it is given.

use crate::types::{
    EntryId, LanguageId, PicklistValueId, PropertyId, PropertyValueId, TermId, TermbaseId,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of stored records, used in error reports and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// A termbase.
    Termbase,
    /// A language of a termbase.
    Language,
    /// A concept entry.
    Entry,
    /// A term.
    Term,
    /// A property definition.
    Property,
    /// An allowed picklist value.
    PicklistValue,
    /// A property assignment.
    PropertyValue,
}

impl EntityKind {
    /// Returns the lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Termbase => "termbase",
            Self::Language => "language",
            Self::Entry => "entry",
            Self::Term => "term",
            Self::Property => "property",
            Self::PicklistValue => "picklist value",
            Self::PropertyValue => "property value",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A self-contained terminology database.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Termbase {
    /// Identifier.
    pub id: TermbaseId,
    /// Display name. Must not be blank.
    pub name: String,
    /// Free-form description.
    pub description: String,
}

impl Termbase {
    /// Creates an unsaved termbase with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A language defined in a termbase.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Language {
    /// Identifier.
    pub id: LanguageId,
    /// Language code, unique within the termbase (e.g. `en`, `it`).
    pub code: String,
    /// Display name, stored verbatim.
    pub name: String,
    /// Owning termbase.
    pub termbase_id: TermbaseId,
}

impl Language {
    /// Creates an unsaved language.
    pub fn new(code: impl Into<String>, termbase_id: TermbaseId) -> Self {
        Self {
            code: code.into(),
            termbase_id,
            ..Self::default()
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// A language-independent concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entry {
    /// Identifier.
    pub id: EntryId,
    /// Owning termbase.
    pub termbase_id: TermbaseId,
}

impl Entry {
    /// Creates an unsaved entry.
    #[must_use]
    pub fn new(termbase_id: TermbaseId) -> Self {
        Self {
            id: EntryId::UNASSIGNED,
            termbase_id,
        }
    }
}

/// A language-specific realization of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Term {
    /// Identifier.
    pub id: TermId,
    /// Owning entry.
    pub entry_id: EntryId,
    /// The term text.
    pub lemma: String,
    /// Code of a language defined in the entry's termbase.
    pub lang: String,
}

impl Term {
    /// Creates an unsaved term.
    pub fn new(entry_id: EntryId, lemma: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            id: TermId::UNASSIGNED,
            entry_id,
            lemma: lemma.into(),
            lang: lang.into(),
        }
    }
}

/// Whether a term may be stored with an empty lemma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LemmaPolicy {
    /// The lemma must contain non-whitespace text.
    #[default]
    Required,
    /// The caller explicitly allows an empty lemma (e.g. a placeholder row).
    AllowEmpty,
}

/// Data type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PropertyType {
    /// Free text.
    #[default]
    Text,
    /// One of an enumerated set of values.
    Picklist,
    /// An opaque image reference.
    Image,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Picklist => "picklist",
            Self::Image => "image",
        })
    }
}

/// The owner kind a property's values attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PropertyLevel {
    /// Values attach to entries.
    #[default]
    Entry,
    /// Values attach to terms.
    Term,
}

impl fmt::Display for PropertyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Entry => "entry",
            Self::Term => "term",
        })
    }
}

/// A user-defined typed field of a termbase.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Property {
    /// Identifier.
    pub id: PropertyId,
    /// Owning termbase.
    pub termbase_id: TermbaseId,
    /// Display name, stored verbatim.
    pub name: String,
    /// Data type of the values.
    pub property_type: PropertyType,
    /// Owner kind of the values.
    pub level: PropertyLevel,
}

impl Property {
    /// Creates an unsaved property.
    pub fn new(
        termbase_id: TermbaseId,
        name: impl Into<String>,
        property_type: PropertyType,
        level: PropertyLevel,
    ) -> Self {
        Self {
            id: PropertyId::UNASSIGNED,
            termbase_id,
            name: name.into(),
            property_type,
            level,
        }
    }
}

/// An allowed value of a picklist property.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PicklistValue {
    /// Identifier.
    pub id: PicklistValueId,
    /// Owning picklist property.
    pub property_id: PropertyId,
    /// The value text, unique within the property.
    pub value: String,
}

impl PicklistValue {
    /// Creates an unsaved picklist value.
    pub fn new(property_id: PropertyId, value: impl Into<String>) -> Self {
        Self {
            id: PicklistValueId::UNASSIGNED,
            property_id,
            value: value.into(),
        }
    }
}

/// The record a property value is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OwnerRef {
    /// An entry (entry-level property).
    Entry(EntryId),
    /// A term (term-level property).
    Term(TermId),
}

impl OwnerRef {
    /// Returns the property level this owner kind corresponds to.
    #[must_use]
    pub const fn level(self) -> PropertyLevel {
        match self {
            Self::Entry(_) => PropertyLevel::Entry,
            Self::Term(_) => PropertyLevel::Term,
        }
    }

    /// Returns the raw owner id as stored.
    #[must_use]
    pub const fn raw(self) -> u64 {
        match self {
            Self::Entry(id) => id.as_u64(),
            Self::Term(id) => id.as_u64(),
        }
    }

    /// Rebuilds an owner from a stored raw id and the property's level.
    #[must_use]
    pub const fn from_raw(level: PropertyLevel, raw: u64) -> Self {
        match level {
            PropertyLevel::Entry => Self::Entry(EntryId::new(raw)),
            PropertyLevel::Term => Self::Term(TermId::new(raw)),
        }
    }
}

impl fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry(id) => write!(f, "entry {id}"),
            Self::Term(id) => write!(f, "term {id}"),
        }
    }
}

/// A concrete assignment of a property to an entry or term.
///
/// The owner is not part of the model: it is given when the value is
/// created and afterwards derived from the stored owner id and the
/// property's level (see [`crate::PropertyValueStore::owner_of`]).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PropertyValue {
    /// Identifier.
    pub id: PropertyValueId,
    /// The assigned property.
    pub property_id: PropertyId,
    /// The value text.
    pub value: String,
}

impl PropertyValue {
    /// Creates an unsaved property value.
    pub fn new(property_id: PropertyId, value: impl Into<String>) -> Self {
        Self {
            id: PropertyValueId::UNASSIGNED,
            property_id,
            value: value.into(),
        }
    }
}
