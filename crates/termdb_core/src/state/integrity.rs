//! Referential integrity verification.
//!
//! The stores never let an invalid row in, so on a healthy store the report
//! is empty. Verification exists for stores written by older builds or
//! damaged outside the engine.

use crate::model::{EntityKind, OwnerRef, PropertyType};
use crate::state::State;
use std::collections::HashSet;
use std::fmt;

/// One violated invariant.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct IntegrityIssue {
    /// Kind of the offending record.
    pub kind: EntityKind,
    /// Raw id of the offending record.
    pub id: u64,
    /// What is wrong with it.
    pub problem: String,
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.id, self.problem)
    }
}

/// Result of an integrity check.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct IntegrityReport {
    /// Every violation found.
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    /// Returns true when no violation was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn push(&mut self, kind: EntityKind, id: u64, problem: impl Into<String>) {
        self.issues.push(IntegrityIssue {
            kind,
            id,
            problem: problem.into(),
        });
    }
}

pub(crate) fn check(state: &State) -> IntegrityReport {
    let mut report = IntegrityReport::default();

    for tb in state.termbases() {
        let mut codes = HashSet::new();
        for lang in state.languages_of(tb.id) {
            if lang.code.trim().is_empty() {
                report.push(EntityKind::Language, lang.id.as_u64(), "empty code");
            }
            if !codes.insert(lang.code.as_str()) {
                report.push(
                    EntityKind::Language,
                    lang.id.as_u64(),
                    format!("duplicate code '{}'", lang.code),
                );
            }
        }

        for entry in state.entries_of(tb.id) {
            for term in state.terms_of_entry(entry.id) {
                if state.language_by_code(tb.id, &term.lang).is_none() {
                    report.push(
                        EntityKind::Term,
                        term.id.as_u64(),
                        format!("language '{}' is not defined in termbase {}", term.lang, tb.id),
                    );
                }
            }
        }

        for property in state.properties_of(tb.id) {
            let mut seen = HashSet::new();
            for value in state.picklist_values_of(property.id) {
                if property.property_type != PropertyType::Picklist {
                    report.push(
                        EntityKind::PicklistValue,
                        value.id.as_u64(),
                        format!("property {} is not a picklist", property.id),
                    );
                }
                if !seen.insert(value.value.as_str()) {
                    report.push(
                        EntityKind::PicklistValue,
                        value.id.as_u64(),
                        format!("duplicate value '{}'", value.value),
                    );
                }
            }
        }
    }

    // Orphans are found by walking the child tables directly.
    for lang in state.languages() {
        if state.termbase(lang.termbase_id).is_none() {
            report.push(
                EntityKind::Language,
                lang.id.as_u64(),
                format!("termbase {} does not exist", lang.termbase_id),
            );
        }
    }
    for entry in state.entries() {
        if state.termbase(entry.termbase_id).is_none() {
            report.push(
                EntityKind::Entry,
                entry.id.as_u64(),
                format!("termbase {} does not exist", entry.termbase_id),
            );
        }
    }
    for property in state.properties() {
        if state.termbase(property.termbase_id).is_none() {
            report.push(
                EntityKind::Property,
                property.id.as_u64(),
                format!("termbase {} does not exist", property.termbase_id),
            );
        }
    }
    for value in state.picklist_values() {
        if state.property(value.property_id).is_none() {
            report.push(
                EntityKind::PicklistValue,
                value.id.as_u64(),
                format!("property {} does not exist", value.property_id),
            );
        }
    }
    for term in state.terms() {
        if state.entry(term.entry_id).is_none() {
            report.push(
                EntityKind::Term,
                term.id.as_u64(),
                format!("entry {} does not exist", term.entry_id),
            );
        }
    }

    for value in state.property_values() {
        let Some(property) = state.property(value.property_id) else {
            report.push(
                EntityKind::PropertyValue,
                value.id.as_u64(),
                format!("property {} does not exist", value.property_id),
            );
            continue;
        };

        let owner = OwnerRef::from_raw(property.level, value.owner_id);
        if !state.owner_exists(owner) {
            report.push(
                EntityKind::PropertyValue,
                value.id.as_u64(),
                format!("owner {owner} does not exist"),
            );
        } else if state.termbase_of_owner(owner) != Some(property.termbase_id) {
            report.push(
                EntityKind::PropertyValue,
                value.id.as_u64(),
                format!("owner {owner} is outside termbase {}", property.termbase_id),
            );
        }

        if property.property_type == PropertyType::Picklist
            && !state
                .picklist_values_of(property.id)
                .any(|allowed| allowed.value == value.value)
        {
            report.push(
                EntityKind::PropertyValue,
                value.id.as_u64(),
                format!("'{}' is not an allowed picklist value", value.value),
            );
        }
    }

    report
}
