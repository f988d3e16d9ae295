//! Per-termbase schema: property definitions and picklist values.
//!
//! A property fixes the data type and the owner kind of its values.
//! Picklist properties also own the set of values they accept.

mod picklist;

pub use picklist::PicklistValueStore;

use crate::cascade::DeletePlan;
use crate::error::{CoreError, CoreResult};
use crate::model::{
    EntityKind, PicklistValue, Property, PropertyLevel, PropertyType,
};
use crate::state::{Row, RowKey, State};
use crate::store::{require_termbase, require_text};
use crate::transaction::{TransactionManager, WriteTransaction};
use crate::types::{PicklistValueId, PropertyId, TermbaseId};

/// Resolves a property referenced as a foreign key.
pub(crate) fn require_property(state: &State, id: PropertyId) -> CoreResult<&Property> {
    state
        .property(id)
        .ok_or_else(|| CoreError::validation(format!("property {id} does not exist")))
}

/// Stages one picklist value after checking the property and the text.
/// `batch` holds texts staged earlier in the same unit.
pub(crate) fn stage_picklist_value(
    txn: &mut WriteTransaction<'_>,
    property_id: PropertyId,
    value: &str,
    batch: &[&str],
) -> CoreResult<PicklistValueId> {
    let state = txn.state();
    let property = require_property(state, property_id)?;
    if property.property_type != PropertyType::Picklist {
        return Err(CoreError::type_mismatch(
            property_id,
            format!("picklist values require a picklist property, not {}", property.property_type),
        ));
    }
    require_text("picklist value", value)?;
    let taken = state
        .picklist_values_of(property_id)
        .any(|existing| existing.value == value)
        || batch.contains(&value);
    if taken {
        return Err(CoreError::conflict(format!(
            "picklist value '{value}' already exists for property {property_id}"
        )));
    }

    let id = txn.allocate(EntityKind::PicklistValue);
    txn.put(Row::PicklistValue(PicklistValue {
        id,
        property_id,
        value: value.to_string(),
    }));
    Ok(id)
}

/// Defines and lists the properties of termbases.
#[derive(Debug, Clone, Copy)]
pub struct SchemaRegistry<'db> {
    tm: &'db TransactionManager,
}

impl<'db> SchemaRegistry<'db> {
    pub(crate) fn new(tm: &'db TransactionManager) -> Self {
        Self { tm }
    }

    /// Defines a property and returns its id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name or a missing termbase.
    pub fn create_property(
        &self,
        name: &str,
        property_type: PropertyType,
        level: PropertyLevel,
        termbase_id: TermbaseId,
    ) -> CoreResult<PropertyId> {
        require_text("property name", name)?;
        self.tm.write(|txn| {
            require_termbase(txn.state(), termbase_id)?;
            let id = txn.allocate(EntityKind::Property);
            txn.put(Row::Property(Property {
                id,
                ..Property::new(termbase_id, name, property_type, level)
            }));
            Ok(id)
        })
    }

    /// Registers an allowed value of a picklist property.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for a non-picklist property, a conflict for a
    /// duplicate value and a validation error for a missing property or a
    /// blank value.
    pub fn create_picklist_value(
        &self,
        property_id: PropertyId,
        value: &str,
    ) -> CoreResult<PicklistValueId> {
        self.tm
            .write(|txn| stage_picklist_value(txn, property_id, value, &[]))
    }

    /// Lists the properties of a termbase, optionally only one level.
    #[must_use]
    pub fn list_properties(
        &self,
        termbase_id: TermbaseId,
        level: Option<PropertyLevel>,
    ) -> Vec<Property> {
        self.tm.read(|state| {
            state
                .properties_of(termbase_id)
                .filter(|property| level.map_or(true, |level| property.level == level))
                .cloned()
                .collect()
        })
    }

    /// Lists the allowed values of a property, in id order.
    #[must_use]
    pub fn list_picklist_values(&self, property_id: PropertyId) -> Vec<PicklistValue> {
        self.tm
            .read(|state| state.picklist_values_of(property_id).cloned().collect())
    }

    /// Returns the property with the given id.
    #[must_use]
    pub fn get_property(&self, id: PropertyId) -> Option<Property> {
        self.tm.read(|state| state.property(id).cloned())
    }

    /// Replaces a property definition.
    ///
    /// Renaming is always allowed. The level may only change while the
    /// property has no values, the type only while it has neither values
    /// nor picklist values.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, a validation error for a blank
    /// name or a changed termbase, `LevelMismatch` or `TypeMismatch` for a
    /// refused change.
    pub fn update_property(&self, property: &Property) -> CoreResult<()> {
        require_text("property name", &property.name)?;
        self.tm.write(|txn| {
            let state = txn.state();
            let old = state
                .property(property.id)
                .ok_or_else(|| CoreError::not_found(EntityKind::Property, property.id.as_u64()))?;
            if old.termbase_id != property.termbase_id {
                return Err(CoreError::validation(
                    "a property cannot be moved to another termbase",
                ));
            }

            let has_values = state.has_values(property.id);
            if old.level != property.level && has_values {
                return Err(CoreError::LevelMismatch {
                    property_id: property.id,
                    expected: old.level,
                    actual: property.level,
                });
            }
            let has_choices = state.picklist_values_of(property.id).next().is_some();
            if old.property_type != property.property_type && (has_values || has_choices) {
                return Err(CoreError::type_mismatch(
                    property.id,
                    format!(
                        "cannot change type from {} to {} while values exist",
                        old.property_type, property.property_type
                    ),
                ));
            }

            txn.put(Row::Property(property.clone()));
            Ok(())
        })
    }

    /// Deletes a property with its picklist values and every value
    /// assigned through it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn delete_property(&self, id: PropertyId) -> CoreResult<()> {
        self.tm.write(|txn| {
            let state = txn.state();
            if state.property(id).is_none() {
                return Err(CoreError::not_found(EntityKind::Property, id.as_u64()));
            }
            DeletePlan::for_root(state, RowKey::Property(id)).stage(txn);
            Ok(())
        })
    }
}
