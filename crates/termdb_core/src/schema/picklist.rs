//! Picklist value store.

use crate::error::{CoreError, CoreResult};
use crate::model::{EntityKind, PicklistValue};
use crate::schema::{require_property, stage_picklist_value};
use crate::state::{Row, RowKey, StoredPropertyValue};
use crate::store::require_text;
use crate::transaction::TransactionManager;
use crate::types::{PicklistValueId, PropertyId};

/// CRUD over the allowed values of picklist properties.
///
/// A value that is assigned somewhere cannot be deleted. Renaming a value
/// renames every assignment holding it.
#[derive(Debug, Clone, Copy)]
pub struct PicklistValueStore<'db> {
    tm: &'db TransactionManager,
}

impl<'db> PicklistValueStore<'db> {
    pub(crate) fn new(tm: &'db TransactionManager) -> Self {
        Self { tm }
    }

    /// Stores a new picklist value and returns its id.
    ///
    /// # Errors
    ///
    /// See [`crate::SchemaRegistry::create_picklist_value`].
    pub fn create(&self, value: &PicklistValue) -> CoreResult<PicklistValueId> {
        self.tm
            .write(|txn| stage_picklist_value(txn, value.property_id, &value.value, &[]))
    }

    /// Stores several values of one property as a single unit and returns
    /// their ids in input order.
    ///
    /// # Errors
    ///
    /// Fails without storing anything if any value would be rejected by
    /// [`PicklistValueStore::create`], including duplicates inside `values`.
    pub fn insert_all<S: AsRef<str>>(
        &self,
        property_id: PropertyId,
        values: &[S],
    ) -> CoreResult<Vec<PicklistValueId>> {
        self.tm.write(|txn| {
            let mut staged: Vec<&str> = Vec::with_capacity(values.len());
            let mut ids = Vec::with_capacity(values.len());
            for value in values {
                let value = value.as_ref();
                ids.push(stage_picklist_value(txn, property_id, value, &staged)?);
                staged.push(value);
            }
            Ok(ids)
        })
    }

    /// Returns the picklist value with the given id.
    #[must_use]
    pub fn get_by_id(&self, id: PicklistValueId) -> Option<PicklistValue> {
        self.tm.read(|state| state.picklist_value(id).cloned())
    }

    /// Returns every value of a property, in id order.
    #[must_use]
    pub fn get_all(&self, property_id: PropertyId) -> Vec<PicklistValue> {
        self.tm
            .read(|state| state.picklist_values_of(property_id).cloned().collect())
    }

    /// Replaces a picklist value. A changed text is carried over to every
    /// property value that held the old text.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, a validation error for a blank
    /// text or a changed property, and a conflict for a duplicate text.
    pub fn update(&self, value: &PicklistValue) -> CoreResult<()> {
        require_text("picklist value", &value.value)?;
        self.tm.write(|txn| {
            let state = txn.state();
            let old = state
                .picklist_value(value.id)
                .ok_or_else(|| CoreError::not_found(EntityKind::PicklistValue, value.id.as_u64()))?;
            if old.property_id != value.property_id {
                return Err(CoreError::validation(
                    "a picklist value cannot be moved to another property",
                ));
            }
            if old.value == value.value {
                return Ok(());
            }
            let duplicate = state
                .picklist_values_of(value.property_id)
                .any(|other| other.id != value.id && other.value == value.value);
            if duplicate {
                return Err(CoreError::conflict(format!(
                    "picklist value '{}' already exists for property {}",
                    value.value, value.property_id
                )));
            }

            let renamed: Vec<StoredPropertyValue> = state
                .values_of_property(value.property_id)
                .filter(|assigned| assigned.value == old.value)
                .map(|assigned| StoredPropertyValue {
                    value: value.value.clone(),
                    ..assigned.clone()
                })
                .collect();
            tracing::debug!(
                from = %old.value,
                to = %value.value,
                assignments = renamed.len(),
                "renaming picklist value"
            );
            for assigned in renamed {
                txn.put(Row::PropertyValue(assigned));
            }
            txn.put(Row::PicklistValue(value.clone()));
            Ok(())
        })
    }

    /// Deletes a picklist value.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and a conflict while any
    /// property value holds it.
    pub fn delete(&self, id: PicklistValueId) -> CoreResult<()> {
        self.tm.write(|txn| {
            let state = txn.state();
            let value = state
                .picklist_value(id)
                .ok_or_else(|| CoreError::not_found(EntityKind::PicklistValue, id.as_u64()))?;
            let used = state
                .values_of_property(value.property_id)
                .filter(|assigned| assigned.value == value.value)
                .count();
            if used > 0 {
                return Err(CoreError::conflict(format!(
                    "picklist value '{}' is assigned {used} time(s)",
                    value.value
                )));
            }
            txn.delete(RowKey::PicklistValue(id));
            Ok(())
        })
    }

    /// Deletes every value of a property and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing property and a conflict if
    /// the property has any assigned values.
    pub fn delete_all(&self, property_id: PropertyId) -> CoreResult<usize> {
        self.tm.write(|txn| {
            let state = txn.state();
            require_property(state, property_id)?;
            if state.has_values(property_id) {
                return Err(CoreError::conflict(format!(
                    "property {property_id} has assigned values"
                )));
            }
            let ids: Vec<PicklistValueId> =
                state.picklist_values_of(property_id).map(|v| v.id).collect();
            for id in &ids {
                txn.delete(RowKey::PicklistValue(*id));
            }
            Ok(ids.len())
        })
    }
}
