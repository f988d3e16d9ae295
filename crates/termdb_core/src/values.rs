//! Attribute value store.
//!
//! Property values are stored entity-attribute-value style: a property,
//! a bare owner id and the value text. The owner kind is not stored; it is
//! the level of the property, so an owner id is only meaningful together
//! with its property.

use crate::error::{CoreError, CoreResult};
use crate::model::{EntityKind, OwnerRef, Property, PropertyType, PropertyValue};
use crate::schema::require_property;
use crate::state::{Row, RowKey, State, StoredPropertyValue};
use crate::transaction::TransactionManager;
use crate::types::{PropertyId, PropertyValueId};

/// Checks a value against its property and owner.
fn validate(state: &State, property: &Property, owner: OwnerRef, value: &str) -> CoreResult<()> {
    if owner.level() != property.level {
        return Err(CoreError::LevelMismatch {
            property_id: property.id,
            expected: property.level,
            actual: owner.level(),
        });
    }
    if !state.owner_exists(owner) {
        return Err(CoreError::validation(format!("{owner} does not exist")));
    }
    if state.termbase_of_owner(owner) != Some(property.termbase_id) {
        return Err(CoreError::validation(format!(
            "{owner} does not belong to termbase {} of property {}",
            property.termbase_id, property.id
        )));
    }

    match property.property_type {
        PropertyType::Text => Ok(()),
        PropertyType::Picklist => {
            if state
                .picklist_values_of(property.id)
                .any(|allowed| allowed.value == value)
            {
                Ok(())
            } else {
                Err(CoreError::InvalidPicklistValue {
                    property_id: property.id,
                    value: value.to_string(),
                })
            }
        }
        PropertyType::Image => {
            if value.is_empty() {
                Err(CoreError::validation("image value must not be empty"))
            } else {
                Ok(())
            }
        }
    }
}

/// CRUD over property values of entries and terms.
#[derive(Debug, Clone, Copy)]
pub struct PropertyValueStore<'db> {
    tm: &'db TransactionManager,
}

impl<'db> PropertyValueStore<'db> {
    pub(crate) fn new(tm: &'db TransactionManager) -> Self {
        Self { tm }
    }

    /// Assigns a value to `owner` and returns its id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing property or owner or an
    /// owner outside the property's termbase, `LevelMismatch` when the
    /// owner kind differs from the property level and
    /// `InvalidPicklistValue` for an unregistered picklist value.
    pub fn create(&self, value: &PropertyValue, owner: OwnerRef) -> CoreResult<PropertyValueId> {
        self.tm.write(|txn| {
            let state = txn.state();
            let property = require_property(state, value.property_id)?;
            validate(state, property, owner, &value.value)?;

            let id = txn.allocate(EntityKind::PropertyValue);
            txn.put(Row::PropertyValue(StoredPropertyValue {
                id,
                property_id: value.property_id,
                owner_id: owner.raw(),
                value: value.value.clone(),
            }));
            Ok(id)
        })
    }

    /// Returns the value with the given id.
    #[must_use]
    pub fn get_by_id(&self, id: PropertyValueId) -> Option<PropertyValue> {
        self.tm
            .read(|state| state.property_value(id).map(StoredPropertyValue::to_model))
    }

    /// Returns the entry or term a value is attached to.
    #[must_use]
    pub fn owner_of(&self, id: PropertyValueId) -> Option<OwnerRef> {
        self.tm.read(|state| state.value_owner(id))
    }

    /// Returns every value attached to `owner`, in id order.
    #[must_use]
    pub fn get_all(&self, owner: OwnerRef) -> Vec<PropertyValue> {
        self.tm.read(|state| {
            state
                .values_of_owner(owner)
                .map(StoredPropertyValue::to_model)
                .collect()
        })
    }

    /// Returns every value assigned through a property, in id order.
    #[must_use]
    pub fn get_all_for_property(&self, property_id: PropertyId) -> Vec<PropertyValue> {
        self.tm.read(|state| {
            state
                .values_of_property(property_id)
                .map(StoredPropertyValue::to_model)
                .collect()
        })
    }

    /// Replaces the property and text of a stored value. The owner stays
    /// the same, so the new property must have the same level.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and the errors of
    /// [`PropertyValueStore::create`].
    pub fn update(&self, value: &PropertyValue) -> CoreResult<()> {
        self.tm.write(|txn| {
            let state = txn.state();
            let stored = state
                .property_value(value.id)
                .ok_or_else(|| CoreError::not_found(EntityKind::PropertyValue, value.id.as_u64()))?;
            let owner = state.value_owner(value.id).ok_or_else(|| {
                CoreError::validation(format!("property value {} has no owner", value.id))
            })?;
            let property = require_property(state, value.property_id)?;
            validate(state, property, owner, &value.value)?;

            txn.put(Row::PropertyValue(StoredPropertyValue {
                id: value.id,
                property_id: value.property_id,
                owner_id: stored.owner_id,
                value: value.value.clone(),
            }));
            Ok(())
        })
    }

    /// Deletes a value.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn delete(&self, id: PropertyValueId) -> CoreResult<()> {
        self.tm.write(|txn| {
            if txn.state().property_value(id).is_none() {
                return Err(CoreError::not_found(EntityKind::PropertyValue, id.as_u64()));
            }
            txn.delete(RowKey::PropertyValue(id));
            Ok(())
        })
    }
}
