//! Simple and complex property builders.
//!
//! | Schema `IFCType` | Entity | Value |
//! |------------------|--------|-------|
//! | `IfcPropertySingleValue` | `IfcPropertySingleValue` | one coerced value |
//! | `IfcPropertyListValue` | `IfcPropertyListValue` | `;`-separated values |
//! | `IfcPropertyEnumeratedValue` | `IfcPropertyEnumeratedValue` | values checked against an enumeration |
//! | `IfcComplexProperty` | `IfcComplexProperty` | nested simple properties |

use smallvec::{SmallVec, smallvec};

use crate::Result;
use crate::coerce::coerce_or_label;
use crate::model::*;
use crate::schema::{DATA_TYPE, ENUMERATION_REFERENCE, PROPERTY_NAME, SchemaBlock, SchemaProperty, ShapeKind};
use crate::storage::ModelBackend;

use super::{BuildContext, LIST_DELIMITER, Placement, RawValue, RegistryKey};

/// Raw value split at the list delimiter. A placeholder stands for `slots`
/// empty values.
fn split_raw(raw: &RawValue, slots: usize) -> SmallVec<[Option<&str>; 4]> {
    match raw.as_text() {
        Some(text) => text.split(LIST_DELIMITER).map(Some).collect(),
        None => smallvec![None; slots],
    }
}

impl<'s, M: ModelBackend> BuildContext<'s, M> {
    // ========================================================================
    // Simple properties
    // ========================================================================

    /// Build the simple property a schema row describes.
    ///
    /// Returns `None` when the row is skipped: no value in live data, or a
    /// shape that is not a simple property.
    pub fn build_simple_property(
        &mut self,
        property: &SchemaProperty,
        placement: Placement,
    ) -> Result<Option<EntityId>> {
        let shape = property.shape();
        if !matches!(
            shape,
            ShapeKind::SingleValue | ShapeKind::ListValue | ShapeKind::EnumeratedValue
        ) {
            tracing::warn!(property = %property.label(), ?shape, "not a simple property, skipping");
            self.stats.unsupported_properties += 1;
            return Ok(None);
        }

        let Some(raw) = self.source.property_value(property) else {
            tracing::trace!(property = %property.label(), "no value, skipping");
            self.stats.properties_skipped += 1;
            return Ok(None);
        };

        let id = match shape {
            ShapeKind::ListValue => self.build_list_value(property, &raw)?,
            ShapeKind::EnumeratedValue => self.build_enumerated_value(property, &raw)?,
            _ => self.build_single_value(property, &raw)?,
        };
        if let Placement::Attached(pset) = placement {
            self.model.attach_property(pset, id)?;
        }
        self.stats.properties_created += 1;
        Ok(Some(id))
    }

    pub fn build_single_value(&mut self, property: &SchemaProperty, raw: &RawValue) -> Result<EntityId> {
        let value = raw.coerce_or_label(property.require(DATA_TYPE)?)?;
        self.model.create_entity(Entity::PropertySingleValue(PropertySingleValue {
            name: property.require(PROPERTY_NAME)?.to_string(),
            specification: None,
            nominal_value: Some(value),
            unit: self.property_unit(property),
        }))
    }

    /// A placeholder list holds two zero values.
    pub fn build_list_value(&mut self, property: &SchemaProperty, raw: &RawValue) -> Result<EntityId> {
        let data_type = property.require(DATA_TYPE)?;
        let list_values = match raw {
            RawValue::Number { .. } => vec![raw.coerce_or_label(data_type)?],
            _ => split_raw(raw, 2)
                .into_iter()
                .map(|item| coerce_or_label(data_type, item))
                .collect::<Result<Vec<_>>>()?,
        };
        self.model.create_entity(Entity::PropertyListValue(PropertyListValue {
            name: property.require(PROPERTY_NAME)?.to_string(),
            specification: None,
            list_values,
            unit: self.property_unit(property),
        }))
    }

    /// Values are typed with the data type of the matching enumeration row;
    /// a value the enumeration does not list is dropped. A placeholder takes
    /// the enumeration's first row.
    pub fn build_enumerated_value(&mut self, property: &SchemaProperty, raw: &RawValue) -> Result<EntityId> {
        let name = property.require(PROPERTY_NAME)?;
        let enumeration_name = property.require(ENUMERATION_REFERENCE)?;
        let schema = self.schema;
        let block = schema.enumerations.require(enumeration_name)?;
        let enumeration = self.enumeration(block, self.property_unit(property))?;

        let mut enumeration_values = Vec::new();
        for item in split_raw(raw, 1) {
            let row = match item {
                Some(text) => block.properties.iter().find(|p| p.enumeration_value() == Some(text)),
                None => block.properties.first(),
            };
            let Some((row, data_type)) = row.and_then(|r| Some((r, r.data_type()?))) else {
                tracing::warn!(
                    property = name,
                    enumeration = enumeration_name,
                    value = item.unwrap_or_default(),
                    "no data type for enumeration value, dropping it"
                );
                self.stats.enumeration_values_skipped += 1;
                continue;
            };
            enumeration_values.push(coerce_or_label(data_type, row.enumeration_value())?);
        }

        self.model.create_entity(Entity::PropertyEnumeratedValue(PropertyEnumeratedValue {
            name: name.to_string(),
            specification: None,
            enumeration_values,
            enumeration_reference: Some(enumeration),
        }))
    }

    /// The model's `IfcPropertyEnumeration` for a schema enumeration block,
    /// created with every listed value on first use.
    pub fn enumeration(&mut self, block: &SchemaBlock, unit: Option<EntityId>) -> Result<EntityId> {
        let key = RegistryKey::Enumeration(block.name.clone());
        if let Some(id) = self.lookup(&key)? {
            return Ok(id);
        }
        let mut enumeration_values = Vec::with_capacity(block.properties.len());
        for row in &block.properties {
            let Some(data_type) = row.data_type() else {
                tracing::warn!(enumeration = %block.name, value = %row.label(), "enumeration row has no data type, leaving it out");
                continue;
            };
            enumeration_values.push(coerce_or_label(data_type, row.enumeration_value())?);
        }
        let id = self.model.create_entity(Entity::PropertyEnumeration(PropertyEnumeration {
            name: block.name.clone(),
            enumeration_values,
            unit,
        }))?;
        self.registry.register(key, id);
        Ok(id)
    }

    // TODO: map schema unit labels such as "GIGA PASCAL" onto IfcSIUnit
    // instances in the project's unit assignment.
    fn property_unit(&self, property: &SchemaProperty) -> Option<EntityId> {
        if let Some(unit) = property.unit() {
            tracing::trace!(unit, "property units are not resolved, leaving Unit unset");
        }
        None
    }

    // ========================================================================
    // Complex properties
    // ========================================================================

    /// Build (or reuse) the complex property a row names and attach it.
    ///
    /// Constituents come from the complex-property block of the same name and
    /// keep their own `Specification`. A complex property that ends up with
    /// no constituents is not created at all.
    pub fn build_complex_property(&mut self, pset: EntityId, property: &SchemaProperty) -> Result<Option<EntityId>> {
        let name = property.require(PROPERTY_NAME)?;
        let key = RegistryKey::ComplexProperty(name.to_string());

        let id = match self.lookup(&key)? {
            Some(existing) => existing,
            None => {
                let schema = self.schema;
                let block = schema.complex_properties.require(name)?;
                let mut has_properties = Vec::with_capacity(block.properties.len());
                for member in &block.properties {
                    let Some(id) = self.build_simple_property(member, Placement::Nested)? else {
                        continue;
                    };
                    if let Some(spec) = member.specification() {
                        self.model.set_specification(id, spec)?;
                    }
                    has_properties.push(id);
                }
                if has_properties.is_empty() {
                    tracing::debug!(property = name, "complex property has no values, skipping");
                    self.stats.complex_properties_skipped += 1;
                    return Ok(None);
                }
                let id = self.model.create_entity(Entity::ComplexProperty(ComplexProperty {
                    name: name.to_string(),
                    specification: None,
                    usage_name: name.to_string(),
                    has_properties,
                }))?;
                self.registry.register(key, id);
                self.stats.properties_created += 1;
                id
            }
        };
        self.model.attach_property(pset, id)?;
        Ok(Some(id))
    }
}
