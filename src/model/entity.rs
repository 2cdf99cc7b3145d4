//! Entity instances held by the object model.
//!
//! Every IFC instance the builders produce is one `Entity` variant, stored
//! under an opaque `EntityId` that doubles as its STEP instance number.

use serde::{Deserialize, Serialize};

use super::GlobalId;
use super::property::*;

/// Opaque entity identifier (the `#n` of the STEP file).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Entity kind, used to enumerate already-created entities of one sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Project,
    ProjectLibrary,
    RelDeclares,
    SiUnit,
    UnitAssignment,
    Organization,
    LibraryInformation,
    Object,
    PropertySet,
    RelDefinesByProperties,
    PropertySingleValue,
    PropertyListValue,
    PropertyEnumeration,
    PropertyEnumeratedValue,
    ComplexProperty,
    PropertyReferenceValue,
    Table,
    TableRow,
    TableColumn,
    Reference,
}

/// Classes the property sets can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ObjectClass {
    #[serde(rename = "IfcBuilding")]
    Building,
    #[serde(rename = "IfcBuildingElementProxy")]
    BuildingElementProxy,
    #[default]
    #[serde(rename = "IfcBuildingElementProxyType")]
    BuildingElementProxyType,
}

impl ObjectClass {
    pub fn ifc_name(&self) -> &'static str {
        match self {
            ObjectClass::Building => "IfcBuilding",
            ObjectClass::BuildingElementProxy => "IfcBuildingElementProxy",
            ObjectClass::BuildingElementProxyType => "IfcBuildingElementProxyType",
        }
    }

    /// Type objects own their sets through `HasPropertySets`; occurrences
    /// need an `IfcRelDefinesByProperties`.
    pub fn is_type(&self) -> bool {
        matches!(self, ObjectClass::BuildingElementProxyType)
    }
}

impl std::str::FromStr for ObjectClass {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "IfcBuilding" => Ok(ObjectClass::Building),
            "IfcBuildingElementProxy" => Ok(ObjectClass::BuildingElementProxy),
            "IfcBuildingElementProxyType" => Ok(ObjectClass::BuildingElementProxyType),
            other => Err(crate::Error::Config(format!("unsupported object class '{other}'"))),
        }
    }
}

// ============================================================================
// Context, units, ownership
// ============================================================================

/// `IfcProject` / `IfcProjectLibrary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextDefinition {
    pub global_id: GlobalId,
    pub name: Option<String>,
    pub units_in_context: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelDeclares {
    pub global_id: GlobalId,
    pub relating_context: EntityId,
    pub related_definitions: Vec<EntityId>,
}

/// `IfcSIUnit`; `unit_type`, `prefix` and `name` are STEP enumeration literals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiUnit {
    pub unit_type: String,
    pub prefix: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitAssignment {
    pub units: Vec<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub identification: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryInformation {
    pub name: String,
    pub version: Option<String>,
    pub publisher: Option<EntityId>,
    pub version_date: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

// ============================================================================
// Target object and property-set plumbing
// ============================================================================

/// The building / element / element type the property sets describe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDefinition {
    pub global_id: GlobalId,
    pub class: ObjectClass,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Only populated for type objects.
    pub has_property_sets: Vec<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    pub global_id: GlobalId,
    pub name: String,
    pub description: Option<String>,
    pub has_properties: Vec<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelDefinesByProperties {
    pub global_id: GlobalId,
    pub related_objects: Vec<EntityId>,
    pub relating_property_set: EntityId,
}

// ============================================================================
// Entity
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity")]
pub enum Entity {
    Project(ContextDefinition),
    ProjectLibrary(ContextDefinition),
    RelDeclares(RelDeclares),
    SiUnit(SiUnit),
    UnitAssignment(UnitAssignment),
    Organization(Organization),
    LibraryInformation(LibraryInformation),
    Object(ObjectDefinition),
    PropertySet(PropertySet),
    RelDefinesByProperties(RelDefinesByProperties),
    PropertySingleValue(PropertySingleValue),
    PropertyListValue(PropertyListValue),
    PropertyEnumeration(PropertyEnumeration),
    PropertyEnumeratedValue(PropertyEnumeratedValue),
    ComplexProperty(ComplexProperty),
    PropertyReferenceValue(PropertyReferenceValue),
    Table(Table),
    TableRow(TableRow),
    TableColumn(TableColumn),
    Reference(Reference),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Project(_) => EntityKind::Project,
            Entity::ProjectLibrary(_) => EntityKind::ProjectLibrary,
            Entity::RelDeclares(_) => EntityKind::RelDeclares,
            Entity::SiUnit(_) => EntityKind::SiUnit,
            Entity::UnitAssignment(_) => EntityKind::UnitAssignment,
            Entity::Organization(_) => EntityKind::Organization,
            Entity::LibraryInformation(_) => EntityKind::LibraryInformation,
            Entity::Object(_) => EntityKind::Object,
            Entity::PropertySet(_) => EntityKind::PropertySet,
            Entity::RelDefinesByProperties(_) => EntityKind::RelDefinesByProperties,
            Entity::PropertySingleValue(_) => EntityKind::PropertySingleValue,
            Entity::PropertyListValue(_) => EntityKind::PropertyListValue,
            Entity::PropertyEnumeration(_) => EntityKind::PropertyEnumeration,
            Entity::PropertyEnumeratedValue(_) => EntityKind::PropertyEnumeratedValue,
            Entity::ComplexProperty(_) => EntityKind::ComplexProperty,
            Entity::PropertyReferenceValue(_) => EntityKind::PropertyReferenceValue,
            Entity::Table(_) => EntityKind::Table,
            Entity::TableRow(_) => EntityKind::TableRow,
            Entity::TableColumn(_) => EntityKind::TableColumn,
            Entity::Reference(_) => EntityKind::Reference,
        }
    }

    /// IFC class name as written in the schema.
    pub fn ifc_class(&self) -> &'static str {
        match self {
            Entity::Project(_) => "IfcProject",
            Entity::ProjectLibrary(_) => "IfcProjectLibrary",
            Entity::RelDeclares(_) => "IfcRelDeclares",
            Entity::SiUnit(_) => "IfcSIUnit",
            Entity::UnitAssignment(_) => "IfcUnitAssignment",
            Entity::Organization(_) => "IfcOrganization",
            Entity::LibraryInformation(_) => "IfcLibraryInformation",
            Entity::Object(o) => o.class.ifc_name(),
            Entity::PropertySet(_) => "IfcPropertySet",
            Entity::RelDefinesByProperties(_) => "IfcRelDefinesByProperties",
            Entity::PropertySingleValue(_) => "IfcPropertySingleValue",
            Entity::PropertyListValue(_) => "IfcPropertyListValue",
            Entity::PropertyEnumeration(_) => "IfcPropertyEnumeration",
            Entity::PropertyEnumeratedValue(_) => "IfcPropertyEnumeratedValue",
            Entity::ComplexProperty(_) => "IfcComplexProperty",
            Entity::PropertyReferenceValue(_) => "IfcPropertyReferenceValue",
            Entity::Table(_) => "IfcTable",
            Entity::TableRow(_) => "IfcTableRow",
            Entity::TableColumn(_) => "IfcTableColumn",
            Entity::Reference(_) => "IfcReference",
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Entity::Project(c) | Entity::ProjectLibrary(c) => c.name.as_deref(),
            Entity::Organization(o) => Some(&o.name),
            Entity::LibraryInformation(l) => Some(&l.name),
            Entity::Object(o) => o.name.as_deref(),
            Entity::PropertySet(p) => Some(&p.name),
            Entity::PropertySingleValue(p) => Some(&p.name),
            Entity::PropertyListValue(p) => Some(&p.name),
            Entity::PropertyEnumeration(p) => Some(&p.name),
            Entity::PropertyEnumeratedValue(p) => Some(&p.name),
            Entity::ComplexProperty(p) => Some(&p.name),
            Entity::PropertyReferenceValue(p) => Some(&p.name),
            Entity::Table(t) => t.name.as_deref(),
            Entity::TableColumn(c) => c.name.as_deref(),
            _ => None,
        }
    }

    /// True for the `IfcProperty` subtypes a property set can hold.
    pub fn is_property(&self) -> bool {
        matches!(
            self,
            Entity::PropertySingleValue(_)
                | Entity::PropertyListValue(_)
                | Entity::PropertyEnumeratedValue(_)
                | Entity::ComplexProperty(_)
                | Entity::PropertyReferenceValue(_)
        )
    }

    /// Set `Specification` on a property. Returns false for other entities.
    pub fn set_specification(&mut self, spec: impl Into<String>) -> bool {
        let slot = match self {
            Entity::PropertySingleValue(p) => &mut p.specification,
            Entity::PropertyListValue(p) => &mut p.specification,
            Entity::PropertyEnumeratedValue(p) => &mut p.specification,
            Entity::ComplexProperty(p) => &mut p.specification,
            Entity::PropertyReferenceValue(p) => &mut p.specification,
            _ => return false,
        };
        *slot = Some(spec.into());
        true
    }

    pub fn specification(&self) -> Option<&str> {
        match self {
            Entity::PropertySingleValue(p) => p.specification.as_deref(),
            Entity::PropertyListValue(p) => p.specification.as_deref(),
            Entity::PropertyEnumeratedValue(p) => p.specification.as_deref(),
            Entity::ComplexProperty(p) => p.specification.as_deref(),
            Entity::PropertyReferenceValue(p) => p.specification.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypedValue;

    fn single(name: &str) -> Entity {
        Entity::PropertySingleValue(PropertySingleValue {
            name: name.into(),
            specification: None,
            nominal_value: Some(TypedValue::label("x")),
            unit: None,
        })
    }

    #[test]
    fn test_kind_and_class() {
        let e = single("Material");
        assert_eq!(e.kind(), EntityKind::PropertySingleValue);
        assert_eq!(e.ifc_class(), "IfcPropertySingleValue");
        assert_eq!(e.name(), Some("Material"));
        assert!(e.is_property());
    }

    #[test]
    fn test_set_specification() {
        let mut e = single("Material");
        assert!(e.set_specification("EN 15804"));
        assert_eq!(e.specification(), Some("EN 15804"));

        let mut unit = Entity::UnitAssignment(UnitAssignment { units: vec![] });
        assert!(!unit.set_specification("nope"));
    }

    #[test]
    fn test_object_class_parse() {
        assert_eq!("IfcBuilding".parse::<ObjectClass>().unwrap(), ObjectClass::Building);
        assert!(ObjectClass::BuildingElementProxyType.is_type());
        assert!(!ObjectClass::Building.is_type());
        assert!("IfcWall".parse::<ObjectClass>().is_err());
    }
}
