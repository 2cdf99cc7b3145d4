//! # Object Model
//!
//! Clean DTOs for the IFC instances this crate produces.
//! These types cross every boundary: builders ↔ storage ↔ export ↔ user.
//!
//! Design rule: this module is pure data. No I/O, no state, no schema
//! knowledge beyond attribute names.

pub mod entity;
pub mod global_id;
pub mod property;
pub mod value;

pub use entity::{
    ContextDefinition, Entity, EntityId, EntityKind, LibraryInformation, ObjectClass,
    ObjectDefinition, Organization, PropertySet, RelDeclares, RelDefinesByProperties, SiUnit,
    UnitAssignment,
};
pub use global_id::GlobalId;
pub use property::{
    ComplexProperty, PropertyEnumeratedValue, PropertyEnumeration, PropertyListValue,
    PropertyReferenceValue, PropertySingleValue, Reference, Table, TableColumn, TableRow,
};
pub use value::{NAN_SENTINEL, Primitive, PrimitiveKind, TypedValue};
