//! Model bootstrap: the project skeleton every generated file starts from.
//!
//! ```text
//! IfcProject ── IfcUnitAssignment (m, m², m³, kg)
//!   └─ IfcRelDeclares ── IfcProjectLibrary         (element targets only)
//!                          └─ IfcRelDeclares ── target object
//! IfcOrganization ◄── IfcLibraryInformation.Publisher
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::model::*;
use crate::storage::ModelBackend;

/// Everything configurable about the skeleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub project_name: String,
    pub object_class: ObjectClass,
    pub object_name: String,
    pub organisation_identification: String,
    pub organisation_name: String,
    pub library_name: String,
    pub library_version: String,
    pub library_version_date: NaiveDate,
    pub library_location: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            project_name: "CODview2 22057 Demo Library Object".into(),
            object_class: ObjectClass::default(),
            object_name: "My Demo Object".into(),
            organisation_identification: "https://identifier.buildingsmart.org/uri/LCA".into(),
            organisation_name: "buildingSMART Sustainability Strategic Group".into(),
            library_name: "LCA indicators and modules".into(),
            library_version: "3.0".into(),
            library_version_date: NaiveDate::from_ymd_opt(2023, 12, 1).unwrap_or_default(),
            library_location: "https://identifier.buildingsmart.org/uri/LCA/LCA/3.0".into(),
        }
    }
}

/// Ids of the skeleton entities the rest of the run needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelHandles {
    pub project: EntityId,
    pub project_library: Option<EntityId>,
    pub units: EntityId,
    pub library_information: EntityId,
    pub target: EntityId,
}

/// Populate an empty model with the project skeleton and the target object.
pub fn bootstrap<M: ModelBackend + ?Sized>(model: &M, config: &BootstrapConfig) -> Result<ModelHandles> {
    let units = assign_si_units(model)?;
    let project = model.create_entity(Entity::Project(ContextDefinition {
        global_id: GlobalId::new(),
        name: Some(config.project_name.clone()),
        units_in_context: Some(units),
    }))?;

    let project_library = if config.object_class == ObjectClass::Building {
        None
    } else {
        let library = model.create_entity(Entity::ProjectLibrary(ContextDefinition {
            global_id: GlobalId::new(),
            name: Some(config.project_name.clone()),
            units_in_context: None,
        }))?;
        declare(model, project, library)?;
        Some(library)
    };

    let publisher = model.create_entity(Entity::Organization(Organization {
        identification: Some(config.organisation_identification.clone()),
        name: config.organisation_name.clone(),
    }))?;
    let library_information = model.create_entity(Entity::LibraryInformation(LibraryInformation {
        name: config.library_name.clone(),
        version: Some(config.library_version.clone()),
        publisher: Some(publisher),
        version_date: Some(config.library_version_date.format("%Y-%m-%d").to_string()),
        location: Some(config.library_location.clone()),
        description: None,
    }))?;

    let target = model.create_entity(Entity::Object(ObjectDefinition {
        global_id: GlobalId::new(),
        class: config.object_class,
        name: Some(config.object_name.clone()),
        description: None,
        has_property_sets: Vec::new(),
    }))?;
    if let Some(library) = project_library {
        declare(model, library, target)?;
    }

    tracing::info!(
        class = config.object_class.ifc_name(),
        object = %config.object_name,
        %target,
        "model bootstrapped"
    );
    Ok(ModelHandles { project, project_library, units, library_information, target })
}

/// Metre, square metre and cubic metre, then kilogram.
fn assign_si_units<M: ModelBackend + ?Sized>(model: &M) -> Result<EntityId> {
    let mass = si_unit(model, "MASSUNIT", Some("KILO"), "GRAM")?;
    let length = si_unit(model, "LENGTHUNIT", None, "METRE")?;
    let area = si_unit(model, "AREAUNIT", None, "SQUARE_METRE")?;
    let volume = si_unit(model, "VOLUMEUNIT", None, "CUBIC_METRE")?;
    model.create_entity(Entity::UnitAssignment(UnitAssignment {
        units: vec![length, area, volume, mass],
    }))
}

fn si_unit<M: ModelBackend + ?Sized>(
    model: &M,
    unit_type: &str,
    prefix: Option<&str>,
    name: &str,
) -> Result<EntityId> {
    model.create_entity(Entity::SiUnit(SiUnit {
        unit_type: unit_type.to_string(),
        prefix: prefix.map(String::from),
        name: name.to_string(),
    }))
}

fn declare<M: ModelBackend + ?Sized>(model: &M, context: EntityId, definition: EntityId) -> Result<EntityId> {
    model.create_entity(Entity::RelDeclares(RelDeclares {
        global_id: GlobalId::new(),
        relating_context: context,
        related_definitions: vec![definition],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryModel;

    fn declarations(model: &MemoryModel) -> Vec<RelDeclares> {
        model
            .entities_of_kind(EntityKind::RelDeclares)
            .unwrap()
            .into_iter()
            .filter_map(|(_, e)| match e {
                Entity::RelDeclares(rel) => Some(rel),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_type_object_declared_in_library() {
        let model = MemoryModel::new();
        let handles = bootstrap(&model, &BootstrapConfig::default()).unwrap();
        let library = handles.project_library.unwrap();

        let rels = declarations(&model);
        assert_eq!(rels.len(), 2);
        assert_eq!(rels[0].relating_context, handles.project);
        assert_eq!(rels[0].related_definitions, vec![library]);
        assert_eq!(rels[1].relating_context, library);
        assert_eq!(rels[1].related_definitions, vec![handles.target]);

        let target = model.require_entity(handles.target).unwrap();
        assert_eq!(target.ifc_class(), "IfcBuildingElementProxyType");
        assert_eq!(target.name(), Some("My Demo Object"));
    }

    #[test]
    fn test_building_has_no_library() {
        let model = MemoryModel::new();
        let config = BootstrapConfig {
            object_class: ObjectClass::Building,
            object_name: "My Demo Building".into(),
            ..Default::default()
        };
        let handles = bootstrap(&model, &config).unwrap();
        assert!(handles.project_library.is_none());
        assert!(declarations(&model).is_empty());
    }

    #[test]
    fn test_units_and_library_information() {
        let model = MemoryModel::new();
        let handles = bootstrap(&model, &BootstrapConfig::default()).unwrap();

        let Entity::UnitAssignment(units) = model.require_entity(handles.units).unwrap() else {
            panic!("wrong kind")
        };
        let names: Vec<String> = units
            .units
            .iter()
            .map(|id| match model.require_entity(*id).unwrap() {
                Entity::SiUnit(u) => u.name,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(names, vec!["METRE", "SQUARE_METRE", "CUBIC_METRE", "GRAM"]);

        let Entity::LibraryInformation(info) = model.require_entity(handles.library_information).unwrap() else {
            panic!("wrong kind")
        };
        assert_eq!(info.version.as_deref(), Some("3.0"));
        assert_eq!(info.version_date.as_deref(), Some("2023-12-01"));
        let publisher = model.require_entity(info.publisher.unwrap()).unwrap();
        assert_eq!(publisher.name(), Some("buildingSMART Sustainability Strategic Group"));
    }

    #[test]
    fn test_config_from_json() {
        let config: BootstrapConfig = serde_json::from_str(
            r#"{ "object_class": "IfcBuilding", "library_version_date": "2024-02-29" }"#,
        )
        .unwrap();
        assert_eq!(config.object_class, ObjectClass::Building);
        assert_eq!(config.library_version_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(config.object_name, "My Demo Object");
    }
}
