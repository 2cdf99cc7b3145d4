//! STEP export: serialize the model as an ISO 10303-21 `.ifc` file.
//!
//! ```text
//! ISO-10303-21;
//! HEADER; FILE_DESCRIPTION / FILE_NAME / FILE_SCHEMA(('IFC4X3')) ENDSEC;
//! DATA;
//! #1=IFCSIUNIT(*,.MASSUNIT.,.KILO.,.GRAM.);
//! ...
//! ENDSEC;
//! END-ISO-10303-21;
//! ```
//!
//! Entity ids are written as instance numbers, so references inside the file
//! are the model's own ids.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::Result;
use crate::model::*;
use crate::storage::ModelBackend;

const VIEW_DEFINITION: &str = "ViewDefinition [ReferenceView]";
const ORIGINATING_SYSTEM: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Header
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct StepHeader {
    pub name: String,
    pub time_stamp: DateTime<Utc>,
    pub author: String,
    pub organization: String,
    pub description: String,
}

impl StepHeader {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time_stamp: Utc::now(),
            author: String::new(),
            organization: String::new(),
            description: VIEW_DEFINITION.to_string(),
        }
    }
}

// ============================================================================
// Export
// ============================================================================

/// Write every entity of the model, in id order.
pub fn export_step<M: ModelBackend + ?Sized>(
    model: &M,
    header: &StepHeader,
    writer: &mut dyn Write,
) -> Result<()> {
    writeln!(writer, "ISO-10303-21;")?;
    writeln!(writer, "HEADER;")?;
    writeln!(writer, "FILE_DESCRIPTION(({}),'2;1');", encode_string(&header.description))?;
    writeln!(
        writer,
        "FILE_NAME({},{},({}),({}),{},{},'');",
        encode_string(&header.name),
        encode_string(&header.time_stamp.format("%Y-%m-%dT%H:%M:%S").to_string()),
        encode_string(&header.author),
        encode_string(&header.organization),
        encode_string(ORIGINATING_SYSTEM),
        encode_string(ORIGINATING_SYSTEM),
    )?;
    writeln!(writer, "FILE_SCHEMA(({}));", encode_string(model.schema_identifier()))?;
    writeln!(writer, "ENDSEC;")?;
    writeln!(writer, "DATA;")?;

    for (id, entity) in model.all_entities()? {
        let attributes: Vec<String> = attributes(&entity).iter().map(Attr::format).collect();
        writeln!(
            writer,
            "{}={}({});",
            id,
            entity.ifc_class().to_ascii_uppercase(),
            attributes.join(",")
        )?;
    }

    writeln!(writer, "ENDSEC;")?;
    writeln!(writer, "END-ISO-10303-21;")?;
    Ok(())
}

/// Write the model to `path`, creating missing parent directories.
pub fn write_step_file<M: ModelBackend + ?Sized>(model: &M, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut writer = BufWriter::new(File::create(path)?);
    export_step(model, &StepHeader::new(name), &mut writer)?;
    writer.flush()?;
    tracing::info!(path = %path.display(), entities = model.entity_count()?, "IFC file written");
    Ok(())
}

// ============================================================================
// Attribute values
// ============================================================================

/// One STEP attribute value.
#[derive(Debug, Clone, PartialEq)]
enum Attr {
    Null,
    Derived,
    Ref(EntityId),
    Text(String),
    Enum(String),
    Value(TypedValue),
    List(Vec<Attr>),
}

impl Attr {
    fn text(s: &str) -> Self {
        Attr::Text(s.to_string())
    }

    fn opt_text(s: Option<&str>) -> Self {
        s.map_or(Attr::Null, Attr::text)
    }

    fn opt_ref(id: Option<EntityId>) -> Self {
        id.map_or(Attr::Null, Attr::Ref)
    }

    fn refs(ids: &[EntityId]) -> Self {
        Attr::List(ids.iter().copied().map(Attr::Ref).collect())
    }

    /// Optional aggregate: `$` when empty.
    fn opt_refs(ids: &[EntityId]) -> Self {
        if ids.is_empty() { Attr::Null } else { Attr::refs(ids) }
    }

    fn values(values: &[TypedValue]) -> Self {
        Attr::List(values.iter().cloned().map(Attr::Value).collect())
    }

    fn enumeration(literal: &str) -> Self {
        Attr::Enum(literal.to_string())
    }

    fn format(&self) -> String {
        match self {
            Attr::Null => "$".to_string(),
            Attr::Derived => "*".to_string(),
            Attr::Ref(id) => id.to_string(),
            Attr::Text(s) => encode_string(s),
            Attr::Enum(e) => format!(".{e}."),
            Attr::Value(v) => format!("{}({})", v.type_name.to_ascii_uppercase(), format_primitive(&v.value)),
            Attr::List(items) => {
                let inner: Vec<String> = items.iter().map(Attr::format).collect();
                format!("({})", inner.join(","))
            }
        }
    }
}

/// Attributes in IFC4X3 declaration order.
fn attributes(entity: &Entity) -> Vec<Attr> {
    use Attr::{Derived, Null};

    match entity {
        Entity::Project(c) | Entity::ProjectLibrary(c) => vec![
            Attr::text(c.global_id.as_str()),
            Null,
            Attr::opt_text(c.name.as_deref()),
            Null,
            Null,
            Null,
            Null,
            Null,
            Attr::opt_ref(c.units_in_context),
        ],
        Entity::RelDeclares(r) => vec![
            Attr::text(r.global_id.as_str()),
            Null,
            Null,
            Null,
            Attr::Ref(r.relating_context),
            Attr::refs(&r.related_definitions),
        ],
        Entity::SiUnit(u) => vec![
            Derived,
            Attr::enumeration(&u.unit_type),
            u.prefix.as_deref().map_or(Null, Attr::enumeration),
            Attr::enumeration(&u.name),
        ],
        Entity::UnitAssignment(u) => vec![Attr::refs(&u.units)],
        Entity::Organization(o) => vec![
            Attr::opt_text(o.identification.as_deref()),
            Attr::text(&o.name),
            Null,
            Null,
            Null,
        ],
        Entity::LibraryInformation(l) => vec![
            Attr::text(&l.name),
            Attr::opt_text(l.version.as_deref()),
            Attr::opt_ref(l.publisher),
            Attr::opt_text(l.version_date.as_deref()),
            Attr::opt_text(l.location.as_deref()),
            Attr::opt_text(l.description.as_deref()),
        ],
        Entity::Object(o) => object_attributes(o),
        Entity::PropertySet(p) => vec![
            Attr::text(p.global_id.as_str()),
            Null,
            Attr::text(&p.name),
            Attr::opt_text(p.description.as_deref()),
            Attr::refs(&p.has_properties),
        ],
        Entity::RelDefinesByProperties(r) => vec![
            Attr::text(r.global_id.as_str()),
            Null,
            Null,
            Null,
            Attr::refs(&r.related_objects),
            Attr::Ref(r.relating_property_set),
        ],
        Entity::PropertySingleValue(p) => vec![
            Attr::text(&p.name),
            Attr::opt_text(p.specification.as_deref()),
            p.nominal_value.clone().map_or(Null, Attr::Value),
            Attr::opt_ref(p.unit),
        ],
        Entity::PropertyListValue(p) => vec![
            Attr::text(&p.name),
            Attr::opt_text(p.specification.as_deref()),
            if p.list_values.is_empty() { Null } else { Attr::values(&p.list_values) },
            Attr::opt_ref(p.unit),
        ],
        Entity::PropertyEnumeration(e) => vec![
            Attr::text(&e.name),
            Attr::values(&e.enumeration_values),
            Attr::opt_ref(e.unit),
        ],
        Entity::PropertyEnumeratedValue(p) => vec![
            Attr::text(&p.name),
            Attr::opt_text(p.specification.as_deref()),
            if p.enumeration_values.is_empty() { Null } else { Attr::values(&p.enumeration_values) },
            Attr::opt_ref(p.enumeration_reference),
        ],
        Entity::ComplexProperty(c) => vec![
            Attr::text(&c.name),
            Attr::opt_text(c.specification.as_deref()),
            Attr::text(&c.usage_name),
            Attr::refs(&c.has_properties),
        ],
        Entity::PropertyReferenceValue(p) => vec![
            Attr::text(&p.name),
            Attr::opt_text(p.specification.as_deref()),
            Attr::opt_text(p.usage_name.as_deref()),
            Attr::opt_ref(p.property_reference),
        ],
        Entity::Table(t) => vec![
            Attr::opt_text(t.name.as_deref()),
            Attr::opt_refs(&t.rows),
            Attr::opt_refs(&t.columns),
        ],
        Entity::TableRow(r) => vec![
            if r.row_cells.is_empty() { Null } else { Attr::values(&r.row_cells) },
            r.is_heading.map_or(Null, |h| Attr::enumeration(if h { "T" } else { "F" })),
        ],
        Entity::TableColumn(c) => vec![
            Attr::opt_text(c.identifier.as_deref()),
            Attr::opt_text(c.name.as_deref()),
            Attr::opt_text(c.description.as_deref()),
            Attr::opt_ref(c.unit),
            Attr::opt_ref(c.reference_path),
        ],
        Entity::Reference(r) => vec![
            Attr::opt_text(r.type_identifier.as_deref()),
            Attr::opt_text(r.attribute_identifier.as_deref()),
            Attr::opt_text(r.instance_name.as_deref()),
            if r.list_positions.is_empty() {
                Null
            } else {
                Attr::List(
                    r.list_positions
                        .iter()
                        .map(|p| Attr::Value(TypedValue::new("IfcInteger", *p)))
                        .collect(),
                )
            },
            Attr::opt_ref(r.inner_reference),
        ],
    }
}

fn object_attributes(o: &ObjectDefinition) -> Vec<Attr> {
    use Attr::Null;

    let mut attrs = vec![
        Attr::text(o.global_id.as_str()),
        Null,
        Attr::opt_text(o.name.as_deref()),
        Attr::opt_text(o.description.as_deref()),
    ];
    match o.class {
        // ObjectType, ObjectPlacement, Representation, LongName,
        // CompositionType, ElevationOfRefHeight, ElevationOfTerrain,
        // BuildingAddress
        ObjectClass::Building => attrs.extend(std::iter::repeat_n(Null, 8)),
        // ObjectType, ObjectPlacement, Representation, Tag, PredefinedType
        ObjectClass::BuildingElementProxy => attrs.extend(std::iter::repeat_n(Null, 5)),
        ObjectClass::BuildingElementProxyType => attrs.extend([
            Null,
            Attr::opt_refs(&o.has_property_sets),
            Null,
            Null,
            Null,
            Attr::enumeration("NOTDEFINED"),
        ]),
    }
    attrs
}

// ============================================================================
// Literals
// ============================================================================

fn format_primitive(value: &Primitive) -> String {
    match value {
        Primitive::Boolean(b) => if *b { ".T." } else { ".F." }.to_string(),
        Primitive::Integer(i) => i.to_string(),
        Primitive::Float(f) => format_real(*f),
        Primitive::Text(s) => encode_string(s),
    }
}

/// STEP reals always carry a decimal point.
fn format_real(value: f64) -> String {
    let mut s = value.to_string();
    if !s.contains('.') {
        s.push('.');
    }
    s
}

/// Quote and escape a string for a STEP file.
///
/// Printable ASCII passes through with `'` and `\` doubled; anything else is
/// written as `\X2\` (UCS-2) or `\X4\` (beyond the BMP) hex runs.
fn encode_string(s: &str) -> String {
    const X2: &str = "\\X2\\";
    const X4: &str = "\\X4\\";
    const END: &str = "\\X0\\";

    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    let mut run: Option<&str> = None;
    for c in s.chars() {
        let needed = match c as u32 {
            0x20..=0x7E => None,
            0..=0xFFFF => Some(X2),
            _ => Some(X4),
        };
        if needed != run {
            if run.is_some() {
                out.push_str(END);
            }
            if let Some(directive) = needed {
                out.push_str(directive);
            }
            run = needed;
        }
        match needed {
            None if c == '\'' => out.push_str("''"),
            None if c == '\\' => out.push_str("\\\\"),
            None => out.push(c),
            Some(X2) => out.push_str(&format!("{:04X}", c as u32)),
            Some(_) => out.push_str(&format!("{:08X}", c as u32)),
        }
    }
    if run.is_some() {
        out.push_str(END);
    }
    out.push('\'');
    out
}
