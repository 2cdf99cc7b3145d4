//! IFC4X3 defined-type reflection.
//!
//! Maps a declared defined-type name (`IfcLabel`, `IfcMassMeasure`, ...) to
//! the primitive its underlying EXPRESS type resolves to. Names are matched
//! case-insensitively, as the schema itself is.

use crate::model::PrimitiveKind;
use crate::{Error, Result};

// Simple defined types of IFC4X3 grouped by their underlying EXPRESS type.
// Aggregate types (`IfcCompoundPlaneAngleMeasure`, `IfcComplexNumber`,
// `IfcLineIndex`, ...) cannot carry a single property value and are left out.

const BOOLEAN_TYPES: &[&str] = &["ifcboolean", "ifclogical", "ifcstrippedoptional"];

const INTEGER_TYPES: &[&str] = &[
    "ifccardinalpointreference",
    "ifcdayinmonthnumber",
    "ifcdayinweeknumber",
    "ifcdimensioncount",
    "ifcinteger",
    "ifcintegercountratemeasure",
    "ifcmonthinyearnumber",
    "ifcpositiveinteger",
    "ifctimestamp",
];

// REAL and NUMBER.
const FLOAT_TYPES: &[&str] = &[
    "ifcabsorbeddosemeasure",
    "ifcaccelerationmeasure",
    "ifcamountofsubstancemeasure",
    "ifcangularvelocitymeasure",
    "ifcareadensitymeasure",
    "ifcareameasure",
    "ifccontextdependentmeasure",
    "ifccountmeasure",
    "ifccurvaturemeasure",
    "ifcdoseequivalentmeasure",
    "ifcdynamicviscositymeasure",
    "ifcelectriccapacitancemeasure",
    "ifcelectricchargemeasure",
    "ifcelectricconductancemeasure",
    "ifcelectriccurrentmeasure",
    "ifcelectricresistancemeasure",
    "ifcelectricvoltagemeasure",
    "ifcenergymeasure",
    "ifcforcemeasure",
    "ifcfrequencymeasure",
    "ifcheatfluxdensitymeasure",
    "ifcheatingvaluemeasure",
    "ifcilluminancemeasure",
    "ifcinductancemeasure",
    "ifcionconcentrationmeasure",
    "ifcisothermalmoisturecapacitymeasure",
    "ifckinematicviscositymeasure",
    "ifclengthmeasure",
    "ifclinearforcemeasure",
    "ifclinearmomentmeasure",
    "ifclinearstiffnessmeasure",
    "ifclinearvelocitymeasure",
    "ifcluminousfluxmeasure",
    "ifcluminousintensitydistributionmeasure",
    "ifcluminousintensitymeasure",
    "ifcmagneticfluxdensitymeasure",
    "ifcmagneticfluxmeasure",
    "ifcmassdensitymeasure",
    "ifcmassflowratemeasure",
    "ifcmassmeasure",
    "ifcmassperlengthmeasure",
    "ifcmodulusofelasticitymeasure",
    "ifcmodulusoflinearsubgradereactionmeasure",
    "ifcmodulusofrotationalsubgradereactionmeasure",
    "ifcmodulusofsubgradereactionmeasure",
    "ifcmoisturediffusivitymeasure",
    "ifcmolecularweightmeasure",
    "ifcmomentofinertiameasure",
    "ifcmonetarymeasure",
    "ifcnonnegativelengthmeasure",
    "ifcnormalisedratiomeasure",
    "ifcnumericmeasure",
    "ifcparametervalue",
    "ifcphmeasure",
    "ifcplanarforcemeasure",
    "ifcplaneanglemeasure",
    "ifcpositivelengthmeasure",
    "ifcpositiveplaneanglemeasure",
    "ifcpositiveratiomeasure",
    "ifcpowermeasure",
    "ifcpressuremeasure",
    "ifcradioactivitymeasure",
    "ifcratiomeasure",
    "ifcreal",
    "ifcrotationalfrequencymeasure",
    "ifcrotationalmassmeasure",
    "ifcrotationalstiffnessmeasure",
    "ifcsectionalareaintegralmeasure",
    "ifcsectionmodulusmeasure",
    "ifcshearmodulusmeasure",
    "ifcsolidanglemeasure",
    "ifcsoundpowerlevelmeasure",
    "ifcsoundpowermeasure",
    "ifcsoundpressurelevelmeasure",
    "ifcsoundpressuremeasure",
    "ifcspecificheatcapacitymeasure",
    "ifcspecularexponent",
    "ifcspecularroughness",
    "ifctemperaturegradientmeasure",
    "ifctemperaturerateofchangemeasure",
    "ifcthermaladmittancemeasure",
    "ifcthermalconductivitymeasure",
    "ifcthermalexpansioncoefficientmeasure",
    "ifcthermalresistancemeasure",
    "ifcthermaltransmittancemeasure",
    "ifcthermodynamictemperaturemeasure",
    "ifctimemeasure",
    "ifctorquemeasure",
    "ifcvaporpermeabilitymeasure",
    "ifcvolumemeasure",
    "ifcvolumetricflowratemeasure",
    "ifcwarpingconstantmeasure",
    "ifcwarpingmomentmeasure",
];

// STRING and BINARY.
const TEXT_TYPES: &[&str] = &[
    "ifcbinary",
    "ifcboxalignment",
    "ifcdate",
    "ifcdatetime",
    "ifcdescriptivemeasure",
    "ifcduration",
    "ifcfontstyle",
    "ifcfontvariant",
    "ifcfontweight",
    "ifcgloballyuniqueid",
    "ifcidentifier",
    "ifclabel",
    "ifclanguageid",
    "ifcpresentabletext",
    "ifctext",
    "ifctextalignment",
    "ifctextdecoration",
    "ifctextfontname",
    "ifctexttransformation",
    "ifctime",
    "ifcurireference",
    "ifcwellknowntextliteral",
];

impl PrimitiveKind {
    /// Reflect a declared IFC type name onto its primitive kind.
    pub fn lookup(type_name: &str) -> Option<PrimitiveKind> {
        let key = type_name.trim().to_ascii_lowercase();
        let key = key.as_str();
        if TEXT_TYPES.contains(&key) {
            Some(PrimitiveKind::Text)
        } else if FLOAT_TYPES.contains(&key) {
            Some(PrimitiveKind::Float)
        } else if INTEGER_TYPES.contains(&key) {
            Some(PrimitiveKind::Integer)
        } else if BOOLEAN_TYPES.contains(&key) {
            Some(PrimitiveKind::Boolean)
        } else {
            None
        }
    }

    /// Like [`PrimitiveKind::lookup`], but an unknown name is a schema defect.
    pub fn for_type(type_name: &str) -> Result<PrimitiveKind> {
        Self::lookup(type_name).ok_or_else(|| Error::UnknownDataType(type_name.to_string()))
    }
}
