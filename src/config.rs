//! Run configuration.
//!
//! ```json
//! {
//!   "schema": { "property_sets": "CSV/22057IFC_psets.csv", ... },
//!   "data_file": "Example22057ProductsJSON/leca_isoblokk_LSX30_iso22057.json",
//!   "generate_demo": false,
//!   "output_dir": "GeneratedIFCModels",
//!   "file_name": "22057IFC_Example_leca_isoblokk",
//!   "model": { "object_class": "IfcBuildingElementProxyType", "object_name": "LSX30" }
//! }
//! ```
//!
//! Every key is optional; the defaults generate the demo object from `CSV/`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bootstrap::BootstrapConfig;
use crate::schema::SchemaPaths;
use crate::{Error, Result};

/// Extension of generated files.
pub const IFC_EXTENSION: &str = "ifc";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub schema: SchemaPaths,
    /// Product data; required unless `generate_demo` is set.
    pub data_file: Option<PathBuf>,
    /// Build every property with placeholder values instead of reading data.
    pub generate_demo: bool,
    pub output_dir: PathBuf,
    pub file_name: String,
    pub model: BootstrapConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            schema: SchemaPaths::default(),
            data_file: None,
            generate_demo: true,
            output_dir: PathBuf::from("GeneratedIFCModels"),
            file_name: "22057IFCDemoObject".into(),
            model: BootstrapConfig::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.generate_demo && self.data_file.is_none() {
            return Err(Error::Config("live generation needs a data_file".into()));
        }
        if self.file_name.is_empty() {
            return Err(Error::Config("file_name must not be empty".into()));
        }
        Ok(())
    }

    /// `<output_dir>/<file_name>.ifc`
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name).with_extension(IFC_EXTENSION)
    }
}
