//! Bundled framework catalogue and example sources

use super::FrameworkError;
use serde::{Deserialize, Serialize};

const BUNDLED_CATALOG: &str = include_str!("../../configs/frameworks.yaml");

/// Example sources shipped with the crate, keyed by `<framework>_example_<id>`
const EXAMPLES: &[(&str, &str)] = &[
    (
        "fastapi_example_1",
        include_str!("../../assets/fastapi_example_1.py"),
    ),
    (
        "fastapi_example_2",
        include_str!("../../assets/fastapi_example_2.py"),
    ),
    (
        "flask_example_1",
        include_str!("../../assets/flask_example_1.py"),
    ),
    (
        "litestar_example_1",
        include_str!("../../assets/litestar_example_1.py"),
    ),
    (
        "typer_example_1",
        include_str!("../../assets/typer_example_1.py"),
    ),
];

/// A framework the scaffolder can set up
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Framework {
    /// Name used on the command line
    pub name: String,

    pub description: String,

    /// Package installed for the framework itself
    pub package: String,

    /// Additional libraries installed alongside the framework
    #[serde(default)]
    pub libs: Vec<String>,

    /// Directories created in addition to the defaults
    #[serde(default)]
    pub extra_dirs: Vec<String>,

    /// Empty files created in the project
    #[serde(default)]
    pub extra_files: Vec<String>,

    /// Ids of bundled example sources
    #[serde(default)]
    pub examples: Vec<u32>,
}

impl Framework {
    /// Requirement string for the framework package, pinned if a version is given
    pub fn requirement(&self, version: Option<&str>) -> String {
        match version {
            Some(version) => format!("{}=={}", self.package, version),
            None => self.package.clone(),
        }
    }

    /// Source of a bundled example, if this framework ships it
    pub fn example(&self, id: u32) -> Option<&'static str> {
        if !self.examples.contains(&id) {
            return None;
        }
        let key = format!("{}_example_{}", self.name, id);
        EXAMPLES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, source)| *source)
    }
}

/// The list of supported frameworks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameworkCatalog {
    frameworks: Vec<Framework>,
}

impl FrameworkCatalog {
    /// The catalogue shipped with the crate
    pub fn bundled() -> Result<Self, FrameworkError> {
        Self::from_yaml(BUNDLED_CATALOG)
    }

    pub fn from_yaml(content: &str) -> Result<Self, FrameworkError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn frameworks(&self) -> &[Framework] {
        &self.frameworks
    }

    pub fn get(&self, name: &str) -> Option<&Framework> {
        self.frameworks
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Like [`FrameworkCatalog::get`], but an unknown name is an error listing the options
    pub fn find(&self, name: &str) -> Result<&Framework, FrameworkError> {
        self.get(name).ok_or_else(|| FrameworkError::UnknownFramework {
            name: name.to_string(),
            available: self.names().join(", "),
        })
    }

    pub fn names(&self) -> Vec<&str> {
        self.frameworks.iter().map(|f| f.name.as_str()).collect()
    }
}
