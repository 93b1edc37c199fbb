//! Bundled registry of package managers and their subcommands

use super::error::ManagerError;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Resource name of the registry shipped with the crate
pub const DEFAULT_RESOURCE: &str = "managers.json";

/// Registry payloads compiled into the binary, keyed by resource name
const BUNDLED: &[(&str, &str)] = &[(
    DEFAULT_RESOURCE,
    include_str!("../../configs/managers.json"),
)];

static SHARED: OnceLock<Result<ManagerRegistry, ManagerError>> = OnceLock::new();

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryFormat {
    #[serde(deserialize_with = "unique_managers")]
    managers: BTreeMap<String, CommandsFormat>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CommandsFormat {
    install: String,
    uninstall: String,
}

/// Decode the `managers` object, rejecting a name that appears twice
fn unique_managers<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, CommandsFormat>, D::Error>
where
    D: Deserializer<'de>,
{
    struct UniqueManagers;

    impl<'de> Visitor<'de> for UniqueManagers {
        type Value = BTreeMap<String, CommandsFormat>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object mapping manager names to their commands")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut managers = BTreeMap::new();
            while let Some((name, commands)) = access.next_entry::<String, CommandsFormat>()? {
                if managers.contains_key(&name) {
                    return Err(de::Error::custom(format!("duplicate manager '{}'", name)));
                }
                managers.insert(name, commands);
            }
            Ok(managers)
        }
    }

    deserializer.deserialize_map(UniqueManagers)
}

/// Install/uninstall subcommands of one package manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerEntry {
    /// Manager binary name (e.g. "pip", "uv")
    pub name: String,
    /// Subcommand that installs libraries (e.g. "install", "add")
    pub install: String,
    /// Subcommand that removes libraries (e.g. "uninstall", "remove")
    pub uninstall: String,
}

/// Mapping from package-manager name to its command templates
///
/// Decoding is strict: unknown keys, missing keys, wrong types, duplicate
/// manager names and empty templates are all rejected with [`ManagerError::SchemaError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerRegistry {
    managers: BTreeMap<String, ManagerEntry>,
}

impl ManagerRegistry {
    /// Load a registry bundled with the crate by resource name
    pub fn load(resource_name: &str) -> Result<Self, ManagerError> {
        let payload = BUNDLED
            .iter()
            .find(|(name, _)| *name == resource_name)
            .map(|(_, payload)| *payload)
            .ok_or_else(|| ManagerError::ResourceNotFound(resource_name.to_string()))?;

        Self::decode(resource_name, payload)
    }

    /// Decode a registry from a JSON payload
    pub fn from_json(payload: &str) -> Result<Self, ManagerError> {
        Self::decode("<inline>", payload)
    }

    /// The default bundled registry, loaded once per process
    pub fn shared() -> Result<&'static ManagerRegistry, ManagerError> {
        SHARED
            .get_or_init(|| Self::load(DEFAULT_RESOURCE))
            .as_ref()
            .map_err(Clone::clone)
    }

    fn decode(resource: &str, payload: &str) -> Result<Self, ManagerError> {
        let schema_error = |reason: String| ManagerError::SchemaError {
            resource: resource.to_string(),
            reason,
        };

        let format: RegistryFormat =
            serde_json::from_str(payload).map_err(|e| schema_error(e.to_string()))?;

        let mut managers = BTreeMap::new();
        for (name, commands) in format.managers {
            if commands.install.trim().is_empty() {
                return Err(schema_error(format!(
                    "manager '{}' has an empty install command",
                    name
                )));
            }
            if commands.uninstall.trim().is_empty() {
                return Err(schema_error(format!(
                    "manager '{}' has an empty uninstall command",
                    name
                )));
            }

            managers.insert(
                name.clone(),
                ManagerEntry {
                    name,
                    install: commands.install,
                    uninstall: commands.uninstall,
                },
            );
        }

        tracing::debug!(resource, count = managers.len(), "loaded package manager registry");

        Ok(Self { managers })
    }

    /// Look up a manager by name
    pub fn get(&self, name: &str) -> Option<&ManagerEntry> {
        self.managers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.managers.contains_key(name)
    }

    /// Manager names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.managers.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ManagerEntry> {
        self.managers.values()
    }

    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }
}
