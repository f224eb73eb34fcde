use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Contract functions the mirror calls. A deployment whose interface lacks
/// any of them is rejected up front.
pub const REQUIRED_FUNCTIONS: &[&str] = &[
    "group_count",
    "get_group",
    "get_members",
    "get_current_eligible_member",
    "get_member_contribution",
    "get_last_contribution",
    "get_contract_balance",
    "get_admin",
    "create_group",
    "join_group",
    "make_contribution",
    "withdraw",
    "delete_group",
];

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MirrorConfig {
    /// Logical name of the contract in the address book
    #[serde(default = "default_contract_name")]
    pub contract_name: String,

    /// Directory holding the deployment artifacts
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,

    /// Address book file, relative to `artifacts_dir`
    #[serde(default = "default_address_file")]
    pub address_file: String,

    /// Interface description file, relative to `artifacts_dir`
    #[serde(default = "default_interface_file")]
    pub interface_file: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            contract_name: default_contract_name(),
            artifacts_dir: default_artifacts_dir(),
            address_file: default_address_file(),
            interface_file: default_interface_file(),
        }
    }
}

fn default_contract_name() -> String {
    String::from("Ikimina")
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("contracts")
}

fn default_address_file() -> String {
    String::from("contract-address.json")
}

fn default_interface_file() -> String {
    String::from("Ikimina.json")
}

impl MirrorConfig {
    /// Defaults, overridden by `file` (TOML) when given, then by `IKIMINA_*`
    /// environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(MirrorConfig::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        let config: MirrorConfig = figment.merge(Env::prefixed("IKIMINA_")).extract()?;
        debug!(?config, "loaded mirror config");
        Ok(config)
    }

    pub fn address_path(&self) -> PathBuf {
        self.artifacts_dir.join(&self.address_file)
    }

    pub fn interface_path(&self) -> PathBuf {
        self.artifacts_dir.join(&self.interface_file)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// One entry of the contract's callable surface.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct InterfaceEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Param>,
}

/// Artifacts written by the deployment step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub contract_id: String,
    pub interface: Vec<InterfaceEntry>,
}

impl Deployment {
    pub fn load(config: &MirrorConfig) -> Result<Self, ConfigError> {
        let book: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(config.address_path())?)?;
        let contract_id = book
            .get(&config.contract_name)
            .cloned()
            .ok_or_else(|| ConfigError::MissingContract(config.contract_name.clone()))?;

        let interface: Vec<InterfaceEntry> =
            serde_json::from_str(&fs::read_to_string(config.interface_path())?)?;

        let deployment = Self {
            contract_id,
            interface,
        };
        for name in REQUIRED_FUNCTIONS {
            if deployment.function(name).is_none() {
                return Err(ConfigError::MissingFunction(name.to_string()));
            }
        }
        Ok(deployment)
    }

    pub fn function(&self, name: &str) -> Option<&InterfaceEntry> {
        self.interface
            .iter()
            .find(|entry| entry.kind == "function" && entry.name == name)
    }

    /// Writes the address book and interface in the layout [`Deployment::load`] reads.
    pub fn store(&self, config: &MirrorConfig) -> Result<(), ConfigError> {
        fs::create_dir_all(&config.artifacts_dir)?;

        let mut book = BTreeMap::new();
        book.insert(config.contract_name.clone(), self.contract_id.clone());
        fs::write(config.address_path(), serde_json::to_string_pretty(&book)?)?;
        fs::write(
            config.interface_path(),
            serde_json::to_string_pretty(&self.interface)?,
        )?;
        Ok(())
    }
}
