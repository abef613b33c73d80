/*
* Cluster Inventory Configuration
* -------------------------------
*
* The node table used to live as a hardcoded literal. Now it is layered like
* every other setting we own, so a laptop with 8GB of RAM can shrink node3
* without forking the repo.
*
* Configuration Hierarchy (from lowest to highest priority):
* -----------------------------------------------------
* 1. Hardcoded defaults (the ampere bootstrap table)
* 2. default.toml (checked-in cluster layout)
* 3. local.toml (your machine, your rules, not in git)
* 4. Environment variables: CLUSTER_PROJECT_NAME, CLUSTER_NAME_INFIX
*
* The node list itself is only replaced wholesale by a file. Nobody wants to
* spell a table of VMs in SCREAMING_SNAKE_CASE.
*
* Usage Example:
* ------------
* ```rust,ignore
* let settings = Settings::new()?;
* let inventory = settings.to_inventory()?;
* ```
*/

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::{
    default_node_specs, Inventory, Naming, NodeSpec, DEFAULT_NAME_INFIX, DEFAULT_PROJECT_NAME,
};
use crate::errors::InventoryError;

pub const ENV_PREFIX: &str = "CLUSTER";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub project_name: String,
    pub name_infix: String,
    #[serde(default = "default_node_specs")]
    pub nodes: Vec<NodeSpec>,
}

impl Settings {
    /// Loads from `$CONFIG_PATH`, or `./config` when unset.
    pub fn new() -> Result<Self, ConfigError> {
        let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config".to_string());
        Self::from_dir(config_path)
    }

    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load(dir.as_ref(), None)
    }

    /// Same layering as `from_dir`, with the environment swapped for `env`.
    pub fn load(dir: &Path, env: Option<config::Map<String, String>>) -> Result<Self, ConfigError> {
        info!("Loading configuration from path: {}", dir.display());

        let config = Config::builder()
            .set_default("project_name", DEFAULT_PROJECT_NAME)?
            .set_default("name_infix", DEFAULT_NAME_INFIX)?
            .add_source(File::from(dir.join("default.toml")).required(false))
            .add_source(File::from(dir.join("local.toml")).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        debug!(
            project = %settings.project_name,
            nodes = settings.nodes.len(),
            "Configuration resolved"
        );
        Ok(settings)
    }

    pub fn from_inventory(inventory: &Inventory) -> Self {
        let naming = inventory.naming();
        Self {
            project_name: naming.project.clone(),
            name_infix: naming.infix.clone(),
            nodes: inventory.iter().map(|n| n.to_spec()).collect(),
        }
    }

    pub fn naming(&self) -> Naming {
        Naming::new(&self.project_name, &self.name_infix)
    }

    pub fn with_project_name(mut self, project_name: Option<String>) -> Self {
        if let Some(name) = project_name {
            self.project_name = name;
        }
        self
    }

    pub fn to_inventory(&self) -> Result<Inventory, InventoryError> {
        Inventory::build(self.naming(), &self.nodes)
    }
}

impl Default for Settings {
    fn default() -> Self {
        generate_default_config()
    }
}

pub fn generate_default_config() -> Settings {
    Settings {
        project_name: DEFAULT_PROJECT_NAME.to_string(),
        name_infix: DEFAULT_NAME_INFIX.to_string(),
        nodes: default_node_specs(),
    }
}

pub fn default_config_dir() -> PathBuf {
    PathBuf::from("config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dir_falls_back_to_builtin_table() {
        let settings = Settings::load(Path::new("/nonexistent/cluster-config"), Some(config::Map::new())).unwrap();
        assert_eq!(settings, generate_default_config());
    }

    #[test]
    fn env_overrides_project_name() {
        let mut env = config::Map::new();
        env.insert("CLUSTER_PROJECT_NAME".to_string(), "bohr".to_string());
        let settings = Settings::load(Path::new("/nonexistent/cluster-config"), Some(env)).unwrap();
        assert_eq!(settings.project_name, "bohr");
        let inv = settings.to_inventory().unwrap();
        assert_eq!(inv.get("node1").unwrap().name, "bohr-k8s-node1");
    }

    #[test]
    fn cli_override_only_applies_when_given() {
        let settings = generate_default_config().with_project_name(None);
        assert_eq!(settings.project_name, "ampere");
        let settings = settings.with_project_name(Some("lab".into()));
        assert_eq!(settings.project_name, "lab");
    }
}
