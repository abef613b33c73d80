/*
* Cluster Inventory Command Line Interface
* ----------------------------------------
*
* Command Structure:
* ---------------
* cluster-inventory
* ├── list                    // Every VM in the cluster, plus the bill for your RAM
* ├── show <ID>               // One node, up close
* ├── validate                // Catch the duplicate IP before Vagrant does
* ├── export [--format]       // json | toml | hosts | ansible
* └── init [--force]          // Writes config/default.toml with the ampere table
*
* Global flags: --config <DIR> picks the config directory and --project <NAME>
* renames the whole cluster for one run.
*
* Logs go to stderr, so `export` output can be piped straight into a file.
*/

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::{error, info};

use crate::config::{default_config_dir, generate_default_config, Settings};
use crate::core::{Inventory, NodeDescriptor, NodeRole};
use crate::errors::{ClusterResult, InventoryError};
use crate::export::{render, Format};

#[derive(Parser, Debug)]
#[command(name = "cluster-inventory")]
#[command(version)]
#[command(about = "Node inventory for the local kubernetes bootstrap cluster", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding default.toml / local.toml
    #[arg(short, long, value_name = "DIR", global = true)]
    pub config: Option<PathBuf>,

    /// Override the project prefix used in node names
    #[arg(short, long, value_name = "NAME", global = true)]
    pub project: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all nodes
    List,
    /// Show a single node
    Show {
        /// Node identifier, e.g. `master` or `node3`
        id: String,
    },
    /// Check the node table and report every problem found
    Validate,
    /// Render the inventory for a provisioning tool
    Export {
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate default configuration
    Init {
        #[arg(short, long)]
        force: bool,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        config,
        project,
    } = cli;

    match command {
        Commands::Init { force } => {
            handle_init_command(config.unwrap_or_else(default_config_dir), force, project)?
        }
        Commands::Validate => handle_validate_command(&load_settings(config, project)?)?,
        Commands::List => handle_list_command(&load_inventory(config, project)?),
        Commands::Show { id } => handle_show_command(&load_inventory(config, project)?, &id)?,
        Commands::Export { format, output } => {
            handle_export_command(&load_inventory(config, project)?, format, output)?
        }
    }

    Ok(())
}

/// `--config` wins over `$CONFIG_PATH`; `--project` wins over everything.
pub fn load_settings(config: Option<PathBuf>, project: Option<String>) -> ClusterResult<Settings> {
    let settings = match config {
        Some(path) => Settings::from_dir(path)?,
        None => Settings::new()?,
    };
    Ok(settings.with_project_name(project))
}

fn load_inventory(config: Option<PathBuf>, project: Option<String>) -> ClusterResult<Inventory> {
    Ok(load_settings(config, project)?.to_inventory()?)
}

fn role_label(role: NodeRole) -> colored::ColoredString {
    match role {
        NodeRole::ControlPlane => "control-plane".cyan(),
        NodeRole::Worker => "worker".normal(),
    }
}

fn print_node_row(node: &NodeDescriptor) {
    println!(
        "{:<10} {:<24} {:<16} {:>4} {:>8}  {}",
        node.id,
        node.name,
        node.ip.to_string(),
        node.cpus,
        node.memory_mb,
        role_label(node.role)
    );
}

fn handle_list_command(inventory: &Inventory) {
    println!("{} {}", "Cluster:".bold(), inventory.project());
    println!(
        "{}",
        format!(
            "{:<10} {:<24} {:<16} {:>4} {:>8}  {}",
            "ID", "NAME", "IP", "CPUS", "MEM(MB)", "ROLE"
        )
        .bold()
    );
    for node in inventory {
        print_node_row(node);
    }

    let totals = inventory.totals();
    println!(
        "{} {} nodes, {} vCPUs, {} MB memory",
        "Total:".bold(),
        totals.nodes,
        totals.cpus,
        totals.memory_mb
    );
}

fn handle_show_command(inventory: &Inventory, id: &str) -> Result<(), InventoryError> {
    let node = inventory.get(id)?;
    println!("{}   {}", "id:".bold(), node.id);
    println!("{}  {}", "name:".bold(), node.name);
    println!("{}    {}", "ip:".bold(), node.ip);
    println!("{}  {}", "cpus:".bold(), node.cpus);
    println!("{} {} MB", "memory:".bold(), node.memory_mb);
    println!("{}  {}", "role:".bold(), role_label(node.role));
    Ok(())
}

fn handle_validate_command(settings: &Settings) -> anyhow::Result<()> {
    match settings.to_inventory() {
        Ok(inventory) => {
            println!(
                "{} {} nodes in '{}' look good",
                "✓".green(),
                inventory.len(),
                inventory.project()
            );
            Ok(())
        }
        Err(e) => {
            for issue in e.issues() {
                println!("{} {}", "✗".red(), issue);
            }
            let count = e.issues().len();
            error!(issues = count, "Validation failed");
            Err(anyhow!("{} validation issue(s)", count))
        }
    }
}

fn handle_export_command(
    inventory: &Inventory,
    format: Format,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let rendered = render(inventory, format)?;
    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), ?format, "Inventory exported");
            eprintln!("{} Wrote {}", "✓".green(), path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

/// Writes `default.toml` into `config_dir`. Returns the path written.
pub fn write_default_config(
    config_dir: &std::path::Path,
    force: bool,
    project: Option<String>,
) -> ClusterResult<Option<PathBuf>> {
    let target = config_dir.join("default.toml");
    if target.exists() && !force {
        error!(path = %target.display(), "Configuration already exists. Use --force to overwrite.");
        return Ok(None);
    }

    let settings = generate_default_config().with_project_name(project);
    // refuse to write a table we would refuse to load
    let inventory = settings.to_inventory()?;

    std::fs::create_dir_all(config_dir)?;
    std::fs::write(&target, render(&inventory, Format::Toml)?)?;
    info!(path = %target.display(), "Default configuration generated");
    Ok(Some(target))
}

fn handle_init_command(dir: PathBuf, force: bool, project: Option<String>) -> anyhow::Result<()> {
    if write_default_config(&dir, force, project)?.is_some() {
        println!("{} Default configuration generated", "✓".green());
    }
    Ok(())
}
