//! Renders an inventory for whatever tool provisions the VMs.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tracing::debug;

use crate::config::Settings;
use crate::core::{Inventory, NodeDescriptor};
use crate::errors::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `{id: {name, ip, cpus, memory}}`
    #[default]
    Json,
    /// Config document that loads back as default.toml / local.toml
    Toml,
    /// /etc/hosts entries
    Hosts,
    /// Ansible INI inventory grouped by role
    Ansible,
}

pub fn render(inventory: &Inventory, format: Format) -> Result<String, ExportError> {
    render_at(inventory, format, Utc::now())
}

/// `render` with a fixed clock for the header comments.
pub fn render_at(
    inventory: &Inventory,
    format: Format,
    now: DateTime<Utc>,
) -> Result<String, ExportError> {
    debug!(?format, nodes = inventory.len(), "Rendering inventory");
    match format {
        Format::Json => {
            let mut out = serde_json::to_string_pretty(inventory)?;
            out.push('\n');
            Ok(out)
        }
        Format::Toml => Ok(toml::to_string_pretty(&Settings::from_inventory(inventory))?),
        Format::Hosts => render_hosts(inventory, now),
        Format::Ansible => render_ansible(inventory, now),
    }
}

fn header(out: &mut String, inventory: &Inventory, now: DateTime<Utc>) -> Result<(), ExportError> {
    writeln!(
        out,
        "# {} cluster, generated by cluster-inventory at {}",
        inventory.project(),
        now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    )?;
    Ok(())
}

fn render_hosts(inventory: &Inventory, now: DateTime<Utc>) -> Result<String, ExportError> {
    let mut out = String::new();
    header(&mut out, inventory, now)?;
    for node in inventory {
        writeln!(out, "{}\t{}", node.ip, node.name)?;
    }
    Ok(out)
}

fn render_ansible(inventory: &Inventory, now: DateTime<Utc>) -> Result<String, ExportError> {
    let mut out = String::new();
    header(&mut out, inventory, now)?;
    group(&mut out, "control_plane", inventory.control_plane())?;
    out.push('\n');
    group(&mut out, "workers", inventory.workers())?;
    Ok(out)
}

fn group<'a>(
    out: &mut String,
    name: &str,
    nodes: impl Iterator<Item = &'a NodeDescriptor>,
) -> Result<(), ExportError> {
    writeln!(out, "[{}]", name)?;
    for node in nodes {
        writeln!(out, "{} ansible_host={}", node.name, node.ip)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::default_inventory;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn hosts_lines() {
        let inv = default_inventory().unwrap();
        let out = render_at(&inv, Format::Hosts, fixed_now()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(
            lines[0],
            "# ampere cluster, generated by cluster-inventory at 2024-05-01T12:00:00Z"
        );
        assert_eq!(lines[1], "192.168.10.100\tampere-k8s-master");
        assert_eq!(lines[4], "192.168.10.103\tampere-k8s-node3");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn ansible_groups_by_role() {
        let inv = default_inventory().unwrap();
        let out = render_at(&inv, Format::Ansible, fixed_now()).unwrap();
        let body: Vec<_> = out.lines().skip(1).collect();
        assert_eq!(
            body,
            [
                "[control_plane]",
                "ampere-k8s-master ansible_host=192.168.10.100",
                "",
                "[workers]",
                "ampere-k8s-node1 ansible_host=192.168.10.101",
                "ampere-k8s-node2 ansible_host=192.168.10.102",
                "ampere-k8s-node3 ansible_host=192.168.10.103",
            ]
        );
    }
}
