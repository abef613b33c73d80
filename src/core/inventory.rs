use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use tracing::{debug, info, warn};

use super::node::{node_name, NodeDescriptor, NodeRole, NodeSpec};
use crate::errors::{InventoryError, LabelField, ValidationIssue};

/// Hostnames end up as DNS labels on the VMs.
pub const MAX_NAME_LEN: usize = 63;

/// How node names get built: `{project}-{infix}-{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    pub project: String,
    pub infix: String,
}

impl Naming {
    pub fn new(project: &str, infix: &str) -> Self {
        Self {
            project: project.to_string(),
            infix: infix.to_string(),
        }
    }

    pub fn name_for(&self, id: &str) -> String {
        node_name(&self.project, &self.infix, id)
    }
}

/// Non-fatal findings; `build` logs them and carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    NoControlPlane,
    MixedNetworks { networks: usize },
}

/// Sums saturate at `u64::MAX` rather than wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub nodes: usize,
    pub cpus: u64,
    pub memory_mb: u64,
}

/// The node table, validated once and read-only from then on.
/// Keeps the order the nodes were declared in.
#[derive(Debug, Clone)]
pub struct Inventory {
    naming: Naming,
    nodes: Vec<NodeDescriptor>,
    index: HashMap<String, usize>,
}

impl Inventory {
    pub fn build(naming: Naming, specs: &[NodeSpec]) -> Result<Self, InventoryError> {
        let mut issues = Vec::new();

        check_label(LabelField::ProjectName, &naming.project, &mut issues);
        check_label(LabelField::NameInfix, &naming.infix, &mut issues);

        if specs.is_empty() {
            issues.push(ValidationIssue::EmptyTable);
        }

        let mut nodes = Vec::with_capacity(specs.len());
        let mut index = HashMap::new();
        let mut ip_owners: HashMap<Ipv4Addr, &str> = HashMap::new();

        for spec in specs {
            let label_ok = check_label(LabelField::Identifier, &spec.id, &mut issues);

            if index.contains_key(&spec.id) {
                issues.push(ValidationIssue::DuplicateIdentifier {
                    id: spec.id.clone(),
                });
            }

            let ip = match spec.ip.trim().parse::<Ipv4Addr>() {
                Ok(ip) if ip.is_unspecified() || ip.is_broadcast() || ip.is_multicast() => {
                    issues.push(ValidationIssue::UnassignableIp {
                        id: spec.id.clone(),
                        ip,
                    });
                    None
                }
                Ok(ip) => Some(ip),
                Err(_) => {
                    issues.push(ValidationIssue::InvalidIp {
                        id: spec.id.clone(),
                        ip: spec.ip.clone(),
                    });
                    None
                }
            };

            if let Some(ip) = ip {
                match ip_owners.get(&ip) {
                    Some(first) => issues.push(ValidationIssue::DuplicateIp {
                        ip,
                        first: first.to_string(),
                        second: spec.id.clone(),
                    }),
                    None => {
                        ip_owners.insert(ip, &spec.id);
                    }
                }
            }

            if spec.cpus == 0 {
                issues.push(ValidationIssue::ZeroCpus {
                    id: spec.id.clone(),
                });
            }
            if spec.memory == 0 {
                issues.push(ValidationIssue::ZeroMemory {
                    id: spec.id.clone(),
                });
            }

            let name = naming.name_for(&spec.id);
            if label_ok && name.len() > MAX_NAME_LEN {
                issues.push(ValidationIssue::NameTooLong {
                    id: spec.id.clone(),
                    name: name.clone(),
                    max: MAX_NAME_LEN,
                });
            }

            if let Some(ip) = ip {
                if !index.contains_key(&spec.id) {
                    index.insert(spec.id.clone(), nodes.len());
                    nodes.push(NodeDescriptor {
                        id: spec.id.clone(),
                        name,
                        ip,
                        cpus: spec.cpus,
                        memory_mb: spec.memory,
                        role: spec.effective_role(),
                    });
                }
            } else {
                // keep later duplicates detectable even when this row's ip is bad
                index.entry(spec.id.clone()).or_insert(usize::MAX);
            }
        }

        if !issues.is_empty() {
            warn!(issues = issues.len(), project = %naming.project, "Node table failed validation");
            return Err(InventoryError::Invalid(issues));
        }

        let inventory = Self { naming, nodes, index };
        inventory.soft_checks();
        info!(
            project = %inventory.naming.project,
            nodes = inventory.len(),
            "Cluster inventory loaded"
        );
        Ok(inventory)
    }

    /// Things a bootstrap can survive but someone probably wants to hear about.
    pub fn advisories(&self) -> Vec<Advisory> {
        let mut advisories = Vec::new();
        if self.control_plane().next().is_none() {
            advisories.push(Advisory::NoControlPlane);
        }

        let networks: HashSet<[u8; 3]> = self
            .nodes
            .iter()
            .map(|n| {
                let o = n.ip.octets();
                [o[0], o[1], o[2]]
            })
            .collect();
        if networks.len() > 1 {
            advisories.push(Advisory::MixedNetworks {
                networks: networks.len(),
            });
        }
        advisories
    }

    fn soft_checks(&self) {
        for advisory in self.advisories() {
            match advisory {
                Advisory::NoControlPlane => {
                    warn!(project = %self.naming.project, "No control-plane node declared")
                }
                Advisory::MixedNetworks { networks } => {
                    warn!(networks, "Nodes span more than one /24 network")
                }
            }
        }
    }

    pub fn get(&self, id: &str) -> Result<&NodeDescriptor, InventoryError> {
        debug!(id, "Looking up node");
        self.index
            .get(id)
            .and_then(|&i| self.nodes.get(i))
            .ok_or_else(|| InventoryError::NotFound { id: id.to_string() })
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeDescriptor> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn naming(&self) -> &Naming {
        &self.naming
    }

    pub fn project(&self) -> &str {
        &self.naming.project
    }

    pub fn control_plane(&self) -> impl Iterator<Item = &NodeDescriptor> {
        self.nodes.iter().filter(|n| n.role == NodeRole::ControlPlane)
    }

    pub fn workers(&self) -> impl Iterator<Item = &NodeDescriptor> {
        self.nodes.iter().filter(|n| n.role == NodeRole::Worker)
    }

    pub fn totals(&self) -> Totals {
        self.nodes.iter().fold(Totals::default(), |acc, n| Totals {
            nodes: acc.nodes + 1,
            cpus: acc.cpus.saturating_add(u64::from(n.cpus)),
            memory_mb: acc.memory_mb.saturating_add(n.memory_mb),
        })
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = &'a NodeDescriptor;
    type IntoIter = std::slice::Iter<'a, NodeDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

// id -> {name, ip, cpus, memory}, in declaration order
impl Serialize for Inventory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.nodes.len()))?;
        for node in &self.nodes {
            map.serialize_entry(&node.id, &node.record())?;
        }
        map.end()
    }
}

/// Lowercase letters, digits and inner hyphens only.
fn check_label(field: LabelField, value: &str, issues: &mut Vec<ValidationIssue>) -> bool {
    let reason = if value.is_empty() {
        Some("must not be empty")
    } else if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        Some("only lowercase letters, digits and '-' are allowed")
    } else if value.starts_with('-') || value.ends_with('-') {
        Some("must not start or end with '-'")
    } else {
        None
    };

    match reason {
        Some(reason) => {
            issues.push(ValidationIssue::InvalidLabel {
                field,
                value: value.to_string(),
                reason,
            });
            false
        }
        None => true,
    }
}
