use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// Which side of the kubernetes cluster a VM lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeRole {
    ControlPlane,
    Worker,
}

impl NodeRole {
    /// The bootstrap table only marks roles through the key: `master` runs
    /// the control plane, everything else joins as a worker.
    pub fn infer(id: &str) -> Self {
        if id == "master" {
            NodeRole::ControlPlane
        } else {
            NodeRole::Worker
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRole::ControlPlane => write!(f, "control-plane"),
            NodeRole::Worker => write!(f, "worker"),
        }
    }
}

/// One row of the node table as it comes out of config, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    pub ip: String,
    pub cpus: u32,
    pub memory: u64, // MB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<NodeRole>,
}

impl NodeSpec {
    pub fn new(id: &str, ip: &str, cpus: u32, memory: u64) -> Self {
        Self {
            id: id.to_string(),
            ip: ip.to_string(),
            cpus,
            memory,
            role: None,
        }
    }

    pub fn with_role(mut self, role: NodeRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn effective_role(&self) -> NodeRole {
        self.role.unwrap_or_else(|| NodeRole::infer(&self.id))
    }
}

/// A validated VM definition. Only `Inventory::build` hands these out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescriptor {
    pub id: String,
    pub name: String,
    pub ip: Ipv4Addr,
    pub cpus: u32,
    pub memory_mb: u64,
    pub role: NodeRole,
}

impl NodeDescriptor {
    pub fn record(&self) -> NodeRecord<'_> {
        NodeRecord {
            name: &self.name,
            ip: self.ip,
            cpus: self.cpus,
            memory: self.memory_mb,
        }
    }

    /// Back to the config form, with the role spelled out.
    pub fn to_spec(&self) -> NodeSpec {
        NodeSpec {
            id: self.id.clone(),
            ip: self.ip.to_string(),
            cpus: self.cpus,
            memory: self.memory_mb,
            role: Some(self.role),
        }
    }
}

/// What provisioning tools read: `{name, ip, cpus, memory}`.
#[derive(Debug, Serialize)]
pub struct NodeRecord<'a> {
    pub name: &'a str,
    pub ip: Ipv4Addr,
    pub cpus: u32,
    pub memory: u64,
}

/// Hostname for a node, e.g. `ampere` + `k8s` + `node3` -> `ampere-k8s-node3`.
pub fn node_name(prefix: &str, infix: &str, id: &str) -> String {
    format!("{}-{}-{}", prefix, infix, id)
}
