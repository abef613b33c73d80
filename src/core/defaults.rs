use super::inventory::{Inventory, Naming};
use super::node::NodeSpec;
use crate::errors::InventoryError;

pub const DEFAULT_PROJECT_NAME: &str = "ampere";
pub const DEFAULT_NAME_INFIX: &str = "k8s";

/// The local bootstrap cluster: one control plane and three workers,
/// with the last worker sized for the heavy pods.
pub fn default_node_specs() -> Vec<NodeSpec> {
    vec![
        NodeSpec::new("master", "192.168.10.100", 2, 4096),
        NodeSpec::new("node1", "192.168.10.101", 2, 4096),
        NodeSpec::new("node2", "192.168.10.102", 2, 4096),
        NodeSpec::new("node3", "192.168.10.103", 4, 10240),
    ]
}

pub fn default_naming() -> Naming {
    Naming::new(DEFAULT_PROJECT_NAME, DEFAULT_NAME_INFIX)
}

pub fn default_inventory() -> Result<Inventory, InventoryError> {
    Inventory::build(default_naming(), &default_node_specs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NodeRole;
    use std::net::Ipv4Addr;

    #[test]
    fn node3_matches_the_bootstrap_table() {
        let inv = default_inventory().unwrap();
        let node3 = inv.get("node3").unwrap();
        assert_eq!(node3.name, "ampere-k8s-node3");
        assert_eq!(node3.ip, Ipv4Addr::new(192, 168, 10, 103));
        assert_eq!(node3.cpus, 4);
        assert_eq!(node3.memory_mb, 10240);
    }

    #[test]
    fn master_is_the_control_plane() {
        let inv = default_inventory().unwrap();
        assert_eq!(inv.get("master").unwrap().role, NodeRole::ControlPlane);
        assert_eq!(inv.workers().count(), 3);
    }
}
