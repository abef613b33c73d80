// Properties every node table we hand to the provisioner must hold.

use cluster_inventory::core::{default_inventory, default_node_specs, Inventory, Naming, NodeSpec};
use cluster_inventory::{render, Format, InventoryError, ValidationIssue};
use std::collections::HashSet;

#[test]
fn default_table_holds_the_invariants() {
    let inv = default_inventory().unwrap();
    assert_eq!(inv.len(), 4);

    let ids: HashSet<_> = inv.iter().map(|n| n.id.as_str()).collect();
    let ips: HashSet<_> = inv.iter().map(|n| n.ip).collect();
    assert_eq!(ids.len(), inv.len(), "identifiers must be distinct");
    assert_eq!(ips.len(), inv.len(), "ips must be distinct");

    for node in &inv {
        assert!(node.cpus > 0);
        assert!(node.memory_mb > 0);
        assert_eq!(node.name, format!("ampere-k8s-{}", node.id));
        // dotted quad survives a round trip through the string form
        assert_eq!(node.ip.to_string().split('.').count(), 4);
    }
}

#[test]
fn json_export_is_the_provisioner_contract() {
    let inv = default_inventory().unwrap();
    let json: serde_json::Value = serde_json::from_str(&render(&inv, Format::Json).unwrap()).unwrap();

    assert_eq!(
        json["node3"],
        serde_json::json!({
            "name": "ampere-k8s-node3",
            "ip": "192.168.10.103",
            "cpus": 4,
            "memory": 10240
        })
    );
    assert_eq!(json["master"]["ip"], "192.168.10.100");
    assert_eq!(json.as_object().unwrap().len(), 4);
}

#[test]
fn project_prefix_renames_every_node() {
    let inv = Inventory::build(Naming::new("bohr", "k8s"), &default_node_specs()).unwrap();
    let names: Vec<_> = inv.iter().map(|n| n.name.clone()).collect();
    assert_eq!(
        names,
        ["bohr-k8s-master", "bohr-k8s-node1", "bohr-k8s-node2", "bohr-k8s-node3"]
    );
}

#[test]
fn unknown_node_lookup_fails() {
    let inv = default_inventory().unwrap();
    match inv.get("node4") {
        Err(InventoryError::NotFound { id }) => assert_eq!(id, "node4"),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn broken_table_reports_every_issue() {
    let mut specs = default_node_specs();
    specs.push(NodeSpec::new("node1", "192.168.10.101", 0, 2048));

    let err = Inventory::build(Naming::new("ampere", "k8s"), &specs).unwrap_err();
    let issues = err.issues();
    assert!(issues.contains(&ValidationIssue::DuplicateIdentifier { id: "node1".into() }));
    assert!(issues.contains(&ValidationIssue::ZeroCpus { id: "node1".into() }));
    assert!(issues
        .iter()
        .any(|i| matches!(i, ValidationIssue::DuplicateIp { first, .. } if first == "node1")));
}

#[test]
fn totals_add_up() {
    let totals = default_inventory().unwrap().totals();
    assert_eq!(totals.nodes, 4);
    assert_eq!(totals.cpus, 10);
    assert_eq!(totals.memory_mb, 4096 * 3 + 10240);
}
