pub mod defaults;
pub mod inventory;
pub mod node;

// exports for lazy devs like us
pub use defaults::{default_inventory, default_node_specs, DEFAULT_NAME_INFIX, DEFAULT_PROJECT_NAME};
pub use inventory::{Advisory, Inventory, Naming, Totals, MAX_NAME_LEN};
pub use node::{node_name, NodeDescriptor, NodeRecord, NodeRole, NodeSpec};
