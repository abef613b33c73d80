pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod export;

// Re-exports
pub use crate::config::Settings;
pub use crate::core::{default_inventory, Inventory, Naming, NodeDescriptor, NodeRole, NodeSpec};
pub use crate::errors::{ClusterError, ClusterResult, InventoryError, ValidationIssue};
pub use crate::export::{render, Format};
