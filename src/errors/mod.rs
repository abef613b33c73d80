use std::fmt;
use std::net::Ipv4Addr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("Inventory Error: {0}")]
    InventoryError(#[from] InventoryError),

    #[error("Configuration Error: {0}")]
    ConfigError(#[from] ::config::ConfigError),

    #[error("Export Error: {0}")]
    ExportError(#[from] ExportError),

    #[error("I/O Error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("node table is invalid:\n{}", IssueList(.0))]
    Invalid(Vec<ValidationIssue>),

    #[error("Node not found: {id}")]
    NotFound {
        id: String,
    },
}

impl InventoryError {
    /// Every issue behind an `Invalid` error, empty for other variants.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            InventoryError::Invalid(issues) => issues,
            _ => &[],
        }
    }
}

/// One broken rule in a node table. Validation collects all of them
/// instead of stopping at the first.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("the node table is empty")]
    EmptyTable,

    #[error("invalid {field} '{value}': {reason}")]
    InvalidLabel {
        field: LabelField,
        value: String,
        reason: &'static str,
    },

    #[error("duplicate node identifier '{id}'")]
    DuplicateIdentifier {
        id: String,
    },

    #[error("node '{id}': '{ip}' is not a valid IPv4 address")]
    InvalidIp {
        id: String,
        ip: String,
    },

    #[error("node '{id}': {ip} cannot be assigned to a host")]
    UnassignableIp {
        id: String,
        ip: Ipv4Addr,
    },

    #[error("duplicate ip {ip} (used by '{first}' and '{second}')")]
    DuplicateIp {
        ip: Ipv4Addr,
        first: String,
        second: String,
    },

    #[error("node '{id}': cpu count must be positive")]
    ZeroCpus {
        id: String,
    },

    #[error("node '{id}': memory must be positive")]
    ZeroMemory {
        id: String,
    },

    #[error("node '{id}': name '{name}' is longer than {max} characters")]
    NameTooLong {
        id: String,
        name: String,
        max: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelField {
    ProjectName,
    NameInfix,
    Identifier,
}

impl fmt::Display for LabelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelField::ProjectName => write!(f, "project name"),
            LabelField::NameInfix => write!(f, "name infix"),
            LabelField::Identifier => write!(f, "node identifier"),
        }
    }
}

struct IssueList<'a>(&'a [ValidationIssue]);

impl fmt::Display for IssueList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {}", issue)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization failed: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("formatting failed")]
    Fmt(#[from] fmt::Error),
}

// Result type alias for convenience
pub type ClusterResult<T> = Result<T, ClusterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_lists_every_issue() {
        let err = InventoryError::Invalid(vec![
            ValidationIssue::ZeroCpus { id: "node1".into() },
            ValidationIssue::DuplicateIdentifier { id: "node2".into() },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("node 'node1': cpu count must be positive"));
        assert!(msg.contains("duplicate node identifier 'node2'"));
        assert_eq!(err.issues().len(), 2);
    }

    #[test]
    fn not_found_has_no_issues() {
        let err = InventoryError::NotFound { id: "node9".into() };
        assert!(err.issues().is_empty());
        assert_eq!(err.to_string(), "Node not found: node9");
    }
}
