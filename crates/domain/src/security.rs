use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stockledger_core::AppError;

/// Record operations enforced by application policy checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOperation {
    /// Enumerating records for an entity.
    List,
    /// Creating a record.
    Create,
    /// Reading a single record.
    Read,
    /// Replacing the mutable fields of a record.
    Update,
    /// Removing a record.
    Delete,
}

impl RecordOperation {
    /// Returns a stable storage value for this operation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Returns all known operations.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[RecordOperation] = &[
            RecordOperation::List,
            RecordOperation::Create,
            RecordOperation::Read,
            RecordOperation::Update,
            RecordOperation::Delete,
        ];

        ALL
    }
}

impl FromStr for RecordOperation {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "list" => Ok(Self::List),
            "create" => Ok(Self::Create),
            "read" => Ok(Self::Read),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(AppError::Validation(format!(
                "unknown record operation '{value}'"
            ))),
        }
    }
}

/// One role grant row: a role may perform an operation on an entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrant {
    /// Role name the grant is attached to.
    pub role: String,
    /// Entity logical name the grant applies to.
    pub entity_logical_name: String,
    /// Operation permitted by the grant.
    pub operation: RecordOperation,
}

impl RoleGrant {
    /// Returns whether the grant permits an operation on an entity.
    #[must_use]
    pub fn permits(&self, entity_logical_name: &str, operation: RecordOperation) -> bool {
        self.entity_logical_name == entity_logical_name && self.operation == operation
    }
}

/// Stable audit actions emitted by record write paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a record is created.
    RecordCreated,
    /// Emitted when a record is updated.
    RecordUpdated,
    /// Emitted when a record is deleted.
    RecordDeleted,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RecordCreated => "record.created",
            Self::RecordUpdated => "record.updated",
            Self::RecordDeleted => "record.deleted",
        }
    }
}
