use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stockledger_core::{AppError, AppResult};
use uuid::Uuid;

use crate::schema::goods_receipt_schema;

/// Opaque record identifier assigned by storage on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Creates a random record identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a record identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses a transport value into a record identifier.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid record id '{value}': {error}")))
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RecordId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Related user projection resolved by a storage-side join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedUser {
    /// Stable user identifier.
    pub id: String,
    /// User email address.
    pub email: String,
}

/// Related organization projection resolved by a storage-side join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedOrganization {
    /// Stable organization identifier.
    pub id: String,
    /// Organization display name.
    pub name: String,
}

/// Validated write payload for a goods receipt.
///
/// Constructing a draft is the only way payload data reaches storage, so the
/// declarative rule set in [`goods_receipt_schema`] is applied exactly once
/// per write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoodsReceiptDraft {
    po_date: NaiveDate,
    po_value: i64,
    po_number: i64,
    user_id: Option<String>,
    organization_id: Option<String>,
}

impl GoodsReceiptDraft {
    /// Validates a JSON write payload and extracts the typed draft.
    pub fn from_payload(payload: &Value) -> AppResult<Self> {
        let schema = goods_receipt_schema();
        schema.validate_payload(payload)?;

        let object = payload.as_object().ok_or_else(|| {
            AppError::Validation(format!(
                "{} payload must be a JSON object",
                schema.entity_logical_name()
            ))
        })?;

        Ok(Self {
            po_date: required_date(object, "po_date")?,
            po_value: required_integer(object, "po_value")?,
            po_number: required_integer(object, "po_number")?,
            user_id: optional_text(object, "user_id"),
            organization_id: optional_text(object, "organization_id"),
        })
    }

    /// Returns the purchase-order date.
    #[must_use]
    pub fn po_date(&self) -> NaiveDate {
        self.po_date
    }

    /// Returns the purchase-order value.
    #[must_use]
    pub fn po_value(&self) -> i64 {
        self.po_value
    }

    /// Returns the purchase-order number.
    #[must_use]
    pub fn po_number(&self) -> i64 {
        self.po_number
    }

    /// Returns the optional linked user identifier.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Returns the optional linked organization identifier.
    #[must_use]
    pub fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }
}

fn required_date(object: &serde_json::Map<String, Value>, name: &str) -> AppResult<NaiveDate> {
    object
        .get(name)
        .and_then(Value::as_str)
        .map(NaiveDate::from_str)
        .transpose()
        .map_err(|error| AppError::Validation(format!("{name} must be a calendar date: {error}")))?
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn required_integer(object: &serde_json::Map<String, Value>, name: &str) -> AppResult<i64> {
    object
        .get(name)
        .and_then(Value::as_i64)
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn optional_text(object: &serde_json::Map<String, Value>, name: &str) -> Option<String> {
    object
        .get(name)
        .and_then(Value::as_str)
        .map(str::to_owned)
}

/// Persisted goods receipt, including storage-owned identity and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodsReceipt {
    id: RecordId,
    po_date: NaiveDate,
    po_value: i64,
    po_number: i64,
    user_id: Option<String>,
    organization_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user: Option<RelatedUser>,
    organization: Option<RelatedOrganization>,
}

impl GoodsReceipt {
    /// Assembles a persisted record projection.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: RecordId,
        po_date: NaiveDate,
        po_value: i64,
        po_number: i64,
        user_id: Option<String>,
        organization_id: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        user: Option<RelatedUser>,
        organization: Option<RelatedOrganization>,
    ) -> Self {
        Self {
            id,
            po_date,
            po_value,
            po_number,
            user_id,
            organization_id,
            created_at,
            updated_at,
            user,
            organization,
        }
    }

    /// Returns the storage-assigned record identifier.
    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the purchase-order date.
    #[must_use]
    pub fn po_date(&self) -> NaiveDate {
        self.po_date
    }

    /// Returns the purchase-order value.
    #[must_use]
    pub fn po_value(&self) -> i64 {
        self.po_value
    }

    /// Returns the purchase-order number.
    #[must_use]
    pub fn po_number(&self) -> i64 {
        self.po_number
    }

    /// Returns the optional linked user identifier.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Returns the optional linked organization identifier.
    #[must_use]
    pub fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }

    /// Returns the storage-owned creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the storage-owned last-update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the included user relation, when the query asked for it.
    #[must_use]
    pub fn user(&self) -> Option<&RelatedUser> {
        self.user.as_ref()
    }

    /// Returns the included organization relation, when the query asked for it.
    #[must_use]
    pub fn organization(&self) -> Option<&RelatedOrganization> {
        self.organization.as_ref()
    }
}
