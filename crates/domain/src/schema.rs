use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stockledger_core::{AppError, AppResult};

/// Supported schema field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Calendar-date string field (`YYYY-MM-DD`).
    Date,
    /// Whole-number field; decimal values are rejected.
    Integer,
    /// UTF-8 string field.
    Text,
}

impl FieldType {
    /// Returns a stable storage value for the field type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Integer => "integer",
            Self::Text => "text",
        }
    }

    fn value_matches(self, value: &Value) -> bool {
        match self {
            Self::Date => value
                .as_str()
                .map(|text| NaiveDate::from_str(text).is_ok())
                .unwrap_or(false),
            Self::Integer => value.as_i64().is_some(),
            Self::Text => value.is_string(),
        }
    }

    fn rule_description(self) -> &'static str {
        match self {
            Self::Date => "must be a calendar date (YYYY-MM-DD)",
            Self::Integer => "must be an integer",
            Self::Text => "must be a string",
        }
    }
}

impl FromStr for FieldType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "date" => Ok(Self::Date),
            "integer" => Ok(Self::Integer),
            "text" => Ok(Self::Text),
            _ => Err(AppError::Validation(format!(
                "unknown field type '{value}'"
            ))),
        }
    }
}

/// Static definition of one writable entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefinition {
    logical_name: &'static str,
    field_type: FieldType,
    is_required: bool,
    is_filterable: bool,
}

impl FieldDefinition {
    /// Returns the field logical name.
    #[must_use]
    pub fn logical_name(&self) -> &'static str {
        self.logical_name
    }

    /// Returns the field type.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Returns whether a write payload must carry a non-null value.
    ///
    /// Optional fields may be absent or explicitly null.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.is_required
    }

    /// Returns whether list queries may filter on this field.
    #[must_use]
    pub fn is_filterable(&self) -> bool {
        self.is_filterable
    }
}

/// Static definition of a zero-or-one relation resolved by storage-side join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationDefinition {
    logical_name: &'static str,
    key_field: &'static str,
    target_entity: &'static str,
}

impl RelationDefinition {
    /// Returns the relation logical name used in include hints.
    #[must_use]
    pub fn logical_name(&self) -> &'static str {
        self.logical_name
    }

    /// Returns the local foreign-key field backing the relation.
    #[must_use]
    pub fn key_field(&self) -> &'static str {
        self.key_field
    }

    /// Returns the target entity logical name.
    #[must_use]
    pub fn target_entity(&self) -> &'static str {
        self.target_entity
    }
}

/// Static schema for one entity: the single source of truth for field
/// constraints, consumed by the validation rule set and the query translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    entity_logical_name: &'static str,
    fields: &'static [FieldDefinition],
    relations: &'static [RelationDefinition],
}

impl EntitySchema {
    /// Returns the entity logical name.
    #[must_use]
    pub fn entity_logical_name(&self) -> &'static str {
        self.entity_logical_name
    }

    /// Returns all writable fields.
    #[must_use]
    pub fn fields(&self) -> &'static [FieldDefinition] {
        self.fields
    }

    /// Returns all relations.
    #[must_use]
    pub fn relations(&self) -> &'static [RelationDefinition] {
        self.relations
    }

    /// Looks up a field definition by logical name.
    #[must_use]
    pub fn field(&self, logical_name: &str) -> Option<&'static FieldDefinition> {
        self.fields
            .iter()
            .find(|field| field.logical_name == logical_name)
    }

    /// Looks up a relation definition by logical name.
    #[must_use]
    pub fn relation(&self, logical_name: &str) -> Option<&'static RelationDefinition> {
        self.relations
            .iter()
            .find(|relation| relation.logical_name == logical_name)
    }

    /// Validates a write payload against the declarative rule set.
    ///
    /// Every failing field is gathered into one validation error; any failure
    /// short-circuits the write before storage is touched. Keys outside the
    /// schema (including storage-owned fields such as `id` and the
    /// timestamps) are rejected.
    pub fn validate_payload(&self, payload: &Value) -> AppResult<()> {
        let object = payload.as_object().ok_or_else(|| {
            AppError::Validation(format!(
                "{} payload must be a JSON object",
                self.entity_logical_name
            ))
        })?;

        let mut failures = Vec::new();

        for key in object.keys() {
            if self.field(key).is_none() {
                failures.push(format!("unknown field '{key}'"));
            }
        }

        for field in self.fields {
            let name = field.logical_name;
            match object.get(name) {
                Some(Value::Null) | None if field.is_required => {
                    failures.push(format!("{name} is required"));
                }
                Some(Value::Null) | None => {}
                Some(value) => {
                    if !field.field_type.value_matches(value) {
                        failures.push(format!("{name} {}", field.field_type.rule_description()));
                    }
                }
            }
        }

        if failures.is_empty() {
            return Ok(());
        }

        Err(AppError::Validation(format!(
            "invalid {} payload: {}",
            self.entity_logical_name,
            failures.join("; ")
        )))
    }
}

static GOODS_RECEIPT_FIELDS: [FieldDefinition; 5] = [
    FieldDefinition {
        logical_name: "po_date",
        field_type: FieldType::Date,
        is_required: true,
        is_filterable: false,
    },
    FieldDefinition {
        logical_name: "po_value",
        field_type: FieldType::Integer,
        is_required: true,
        is_filterable: false,
    },
    FieldDefinition {
        logical_name: "po_number",
        field_type: FieldType::Integer,
        is_required: true,
        is_filterable: false,
    },
    FieldDefinition {
        logical_name: "user_id",
        field_type: FieldType::Text,
        is_required: false,
        is_filterable: true,
    },
    FieldDefinition {
        logical_name: "organization_id",
        field_type: FieldType::Text,
        is_required: false,
        is_filterable: true,
    },
];

static GOODS_RECEIPT_RELATIONS: [RelationDefinition; 2] = [
    RelationDefinition {
        logical_name: "user",
        key_field: "user_id",
        target_entity: "user",
    },
    RelationDefinition {
        logical_name: "organization",
        key_field: "organization_id",
        target_entity: "organization",
    },
];

static GOODS_RECEIPT_SCHEMA: EntitySchema = EntitySchema {
    entity_logical_name: "goods_receipt",
    fields: &GOODS_RECEIPT_FIELDS,
    relations: &GOODS_RECEIPT_RELATIONS,
};

/// Returns the static schema for the `goods_receipt` entity.
#[must_use]
pub fn goods_receipt_schema() -> &'static EntitySchema {
    &GOODS_RECEIPT_SCHEMA
}

/// Looks up the record schema for an entity logical name.
///
/// Only `goods_receipt` carries a record schema; `user` and `organization`
/// are directory entities without a record API of their own.
#[must_use]
pub fn schema_for_entity(entity_logical_name: &str) -> Option<&'static EntitySchema> {
    (entity_logical_name == GOODS_RECEIPT_SCHEMA.entity_logical_name)
        .then_some(&GOODS_RECEIPT_SCHEMA)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::goods_receipt_schema;

    #[test]
    fn valid_payload_passes() {
        let payload = json!({
            "po_date": "2024-01-10",
            "po_value": 100,
            "po_number": 7,
        });
        assert!(goods_receipt_schema().validate_payload(&payload).is_ok());
    }

    #[test]
    fn missing_required_fields_are_all_enumerated() {
        let payload = json!({ "po_date": "2024-01-10" });
        let error = goods_receipt_schema().validate_payload(&payload);
        assert!(error.is_err());

        let message = error.map(|_| String::new()).unwrap_or_else(|e| e.to_string());
        assert!(message.contains("po_value is required"));
        assert!(message.contains("po_number is required"));
    }

    #[test]
    fn decimal_po_value_is_rejected() {
        let payload = json!({
            "po_date": "2024-01-10",
            "po_value": 100.5,
            "po_number": 7,
        });
        assert!(goods_receipt_schema().validate_payload(&payload).is_err());
    }

    #[test]
    fn malformed_date_is_rejected() {
        let payload = json!({
            "po_date": "tenth of January",
            "po_value": 100,
            "po_number": 7,
        });
        assert!(goods_receipt_schema().validate_payload(&payload).is_err());
    }

    #[test]
    fn nullable_relations_accept_explicit_null() {
        let payload = json!({
            "po_date": "2024-01-10",
            "po_value": 100,
            "po_number": 7,
            "user_id": null,
            "organization_id": null,
        });
        assert!(goods_receipt_schema().validate_payload(&payload).is_ok());
    }

    #[test]
    fn storage_owned_fields_are_rejected_on_write() {
        let payload = json!({
            "id": "abc",
            "po_date": "2024-01-10",
            "po_value": 100,
            "po_number": 7,
        });
        assert!(goods_receipt_schema().validate_payload(&payload).is_err());
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!(
            goods_receipt_schema()
                .validate_payload(&json!("not-object"))
                .is_err()
        );
    }
}
