//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod goods_receipt;
mod schema;
mod security;

pub use goods_receipt::{
    GoodsReceipt, GoodsReceiptDraft, RecordId, RelatedOrganization, RelatedUser,
};
pub use schema::{
    EntitySchema, FieldDefinition, FieldType, RelationDefinition, goods_receipt_schema,
    schema_for_entity,
};
pub use security::{AuditAction, RecordOperation, RoleGrant};
