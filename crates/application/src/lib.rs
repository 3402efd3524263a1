//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod directory_service;
mod query_translator;
mod record_ports;
mod record_service;

pub use authorization_service::{AuthorizationService, TenantRecordStore};
pub use directory_service::DirectoryService;
pub use query_translator::{
    TranslatedListRequest, convert_route_to_entity, translate_list_request,
    translate_relation_includes,
};
pub use record_ports::{
    AuditEvent, AuditRepository, AuthorizationRepository, DirectoryOption, DirectoryRepository,
    EqualityFilter, RecordQuery, RecordRepository, RelationIncludes,
};
pub use record_service::RecordService;
