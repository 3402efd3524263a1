//! Storage adapters: PostgreSQL repositories and in-memory test doubles.

#![forbid(unsafe_code)]

mod in_memory_audit_repository;
mod in_memory_authorization_repository;
mod in_memory_directory_repository;
mod in_memory_record_repository;
mod postgres_audit_repository;
mod postgres_authorization_repository;
mod postgres_directory_repository;
mod postgres_record_repository;

pub use in_memory_audit_repository::InMemoryAuditRepository;
pub use in_memory_authorization_repository::InMemoryAuthorizationRepository;
pub use in_memory_directory_repository::InMemoryDirectoryRepository;
pub use in_memory_record_repository::InMemoryRecordRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_directory_repository::PostgresDirectoryRepository;
pub use postgres_record_repository::PostgresRecordRepository;
