//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_field_schema_source;
mod in_memory_field_value_store;
mod in_memory_grant_table_repository;
mod in_memory_role_repository;
mod postgres_field_schema_source;
mod postgres_field_value_store;
mod postgres_grant_table_repository;
mod postgres_role_repository;
mod site_key;

pub use in_memory_field_schema_source::InMemoryFieldSchemaSource;
pub use in_memory_field_value_store::InMemoryFieldValueStore;
pub use in_memory_grant_table_repository::InMemoryGrantTableRepository;
pub use in_memory_role_repository::InMemoryRoleRepository;
pub use postgres_field_schema_source::PostgresFieldSchemaSource;
pub use postgres_field_value_store::PostgresFieldValueStore;
pub use postgres_grant_table_repository::PostgresGrantTableRepository;
pub use postgres_role_repository::PostgresRoleRepository;
