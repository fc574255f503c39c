//! Core domain logic for the studio CRM.
//! This crate is the single source of truth for orders, clients and the
//! rules that tie them together.

pub mod codec;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;

pub use codec::{CodecError, CodecResult};
pub use config::{ConfigError, CoreConfig, StorageKeys};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::client::{Client, ClientDraft};
pub use model::entity::{Entity, EntityId};
pub use model::order::{
    CustomerSnapshot, Order, OrderDraft, OrderItem, OrderItems, OrderNumbering, OrderStatus,
};
pub use model::validation::{Validate, ValidationError};
pub use repo::entity_repo::{ClientRepository, EntityRepository, OrderRepository};
pub use repo::events::{RepositoryEvent, SubscriptionId};
pub use search::filter::{filter_entities, SearchCriteria, StatusFilter};
pub use service::crm_service::{CrmService, ServiceError, ServiceResult};
pub use store::{BlobError, BlobStore, MemoryBlobStore, SqliteBlobStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
