//! Repository layer: canonical collections with write-through persistence.
//!
//! # Responsibility
//! - Hold one in-memory collection per entity type.
//! - Persist the whole collection to its blob key on every mutation.
//! - Derive the filtered view and track the selected record.
//!
//! # Invariants
//! - In-memory state is authoritative; persistence failures are logged only.
//! - Repositories never touch each other; cross-entity rules live in
//!   `service`.

pub mod entity_repo;
pub mod events;
pub mod selection;
