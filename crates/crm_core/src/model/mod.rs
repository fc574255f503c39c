//! CRM domain model.
//!
//! # Responsibility
//! - Define the two persisted entity types (orders, clients) and their drafts.
//! - Own the value-level invariants that hold no matter who mutates a record.
//!
//! # Invariants
//! - Every persisted record has a stable, never-reused string id.
//! - An order always has at least one item; its total is derived, never stored.
//! - An order's customer is a value snapshot, not a live client reference.

pub mod catalog;
pub mod client;
pub mod entity;
pub mod order;
pub mod seed;
pub mod validation;
