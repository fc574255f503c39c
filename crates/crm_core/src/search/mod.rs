//! Search and filtering over in-memory collections.
//!
//! # Responsibility
//! - Derive list/board views from a canonical collection plus view criteria.
//! - Keep matching rules in one place for every entity type.

pub mod filter;
