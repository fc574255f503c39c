//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into CRM use-cases.
//! - Own rules that span more than one entity type.

pub mod crm_service;
