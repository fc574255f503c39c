//! Shared contract for entities held by an [`EntityRepository`].
//!
//! [`EntityRepository`]: crate::repo::entity_repo::EntityRepository

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// Opaque record identifier.
///
/// Kept as a plain string because imported data may carry ids minted
/// elsewhere; new records get a UUID v4 in string form.
pub type EntityId = String;

/// Generates a fresh id for a newly created record.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4().to_string()
}

/// A record type with a stable id that can be created from a draft.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    /// Form payload accepted by `add`: the record minus id and counters.
    type Draft;

    /// Short lowercase name used in log events (`order`, `client`).
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Builds the persisted record from a draft and a freshly minted id.
    fn from_draft(id: EntityId, draft: Self::Draft) -> Self;
}
