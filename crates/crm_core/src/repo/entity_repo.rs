//! Generic entity repository over a blob store.
//!
//! # Responsibility
//! - Own the canonical collection for one entity type.
//! - Write the whole collection through to the blob store on every mutation.
//! - Keep the filtered view and selection consistent with the collection.
//! - Notify subscribers after each mutation.
//!
//! # Invariants
//! - Every mutation persists before returning; a failed write is logged and
//!   never rolls back the in-memory change.
//! - The filtered view is recomputed synchronously after every mutation and
//!   every criteria change; it is never edited directly.
//! - `update`/`delete` with an unknown id change nothing and persist nothing.
//! - Import is all-or-nothing and replaces the collection wholesale.

use crate::codec::{decode_collection, encode_collection, encode_compact, CodecResult};
use crate::model::client::Client;
use crate::model::entity::{new_entity_id, Entity, EntityId};
use crate::model::order::{next_order_number, Order, OrderStatus};
use crate::repo::events::{RepositoryEvent, Subscribers, SubscriptionId};
use crate::repo::selection::Selection;
use crate::search::filter::{filter_entities, SearchCriteria, Searchable, StatusFilter};
use crate::store::BlobStore;
use log::{debug, error, info, warn};

pub type OrderRepository<S> = EntityRepository<Order, S>;
pub type ClientRepository<S> = EntityRepository<Client, S>;

/// Canonical in-memory collection for one entity type, bound to a blob key.
#[derive(Debug)]
pub struct EntityRepository<T, S> {
    store: S,
    key: String,
    records: Vec<T>,
    criteria: SearchCriteria,
    view: Vec<T>,
    selection: Selection,
    subscribers: Subscribers,
}

impl<T, S> EntityRepository<T, S>
where
    T: Entity + Searchable,
    S: BlobStore,
{
    /// Loads the collection stored at `key`, falling back to `seed`.
    ///
    /// A missing blob, a read failure, or a blob that does not decode as a
    /// collection of `T` all count as "absent". Never fails.
    pub fn load(store: S, key: impl Into<String>, seed: impl FnOnce() -> Vec<T>) -> Self {
        let key = key.into();
        let records = match store.get(&key) {
            Ok(Some(text)) => match decode_collection::<T>(&text) {
                Ok(records) => {
                    info!(
                        "event=repo_load module=repo status=ok kind={} key={} count={}",
                        T::KIND,
                        key,
                        records.len()
                    );
                    records
                }
                Err(err) => {
                    warn!(
                        "event=repo_load module=repo status=fallback kind={} key={} reason=invalid_blob error={}",
                        T::KIND, key, err
                    );
                    seed()
                }
            },
            Ok(None) => {
                info!(
                    "event=repo_load module=repo status=fallback kind={} key={} reason=missing_blob",
                    T::KIND,
                    key
                );
                seed()
            }
            Err(err) => {
                error!(
                    "event=repo_load module=repo status=fallback kind={} key={} reason=read_failed error={}",
                    T::KIND, key, err
                );
                seed()
            }
        };
        Self::with_records(store, key, records)
    }

    /// Wraps an already known collection without touching storage.
    pub fn with_records(store: S, key: impl Into<String>, records: Vec<T>) -> Self {
        let view = records.clone();
        Self {
            store,
            key: key.into(),
            records,
            criteria: SearchCriteria::default(),
            view,
            selection: Selection::default(),
            subscribers: Subscribers::default(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Full, unfiltered collection in insertion order.
    pub fn all(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records matching the current criteria, in collection order.
    pub fn filtered(&self) -> &[T] {
        &self.view
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    pub fn search_term(&self) -> &str {
        &self.criteria.term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.criteria.term = term.into();
        self.refresh_view();
        self.publish(RepositoryEvent::ViewChanged { kind: T::KIND });
    }

    /// Creates a record from a draft under a fresh id.
    pub fn add(&mut self, draft: T::Draft) -> T {
        let entity = T::from_draft(new_entity_id(), draft);
        self.records.push(entity.clone());
        self.commit(RepositoryEvent::Added {
            kind: T::KIND,
            id: entity.id().to_string(),
        });
        entity
    }

    /// Replaces the record carrying `entity.id()` wholesale.
    ///
    /// Returns `false`, and changes nothing, when no such record exists.
    pub fn update(&mut self, entity: T) -> bool {
        let id = entity.id().to_string();
        match self.records.iter_mut().find(|record| record.id() == id) {
            Some(slot) => *slot = entity,
            None => {
                debug!(
                    "event=repo_update module=repo status=skipped kind={} id={} reason=not_found",
                    T::KIND,
                    id
                );
                return false;
            }
        }
        self.commit(RepositoryEvent::Updated { kind: T::KIND, id });
        true
    }

    /// Removes a record and clears the selection if it pointed at it.
    ///
    /// Returns the removed record, or `None` when the id is unknown.
    pub fn delete(&mut self, id: &str) -> Option<T> {
        let Some(index) = self.records.iter().position(|record| record.id() == id) else {
            debug!(
                "event=repo_delete module=repo status=skipped kind={} id={} reason=not_found",
                T::KIND,
                id
            );
            return None;
        };
        let removed = self.records.remove(index);
        self.selection.forget(id);
        self.commit(RepositoryEvent::Deleted {
            kind: T::KIND,
            id: id.to_string(),
        });
        Some(removed)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Pretty JSON array of the full collection.
    pub fn export_to_text(&self) -> CodecResult<String> {
        encode_collection(&self.records)
    }

    /// Replaces the collection with the records decoded from `text`.
    ///
    /// On any decode error the collection, its persisted copy and the
    /// selection are left untouched.
    pub fn import_from_text(&mut self, text: &str) -> CodecResult<usize> {
        let records = decode_collection::<T>(text).map_err(|err| {
            warn!(
                "event=repo_import module=repo status=error kind={} error={}",
                T::KIND,
                err
            );
            err
        })?;
        let count = records.len();
        self.records = records;
        self.selection = Selection::default();
        self.commit(RepositoryEvent::Imported {
            kind: T::KIND,
            count,
        });
        Ok(count)
    }

    /// Currently selected record, resolved against the live collection.
    pub fn current(&self) -> Option<&T> {
        self.selection
            .current_id()
            .and_then(|id| self.get_by_id(id))
    }

    /// Selects a record by id, or clears the selection with `None`.
    ///
    /// Returns `false` and clears the selection when the id is unknown.
    pub fn set_current(&mut self, id: Option<&str>) -> bool {
        let known = id.filter(|id| self.get_by_id(id).is_some());
        self.selection.select(known.map(EntityId::from));
        known.is_some() || id.is_none()
    }

    pub fn is_edit_open(&self) -> bool {
        self.selection.is_edit_open()
    }

    pub fn set_edit_open(&mut self, open: bool) {
        self.selection.set_edit_open(open);
    }

    pub fn is_delete_open(&self) -> bool {
        self.selection.is_delete_open()
    }

    pub fn set_delete_open(&mut self, open: bool) {
        self.selection.set_delete_open(open);
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&RepositoryEvent) + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Applies `change` to one record in place and commits it as an update.
    fn modify(&mut self, id: &str, change: impl FnOnce(&mut T)) -> bool {
        match self.records.iter_mut().find(|record| record.id() == id) {
            Some(record) => change(record),
            None => return false,
        }
        self.commit(RepositoryEvent::Updated {
            kind: T::KIND,
            id: id.to_string(),
        });
        true
    }

    fn set_status_criteria(&mut self, status: StatusFilter) {
        self.criteria.status = status;
        self.refresh_view();
        self.publish(RepositoryEvent::ViewChanged { kind: T::KIND });
    }

    fn commit(&mut self, event: RepositoryEvent) {
        self.persist();
        self.refresh_view();
        debug!(
            "event=repo_{} module=repo status=ok kind={} count={}",
            event.action(),
            T::KIND,
            self.records.len()
        );
        self.publish(event);
    }

    fn persist(&self) -> bool {
        let written = encode_compact(&self.records)
            .map_err(|err| err.to_string())
            .and_then(|text| {
                self.store
                    .set(&self.key, &text)
                    .map_err(|err| err.to_string())
            });
        match written {
            Ok(()) => true,
            Err(err) => {
                error!(
                    "event=blob_write module=repo status=error kind={} key={} error={}",
                    T::KIND,
                    self.key,
                    err
                );
                false
            }
        }
    }

    fn refresh_view(&mut self) {
        self.view = filter_entities(&self.records, &self.criteria);
    }

    fn publish(&mut self, event: RepositoryEvent) {
        self.subscribers.publish(&event);
    }
}

impl<S: BlobStore> EntityRepository<Order, S> {
    pub fn status_filter(&self) -> StatusFilter {
        self.criteria.status
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.set_status_criteria(status);
    }

    /// Next sequential `ORD-<n>` over every order, not just the filtered ones.
    pub fn next_order_number(&self) -> String {
        next_order_number(self.records.iter().map(|order| order.number.as_str()))
    }

    /// Moves an order to another status column.
    pub fn set_status(&mut self, id: &str, status: OrderStatus) -> bool {
        self.modify(id, |order| order.status = status)
    }
}

impl<S: BlobStore> EntityRepository<Client, S> {
    pub fn increment_orders(&mut self, id: &str) -> bool {
        self.modify(id, Client::increment_orders)
    }

    /// Decrements the counter, stopping at 0.
    pub fn decrement_orders(&mut self, id: &str) -> bool {
        self.modify(id, Client::decrement_orders)
    }
}
