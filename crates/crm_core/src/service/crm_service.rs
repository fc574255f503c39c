//! CRM use-case service.
//!
//! # Responsibility
//! - Own the order and client repositories over one shared blob store.
//! - Validate submitted forms before they reach a repository.
//! - Keep each client's order counter in step with its orders.
//!
//! # Invariants
//! - Creating an order with an assigned customer increments that client once.
//! - Deleting an order decrements its client, never below 0.
//! - Updating an order, or importing a collection, never touches counters.
//! - Deleting a client does not cascade to its orders.

use crate::codec::CodecError;
use crate::config::StorageKeys;
use crate::model::client::{Client, ClientDraft};
use crate::model::order::{
    random_order_number, CustomerSnapshot, Order, OrderDraft, OrderNumbering, OrderStatus,
};
use crate::model::seed::{seed_clients, seed_orders};
use crate::model::validation::{Validate, ValidationError};
use crate::repo::entity_repo::{ClientRepository, OrderRepository};
use crate::store::BlobStore;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for CRM use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Submitted form failed boundary validation.
    Validation(ValidationError),
    /// Import text was rejected, or export failed to encode.
    Codec(CodecError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "validation failed: {err}"),
            Self::Codec(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Codec(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<CodecError> for ServiceError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

/// Facade over the two repositories.
#[derive(Debug)]
pub struct CrmService<S> {
    orders: OrderRepository<S>,
    clients: ClientRepository<S>,
}

impl<S: BlobStore + Clone> CrmService<S> {
    /// Loads both collections from `store`, falling back to the seed data.
    pub fn load(store: S, keys: &StorageKeys) -> Self {
        let orders = OrderRepository::load(store.clone(), keys.orders.as_str(), seed_orders);
        let clients = ClientRepository::load(store, keys.clients.as_str(), seed_clients);
        info!(
            "event=crm_load module=service status=ok orders={} clients={}",
            orders.len(),
            clients.len()
        );
        Self { orders, clients }
    }
}

impl<S: BlobStore> CrmService<S> {
    pub fn from_repositories(orders: OrderRepository<S>, clients: ClientRepository<S>) -> Self {
        Self { orders, clients }
    }

    pub fn orders(&self) -> &OrderRepository<S> {
        &self.orders
    }

    /// Mutable access for view state (criteria, selection, subscriptions).
    ///
    /// Creating or deleting orders through it bypasses the counter rule;
    /// use [`CrmService::create_order`] and [`CrmService::delete_order`].
    pub fn orders_mut(&mut self) -> &mut OrderRepository<S> {
        &mut self.orders
    }

    pub fn clients(&self) -> &ClientRepository<S> {
        &self.clients
    }

    pub fn clients_mut(&mut self) -> &mut ClientRepository<S> {
        &mut self.clients
    }

    /// Next sequential number across every order, ignoring the current view.
    pub fn next_order_number(&self) -> String {
        self.orders.next_order_number()
    }

    /// Blank order form with a generated number.
    pub fn new_order_draft(&self, numbering: OrderNumbering) -> OrderDraft {
        let number = match numbering {
            OrderNumbering::Sequential => self.next_order_number(),
            OrderNumbering::Random => random_order_number(),
        };
        OrderDraft::new(number)
    }

    /// Copies the client's contact fields into the draft.
    ///
    /// Returns `false` and leaves the draft alone when the client is unknown.
    pub fn assign_customer(&self, draft: &mut OrderDraft, client_id: &str) -> bool {
        match self.clients.get_by_id(client_id) {
            Some(client) => {
                draft.customer = CustomerSnapshot::from_client(client);
                true
            }
            None => {
                debug!(
                    "event=assign_customer module=service status=skipped client_id={} reason=not_found",
                    client_id
                );
                false
            }
        }
    }

    /// Validates and stores a new order, then bumps its client's counter.
    pub fn create_order(&mut self, draft: OrderDraft) -> ServiceResult<Order> {
        draft.validate()?;
        let order = self.orders.add(draft);
        let customer_id = order.customer.id.as_str();
        if !customer_id.is_empty() && !self.clients.increment_orders(customer_id) {
            warn!(
                "event=order_create module=service status=warn order_id={} client_id={} reason=client_not_found",
                order.id, customer_id
            );
        }
        info!(
            "event=order_create module=service status=ok order_id={} number={} total={}",
            order.id,
            order.number,
            order.total()
        );
        Ok(order)
    }

    /// Validates and replaces an order. Counters are left alone even if the
    /// customer changed.
    pub fn update_order(&mut self, order: Order) -> ServiceResult<bool> {
        order.validate()?;
        Ok(self.orders.update(order))
    }

    /// Removes an order and decrements the counter of the client it names.
    pub fn delete_order(&mut self, id: &str) -> Option<Order> {
        let removed = self.orders.delete(id)?;
        let customer_id = removed.customer.id.as_str();
        if !customer_id.is_empty() {
            self.clients.decrement_orders(customer_id);
        }
        info!(
            "event=order_delete module=service status=ok order_id={} client_id={}",
            removed.id, customer_id
        );
        Some(removed)
    }

    /// Board move: same order, new status column.
    pub fn move_order(&mut self, id: &str, status: OrderStatus) -> bool {
        self.orders.set_status(id, status)
    }

    pub fn create_client(&mut self, draft: ClientDraft) -> ServiceResult<Client> {
        draft.validate()?;
        let client = self.clients.add(draft);
        info!(
            "event=client_create module=service status=ok client_id={}",
            client.id
        );
        Ok(client)
    }

    pub fn update_client(&mut self, client: Client) -> ServiceResult<bool> {
        client.validate()?;
        Ok(self.clients.update(client))
    }

    /// Removes a client. Orders keep their customer snapshot.
    pub fn delete_client(&mut self, id: &str) -> Option<Client> {
        self.clients.delete(id)
    }

    pub fn export_orders(&self) -> ServiceResult<String> {
        Ok(self.orders.export_to_text()?)
    }

    pub fn export_clients(&self) -> ServiceResult<String> {
        Ok(self.clients.export_to_text()?)
    }

    /// Replaces all orders. Client counters are taken as-is.
    pub fn import_orders(&mut self, text: &str) -> ServiceResult<usize> {
        Ok(self.orders.import_from_text(text)?)
    }

    pub fn import_clients(&mut self, text: &str) -> ServiceResult<usize> {
        Ok(self.clients.import_from_text(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::order::{OrderItem, OrderItems};
    use crate::store::MemoryBlobStore;

    fn service(store: &MemoryBlobStore) -> CrmService<&MemoryBlobStore> {
        CrmService::load(store, &StorageKeys::default())
    }

    fn counter(service: &CrmService<&MemoryBlobStore>, client_id: &str) -> u32 {
        service.clients().get_by_id(client_id).unwrap().orders
    }

    #[test]
    fn sequential_draft_continues_after_seed_orders() {
        let store = MemoryBlobStore::new();
        let service = service(&store);
        let draft = service.new_order_draft(OrderNumbering::Sequential);
        assert_eq!(draft.number, "ORD-006");
        assert_eq!(draft.status, OrderStatus::New);
        assert_eq!(draft.items.len(), 1);
        assert!(!draft.customer.is_assigned());
    }

    #[test]
    fn random_draft_number_is_three_digits() {
        let store = MemoryBlobStore::new();
        let draft = service(&store).new_order_draft(OrderNumbering::Random);
        let digits = draft.number.strip_prefix("ORD-").unwrap();
        let n: u32 = digits.parse().unwrap();
        assert!((100..=999).contains(&n));
    }

    #[test]
    fn assign_customer_copies_contact_fields() {
        let store = MemoryBlobStore::new();
        let service = service(&store);
        let mut draft = service.new_order_draft(OrderNumbering::Sequential);

        assert!(!service.assign_customer(&mut draft, "missing"));
        assert!(!draft.customer.is_assigned());

        assert!(service.assign_customer(&mut draft, "seed-client-elena"));
        assert_eq!(draft.customer.id, "seed-client-elena");
        assert_eq!(draft.customer.email, "elena@example.com");
    }

    #[test]
    fn create_then_delete_keeps_counter_in_step() {
        let store = MemoryBlobStore::new();
        let mut service = service(&store);
        let before = counter(&service, "seed-client-ivan");

        let mut draft = service.new_order_draft(OrderNumbering::Sequential);
        service.assign_customer(&mut draft, "seed-client-ivan");
        draft.items = OrderItems::new(OrderItem::new("CRM setup", 1, 40_000));
        let order = service.create_order(draft).unwrap();
        assert_eq!(counter(&service, "seed-client-ivan"), before + 1);

        let edited = order.with_status(OrderStatus::Processing);
        assert!(service.update_order(edited).unwrap());
        assert_eq!(counter(&service, "seed-client-ivan"), before + 1);

        service.delete_order(&order.id).unwrap();
        assert_eq!(counter(&service, "seed-client-ivan"), before);
    }

    #[test]
    fn invalid_forms_are_rejected_without_side_effects() {
        let store = MemoryBlobStore::new();
        let mut service = service(&store);
        let orders_before = service.orders().len();

        let draft = service.new_order_draft(OrderNumbering::Sequential);
        let err = service.create_order(draft).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::CustomerNotSelected)
        ));
        assert_eq!(service.orders().len(), orders_before);

        let err = service
            .create_client(ClientDraft::new("No Phone", "np@example.com", " "))
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::MissingField("phone"))
        ));
    }

    #[test]
    fn bad_import_surfaces_as_codec_error() {
        let store = MemoryBlobStore::new();
        let mut service = service(&store);
        let err = service.import_orders("{not an array}").unwrap_err();
        match err {
            ServiceError::Codec(codec) => assert!(codec.is_invalid_format()),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(service.orders().len(), seed_orders().len());
    }
}
