use crm_core::model::order::OrderItem;
use crm_core::{
    BlobStore, Client, ClientDraft, CrmService, MemoryBlobStore, OrderItems, OrderNumbering,
    OrderStatus, RepositoryEvent, ServiceError, StatusFilter, StorageKeys, ValidationError,
};
use std::cell::RefCell;
use std::rc::Rc;

const CLIENTS_KEY: &str = "web_studio_crm_clients";
const ORDERS_KEY: &str = "web_studio_crm_orders";

fn empty_store() -> MemoryBlobStore {
    let store = MemoryBlobStore::new();
    store.set(ORDERS_KEY, "[]").unwrap();
    store.set(CLIENTS_KEY, "[]").unwrap();
    store
}

fn stored_clients(store: &MemoryBlobStore) -> Vec<Client> {
    serde_json::from_str(&store.get(CLIENTS_KEY).unwrap().unwrap()).unwrap()
}

#[test]
fn order_counter_follows_create_update_and_delete() {
    let store = empty_store();
    let mut crm = CrmService::load(&store, &StorageKeys::default());
    let client = crm
        .create_client(ClientDraft::new("Ivan Petrov", "ivan@example.com", "+7 999 1"))
        .unwrap();
    assert_eq!(client.orders, 0);

    let mut draft = crm.new_order_draft(OrderNumbering::Sequential);
    assert_eq!(draft.number, "ORD-001");
    assert!(crm.assign_customer(&mut draft, &client.id));
    draft.items = OrderItems::new(OrderItem::new("Website development", 1, 100_000));
    let order = crm.create_order(draft).unwrap();
    assert_eq!(crm.clients().get_by_id(&client.id).unwrap().orders, 1);

    let mut edited = order.clone();
    edited.comments = Some("Deadline moved to Friday".to_string());
    assert!(crm.update_order(edited).unwrap());
    assert_eq!(crm.clients().get_by_id(&client.id).unwrap().orders, 1);
    assert_eq!(stored_clients(&store)[0].orders, 1);

    crm.delete_order(&order.id).unwrap();
    assert_eq!(crm.clients().get_by_id(&client.id).unwrap().orders, 0);
    assert_eq!(stored_clients(&store)[0].orders, 0);
}

#[test]
fn client_edits_never_rewrite_order_snapshots() {
    let store = MemoryBlobStore::new();
    let mut crm = CrmService::load(&store, &StorageKeys::default());

    let mut elena = crm.clients().get_by_id("seed-client-elena").unwrap().clone();
    elena.email = "elena@new-domain.com".to_string();
    assert!(crm.update_client(elena).unwrap());

    let order = crm.orders().get_by_id("seed-order-002").unwrap();
    assert_eq!(order.customer.email, "elena@example.com");

    crm.delete_client("seed-client-elena").unwrap();
    assert!(crm.orders().get_by_id("seed-order-002").is_some());
}

#[test]
fn update_client_validates_contact_fields() {
    let store = MemoryBlobStore::new();
    let mut crm = CrmService::load(&store, &StorageKeys::default());
    let mut maria = crm.clients().get_by_id("seed-client-maria").unwrap().clone();
    maria.email = "   ".to_string();

    let err = crm.update_client(maria).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::MissingField("email"))
    ));
    assert_eq!(
        crm.clients().get_by_id("seed-client-maria").unwrap().email,
        "maria@example.com"
    );
}

#[test]
fn malformed_import_keeps_memory_and_storage() {
    let store = MemoryBlobStore::new();
    let mut crm = CrmService::load(&store, &StorageKeys::default());
    crm.move_order("seed-order-003", OrderStatus::Processing);
    let persisted = store.get(ORDERS_KEY).unwrap();
    let in_memory = crm.orders().all().to_vec();

    let err = crm.import_orders("{not an array}").unwrap_err();
    assert!(matches!(err, ServiceError::Codec(ref codec) if codec.is_invalid_format()));
    assert_eq!(crm.orders().all(), in_memory.as_slice());
    assert_eq!(store.get(ORDERS_KEY).unwrap(), persisted);
}

#[test]
fn import_rejects_orders_without_items() {
    let store = MemoryBlobStore::new();
    let mut crm = CrmService::load(&store, &StorageKeys::default());
    let text = r#"[{
        "id": "o1", "number": "ORD-900", "date": "2024-01-10", "status": "new",
        "customer": {"id": "c1", "name": "A", "email": "a@x", "phone": "1"},
        "items": [], "total": 0
    }]"#;

    assert!(crm.import_orders(text).is_err());
    assert_eq!(crm.orders().len(), 5);
}

#[test]
fn deleting_current_order_clears_selection_and_filtered_view() {
    let store = MemoryBlobStore::new();
    let mut crm = CrmService::load(&store, &StorageKeys::default());
    let orders = crm.orders_mut();
    orders.set_status_filter(StatusFilter::Only(OrderStatus::New));
    assert!(orders.set_current(Some("seed-order-005")));
    orders.set_edit_open(true);
    assert_eq!(orders.filtered().len(), 2);

    crm.delete_order("seed-order-005").unwrap();

    let orders = crm.orders();
    assert!(orders.current().is_none());
    assert_eq!(orders.filtered().len(), 1);
    assert!(orders
        .filtered()
        .iter()
        .all(|order| order.id != "seed-order-005"));
    assert_eq!(
        crm.clients().get_by_id("seed-client-sergey").unwrap().orders,
        0
    );
}

#[test]
fn current_selection_reflects_latest_version() {
    let store = MemoryBlobStore::new();
    let mut crm = CrmService::load(&store, &StorageKeys::default());
    crm.orders_mut().set_current(Some("seed-order-001"));

    crm.move_order("seed-order-001", OrderStatus::Cancelled);

    let current = crm.orders().current().unwrap();
    assert_eq!(current.status, OrderStatus::Cancelled);
}

#[test]
fn views_are_notified_once_per_mutation() {
    let store = MemoryBlobStore::new();
    let mut crm = CrmService::load(&store, &StorageKeys::default());
    let seen = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&seen);
    crm.clients_mut()
        .subscribe(move |event| sink.borrow_mut().push(event.clone()));

    let mut draft = crm.new_order_draft(OrderNumbering::Sequential);
    crm.assign_customer(&mut draft, "seed-client-alexey");
    draft.items = OrderItems::new(OrderItem::new("Logo design", 1, 25_000));
    crm.create_order(draft).unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![RepositoryEvent::Updated {
            kind: "client",
            id: "seed-client-alexey".to_string(),
        }]
    );
}

#[test]
fn export_then_import_restores_the_same_collections() {
    let source = MemoryBlobStore::new();
    let crm = CrmService::load(&source, &StorageKeys::default());
    let orders_text = crm.export_orders().unwrap();
    let clients_text = crm.export_clients().unwrap();
    assert!(orders_text.contains("\"total\": 140000"));

    let target = empty_store();
    let mut restored = CrmService::load(&target, &StorageKeys::default());
    assert_eq!(restored.import_orders(&orders_text).unwrap(), 5);
    assert_eq!(restored.import_clients(&clients_text).unwrap(), 5);

    assert_eq!(restored.orders().all(), crm.orders().all());
    assert_eq!(restored.clients().all(), crm.clients().all());
    assert_eq!(restored.next_order_number(), "ORD-006");
}

#[test]
fn zero_quantity_line_is_stored_as_one_and_survives_reload() {
    let store = MemoryBlobStore::new();
    let mut crm = CrmService::load(&store, &StorageKeys::default());
    let mut draft = crm.new_order_draft(OrderNumbering::Sequential);
    crm.assign_customer(&mut draft, "seed-client-ivan");
    draft.items = OrderItems::new(OrderItem {
        id: "line-1".to_string(),
        name: "CRM setup".to_string(),
        quantity: 0,
        price: 40_000,
    });
    let order = crm.create_order(draft).unwrap();
    assert_eq!(order.total(), 40_000);

    let reloaded = CrmService::load(&store, &StorageKeys::default());
    assert_eq!(reloaded.orders().len(), 6);
    assert_eq!(reloaded.orders().get_by_id(&order.id), Some(&order));

    let exported = reloaded.export_orders().unwrap();
    let target = empty_store();
    let mut restored = CrmService::load(&target, &StorageKeys::default());
    assert_eq!(restored.import_orders(&exported).unwrap(), 6);
}
