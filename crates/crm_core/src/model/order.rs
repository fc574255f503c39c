//! Order domain model.
//!
//! # Responsibility
//! - Define orders, their line items and the embedded customer snapshot.
//! - Keep item-list edits and the derived total consistent.
//! - Generate display numbers (`ORD-<n>`).
//!
//! # Invariants
//! - [`OrderItems`] is never empty; removing the last item is a no-op.
//! - Item quantity is at least 1.
//! - `total` is computed from items on every read and written to JSON only
//!   for interchange; a `total` coming from JSON is ignored.
//! - `status` is one of four fixed values.

use crate::model::catalog::{find_service, CUSTOM_SERVICE};
use crate::model::client::Client;
use crate::model::entity::{new_entity_id, Entity, EntityId};
use chrono::{Local, NaiveDate};
use log::warn;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static ORDER_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ORD-(\d+)$").expect("valid order number regex"));

/// Order lifecycle state, also the board column an order sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    New,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Board column order.
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::New,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses the lowercase wire name. Anything else is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(Self::New),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer contact data frozen into an order when a client is picked.
///
/// Later edits to the client never reach orders that already carry a
/// snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    /// Client id at assignment time. Empty while no client is selected.
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl CustomerSnapshot {
    pub fn from_client(client: &Client) -> Self {
        Self {
            id: client.id.clone(),
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
        }
    }

    /// Whether the snapshot points at a client.
    pub fn is_assigned(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

/// One billable line of an order. Prices are integer minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: EntityId,
    pub name: String,
    pub quantity: u32,
    pub price: u64,
}

impl OrderItem {
    pub fn new(name: impl Into<String>, quantity: u32, price: u64) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            quantity: quantity.max(1),
            price,
        }
    }

    /// Empty line as offered by the order form: no name, quantity 1, price 0.
    pub fn blank() -> Self {
        Self::new("", 1, 0)
    }

    pub fn line_total(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }
}

/// Rejection reasons for an item list read from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemListError {
    Empty,
    ZeroQuantity { index: usize },
}

impl Display for ItemListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "order must contain at least one item"),
            Self::ZeroQuantity { index } => {
                write!(f, "order item #{index} has quantity 0; expected at least 1")
            }
        }
    }
}

impl Error for ItemListError {}

/// Non-empty, ordered list of order items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<OrderItem>", into = "Vec<OrderItem>")]
pub struct OrderItems(Vec<OrderItem>);

impl OrderItems {
    /// Quantities below 1 are raised to 1, as with every other item edit.
    pub fn new(first: OrderItem) -> Self {
        Self(vec![clamp_quantity(first)])
    }

    /// List holding a single [`OrderItem::blank`] line.
    pub fn single_blank() -> Self {
        Self::new(OrderItem::blank())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OrderItem> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[OrderItem] {
        &self.0
    }

    pub fn get(&self, item_id: &str) -> Option<&OrderItem> {
        self.0.iter().find(|item| item.id == item_id)
    }

    /// Sum of `price * quantity` over all lines.
    pub fn total(&self) -> u64 {
        self.0
            .iter()
            .fold(0u64, |sum, item| sum.saturating_add(item.line_total()))
    }

    /// Appends a line, raising a quantity of 0 to 1.
    pub fn push(&mut self, item: OrderItem) {
        self.0.push(clamp_quantity(item));
    }

    /// Appends a blank line and returns its id.
    pub fn push_blank(&mut self) -> EntityId {
        let item = OrderItem::blank();
        let id = item.id.clone();
        self.0.push(item);
        id
    }

    /// Removes one line. Refuses to remove the last remaining line.
    ///
    /// Returns whether a line was removed.
    pub fn remove(&mut self, item_id: &str) -> bool {
        if self.0.len() <= 1 {
            return false;
        }
        let before = self.0.len();
        self.0.retain(|item| item.id != item_id);
        before != self.0.len()
    }

    pub fn set_name(&mut self, item_id: &str, name: impl Into<String>) -> bool {
        self.with_item(item_id, |item| item.name = name.into())
    }

    /// Sets quantity, clamping values below 1 up to 1.
    pub fn set_quantity(&mut self, item_id: &str, quantity: u32) -> bool {
        self.with_item(item_id, |item| item.quantity = quantity.max(1))
    }

    pub fn set_price(&mut self, item_id: &str, price: u64) -> bool {
        self.with_item(item_id, |item| item.price = price)
    }

    /// Fills name and price from the studio catalog.
    ///
    /// `custom` clears both so the user can type their own line. Unknown
    /// service names leave the item untouched and return `false`.
    pub fn apply_service(&mut self, item_id: &str, service_name: &str) -> bool {
        if service_name == CUSTOM_SERVICE {
            return self.with_item(item_id, |item| {
                item.name.clear();
                item.price = 0;
            });
        }
        match find_service(service_name) {
            Some(service) => self.with_item(item_id, |item| {
                item.name = service.name.to_string();
                item.price = service.default_price;
            }),
            None => false,
        }
    }

    fn with_item(&mut self, item_id: &str, apply: impl FnOnce(&mut OrderItem)) -> bool {
        match self.0.iter_mut().find(|item| item.id == item_id) {
            Some(item) => {
                apply(item);
                true
            }
            None => false,
        }
    }
}

fn clamp_quantity(mut item: OrderItem) -> OrderItem {
    item.quantity = item.quantity.max(1);
    item
}

impl TryFrom<Vec<OrderItem>> for OrderItems {
    type Error = ItemListError;

    fn try_from(value: Vec<OrderItem>) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(ItemListError::Empty);
        }
        if let Some(index) = value.iter().position(|item| item.quantity == 0) {
            return Err(ItemListError::ZeroQuantity { index });
        }
        Ok(Self(value))
    }
}

impl From<OrderItems> for Vec<OrderItem> {
    fn from(value: OrderItems) -> Self {
        value.0
    }
}

impl<'a> IntoIterator for &'a OrderItems {
    type Item = &'a OrderItem;
    type IntoIter = std::slice::Iter<'a, OrderItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Persisted order record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OrderRecord", into = "OrderRecord")]
pub struct Order {
    pub id: EntityId,
    pub number: String,
    pub date: NaiveDate,
    pub status: OrderStatus,
    pub customer: CustomerSnapshot,
    pub items: OrderItems,
    pub comments: Option<String>,
}

impl Order {
    /// Derived order total.
    pub fn total(&self) -> u64 {
        self.items.total()
    }

    /// Copy of this order with a different status (board moves).
    pub fn with_status(&self, status: OrderStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Editable copy for the order form.
    pub fn to_draft(&self) -> OrderDraft {
        OrderDraft {
            number: self.number.clone(),
            date: self.date,
            status: self.status,
            customer: self.customer.clone(),
            items: self.items.clone(),
            comments: self.comments.clone(),
        }
    }
}

impl Entity for Order {
    type Draft = OrderDraft;

    const KIND: &'static str = "order";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: EntityId, draft: OrderDraft) -> Self {
        Self {
            id,
            number: draft.number,
            date: draft.date,
            status: draft.status,
            customer: draft.customer,
            items: draft.items,
            comments: draft.comments.filter(|value| !value.is_empty()),
        }
    }
}

/// Order form payload: everything except the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub number: String,
    pub date: NaiveDate,
    pub status: OrderStatus,
    pub customer: CustomerSnapshot,
    pub items: OrderItems,
    pub comments: Option<String>,
}

impl OrderDraft {
    /// Blank draft dated today with status `new` and one blank item.
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            date: today(),
            status: OrderStatus::New,
            customer: CustomerSnapshot::default(),
            items: OrderItems::single_blank(),
            comments: None,
        }
    }

    pub fn total(&self) -> u64 {
        self.items.total()
    }
}

/// JSON interchange shape with the explicit `total` key.
#[derive(Serialize, Deserialize)]
struct OrderRecord {
    id: EntityId,
    number: String,
    date: NaiveDate,
    status: OrderStatus,
    customer: CustomerSnapshot,
    items: OrderItems,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comments: Option<String>,
}

impl From<Order> for OrderRecord {
    fn from(order: Order) -> Self {
        let total = Some(order.total());
        Self {
            id: order.id,
            number: order.number,
            date: order.date,
            status: order.status,
            customer: order.customer,
            items: order.items,
            total,
            comments: order.comments,
        }
    }
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        let order = Self {
            id: record.id,
            number: record.number,
            date: record.date,
            status: record.status,
            customer: record.customer,
            items: record.items,
            comments: record.comments,
        };
        if let Some(stored) = record.total {
            if stored != order.total() {
                warn!(
                    "event=order_total_recomputed module=model status=ok order_id={} stored={} computed={}",
                    order.id,
                    stored,
                    order.total()
                );
            }
        }
        order
    }
}

/// How a new draft gets its display number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderNumbering {
    /// `ORD-<max suffix + 1>`, zero-padded to three digits.
    #[default]
    Sequential,
    /// `ORD-<random 100..=999>`.
    Random,
}

/// Next sequential number given every existing order number.
///
/// Numbers that do not match `ORD-<digits>` are ignored. Gaps left by
/// deleted orders are never refilled: the result is always above the
/// highest suffix seen.
pub fn next_order_number<'a, I>(existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let max_suffix = existing
        .into_iter()
        .filter_map(order_number_suffix)
        .max()
        .unwrap_or(0);
    format!("ORD-{:03}", max_suffix.saturating_add(1))
}

/// Random three-digit order number.
pub fn random_order_number() -> String {
    let n: u16 = rand::thread_rng().gen_range(100..=999);
    format!("ORD-{n}")
}

fn order_number_suffix(number: &str) -> Option<u64> {
    ORDER_NUMBER_RE
        .captures(number.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse::<u64>().ok())
}

/// Today's local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
