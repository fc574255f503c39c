//! Form-boundary validation.
//!
//! Repositories accept any structurally valid record; these checks run in the
//! service layer before a submitted form reaches a repository.

use crate::model::client::{Client, ClientDraft};
use crate::model::order::{CustomerSnapshot, Order, OrderDraft, OrderItems};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reason a submitted form was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required contact field is blank.
    MissingField(&'static str),
    /// The order has no client assigned.
    CustomerNotSelected,
    /// An item has no name, a zero quantity or a non-positive price.
    IncompleteItem { index: usize },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "required field `{field}` is empty"),
            Self::CustomerNotSelected => write!(f, "order has no client selected"),
            Self::IncompleteItem { index } => {
                write!(
                    f,
                    "order item #{index} needs a name, a quantity of at least 1 and a price above zero"
                )
            }
        }
    }
}

impl Error for ValidationError {}

/// Records that can be checked before submission.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for ClientDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require_contact(&self.name, &self.email, &self.phone)
    }
}

impl Validate for Client {
    fn validate(&self) -> Result<(), ValidationError> {
        require_contact(&self.name, &self.email, &self.phone)
    }
}

impl Validate for OrderDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require_order(&self.customer, &self.items)
    }
}

impl Validate for Order {
    fn validate(&self) -> Result<(), ValidationError> {
        require_order(&self.customer, &self.items)
    }
}

fn require_contact(name: &str, email: &str, phone: &str) -> Result<(), ValidationError> {
    for (field, value) in [("name", name), ("email", email), ("phone", phone)] {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField(field));
        }
    }
    Ok(())
}

fn require_order(customer: &CustomerSnapshot, items: &OrderItems) -> Result<(), ValidationError> {
    if !customer.is_assigned() {
        return Err(ValidationError::CustomerNotSelected);
    }
    match items
        .iter()
        .position(|item| item.name.trim().is_empty() || item.price == 0 || item.quantity == 0)
    {
        Some(index) => Err(ValidationError::IncompleteItem { index }),
        None => Ok(()),
    }
}
