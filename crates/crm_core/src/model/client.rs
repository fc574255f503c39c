//! Client domain model.
//!
//! # Invariants
//! - `orders` starts at 0 and never goes below 0.
//! - Optional metadata is omitted from JSON when absent.

use crate::model::entity::{Entity, EntityId};
use serde::{Deserialize, Serialize};

/// Persisted client record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Number of orders currently placed by this client.
    #[serde(default)]
    pub orders: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Acquisition channel (referral, search ads, conference...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Client {
    pub fn increment_orders(&mut self) {
        self.orders = self.orders.saturating_add(1);
    }

    /// Decrements the counter, stopping at 0.
    pub fn decrement_orders(&mut self) {
        self.orders = self.orders.saturating_sub(1);
    }

    /// Editable copy for the client form. The counter is not part of it.
    pub fn to_draft(&self) -> ClientDraft {
        ClientDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            company: self.company.clone(),
            position: self.position.clone(),
            website: self.website.clone(),
            source: self.source.clone(),
        }
    }
}

impl Entity for Client {
    type Draft = ClientDraft;

    const KIND: &'static str = "client";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: EntityId, draft: ClientDraft) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            orders: 0,
            company: non_blank(draft.company),
            position: non_blank(draft.position),
            website: non_blank(draft.website),
            source: non_blank(draft.source),
        }
    }
}

/// Client form payload: the record minus id and order counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub website: Option<String>,
    pub source: Option<String>,
}

impl ClientDraft {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_client_starts_with_zero_orders_and_drops_blank_metadata() {
        let mut draft = ClientDraft::new("Ivan Petrov", "ivan@example.com", "+7 999 123-45-67");
        draft.company = Some("  ".to_string());
        draft.website = Some("innovate.ru".to_string());

        let client = Client::from_draft("c1".to_string(), draft);
        assert_eq!(client.orders, 0);
        assert_eq!(client.company, None);
        assert_eq!(client.website.as_deref(), Some("innovate.ru"));
    }

    #[test]
    fn counter_never_goes_negative() {
        let mut client = Client::from_draft("c1".to_string(), ClientDraft::default());
        client.decrement_orders();
        client.decrement_orders();
        assert_eq!(client.orders, 0);

        client.increment_orders();
        client.decrement_orders();
        client.decrement_orders();
        assert_eq!(client.orders, 0);
    }

    #[test]
    fn absent_metadata_is_omitted_from_json() {
        let client = Client::from_draft(
            "c1".to_string(),
            ClientDraft::new("Maria", "maria@example.com", "+7 999 888-99-99"),
        );
        let value = serde_json::to_value(&client).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("company"));
        assert!(!object.contains_key("source"));
        assert_eq!(object["orders"], 0);
    }
}
