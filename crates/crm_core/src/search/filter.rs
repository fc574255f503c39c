//! In-memory filter engine behind list and board views.
//!
//! # Responsibility
//! - Compute the filtered view from (collection, search term, status filter).
//!
//! # Invariants
//! - Pure: same inputs, same output; no hidden state.
//! - Stable: output keeps collection order, nothing is re-sorted.
//! - Search is a case-insensitive substring match on the raw term; only the
//!   empty term matches all. Whitespace is part of the term.
//! - Search and status conditions are AND-combined.

use crate::model::client::Client;
use crate::model::order::{Order, OrderStatus};
use std::fmt::{Display, Formatter};

/// Status restriction for order views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    /// Parses `all` or a lowercase status name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "all" => Some(Self::All),
            other => OrderStatus::parse(other).map(Self::Only),
        }
    }

    pub fn matches(self, status: OrderStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == status,
        }
    }
}

impl Display for StatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => write!(f, "{status}"),
        }
    }
}

/// Current view criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub term: String,
    pub status: StatusFilter,
}

impl SearchCriteria {
    pub fn new(term: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            term: term.into(),
            status,
        }
    }

    /// Criteria that match every record.
    pub fn is_match_all(&self) -> bool {
        self.term.is_empty() && self.status == StatusFilter::All
    }
}

/// Records that can appear in a filtered view.
pub trait Searchable {
    /// `needle` is already lowercased and non-empty.
    fn matches_term(&self, needle: &str) -> bool;

    /// Entities without a status match every filter.
    fn matches_status(&self, _filter: StatusFilter) -> bool {
        true
    }
}

impl Searchable for Order {
    fn matches_term(&self, needle: &str) -> bool {
        contains_ci(&self.number, needle)
            || contains_ci(&self.customer.name, needle)
            || contains_ci(&self.customer.email, needle)
    }

    fn matches_status(&self, filter: StatusFilter) -> bool {
        filter.matches(self.status)
    }
}

impl Searchable for Client {
    fn matches_term(&self, needle: &str) -> bool {
        contains_ci(&self.name, needle)
            || contains_ci(&self.email, needle)
            || contains_ci(&self.phone, needle)
            || self
                .company
                .as_deref()
                .is_some_and(|company| contains_ci(company, needle))
    }
}

/// Returns the records matching `criteria`, in collection order.
pub fn filter_entities<T>(records: &[T], criteria: &SearchCriteria) -> Vec<T>
where
    T: Searchable + Clone,
{
    let needle = criteria.term.to_lowercase();
    records
        .iter()
        .filter(|record| needle.is_empty() || record.matches_term(&needle))
        .filter(|record| record.matches_status(criteria.status))
        .cloned()
        .collect()
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
