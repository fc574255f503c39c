//! Publish-on-mutation notifications for views bound to a repository.
//!
//! Listeners run synchronously, in subscription order, after the mutation is
//! applied, persisted and the filtered view is recomputed.

use crate::model::entity::EntityId;
use std::fmt::{Debug, Formatter};

/// Change notification emitted by an entity repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryEvent {
    Added { kind: &'static str, id: EntityId },
    Updated { kind: &'static str, id: EntityId },
    Deleted { kind: &'static str, id: EntityId },
    /// The whole collection was replaced by an import.
    Imported { kind: &'static str, count: usize },
    /// Search or status criteria changed; only the filtered view moved.
    ViewChanged { kind: &'static str },
}

impl RepositoryEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Added { kind, .. }
            | Self::Updated { kind, .. }
            | Self::Deleted { kind, .. }
            | Self::Imported { kind, .. }
            | Self::ViewChanged { kind } => kind,
        }
    }

    /// Record id for single-record events.
    pub fn entity_id(&self) -> Option<&str> {
        match self {
            Self::Added { id, .. } | Self::Updated { id, .. } | Self::Deleted { id, .. } => {
                Some(id)
            }
            Self::Imported { .. } | Self::ViewChanged { .. } => None,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Self::Added { .. } => "added",
            Self::Updated { .. } => "updated",
            Self::Deleted { .. } => "deleted",
            Self::Imported { .. } => "imported",
            Self::ViewChanged { .. } => "view_changed",
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&RepositoryEvent)>;

/// Ordered listener list.
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Subscribers {
    pub fn subscribe(&mut self, listener: impl FnMut(&RepositoryEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns whether a listener was removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(current, _)| *current != id);
        before != self.listeners.len()
    }

    /// Delivers the event to every listener and returns how many got it.
    pub fn publish(&mut self, event: &RepositoryEvent) -> usize {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
        self.listeners.len()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl Debug for Subscribers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn publish_reaches_listeners_until_unsubscribed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut subscribers = Subscribers::default();
        let sink = Rc::clone(&seen);
        let id = subscribers.subscribe(move |event| sink.borrow_mut().push(event.action()));

        let event = RepositoryEvent::Deleted {
            kind: "order",
            id: "o1".to_string(),
        };
        assert_eq!(subscribers.publish(&event), 1);
        assert!(subscribers.unsubscribe(id));
        assert_eq!(subscribers.publish(&event), 0);
        assert!(!subscribers.unsubscribe(id));

        assert_eq!(*seen.borrow(), vec!["deleted"]);
        assert_eq!(event.entity_id(), Some("o1"));
        assert_eq!(event.kind(), "order");
    }
}
