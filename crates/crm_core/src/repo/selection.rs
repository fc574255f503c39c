//! Ephemeral view state: which record is current and which dialogs are open.
//!
//! Never persisted. The current record is tracked by id and resolved against
//! the live collection, so it always reflects the latest stored version.

use crate::model::entity::EntityId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    current_id: Option<EntityId>,
    edit_open: bool,
    delete_open: bool,
}

impl Selection {
    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    pub fn select(&mut self, id: Option<EntityId>) {
        self.current_id = id;
    }

    /// Clears the current record when it is `id`. Returns whether it did.
    pub fn forget(&mut self, id: &str) -> bool {
        if self.current_id.as_deref() == Some(id) {
            self.current_id = None;
            return true;
        }
        false
    }

    pub fn is_edit_open(&self) -> bool {
        self.edit_open
    }

    pub fn set_edit_open(&mut self, open: bool) {
        self.edit_open = open;
    }

    pub fn is_delete_open(&self) -> bool {
        self.delete_open
    }

    pub fn set_delete_open(&mut self, open: bool) {
        self.delete_open = open;
    }
}
