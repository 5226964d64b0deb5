//! The product/quantity form and its create-or-edit mode.

use shared::domain::{Item, ItemDraft, ItemId};

use crate::backend_bridge::commands::BackendCommand;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub name: String,
    pub quantity: String,
    editing: Option<ItemId>,
}

impl ItemForm {
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() {
            "Update Cloud"
        } else {
            "Send to Cloud"
        }
    }

    /// Loads `item` into the fields; the next submit updates it.
    pub fn begin_edit(&mut self, item: &Item) {
        self.name = item.name.clone();
        self.quantity = item.quantity.clone();
        self.editing = Some(item.id.clone());
    }

    /// Turns the fields into a create or update command, then clears them and
    /// leaves edit mode. Nothing happens while either field is empty.
    pub fn submit(&mut self) -> Option<BackendCommand> {
        let draft = ItemDraft::new(self.name.clone(), self.quantity.clone());
        if draft.has_empty_field() {
            return None;
        }

        let cmd = match self.editing.take() {
            Some(id) => BackendCommand::UpdateItem { id, draft },
            None => BackendCommand::CreateItem { draft },
        };
        self.name.clear();
        self.quantity.clear();
        Some(cmd)
    }
}
