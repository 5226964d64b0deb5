//! Backend commands queued from UI to backend worker.

use shared::domain::{ItemDraft, ItemId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    RefreshItems,
    CreateItem { draft: ItemDraft },
    UpdateItem { id: ItemId, draft: ItemDraft },
    DeleteItem { id: ItemId },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::RefreshItems => "refresh_items",
            BackendCommand::CreateItem { .. } => "create_item",
            BackendCommand::UpdateItem { .. } => "update_item",
            BackendCommand::DeleteItem { .. } => "delete_item",
        }
    }
}
