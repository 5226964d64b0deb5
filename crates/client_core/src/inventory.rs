use async_trait::async_trait;
use shared::{
    domain::{Item, ItemDraft, ItemId},
    protocol::{OrderBy, RowFilter},
};

use crate::{config::ClientConfig, error::ClientError, rest::RestTableClient};

/// The four remote operations the inventory screen is built on.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Every item, newest first.
    async fn list_items(&self) -> Result<Vec<Item>, ClientError>;
    async fn create_item(&self, draft: &ItemDraft) -> Result<(), ClientError>;
    async fn update_item(&self, id: &ItemId, draft: &ItemDraft) -> Result<(), ClientError>;
    async fn delete_item(&self, id: &ItemId) -> Result<(), ClientError>;
}

#[derive(Clone)]
pub struct RemoteInventory {
    client: RestTableClient,
    table: String,
}

impl RemoteInventory {
    pub fn new(client: RestTableClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::new(
            RestTableClient::from_config(config)?,
            config.table.clone(),
        ))
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl InventoryStore for RemoteInventory {
    async fn list_items(&self) -> Result<Vec<Item>, ClientError> {
        self.client
            .select(&self.table, &OrderBy::newest_first())
            .await
    }

    async fn create_item(&self, draft: &ItemDraft) -> Result<(), ClientError> {
        self.client
            .insert(&self.table, std::slice::from_ref(draft))
            .await
    }

    async fn update_item(&self, id: &ItemId, draft: &ItemDraft) -> Result<(), ClientError> {
        self.client
            .update(&self.table, draft, &RowFilter::id_eq(id))
            .await
    }

    async fn delete_item(&self, id: &ItemId) -> Result<(), ClientError> {
        self.client
            .delete(&self.table, &RowFilter::id_eq(id))
            .await
    }
}
