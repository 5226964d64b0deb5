use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned row identifier. Hosted tables may key rows by an identity
/// integer or by text such as a uuid; either way the client only echoes the
/// raw value back in `id=eq.<id>` filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Text(String),
}

impl ItemId {
    /// Reads an identifier typed by a user: integers stay integers, anything
    /// else is kept as text.
    pub fn parse(raw: &str) -> Self {
        raw.parse::<i64>()
            .map(ItemId::Int)
            .unwrap_or_else(|_| ItemId::Text(raw.to_string()))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ItemId::Int(id) => Some(*id),
            ItemId::Text(_) => None,
        }
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        ItemId::Int(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        ItemId::Text(id)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId::Text(id.to_string())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(id) => write!(f, "{id}"),
            ItemId::Text(id) => f.write_str(id),
        }
    }
}

pub const ID_COLUMN: &str = "id";
pub const NAME_COLUMN: &str = "nombre";
pub const QUANTITY_COLUMN: &str = "cantidad";
pub const CREATED_AT_COLUMN: &str = "created_at";

/// A row of the inventory table as the remote store returns it.
///
/// `quantity` is free text on the wire; nothing here treats it as a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "cantidad")]
    pub quantity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert and update payload. Carries no identifier; the store assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "cantidad")]
    pub quantity: String,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
        }
    }

    pub fn has_empty_field(&self) -> bool {
        self.name.is_empty() || self.quantity.is_empty()
    }
}

/// Body of a partial update: absent columns keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "cantidad", default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.quantity.is_none()
    }
}

impl From<ItemDraft> for ItemPatch {
    fn from(draft: ItemDraft) -> Self {
        Self {
            name: Some(draft.name),
            quantity: Some(draft.quantity),
        }
    }
}
