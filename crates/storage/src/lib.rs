use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::{
    domain::{Item, ItemDraft, ItemId, ItemPatch, CREATED_AT_COLUMN, ID_COLUMN, NAME_COLUMN, QUANTITY_COLUMN},
    protocol::SortDirection,
};

const ITEM_COLUMNS: &str = "id, name, quantity, created_at";

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

/// Columns the table service can sort on, keyed by their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemColumn {
    Id,
    Name,
    Quantity,
    CreatedAt,
}

impl ItemColumn {
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            ID_COLUMN => Some(Self::Id),
            NAME_COLUMN => Some(Self::Name),
            QUANTITY_COLUMN => Some(Self::Quantity),
            CREATED_AT_COLUMN => Some(Self::CreatedAt),
            _ => None,
        }
    }

    fn sql_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Quantity => "quantity",
            Self::CreatedAt => "created_at",
        }
    }
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn list_items(&self, column: ItemColumn, direction: SortDirection) -> Result<Vec<Item>> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items ORDER BY {}",
            order_clause(column, direction)
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("failed to list inventory items")?;
        rows.iter().map(item_from_row).collect()
    }

    /// Inserts every draft in one transaction and returns the stored rows.
    pub async fn insert_items(&self, drafts: &[ItemDraft]) -> Result<Vec<Item>> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let row = sqlx::query(&format!(
                "INSERT INTO inventory_items (name, quantity, created_at) VALUES (?, ?, ?) RETURNING {ITEM_COLUMNS}"
            ))
            .bind(&draft.name)
            .bind(&draft.quantity)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .context("failed to insert inventory item")?;
            inserted.push(item_from_row(&row)?);
        }
        tx.commit().await?;
        tracing::debug!(count = inserted.len(), "inserted inventory items");
        Ok(inserted)
    }

    /// Writes the columns present in `patch`. `None` when no row carries `id`.
    pub async fn update_item(&self, id: i64, patch: &ItemPatch) -> Result<Option<Item>> {
        let row = sqlx::query(&format!(
            "UPDATE inventory_items SET name = COALESCE(?, name), quantity = COALESCE(?, quantity) \
             WHERE id = ? RETURNING {ITEM_COLUMNS}"
        ))
        .bind(patch.name.as_deref())
        .bind(patch.quantity.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to update inventory item {id}"))?;
        row.as_ref().map(item_from_row).transpose()
    }

    /// `None` when no row carries `id`.
    pub async fn delete_item(&self, id: i64) -> Result<Option<Item>> {
        let row = sqlx::query(&format!(
            "DELETE FROM inventory_items WHERE id = ? RETURNING {ITEM_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to delete inventory item {id}"))?;
        row.as_ref().map(item_from_row).transpose()
    }
}

/// Equal sort keys fall back to id order; sorting on id itself needs no tie-break.
fn order_clause(column: ItemColumn, direction: SortDirection) -> String {
    let direction = match direction {
        SortDirection::Ascending => "ASC",
        SortDirection::Descending => "DESC",
    };
    match column {
        ItemColumn::Id => format!("id {direction}"),
        other => format!("{} {direction}, id {direction}", other.sql_name()),
    }
}

fn item_from_row(row: &SqliteRow) -> Result<Item> {
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| anyhow!("invalid created_at column: {e}"))?;
    Ok(Item {
        id: ItemId::Int(row.try_get("id")?),
        name: row.try_get("name")?,
        quantity: row.try_get("quantity")?,
        created_at: Some(created_at),
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
