//! Table operations behind the REST routes. Handlers in `main.rs` translate
//! HTTP into these calls and `ApiError` codes back into status codes.

use serde::Deserialize;
use shared::{
    domain::{Item, ItemDraft, ItemPatch, ID_COLUMN},
    error::{ApiError, ApiException, ErrorCode},
    protocol::{OrderBy, RowFilter, ORDER_PARAM, SELECT_ALL, SELECT_PARAM},
};
use storage::{ItemColumn, Storage};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
    pub table_name: String,
}

/// Parsed query string of a table request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableQuery {
    pub order: Option<OrderBy>,
    pub filters: Vec<RowFilter>,
}

/// Insert bodies may be a single object or an array of objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InsertBody {
    Many(Vec<ItemDraft>),
    One(ItemDraft),
}

impl InsertBody {
    pub fn into_drafts(self) -> Vec<ItemDraft> {
        match self {
            InsertBody::Many(drafts) => drafts,
            InsertBody::One(draft) => vec![draft],
        }
    }
}

pub fn table_route() -> &'static str {
    "/rest/v1/:table"
}

pub fn parse_table_query(params: &[(String, String)]) -> Result<TableQuery, ApiException> {
    let mut query = TableQuery::default();
    for (key, value) in params {
        match key.as_str() {
            SELECT_PARAM => {
                if value.trim() != SELECT_ALL {
                    return Err(ApiException::validation(format!(
                        "unsupported select list '{value}'; only '{SELECT_ALL}' is available"
                    )));
                }
            }
            ORDER_PARAM => {
                if query.order.is_some() {
                    return Err(ApiException::validation("only one order clause is supported"));
                }
                query.order = Some(OrderBy::parse(value)?);
            }
            column => query.filters.push(RowFilter::parse(column, value)?),
        }
    }
    Ok(query)
}

pub fn ensure_table(ctx: &ApiContext, table: &str) -> Result<(), ApiError> {
    if table == ctx.table_name {
        return Ok(());
    }
    Err(ApiError::new(
        ErrorCode::NotFound,
        format!("Could not find the table '{table}'"),
    )
    .with_hint(format!("this service exposes '{}'", ctx.table_name)))
}

pub async fn select_rows(ctx: &ApiContext, query: &TableQuery) -> Result<Vec<Item>, ApiError> {
    if let Some(filter) = query.filters.first() {
        return Err(ApiError::new(
            ErrorCode::Validation,
            format!("filtering on '{}' is not supported for reads", filter.column()),
        ));
    }
    let order = query.order.clone().unwrap_or_else(OrderBy::newest_first);
    let column = ItemColumn::from_wire(&order.column).ok_or_else(|| unknown_column(&order.column))?;
    ctx.storage
        .list_items(column, order.direction)
        .await
        .map_err(internal)
}

pub async fn insert_rows(ctx: &ApiContext, drafts: &[ItemDraft]) -> Result<Vec<Item>, ApiError> {
    if drafts.is_empty() {
        return Ok(Vec::new());
    }
    ctx.storage.insert_items(drafts).await.map_err(internal)
}

pub async fn update_rows(
    ctx: &ApiContext,
    query: &TableQuery,
    patch: &ItemPatch,
) -> Result<Vec<Item>, ApiError> {
    let id = required_id_filter(query)?;
    if patch.is_empty() {
        return Err(ApiError::new(
            ErrorCode::Validation,
            "update body names no columns",
        ));
    }
    let updated = ctx.storage.update_item(id, patch).await.map_err(internal)?;
    Ok(updated.into_iter().collect())
}

pub async fn delete_rows(ctx: &ApiContext, query: &TableQuery) -> Result<Vec<Item>, ApiError> {
    let id = required_id_filter(query)?;
    let deleted = ctx.storage.delete_item(id).await.map_err(internal)?;
    Ok(deleted.into_iter().collect())
}

/// Rows here are keyed by an integer identity column.
fn required_id_filter(query: &TableQuery) -> Result<i64, ApiError> {
    if query.order.is_some() {
        return Err(ApiError::new(
            ErrorCode::Validation,
            "order is only supported for reads",
        ));
    }
    match query.filters.as_slice() {
        [RowFilter::Eq { column, value }] if column == ID_COLUMN => value
            .parse::<i64>()
            .map_err(|_| {
                ApiError::new(
                    ErrorCode::Validation,
                    format!("invalid identifier '{value}'"),
                )
            }),
        [] => Err(ApiError::new(
            ErrorCode::Validation,
            "a filter is required for updates and deletes",
        )
        .with_hint(format!("add '{ID_COLUMN}=eq.<id>' to the query"))),
        [RowFilter::Eq { column, .. }] => Err(unknown_column(column)),
        _ => Err(ApiError::new(
            ErrorCode::Validation,
            "only a single identifier filter is supported",
        )),
    }
}

fn unknown_column(column: &str) -> ApiError {
    ApiError::new(
        ErrorCode::Validation,
        format!("column '{column}' cannot be used here"),
    )
}

fn internal(err: anyhow::Error) -> ApiError {
    tracing::error!(error = %err, "table storage failure");
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
