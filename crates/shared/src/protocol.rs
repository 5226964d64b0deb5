//! Table-query protocol primitives shared by the REST client and the local
//! table service: `select`, `order`, `<column>=eq.<value>` filters and the
//! `Prefer` header.

use std::fmt;

use crate::{
    domain::{ItemId, ID_COLUMN},
    error::ApiException,
};

pub const SELECT_ALL: &str = "*";
pub const SELECT_PARAM: &str = "select";
pub const ORDER_PARAM: &str = "order";
pub const PREFER_HEADER: &str = "Prefer";
pub const API_KEY_HEADER: &str = "apikey";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefer {
    ReturnMinimal,
    ReturnRepresentation,
}

impl Prefer {
    pub fn as_header_value(self) -> &'static str {
        match self {
            Prefer::ReturnMinimal => "return=minimal",
            Prefer::ReturnRepresentation => "return=representation",
        }
    }

    /// Reads a `Prefer` header value; anything unrecognised means minimal.
    pub fn from_header_value(value: &str) -> Self {
        let wants_rows = value
            .split(',')
            .map(str::trim)
            .any(|part| part.eq_ignore_ascii_case("return=representation"));
        if wants_rows {
            Prefer::ReturnRepresentation
        } else {
            Prefer::ReturnMinimal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn suffix(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    /// `id.desc`: the most recently inserted rows first.
    pub fn newest_first() -> Self {
        Self::new(ID_COLUMN, SortDirection::Descending)
    }

    pub fn parse(raw: &str) -> Result<Self, ApiException> {
        let mut parts = raw.trim().split('.');
        let column = parts.next().unwrap_or_default();
        if column.is_empty() {
            return Err(ApiException::validation(format!(
                "invalid order clause '{raw}': missing column"
            )));
        }
        let direction = match parts.next() {
            None | Some("asc") => SortDirection::Ascending,
            Some("desc") => SortDirection::Descending,
            Some(other) => {
                return Err(ApiException::validation(format!(
                    "invalid order direction '{other}' in '{raw}'"
                )))
            }
        };
        if let Some(extra) = parts.next() {
            return Err(ApiException::validation(format!(
                "unsupported order modifier '{extra}' in '{raw}'"
            )));
        }
        Ok(Self::new(column, direction))
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.column, self.direction.suffix())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFilter {
    Eq { column: String, value: String },
}

impl RowFilter {
    pub fn eq(column: impl Into<String>, value: impl ToString) -> Self {
        RowFilter::Eq {
            column: column.into(),
            value: value.to_string(),
        }
    }

    pub fn id_eq(id: &ItemId) -> Self {
        Self::eq(ID_COLUMN, id)
    }

    pub fn to_query_pair(&self) -> (String, String) {
        match self {
            RowFilter::Eq { column, value } => (column.clone(), format!("eq.{value}")),
        }
    }

    pub fn parse(column: &str, raw: &str) -> Result<Self, ApiException> {
        match raw.split_once('.') {
            Some(("eq", value)) => Ok(Self::eq(column, value)),
            Some((op, _)) => Err(ApiException::validation(format!(
                "unsupported filter operator '{op}' on column '{column}'"
            ))),
            None => Err(ApiException::validation(format!(
                "malformed filter '{raw}' on column '{column}'"
            ))),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            RowFilter::Eq { column, .. } => column,
        }
    }
}
