//! Thin client for the hosted database's table-query REST dialect.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use shared::protocol::{
    OrderBy, Prefer, RowFilter, API_KEY_HEADER, ORDER_PARAM, PREFER_HEADER, SELECT_ALL,
    SELECT_PARAM,
};
use tracing::{debug, warn};
use url::Url;

use crate::{config::ClientConfig, error::ClientError};

const REST_PATH: &str = "rest/v1/";

#[derive(Clone)]
pub struct RestTableClient {
    http: Client,
    rest_url: Url,
    api_key: String,
}

impl RestTableClient {
    pub fn new(project_url: &str, api_key: impl Into<String>) -> Result<Self, ClientError> {
        let base = Url::parse(&format!("{}/", project_url.trim_end_matches('/')))?;
        Ok(Self {
            http: Client::new(),
            rest_url: base.join(REST_PATH)?,
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(&config.project_url, config.api_key.clone())
    }

    pub fn table_url(&self, table: &str) -> Result<Url, ClientError> {
        Ok(self.rest_url.join(table)?)
    }

    fn request(&self, method: Method, table: &str) -> Result<RequestBuilder, ClientError> {
        let mut request = self.http.request(method, self.table_url(table)?);
        if !self.api_key.is_empty() {
            request = request
                .header(API_KEY_HEADER, &self.api_key)
                .bearer_auth(&self.api_key);
        }
        Ok(request)
    }

    /// All columns of every row, sorted by `order`.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        order: &OrderBy,
    ) -> Result<Vec<T>, ClientError> {
        debug!(table, %order, "selecting rows");
        let response = self
            .request(Method::GET, table)?
            .query(&[
                (SELECT_PARAM, SELECT_ALL.to_string()),
                (ORDER_PARAM, order.to_string()),
            ])
            .send()
            .await?;
        let body = success_body(table, response).await?;
        serde_json::from_str(&body).map_err(ClientError::Decode)
    }

    pub async fn insert<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<(), ClientError> {
        debug!(table, rows = rows.len(), "inserting rows");
        let response = self
            .request(Method::POST, table)?
            .header(PREFER_HEADER, Prefer::ReturnMinimal.as_header_value())
            .json(rows)
            .send()
            .await?;
        success_body(table, response).await.map(drop)
    }

    pub async fn update<T: Serialize>(
        &self,
        table: &str,
        patch: &T,
        filter: &RowFilter,
    ) -> Result<(), ClientError> {
        debug!(table, filter = ?filter, "updating rows");
        let response = self
            .request(Method::PATCH, table)?
            .header(PREFER_HEADER, Prefer::ReturnMinimal.as_header_value())
            .query(&[filter.to_query_pair()])
            .json(patch)
            .send()
            .await?;
        success_body(table, response).await.map(drop)
    }

    pub async fn delete(&self, table: &str, filter: &RowFilter) -> Result<(), ClientError> {
        debug!(table, filter = ?filter, "deleting rows");
        let response = self
            .request(Method::DELETE, table)?
            .query(&[filter.to_query_pair()])
            .send()
            .await?;
        success_body(table, response).await.map(drop)
    }
}

async fn success_body(table: &str, response: Response) -> Result<String, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }
    let err = ClientError::from_response(status, &body);
    warn!(table, status = status.as_u16(), error = %err, "table request rejected");
    Err(err)
}

#[cfg(test)]
#[path = "tests/rest_tests.rs"]
mod tests;
