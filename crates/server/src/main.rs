use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use shared::{
    domain::{Item, ItemPatch},
    error::{ApiError, ErrorCode},
    protocol::{Prefer, API_KEY_HEADER, PREFER_HEADER},
};
use storage::Storage;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::{
    delete_rows, ensure_table, insert_rows, parse_table_query, select_rows, table_route,
    update_rows, ApiContext, InsertBody, TableQuery,
};
use app_state::AppState;
use config::{load_settings, prepare_database_url};

const MAX_BODY_BYTES: usize = 64 * 1024;

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = AppState {
        api: ApiContext {
            storage,
            table_name: settings.table_name.clone(),
        },
        api_key: settings.api_key.clone(),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(
        %addr,
        table = %settings.table_name,
        api_key_required = settings.api_key.is_some(),
        "table service listening"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(
            table_route(),
            get(http_select)
                .post(http_insert)
                .patch(http_update)
                .delete(http_delete),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> ApiResult<&'static str> {
    state
        .api
        .storage
        .health_check()
        .await
        .map_err(|e| error_response(ApiError::new(ErrorCode::Internal, e.to_string())))?;
    Ok("ok")
}

async fn http_select(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Vec<Item>>> {
    let query = admit(&state, &headers, &table, &params)?;
    let rows = select_rows(&state.api, &query)
        .await
        .map_err(error_response)?;
    Ok(Json(rows))
}

async fn http_insert(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
    body: Bytes,
) -> ApiResult<Response> {
    let query = admit(&state, &headers, &table, &params)?;
    if query.order.is_some() || !query.filters.is_empty() {
        return Err(error_response(ApiError::new(
            ErrorCode::Validation,
            "inserts take no order or filter parameters",
        )));
    }
    let drafts = serde_json::from_slice::<InsertBody>(&body)
        .map_err(|e| invalid_body(&e))?
        .into_drafts();
    let rows = insert_rows(&state.api, &drafts)
        .await
        .map_err(error_response)?;
    info!(table = %table, count = rows.len(), "inserted rows");
    Ok(mutation_response(&headers, StatusCode::CREATED, rows))
}

async fn http_update(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
    body: Bytes,
) -> ApiResult<Response> {
    let query = admit(&state, &headers, &table, &params)?;
    let patch = serde_json::from_slice::<ItemPatch>(&body).map_err(|e| invalid_body(&e))?;
    let rows = update_rows(&state.api, &query, &patch)
        .await
        .map_err(error_response)?;
    info!(table = %table, count = rows.len(), "updated rows");
    Ok(mutation_response(&headers, StatusCode::OK, rows))
}

async fn http_delete(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let query = admit(&state, &headers, &table, &params)?;
    let rows = delete_rows(&state.api, &query)
        .await
        .map_err(error_response)?;
    info!(table = %table, count = rows.len(), "deleted rows");
    Ok(mutation_response(&headers, StatusCode::OK, rows))
}

/// Key check, table lookup and query parsing shared by every table route.
fn admit(
    state: &AppState,
    headers: &HeaderMap,
    table: &str,
    params: &[(String, String)],
) -> ApiResult<TableQuery> {
    if let Some(expected) = state.api_key.as_deref() {
        let presented = headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());
        if presented != Some(expected) {
            return Err(error_response(
                ApiError::new(ErrorCode::Unauthorized, "Invalid API key")
                    .with_hint("send the service key in the 'apikey' header"),
            ));
        }
    }
    ensure_table(&state.api, table).map_err(error_response)?;
    parse_table_query(params).map_err(|e| error_response(e.into()))
}

/// `return=minimal` answers with an empty body: 201 for inserts, 204 otherwise.
fn mutation_response(headers: &HeaderMap, representation_status: StatusCode, rows: Vec<Item>) -> Response {
    let prefer = headers
        .get(PREFER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(Prefer::from_header_value)
        .unwrap_or(Prefer::ReturnMinimal);

    match prefer {
        Prefer::ReturnRepresentation => (representation_status, Json(rows)).into_response(),
        Prefer::ReturnMinimal if representation_status == StatusCode::CREATED => {
            StatusCode::CREATED.into_response()
        }
        Prefer::ReturnMinimal => StatusCode::NO_CONTENT.into_response(),
    }
}

fn invalid_body(err: &serde_json::Error) -> (StatusCode, Json<ApiError>) {
    error_response(ApiError::new(
        ErrorCode::Validation,
        format!("invalid request body: {err}"),
    ))
}

fn error_response(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
