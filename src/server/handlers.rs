//! Request handlers: one store operation per endpoint.

use crate::{
    common::{self, condition, key, projection},
    read, server, table, write,
};

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections;

type HandlerResult<T> = Result<T, server::error::AppError>;

/// Body of `POST /tables/{table}/items`.
#[derive(Debug, Deserialize)]
pub struct PutItemRequest {
    /// The record to store.
    pub item: common::Record,
    /// Condition that must hold for the write to proceed.
    #[serde(default)]
    pub condition: Option<condition::Filter<Value>>,
}

/// Body of `POST /tables/{table}/items/batch`.
#[derive(Debug, Deserialize)]
pub struct BatchPutRequest {
    /// Records to store, in order.
    pub items: Vec<common::Record>,
}

/// Body of `POST /tables/{table}/items/get`.
#[derive(Debug, Deserialize)]
pub struct GetItemRequest {
    /// Primary key of the item.
    #[serde(flatten)]
    pub keys: key::Keys<Value>,
    /// Attributes to return; all of them when absent.
    #[serde(default)]
    pub projection: Option<projection::Projection>,
    /// Strongly consistent read.
    #[serde(default)]
    pub consistent_read: Option<bool>,
}

/// Body of `POST /tables/{table}/query`.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// Partition to read.
    pub partition_key: key::Key<Value>,
    /// Condition on the sort key.
    #[serde(default)]
    pub sort_key_condition: Option<condition::FieldCondition<Value>>,
    /// Filter applied to every page.
    #[serde(default)]
    pub filter: Option<condition::Filter<Value>>,
    /// Attributes to return; all of them when absent.
    #[serde(default)]
    pub projection: Option<projection::Projection>,
    /// Secondary index to read instead of the table.
    #[serde(default)]
    pub index_name: Option<String>,
    /// Page size.
    #[serde(default)]
    pub limit: Option<i32>,
    /// Strongly consistent read.
    #[serde(default)]
    pub consistent_read: Option<bool>,
    /// Ascending sort key order; descending when `false`.
    #[serde(default)]
    pub scan_index_forward: Option<bool>,
    /// Cursor to resume from.
    #[serde(default)]
    pub exclusive_start_key: Option<collections::HashMap<String, Value>>,
}

/// Body of `POST /tables/{table}/scan`; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScanRequest {
    /// Filter applied to every page.
    pub filter: Option<condition::Filter<Value>>,
    /// Attributes to return; all of them when absent.
    pub projection: Option<projection::Projection>,
    /// Secondary index to read instead of the table.
    pub index_name: Option<String>,
    /// Page size.
    pub limit: Option<i32>,
    /// Strongly consistent read.
    pub consistent_read: Option<bool>,
    /// Parallel-scan segment to read.
    pub segment: Option<i32>,
    /// Number of parallel-scan segments.
    pub total_segments: Option<i32>,
    /// Cursor to resume from.
    pub exclusive_start_key: Option<collections::HashMap<String, Value>>,
}

/// Items returned by a query or scan.
#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    /// Number of items returned.
    pub count: usize,
    /// Items in page-arrival order.
    pub items: Vec<common::Record>,
}

impl From<Vec<common::Record>> for ItemsResponse {
    fn from(items: Vec<common::Record>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /tables
pub async fn create_table(
    State(state): State<server::AppState>,
    payload: Result<Json<table::create_table::CreateTable>, JsonRejection>,
) -> HandlerResult<impl IntoResponse> {
    let Json(create_table) = payload?;
    let table_name = create_table.table_name.clone();
    create_table.send(state.store.as_ref()).await?;
    tracing::info!(table_name = %table_name, "created table");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "table_name": table_name })),
    ))
}

/// DELETE /tables/{table}
pub async fn delete_table(
    State(state): State<server::AppState>,
    Path(table_name): Path<String>,
) -> HandlerResult<StatusCode> {
    table::delete_table::DeleteTable {
        table_name: table_name.clone(),
    }
    .send(state.store.as_ref())
    .await?;
    tracing::info!(table_name = %table_name, "deleted table");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /tables/{table}/items
pub async fn put_item(
    State(state): State<server::AppState>,
    Path(table_name): Path<String>,
    payload: Result<Json<PutItemRequest>, JsonRejection>,
) -> HandlerResult<StatusCode> {
    let Json(request) = payload?;
    let item = Value::Object(request.item.into_iter().collect());
    write::put_item::PutItem {
        item,
        write_args: write::common::WriteArgs {
            condition: request.condition,
            table_name,
            ..Default::default()
        },
    }
    .send(state.store.as_ref())
    .await?;
    Ok(StatusCode::CREATED)
}

/// POST /tables/{table}/items/batch
pub async fn batch_put(
    State(state): State<server::AppState>,
    Path(table_name): Path<String>,
    payload: Result<Json<BatchPutRequest>, JsonRejection>,
) -> HandlerResult<Json<write::batch_write_item::BatchWriteSummary>> {
    let Json(request) = payload?;
    let summary = write::batch_write_item::BatchWriteItem {
        items: request.items,
        retry: state.retry.clone(),
        table_name,
        ..Default::default()
    }
    .send(state.store.as_ref())
    .await?;
    Ok(Json(summary))
}

/// POST /tables/{table}/items/get
pub async fn get_item(
    State(state): State<server::AppState>,
    Path(table_name): Path<String>,
    payload: Result<Json<GetItemRequest>, JsonRejection>,
) -> HandlerResult<Json<common::Record>> {
    let Json(request) = payload?;
    let item = read::get_item::GetItem {
        keys: request.keys,
        single_read_args: read::common::SingleReadArgs {
            consistent_read: request.consistent_read,
            projection: request.projection,
            table_name,
        },
        ..Default::default()
    }
    .fetch(state.store.as_ref())
    .await?;
    Ok(Json(item))
}

/// POST /tables/{table}/query
pub async fn query(
    State(state): State<server::AppState>,
    Path(table_name): Path<String>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> HandlerResult<Json<ItemsResponse>> {
    let Json(request) = payload?;
    let items: Vec<common::Record> = read::query::Query {
        multiple_read_args: read::common::MultipleReadArgs {
            consistent_read: request.consistent_read,
            exclusive_start_key: request.exclusive_start_key,
            filter: request.filter,
            index_name: request.index_name,
            limit: request.limit,
            max_pages: Some(state.max_pages),
            projection: request.projection,
            table_name,
            ..Default::default()
        },
        partition_key: request.partition_key,
        scan_index_forward: request.scan_index_forward,
        sort_key_condition: request.sort_key_condition,
        ..Default::default()
    }
    .fetch(state.store.as_ref())
    .await?;
    Ok(Json(items.into()))
}

/// POST /tables/{table}/scan
pub async fn scan(
    State(state): State<server::AppState>,
    Path(table_name): Path<String>,
    payload: Result<Option<Json<ScanRequest>>, JsonRejection>,
) -> HandlerResult<Json<ItemsResponse>> {
    let Json(request) = payload?.unwrap_or_default();
    let items: Vec<common::Record> = read::scan::Scan {
        multiple_read_args: read::common::MultipleReadArgs {
            consistent_read: request.consistent_read,
            exclusive_start_key: request.exclusive_start_key,
            filter: request.filter,
            index_name: request.index_name,
            limit: request.limit,
            max_pages: Some(state.max_pages),
            projection: request.projection,
            table_name,
            ..Default::default()
        },
        segment: request.segment,
        total_segments: request.total_segments,
        ..Default::default()
    }
    .fetch(state.store.as_ref())
    .await?;
    Ok(Json(items.into()))
}
