//! In-memory [`Store`] for tests.
//!
//! Tables keep items in insertion order and page through them with an
//! offset cursor. Query only honours the partition key equality; put only
//! understands `attribute_not_exists` conditions.

use crate::{Error, Result, common, store::Store};

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    operation::{
        batch_write_item::{BatchWriteItemInput, BatchWriteItemOutput},
        create_table::{CreateTableInput, CreateTableOutput},
        delete_table::{DeleteTableInput, DeleteTableOutput},
        get_item::{GetItemInput, GetItemOutput},
        put_item::{PutItemInput, PutItemOutput},
        query::{QueryInput, QueryOutput},
        scan::{ScanInput, ScanOutput},
    },
    types,
};
use std::{
    collections::{self, VecDeque},
    sync,
};

const OFFSET: &str = "__offset";

#[derive(Debug, Default)]
struct Table {
    key_names: Vec<String>,
    items: Vec<common::Item>,
}

impl Table {
    fn same_key(&self, left: &common::Item, right: &common::Item) -> bool {
        self.key_names
            .iter()
            .all(|name| left.get(name) == right.get(name))
    }

    fn upsert(&mut self, item: common::Item) {
        match self.items.iter().position(|known| self.same_key(known, &item)) {
            Some(index) => self.items[index] = item,
            None => self.items.push(item),
        }
    }
}

#[derive(Debug, Default)]
struct State {
    tables: collections::BTreeMap<String, Table>,
    page_size: Option<usize>,
    scripted_pages: VecDeque<(Vec<common::Item>, Option<common::Item>)>,
    endless_cursor: bool,
    unprocessed: VecDeque<usize>,
    fail_batch_call: Option<usize>,
    calls: usize,
    batch_sizes: Vec<usize>,
    scan_calls: Vec<ScanInput>,
    query_calls: Vec<QueryInput>,
}

impl State {
    fn table(&mut self, table_name: Option<&str>) -> Result<&mut Table> {
        table_name
            .and_then(|table_name| self.tables.get_mut(table_name))
            .ok_or_else(|| Error::ResourceNotFound("Requested resource not found".to_string()))
    }

    fn limit(&self, limit: Option<i32>) -> usize {
        let limit = limit.and_then(|limit| usize::try_from(limit).ok());
        match (limit, self.page_size) {
            (Some(limit), Some(page_size)) => limit.min(page_size),
            (Some(size), None) | (None, Some(size)) => size,
            (None, None) => usize::MAX,
        }
    }
}

fn offset(cursor: Option<&common::Item>) -> usize {
    match cursor.and_then(|cursor| cursor.get(OFFSET)) {
        Some(types::AttributeValue::N(offset)) => offset.parse().unwrap_or(0),
        _ => 0,
    }
}

fn cursor(offset: usize) -> common::Item {
    common::Item::from([(
        OFFSET.to_string(),
        types::AttributeValue::N(offset.to_string()),
    )])
}

fn page(
    items: Vec<common::Item>,
    start: Option<&common::Item>,
    limit: usize,
) -> (Vec<common::Item>, Option<common::Item>) {
    let start = offset(start).min(items.len());
    let end = start.saturating_add(limit).min(items.len());
    let next = (end < items.len()).then(|| cursor(end));
    (items[start..end].to_vec(), next)
}

/// Scriptable in-memory store.
#[derive(Debug, Default)]
pub(crate) struct StubStore {
    state: sync::Mutex<State>,
}

impl StubStore {
    fn state(&self) -> sync::MutexGuard<'_, State> {
        self.state.lock().expect("stub state poisoned")
    }

    /// Add an empty table keyed by `id`.
    pub(crate) fn add_table(&self, table_name: &str) {
        self.state().tables.insert(
            table_name.to_string(),
            Table {
                key_names: vec!["id".to_string()],
                items: Vec::new(),
            },
        );
    }

    /// Append an item without key checks.
    pub(crate) fn insert(&self, table_name: &str, item: common::Item) {
        self.state()
            .tables
            .entry(table_name.to_string())
            .or_default()
            .items
            .push(item);
    }

    pub(crate) fn items(&self, table_name: &str) -> Vec<common::Item> {
        self.state()
            .tables
            .get(table_name)
            .map(|table| table.items.clone())
            .unwrap_or_default()
    }

    pub(crate) fn tables(&self) -> Vec<String> {
        self.state().tables.keys().cloned().collect()
    }

    pub(crate) fn set_page_size(&self, page_size: usize) {
        self.state().page_size = Some(page_size);
    }

    /// Serve these scan pages, in order, before looking at any table.
    pub(crate) fn script_scan_pages(&self, pages: Vec<(Vec<common::Item>, Option<common::Item>)>) {
        self.state().scripted_pages = pages.into();
    }

    /// Make every scan and query page carry a cursor.
    pub(crate) fn endless_cursor(&self) {
        self.state().endless_cursor = true;
    }

    /// Report the trailing `n` entries of successive batch calls as unprocessed.
    pub(crate) fn script_unprocessed(&self, counts: Vec<usize>) {
        self.state().unprocessed = counts.into();
    }

    /// Fail the `call`-th batch write call (1-based) with a transport error.
    pub(crate) fn fail_batch_call(&self, call: usize) {
        self.state().fail_batch_call = Some(call);
    }

    pub(crate) fn call_count(&self) -> usize {
        self.state().calls
    }

    pub(crate) fn batch_sizes(&self) -> Vec<usize> {
        self.state().batch_sizes.clone()
    }

    pub(crate) fn scan_calls(&self) -> Vec<ScanInput> {
        self.state().scan_calls.clone()
    }

    pub(crate) fn query_calls(&self) -> Vec<QueryInput> {
        self.state().query_calls.clone()
    }
}

#[async_trait]
impl Store for StubStore {
    async fn create_table(&self, input: CreateTableInput) -> Result<CreateTableOutput> {
        let mut state = self.state();
        state.calls += 1;
        let table_name = input.table_name.unwrap_or_default();
        if state.tables.contains_key(&table_name) {
            return Err(Error::Conflict("Table already exists".to_string()));
        }
        let key_names = input
            .key_schema
            .unwrap_or_default()
            .into_iter()
            .map(|element| element.attribute_name)
            .collect();
        state.tables.insert(
            table_name,
            Table {
                key_names,
                items: Vec::new(),
            },
        );
        Ok(CreateTableOutput::builder().build())
    }

    async fn delete_table(&self, input: DeleteTableInput) -> Result<DeleteTableOutput> {
        let mut state = self.state();
        state.calls += 1;
        let table_name = input.table_name.unwrap_or_default();
        match state.tables.remove(&table_name) {
            Some(_) => Ok(DeleteTableOutput::builder().build()),
            None => Err(Error::ResourceNotFound(
                "Requested resource not found".to_string(),
            )),
        }
    }

    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput> {
        let mut state = self.state();
        state.calls += 1;
        let table = state.table(input.table_name.as_deref())?;
        let item = input.item.unwrap_or_default();
        let guarded = input
            .condition_expression
            .as_deref()
            .and_then(|expression| expression.strip_prefix("attribute_not_exists("))
            .and_then(|placeholder| placeholder.strip_suffix(')'))
            .and_then(|placeholder| {
                input
                    .expression_attribute_names
                    .as_ref()
                    .and_then(|names| names.get(placeholder))
            });
        if let Some(attribute) = guarded {
            let exists = table
                .items
                .iter()
                .any(|known| table.same_key(known, &item) && known.contains_key(attribute));
            if exists {
                return Err(Error::Conflict(
                    "The conditional request failed".to_string(),
                ));
            }
        }
        table.upsert(item);
        Ok(PutItemOutput::builder().build())
    }

    async fn batch_write_item(&self, input: BatchWriteItemInput) -> Result<BatchWriteItemOutput> {
        let mut state = self.state();
        state.calls += 1;
        let request_items = input.request_items.unwrap_or_default();
        let size = request_items.values().map(Vec::len).sum();
        state.batch_sizes.push(size);
        if state.fail_batch_call == Some(state.batch_sizes.len()) {
            return Err(Error::Transport("connection reset".to_string()));
        }
        let unprocessed_count = state.unprocessed.pop_front().unwrap_or(0);
        let mut unprocessed = collections::HashMap::new();
        for (table_name, mut requests) in request_items {
            let split = requests.len().saturating_sub(unprocessed_count);
            let pending = requests.split_off(split);
            let table = state.table(Some(&table_name))?;
            for request in requests {
                if let Some(put_request) = request.put_request {
                    table.upsert(put_request.item);
                }
            }
            if !pending.is_empty() {
                unprocessed.insert(table_name, pending);
            }
        }
        Ok(BatchWriteItemOutput::builder()
            .set_unprocessed_items(Some(unprocessed))
            .build())
    }

    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput> {
        let mut state = self.state();
        state.calls += 1;
        let table = state.table(input.table_name.as_deref())?;
        let key = input.key.unwrap_or_default();
        let item = table
            .items
            .iter()
            .find(|item| key.iter().all(|(name, value)| item.get(name) == Some(value)))
            .cloned();
        Ok(GetItemOutput::builder().set_item(item).build())
    }

    async fn query(&self, input: QueryInput) -> Result<QueryOutput> {
        let mut state = self.state();
        state.calls += 1;
        state.query_calls.push(input.clone());
        if state.endless_cursor {
            return Ok(QueryOutput::builder()
                .set_items(Some(Vec::new()))
                .set_last_evaluated_key(Some(cursor(0)))
                .build());
        }
        let limit = state.limit(input.limit);
        let table = state.table(input.table_name.as_deref())?;
        let name = input
            .expression_attribute_names
            .as_ref()
            .and_then(|names| names.get("#n0"));
        let value = input
            .expression_attribute_values
            .as_ref()
            .and_then(|values| values.get(":v0"));
        let matching: Vec<_> = table
            .items
            .iter()
            .filter(|item| match (name, value) {
                (Some(name), Some(value)) => item.get(name) == Some(value),
                _ => false,
            })
            .cloned()
            .collect();
        let (items, last_evaluated_key) = page(matching, input.exclusive_start_key.as_ref(), limit);
        let count = i32::try_from(items.len()).unwrap_or(i32::MAX);
        Ok(QueryOutput::builder()
            .count(count)
            .scanned_count(count)
            .set_items(Some(items))
            .set_last_evaluated_key(last_evaluated_key)
            .build())
    }

    async fn scan(&self, input: ScanInput) -> Result<ScanOutput> {
        let mut state = self.state();
        state.calls += 1;
        state.scan_calls.push(input.clone());
        let (items, last_evaluated_key) = if state.endless_cursor {
            (Vec::new(), Some(cursor(0)))
        } else if let Some(scripted) = state.scripted_pages.pop_front() {
            scripted
        } else {
            let limit = state.limit(input.limit);
            let table = state.table(input.table_name.as_deref())?;
            page(table.items.clone(), input.exclusive_start_key.as_ref(), limit)
        };
        let count = i32::try_from(items.len()).unwrap_or(i32::MAX);
        Ok(ScanOutput::builder()
            .count(count)
            .scanned_count(count)
            .set_items(Some(items))
            .set_last_evaluated_key(last_evaluated_key)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn item(id: usize) -> common::Item {
        common::Item::from([("id".to_string(), types::AttributeValue::N(id.to_string()))])
    }

    #[rstest]
    #[case::first_page(None, 2, vec![0, 1], Some(2))]
    #[case::middle_page(Some(cursor(2)), 2, vec![2, 3], Some(4))]
    #[case::last_page(Some(cursor(4)), 2, vec![4], None)]
    #[case::unbounded(None, usize::MAX, vec![0, 1, 2, 3, 4], None)]
    fn test_page(
        #[case] start: Option<common::Item>,
        #[case] limit: usize,
        #[case] expected: Vec<usize>,
        #[case] next: Option<usize>,
    ) {
        let items: Vec<_> = (0..5).map(item).collect();
        let (actual, actual_next) = page(items, start.as_ref(), limit);
        assert_eq!(actual, expected.into_iter().map(item).collect::<Vec<_>>());
        assert_eq!(actual_next, next.map(cursor));
    }
}
