use crate::{Result, store::Store};

use async_trait::async_trait;
use aws_sdk_dynamodb::operation::{
    batch_write_item::{BatchWriteItemInput, BatchWriteItemOutput},
    create_table::{CreateTableInput, CreateTableOutput},
    delete_table::{DeleteTableInput, DeleteTableOutput},
    get_item::{GetItemInput, GetItemOutput},
    put_item::{PutItemInput, PutItemOutput},
    query::{QueryInput, QueryOutput},
    scan::{ScanInput, ScanOutput},
};
use std::collections;

/// Prefix joined to every logical table name.
pub const DEFAULT_TABLE_PREFIX: &str = "Dev.Inkspire..";

/// [`Store`] decorator that maps logical table names to physical ones.
///
/// Every operation sees `prefix + name`; table names the store hands back
/// in unprocessed batch entries are mapped back to logical names.
#[derive(Clone, Debug)]
pub struct Namespaced<S> {
    inner: S,
    prefix: String,
}

impl<S> Namespaced<S> {
    /// Wrap `inner`, prefixing table names with `prefix`.
    pub fn new(inner: S, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    /// The prefix applied to table names.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn physical(&self, table_name: Option<String>) -> Option<String> {
        table_name.map(|table_name| format!("{}{table_name}", self.prefix))
    }

    fn logical(&self, table_name: String) -> String {
        match table_name.strip_prefix(&self.prefix) {
            Some(logical) => logical.to_string(),
            None => table_name,
        }
    }
}

#[async_trait]
impl<S: Store> Store for Namespaced<S> {
    async fn create_table(&self, mut input: CreateTableInput) -> Result<CreateTableOutput> {
        input.table_name = self.physical(input.table_name);
        self.inner.create_table(input).await
    }

    async fn delete_table(&self, mut input: DeleteTableInput) -> Result<DeleteTableOutput> {
        input.table_name = self.physical(input.table_name);
        self.inner.delete_table(input).await
    }

    async fn put_item(&self, mut input: PutItemInput) -> Result<PutItemOutput> {
        input.table_name = self.physical(input.table_name);
        self.inner.put_item(input).await
    }

    async fn batch_write_item(
        &self,
        mut input: BatchWriteItemInput,
    ) -> Result<BatchWriteItemOutput> {
        input.request_items = input.request_items.map(|request_items| {
            request_items
                .into_iter()
                .map(|(table_name, requests)| (format!("{}{table_name}", self.prefix), requests))
                .collect()
        });
        let mut output = self.inner.batch_write_item(input).await?;
        output.unprocessed_items = output.unprocessed_items.map(|unprocessed| {
            unprocessed
                .into_iter()
                .map(|(table_name, requests)| (self.logical(table_name), requests))
                .collect::<collections::HashMap<_, _>>()
        });
        Ok(output)
    }

    async fn get_item(&self, mut input: GetItemInput) -> Result<GetItemOutput> {
        input.table_name = self.physical(input.table_name);
        self.inner.get_item(input).await
    }

    async fn query(&self, mut input: QueryInput) -> Result<QueryOutput> {
        input.table_name = self.physical(input.table_name);
        self.inner.query(input).await
    }

    async fn scan(&self, mut input: ScanInput) -> Result<ScanOutput> {
        input.table_name = self.physical(input.table_name);
        self.inner.scan(input).await
    }
}
