//! The store seam.
//!
//! Operations build SDK inputs and hand them to a [`Store`]; the store sends
//! them and maps failures to [`crate::Error`]. [`dynamodb::DynamoDbStore`]
//! talks to DynamoDB, [`namespace::Namespaced`] applies a table-name prefix
//! around any other store.

/// Store backed by the AWS SDK client.
pub mod dynamodb;

/// Table-name prefixing decorator.
pub mod namespace;

#[cfg(test)]
pub(crate) mod stub;

use crate::Result;

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

/// One request, one response: the operations the gateway sends to the store.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait Store: Send + Sync {
    /// Create a table.
    async fn create_table(&self, input: CreateTableInput) -> Result<CreateTableOutput>;

    /// Delete a table.
    async fn delete_table(&self, input: DeleteTableInput) -> Result<DeleteTableOutput>;

    /// Put a single item.
    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput>;

    /// Submit one batch of write requests.
    async fn batch_write_item(&self, input: BatchWriteItemInput) -> Result<BatchWriteItemOutput>;

    /// Look up a single item by key.
    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput>;

    /// Fetch one page of a query.
    async fn query(&self, input: QueryInput) -> Result<QueryOutput>;

    /// Fetch one page of a scan.
    async fn scan(&self, input: ScanInput) -> Result<ScanOutput>;
}
