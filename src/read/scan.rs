use crate::{Result, common, read, store::Store};

use aws_sdk_dynamodb::{operation, types};
use serde::{Serialize, de::DeserializeOwned};

/// Scan operation.
///
/// Reads every page of the table, or of one parallel-scan segment, and
/// returns them as a single output.
///
/// ```rust,no_run
/// use dynamodb_gateway::{read, store};
/// use serde_json::Value;
///
/// # async fn example(store: &store::dynamodb::DynamoDbStore) -> dynamodb_gateway::Result<()> {
/// let scan: read::scan::Scan<Value> = read::scan::Scan {
///     multiple_read_args: read::common::MultipleReadArgs {
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// let users: Vec<dynamodb_gateway::common::Record> = scan.fetch(store).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scan<T> {
    /// Additional read operation arguments (table name, filter, projection, etc.).
    pub multiple_read_args: read::common::MultipleReadArgs<T>,
    /// Whether to return the consumed capacity information.
    pub return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    /// The segment number for parallel scans (0-indexed).
    pub segment: Option<i32>,
    /// The total number of segments for parallel scans.
    pub total_segments: Option<i32>,
}

impl<T: Serialize> TryFrom<Scan<T>> for operation::scan::ScanInput {
    type Error = crate::Error;

    fn try_from(scan: Scan<T>) -> Result<Self> {
        let multiple_read_operation = scan
            .multiple_read_args
            .into_input(common::ExpressionAttributes::default())?;
        let builder = Self::builder()
            .set_return_consumed_capacity(scan.return_consumed_capacity)
            .set_segment(scan.segment)
            .set_total_segments(scan.total_segments);
        let input = crate::apply_multiple_read_operation!(builder, multiple_read_operation).build()?;
        Ok(input)
    }
}

impl<T: Serialize> Scan<T> {
    /// Execute the scan, following the cursor until the table is exhausted.
    #[tracing::instrument(name = "dynamodb_gateway.scan", skip_all, err)]
    pub async fn send<S: Store + ?Sized>(self, store: &S) -> Result<operation::scan::ScanOutput> {
        let max_pages = self.multiple_read_args.max_pages()?;
        let input: operation::scan::ScanInput = self.try_into()?;
        crate::get_paginated_output!(store, scan, input, max_pages, operation::scan::ScanOutput)
    }

    /// Execute the scan and deserialize every item.
    pub async fn fetch<O, S>(self, store: &S) -> Result<Vec<O>>
    where
        O: DeserializeOwned,
        S: Store + ?Sized,
    {
        let output = self.send(store).await?;
        read::common::deserialize_items(output.items)
    }
}
