use crate::{Error, Result, common, store::Store};

use aws_sdk_dynamodb::{operation, types};
use serde::Serialize;
use serde_dynamo::to_item;
use std::time;

/// Maximum number of requests in one batch write call.
pub const MAX_BATCH_SIZE: usize = 25;

/// Resubmission policy for entries the store reports as unprocessed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnprocessedRetry {
    /// Resubmissions allowed per batch before giving up.
    pub max_retries: usize,
    /// Delay before the first resubmission; doubled for each further one.
    pub base_delay: time::Duration,
}

impl Default for UnprocessedRetry {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: time::Duration::from_millis(50),
        }
    }
}

impl UnprocessedRetry {
    fn delay(&self, retry: usize) -> time::Duration {
        let factor = 2u32.saturating_pow(u32::try_from(retry).unwrap_or(u32::MAX));
        self.base_delay.saturating_mul(factor)
    }
}

/// Outcome of a completed batch write.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct BatchWriteSummary {
    /// Batches submitted, `ceil(items / MAX_BATCH_SIZE)`.
    pub batches: usize,
    /// Records written.
    pub items: usize,
    /// Entries resubmitted after being reported unprocessed.
    pub retried_entries: usize,
}

/// Batch put of an arbitrary number of records into one table.
///
/// Records are split, in order, into batches of [`MAX_BATCH_SIZE`] and the
/// batches are written one after the other. The first failing batch aborts
/// the operation with [`Error::BatchAborted`]; batches written before it
/// stay written.
///
/// ```rust,no_run
/// use dynamodb_gateway::{store, write};
/// use serde_json::json;
///
/// # async fn example(store: &store::dynamodb::DynamoDbStore) -> dynamodb_gateway::Result<()> {
/// let batch_write = write::batch_write_item::BatchWriteItem {
///     items: (0..60).map(|id| json!({"id": id})).collect(),
///     table_name: "users".to_string(),
///     ..Default::default()
/// };
/// let summary = batch_write.send(store).await?;
/// assert_eq!(summary.batches, 3);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchWriteItem<T> {
    /// Records to put, in submission order.
    pub items: Vec<T>,
    /// Resubmission policy for unprocessed entries.
    pub retry: UnprocessedRetry,
    /// Whether to return the consumed capacity information.
    pub return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    /// The name of the table to write to.
    pub table_name: String,
}

fn put_request<T: Serialize>(item: T) -> Result<types::WriteRequest> {
    let put_request = types::PutRequest::builder()
        .set_item(Some(to_item(item)?))
        .build()?;
    Ok(types::WriteRequest::builder()
        .put_request(put_request)
        .build())
}

impl<T: Serialize> BatchWriteItem<T> {
    /// Execute the batch write.
    #[tracing::instrument(name = "dynamodb_gateway.batch_write_item", skip_all, err)]
    pub async fn send<S: Store + ?Sized>(self, store: &S) -> Result<BatchWriteSummary> {
        common::validate_table_name(&self.table_name)?;
        // every record is converted before the first call
        let requests = self
            .items
            .into_iter()
            .map(put_request)
            .collect::<Result<Vec<_>>>()?;
        let mut summary = BatchWriteSummary::default();
        for (index, batch) in requests.chunks(MAX_BATCH_SIZE).enumerate() {
            tracing::debug!(batch = index, size = batch.len(), "writing batch");
            let retried = write_batch(
                store,
                &self.table_name,
                batch.to_vec(),
                &self.retry,
                self.return_consumed_capacity.clone(),
            )
            .await
            .map_err(|source| Error::BatchAborted {
                committed_batches: index,
                source: Box::new(source),
            })?;
            summary.batches += 1;
            summary.items += batch.len();
            summary.retried_entries += retried;
        }
        Ok(summary)
    }
}

/// Write one batch, resubmitting unprocessed entries; returns how many
/// entries were resubmitted.
async fn write_batch<S: Store + ?Sized>(
    store: &S,
    table_name: &str,
    mut pending: Vec<types::WriteRequest>,
    retry: &UnprocessedRetry,
    return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
) -> Result<usize> {
    let mut attempts = 0;
    let mut retried = 0;
    loop {
        let input = operation::batch_write_item::BatchWriteItemInput::builder()
            .request_items(table_name, pending)
            .set_return_consumed_capacity(return_consumed_capacity.clone())
            .build()?;
        let output = store.batch_write_item(input).await?;
        attempts += 1;
        pending = output
            .unprocessed_items
            .and_then(|mut unprocessed| unprocessed.remove(table_name))
            .unwrap_or_default();
        if pending.is_empty() {
            return Ok(retried);
        }
        if attempts > retry.max_retries {
            return Err(Error::Unprocessed {
                count: pending.len(),
                attempts,
            });
        }
        let delay = retry.delay(attempts - 1);
        tracing::warn!(
            unprocessed = pending.len(),
            attempt = attempts,
            ?delay,
            "resubmitting unprocessed entries"
        );
        retried += pending.len();
        tokio::time::sleep(delay).await;
    }
}
