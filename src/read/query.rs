use crate::{Error, Result, common, read, store::Store};

use aws_sdk_dynamodb::{operation, types};
use serde::{Serialize, de::DeserializeOwned};

/// Query operation.
///
/// ```rust,no_run
/// use dynamodb_gateway::{common, read, store};
///
/// # async fn example(store: &store::dynamodb::DynamoDbStore) -> dynamodb_gateway::Result<()> {
/// let query = read::query::Query {
///     partition_key: common::key::Key {
///         name: "id".to_string(),
///         value: "1".to_string(),
///     },
///     multiple_read_args: read::common::MultipleReadArgs {
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// query.send(store).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query<T> {
    /// Additional read operation arguments (table name, filter, projection, etc.).
    pub multiple_read_args: read::common::MultipleReadArgs<T>,
    /// The partition key value to query for.
    pub partition_key: common::key::Key<T>,
    /// Whether to return the consumed capacity information.
    pub return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    /// Whether to scan the index forward (ascending) or backward (descending).
    pub scan_index_forward: Option<bool>,
    /// Optional condition on the sort key; only key-condition operators are accepted.
    pub sort_key_condition: Option<common::condition::FieldCondition<T>>,
}

impl<T: Serialize> Query<T> {
    fn get_key_condition_expression(
        partition_key: common::key::Key<T>,
        sort_key_condition: Option<common::condition::FieldCondition<T>>,
        attributes: &mut common::ExpressionAttributes,
    ) -> Result<String> {
        let mut keys = common::key::Keys {
            partition_key,
            sort_key: None,
        };
        let sort_key_condition = match sort_key_condition {
            Some(common::condition::FieldCondition {
                name,
                condition: common::condition::Condition::Equals(value),
            }) => {
                keys.sort_key = Some(common::key::Key { name, value });
                None
            }
            Some(sort_key_condition) if !sort_key_condition.condition.is_key_condition() => {
                return Err(Error::Validation(format!(
                    "operator not allowed in a key condition on `{}`",
                    sort_key_condition.name
                )));
            }
            other => other,
        };
        let mut expression = keys.key_condition(attributes)?;
        if let Some(sort_key_condition) = sort_key_condition {
            expression.push_str(" AND ");
            expression.push_str(&sort_key_condition.render(attributes)?);
        }
        Ok(expression)
    }
}

impl<T: Serialize> TryFrom<Query<T>> for operation::query::QueryInput {
    type Error = Error;

    fn try_from(query: Query<T>) -> Result<Self> {
        let mut attributes = common::ExpressionAttributes::default();
        let key_condition_expression = Query::get_key_condition_expression(
            query.partition_key,
            query.sort_key_condition,
            &mut attributes,
        )?;
        let multiple_read_operation = query.multiple_read_args.into_input(attributes)?;
        let builder = Self::builder()
            .key_condition_expression(key_condition_expression)
            .set_return_consumed_capacity(query.return_consumed_capacity)
            .set_scan_index_forward(query.scan_index_forward);
        let input = crate::apply_multiple_read_operation!(builder, multiple_read_operation).build()?;
        Ok(input)
    }
}

impl<T: Serialize> Query<T> {
    /// Execute the query, following the cursor until every match is read.
    #[tracing::instrument(name = "dynamodb_gateway.query", skip_all, err)]
    pub async fn send<S: Store + ?Sized>(
        self,
        store: &S,
    ) -> Result<operation::query::QueryOutput> {
        let max_pages = self.multiple_read_args.max_pages()?;
        let input: operation::query::QueryInput = self.try_into()?;
        crate::get_paginated_output!(store, query, input, max_pages, operation::query::QueryOutput)
    }

    /// Execute the query and deserialize every item.
    pub async fn fetch<O, S>(self, store: &S) -> Result<Vec<O>>
    where
        O: DeserializeOwned,
        S: Store + ?Sized,
    {
        let output = self.send(store).await?;
        read::common::deserialize_items(output.items)
    }
}
