use crate::{Error, Result, store::Store, write};

use aws_sdk_dynamodb::operation;
use serde::Serialize;
use serde_dynamo::to_item;

/// Put item operation.
///
/// ```rust,no_run
/// use dynamodb_gateway::{common, store, write};
/// use serde_json::{Value, json};
///
/// # async fn example(store: &store::dynamodb::DynamoDbStore) -> dynamodb_gateway::Result<()> {
/// // create-only: fails with a conflict when the id is taken
/// let put_item = write::put_item::PutItem {
///     item: json!({"id": "1", "name": "John"}),
///     write_args: write::common::WriteArgs {
///         condition: Some(common::condition::Filter::Field(
///             common::condition::FieldCondition {
///                 name: "id".to_string(),
///                 condition: common::condition::Condition::<Value>::NotExists,
///             },
///         )),
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
/// };
/// put_item.send(store).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PutItem<T> {
    /// The item to put into the table.
    pub item: T,
    /// Additional write operation arguments (table name, condition, return values, etc.).
    pub write_args: write::common::WriteArgs<T>,
}

impl<T: Serialize> TryFrom<PutItem<T>> for operation::put_item::PutItemInput {
    type Error = Error;

    fn try_from(put_item: PutItem<T>) -> Result<Self> {
        let write_operation: write::common::WriteInput = put_item.write_args.try_into()?;
        let item = to_item(put_item.item)?;
        let builder = Self::builder().set_item(Some(item));
        let input = crate::apply_write_operation!(builder, write_operation).build()?;
        Ok(input)
    }
}

impl<T: Serialize> PutItem<T> {
    /// Execute the put item operation.
    #[tracing::instrument(name = "dynamodb_gateway.put_item", skip_all, err)]
    pub async fn send<S: Store + ?Sized>(
        self,
        store: &S,
    ) -> Result<operation::put_item::PutItemOutput> {
        let input: operation::put_item::PutItemInput = self.try_into()?;
        store.put_item(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{common, store::stub::StubStore};

    use aws_sdk_dynamodb::types;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn create_only(id: &str) -> PutItem<Value> {
        PutItem {
            item: json!({"id": id, "name": "John"}),
            write_args: write::common::WriteArgs {
                condition: Some(common::condition::Filter::Field(
                    common::condition::FieldCondition {
                        name: "id".to_string(),
                        condition: common::condition::Condition::NotExists,
                    },
                )),
                table_name: "users".to_string(),
                ..Default::default()
            },
        }
    }

    #[rstest]
    #[case::empty(
        PutItem {
            item: json!(
                {
                    "a": "b"
                }
            ),
            write_args: write::common::WriteArgs {
                table_name: "c".to_string(),
                ..Default::default()
            },
        },
        operation::put_item::PutItemInput::builder()
            .item(
                "a",
                types::AttributeValue::S(
                    "b".to_string()
                )
            )
            .table_name("c")
            .build()
            .unwrap()
    )]
    #[case::full(
        PutItem {
            item: json!(
                {
                    "a": "b"
                }
            ),
            write_args: write::common::WriteArgs {
                condition: Some(
                    common::condition::Filter::Field(
                        common::condition::FieldCondition {
                            name: "c".to_string(),
                            condition: common::condition::Condition::Equals(
                                Value::String(
                                    "d".to_string()
                                )
                            ),
                        }
                    )
                ),
                return_consumed_capacity: Some(
                    types::ReturnConsumedCapacity::Total
                ),
                return_item_collection_metrics: Some(
                    types::ReturnItemCollectionMetrics::Size
                ),
                return_values: Some(
                    types::ReturnValue::AllOld
                ),
                table_name: "e".to_string(),
            },
        },
        operation::put_item::PutItemInput::builder()
            .item(
                "a",
                types::AttributeValue::S(
                    "b".to_string()
                )
            )
            .condition_expression("#n0 = :v0")
            .expression_attribute_names("#n0", "c")
            .expression_attribute_values(
                ":v0",
                types::AttributeValue::S(
                    "d".to_string()
                )
            )
            .return_consumed_capacity(types::ReturnConsumedCapacity::Total)
            .return_item_collection_metrics(types::ReturnItemCollectionMetrics::Size)
            .return_values(types::ReturnValue::AllOld)
            .table_name("e")
            .build()
            .unwrap()
    )]
    fn test_put_item_input(
        #[case] args: PutItem<Value>,
        #[case] expected: operation::put_item::PutItemInput,
    ) {
        let actual: operation::put_item::PutItemInput = args.try_into().unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_non_object_item_is_rejected() {
        let put_item = PutItem {
            item: json!("not a map"),
            write_args: write::common::WriteArgs {
                table_name: "users".to_string(),
                ..Default::default()
            },
        };
        let actual: Result<operation::put_item::PutItemInput> = put_item.try_into();
        assert!(matches!(actual, Err(Error::Serialization(_))));
    }

    #[tokio::test]
    async fn test_create_only_put_conflicts_on_existing_key() {
        let store = StubStore::default();
        store.add_table("users");
        create_only("1").send(&store).await.unwrap();
        let actual = create_only("1").send(&store).await;
        assert!(matches!(actual, Err(Error::Conflict(_))));
        create_only("2").send(&store).await.unwrap();
        assert_eq!(store.items("users").len(), 2);
    }
}
