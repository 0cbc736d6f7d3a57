use crate::{Error, Result, common, read, store::Store};

use aws_sdk_dynamodb::{operation, types};
use serde::{Serialize, de::DeserializeOwned};
use serde_dynamo::from_item;

/// Get item operation.
///
/// ```rust,no_run
/// use dynamodb_gateway::{common, read, store};
///
/// # async fn example(store: &store::dynamodb::DynamoDbStore) -> dynamodb_gateway::Result<()> {
/// let get_item = read::get_item::GetItem {
///     keys: common::key::Keys {
///         partition_key: common::key::Key {
///             name: "id".to_string(),
///             value: "1".to_string(),
///         },
///         ..Default::default()
///     },
///     single_read_args: read::common::SingleReadArgs {
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// let user: common::Record = get_item.fetch(store).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetItem<T> {
    /// The primary key of the item to retrieve.
    pub keys: common::key::Keys<T>,
    /// Whether to return the consumed capacity information.
    pub return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    /// Additional read operation arguments (table name, consistent read, projection).
    pub single_read_args: read::common::SingleReadArgs,
}

impl<T: Serialize> TryFrom<GetItem<T>> for operation::get_item::GetItemInput {
    type Error = Error;

    fn try_from(get_item: GetItem<T>) -> Result<Self> {
        let single_read_operation: read::common::SingleReadInput =
            get_item.single_read_args.try_into()?;
        let keys: common::Item = get_item.keys.try_into()?;
        let builder = Self::builder()
            .set_key(Some(keys))
            .set_return_consumed_capacity(get_item.return_consumed_capacity);
        let input = crate::apply_single_read_operation!(builder, single_read_operation).build()?;
        Ok(input)
    }
}

impl<T: Serialize> GetItem<T> {
    /// Execute the get item operation.
    #[tracing::instrument(name = "dynamodb_gateway.get_item", skip_all, err)]
    pub async fn send<S: Store + ?Sized>(
        self,
        store: &S,
    ) -> Result<operation::get_item::GetItemOutput> {
        let input: operation::get_item::GetItemInput = self.try_into()?;
        store.get_item(input).await
    }

    /// Execute the lookup and deserialize the item, failing with
    /// [`Error::NotFound`] when no item has the given key.
    pub async fn fetch<O, S>(self, store: &S) -> Result<O>
    where
        O: DeserializeOwned,
        S: Store + ?Sized,
    {
        let table_name = self.single_read_args.table_name.clone();
        let output = self.send(store).await?;
        match output.item {
            Some(item) => Ok(from_item(item)?),
            None => Err(Error::NotFound { table_name }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::stub::StubStore;

    use rstest::rstest;
    use serde_json::{Value, json};

    fn get_item(id: &str) -> GetItem<Value> {
        GetItem {
            keys: common::key::Keys {
                partition_key: common::key::Key {
                    name: "id".to_string(),
                    value: Value::String(id.to_string()),
                },
                ..Default::default()
            },
            single_read_args: read::common::SingleReadArgs {
                table_name: "users".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[rstest]
    #[case::empty(
        get_item("b"),
        operation::get_item::GetItemInput::builder()
            .key(
                "id",
                types::AttributeValue::S(
                    "b".to_string()
                )
            )
            .table_name("users")
            .build()
            .unwrap()
    )]
    #[case::full(
        GetItem {
            keys: common::key::Keys {
                partition_key: common::key::Key {
                    name: "a".to_string(),
                    value: Value::String(
                        "b".to_string()
                    ),
                },
                sort_key: Some(
                    common::key::Key {
                        name: "c".to_string(),
                        value: Value::Number(
                            1.into()
                        ),
                    }
                ),
            },
            return_consumed_capacity: Some(
                types::ReturnConsumedCapacity::Total
            ),
            single_read_args: read::common::SingleReadArgs {
                consistent_read: Some(true),
                projection: Some(
                    common::projection::Projection {
                        attributes: vec![
                            "d".to_string(),
                            "e.f".to_string()
                        ],
                    }
                ),
                table_name: "g".to_string(),
            },
        },
        operation::get_item::GetItemInput::builder()
            .key(
                "a",
                types::AttributeValue::S(
                    "b".to_string()
                )
            )
            .key(
                "c",
                types::AttributeValue::N(
                    "1".to_string()
                )
            )
            .consistent_read(true)
            .expression_attribute_names("#n0", "d")
            .expression_attribute_names("#n1", "e")
            .expression_attribute_names("#n2", "f")
            .projection_expression("#n0, #n1.#n2")
            .return_consumed_capacity(types::ReturnConsumedCapacity::Total)
            .table_name("g")
            .build()
            .unwrap()
    )]
    fn test_get_item_input(
        #[case] args: GetItem<Value>,
        #[case] expected: operation::get_item::GetItemInput,
    ) {
        let actual: operation::get_item::GetItemInput = args.try_into().unwrap();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_fetch_existing_item() {
        let store = StubStore::default();
        store.add_table("users");
        store.insert(
            "users",
            common::Item::from([
                ("id".to_string(), types::AttributeValue::S("1".to_string())),
                ("name".to_string(), types::AttributeValue::S("Ada".to_string())),
            ]),
        );
        let actual: common::Record = get_item("1").fetch(&store).await.unwrap();
        assert_eq!(actual.get("name"), Some(&json!("Ada")));
    }

    #[tokio::test]
    async fn test_fetch_missing_item_is_not_found() {
        let store = StubStore::default();
        store.add_table("users");
        let actual = get_item("404").fetch::<common::Record, _>(&store).await;
        assert!(matches!(actual, Err(Error::NotFound { ref table_name }) if table_name == "users"));
    }

    #[tokio::test]
    async fn test_empty_key_never_reaches_store() {
        let store = StubStore::default();
        store.add_table("users");
        let actual = get_item("").send(&store).await;
        assert!(matches!(actual, Err(Error::Validation(_))));
        assert_eq!(store.call_count(), 0);
    }
}
