use crate::{Error, Result, common, store::Store};

use aws_sdk_dynamodb::{operation, types};
use serde::Deserialize;

/// Scalar type of a key attribute.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
pub enum ScalarType {
    /// String.
    #[default]
    S,
    /// Number.
    N,
    /// Binary.
    B,
}

impl From<ScalarType> for types::ScalarAttributeType {
    fn from(scalar_type: ScalarType) -> Self {
        match scalar_type {
            ScalarType::S => Self::S,
            ScalarType::N => Self::N,
            ScalarType::B => Self::B,
        }
    }
}

/// Key attribute of a table schema.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct KeyAttribute {
    /// Attribute name.
    pub name: String,
    /// Attribute type; string when omitted.
    #[serde(default, rename = "type")]
    pub attribute_type: ScalarType,
}

/// Billing of a new table.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Capacity {
    /// Provisioned read and write capacity units.
    Provisioned {
        /// Read capacity units.
        read: i64,
        /// Write capacity units.
        write: i64,
    },
    /// Pay per request.
    OnDemand,
}

impl Default for Capacity {
    fn default() -> Self {
        Self::Provisioned {
            read: 10,
            write: 10,
        }
    }
}

/// Create table operation.
///
/// ```rust,no_run
/// use dynamodb_gateway::{store, table};
///
/// # async fn example(store: &store::dynamodb::DynamoDbStore) -> dynamodb_gateway::Result<()> {
/// let create_table = table::create_table::CreateTable {
///     table_name: "movies".to_string(),
///     partition_key: table::create_table::KeyAttribute {
///         name: "title".to_string(),
///         ..Default::default()
///     },
///     sort_key: Some(table::create_table::KeyAttribute {
///         name: "year".to_string(),
///         attribute_type: table::create_table::ScalarType::N,
///     }),
///     ..Default::default()
/// };
/// create_table.send(store).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct CreateTable {
    /// The name of the table to create.
    pub table_name: String,
    /// Partition (hash) key.
    pub partition_key: KeyAttribute,
    /// Sort (range) key, for a composite primary key.
    #[serde(default)]
    pub sort_key: Option<KeyAttribute>,
    /// Billing; 10 read and 10 write units when omitted.
    #[serde(default)]
    pub capacity: Capacity,
}

fn key_schema(
    key: KeyAttribute,
    key_type: types::KeyType,
) -> Result<(types::KeySchemaElement, types::AttributeDefinition)> {
    if key.name.trim().is_empty() {
        return Err(Error::Validation(format!(
            "{} key name is empty",
            key_type.as_str().to_lowercase()
        )));
    }
    let element = types::KeySchemaElement::builder()
        .attribute_name(&key.name)
        .key_type(key_type)
        .build()?;
    let definition = types::AttributeDefinition::builder()
        .attribute_name(key.name)
        .attribute_type(key.attribute_type.into())
        .build()?;
    Ok((element, definition))
}

impl TryFrom<CreateTable> for operation::create_table::CreateTableInput {
    type Error = Error;

    fn try_from(create_table: CreateTable) -> Result<Self> {
        common::validate_table_name(&create_table.table_name)?;
        let (partition_element, partition_definition) =
            key_schema(create_table.partition_key, types::KeyType::Hash)?;
        let mut builder = Self::builder()
            .table_name(create_table.table_name)
            .key_schema(partition_element)
            .attribute_definitions(partition_definition);
        if let Some(sort_key) = create_table.sort_key {
            let (sort_element, sort_definition) = key_schema(sort_key, types::KeyType::Range)?;
            builder = builder
                .key_schema(sort_element)
                .attribute_definitions(sort_definition);
        }
        builder = match create_table.capacity {
            Capacity::Provisioned { read, write } => {
                if read < 1 || write < 1 {
                    return Err(Error::Validation(
                        "provisioned capacity units must be positive".to_string(),
                    ));
                }
                let throughput = types::ProvisionedThroughput::builder()
                    .read_capacity_units(read)
                    .write_capacity_units(write)
                    .build()?;
                builder
                    .billing_mode(types::BillingMode::Provisioned)
                    .provisioned_throughput(throughput)
            }
            Capacity::OnDemand => builder.billing_mode(types::BillingMode::PayPerRequest),
        };
        Ok(builder.build()?)
    }
}

impl CreateTable {
    /// Execute the create table operation.
    #[tracing::instrument(name = "dynamodb_gateway.create_table", skip_all, err)]
    pub async fn send<S: Store + ?Sized>(
        self,
        store: &S,
    ) -> Result<operation::create_table::CreateTableOutput> {
        let input: operation::create_table::CreateTableInput = self.try_into()?;
        store.create_table(input).await
    }
}
