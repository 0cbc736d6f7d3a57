use crate::{Error, Result, store::Store};

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    Client,
    operation::{
        batch_write_item::{BatchWriteItemInput, BatchWriteItemOutput},
        create_table::{CreateTableInput, CreateTableOutput},
        delete_table::{DeleteTableInput, DeleteTableOutput},
        get_item::{GetItemInput, GetItemOutput},
        put_item::{PutItemInput, PutItemOutput},
        query::{QueryInput, QueryOutput},
        scan::{ScanInput, ScanOutput},
    },
};

/// [`Store`] backed by an [`aws_sdk_dynamodb::Client`].
///
/// The client is cheap to clone and safe to share.
#[derive(Clone, Debug)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    /// Wrap an existing client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default credential chain.
    ///
    /// `endpoint_url` points the client at e.g. DynamoDB Local
    /// (`http://localhost:8000`); `region` overrides the region chain.
    pub async fn connect(endpoint_url: Option<&str>, region: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region.to_string()));
        }
        if let Some(endpoint_url) = endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config))
    }

    /// The wrapped client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Store for DynamoDbStore {
    async fn create_table(&self, input: CreateTableInput) -> Result<CreateTableOutput> {
        self.client
            .create_table()
            .set_table_name(input.table_name)
            .set_attribute_definitions(input.attribute_definitions)
            .set_key_schema(input.key_schema)
            .set_billing_mode(input.billing_mode)
            .set_provisioned_throughput(input.provisioned_throughput)
            .send()
            .await
            .map_err(Error::from_sdk)
    }

    async fn delete_table(&self, input: DeleteTableInput) -> Result<DeleteTableOutput> {
        self.client
            .delete_table()
            .set_table_name(input.table_name)
            .send()
            .await
            .map_err(Error::from_sdk)
    }

    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput> {
        let builder = self.client.put_item().set_item(input.item);
        crate::apply_write_operation!(builder, input)
            .send()
            .await
            .map_err(Error::from_sdk)
    }

    async fn batch_write_item(&self, input: BatchWriteItemInput) -> Result<BatchWriteItemOutput> {
        self.client
            .batch_write_item()
            .set_request_items(input.request_items)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_return_item_collection_metrics(input.return_item_collection_metrics)
            .send()
            .await
            .map_err(Error::from_sdk)
    }

    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput> {
        let builder = self
            .client
            .get_item()
            .set_key(input.key)
            .set_return_consumed_capacity(input.return_consumed_capacity);
        crate::apply_single_read_operation!(builder, input)
            .send()
            .await
            .map_err(Error::from_sdk)
    }

    async fn query(&self, input: QueryInput) -> Result<QueryOutput> {
        let builder = self
            .client
            .query()
            .set_key_condition_expression(input.key_condition_expression)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_scan_index_forward(input.scan_index_forward);
        crate::apply_multiple_read_operation!(builder, input)
            .send()
            .await
            .map_err(Error::from_sdk)
    }

    async fn scan(&self, input: ScanInput) -> Result<ScanOutput> {
        let builder = self
            .client
            .scan()
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_segment(input.segment)
            .set_total_segments(input.total_segments);
        crate::apply_multiple_read_operation!(builder, input)
            .send()
            .await
            .map_err(Error::from_sdk)
    }
}
