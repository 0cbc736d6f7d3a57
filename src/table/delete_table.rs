use crate::{Error, Result, common, store::Store};

use aws_sdk_dynamodb::operation;

/// Delete table operation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DeleteTable {
    /// The name of the table to delete.
    pub table_name: String,
}

impl TryFrom<DeleteTable> for operation::delete_table::DeleteTableInput {
    type Error = Error;

    fn try_from(delete_table: DeleteTable) -> Result<Self> {
        common::validate_table_name(&delete_table.table_name)?;
        Ok(Self::builder()
            .table_name(delete_table.table_name)
            .build()?)
    }
}

impl DeleteTable {
    /// Execute the delete table operation.
    #[tracing::instrument(name = "dynamodb_gateway.delete_table", skip_all, err)]
    pub async fn send<S: Store + ?Sized>(
        self,
        store: &S,
    ) -> Result<operation::delete_table::DeleteTableOutput> {
        let input: operation::delete_table::DeleteTableInput = self.try_into()?;
        store.delete_table(input).await
    }
}
