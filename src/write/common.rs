use crate::{Error, Result, common};

use aws_sdk_dynamodb::types;
use serde::Serialize;
use std::collections;

/// Write parameters with the condition already rendered.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct WriteInput {
    pub(crate) condition_expression: Option<String>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) expression_attribute_values: Option<common::Item>,
    pub(crate) return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    pub(crate) return_item_collection_metrics: Option<types::ReturnItemCollectionMetrics>,
    pub(crate) return_values: Option<types::ReturnValue>,
    pub(crate) table_name: String,
}

/// Arguments common to single-item write operations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WriteArgs<T> {
    /// Condition that must hold for the write to proceed.
    ///
    /// A failed check surfaces as [`Error::Conflict`].
    pub condition: Option<common::condition::Filter<T>>,
    /// Whether to return the consumed capacity information.
    pub return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    /// Whether to return item collection metrics.
    pub return_item_collection_metrics: Option<types::ReturnItemCollectionMetrics>,
    /// Which item attributes to return in the response.
    pub return_values: Option<types::ReturnValue>,
    /// The name of the table to write to.
    pub table_name: String,
}

impl<T: Serialize> TryFrom<WriteArgs<T>> for WriteInput {
    type Error = Error;

    fn try_from(write_args: WriteArgs<T>) -> Result<Self> {
        common::validate_table_name(&write_args.table_name)?;
        let mut attributes = common::ExpressionAttributes::default();
        let condition_expression = write_args
            .condition
            .map(|condition| condition.render(&mut attributes))
            .transpose()?;
        let (expression_attribute_names, expression_attribute_values) = attributes.into_parts();
        Ok(Self {
            condition_expression,
            expression_attribute_names,
            expression_attribute_values,
            return_consumed_capacity: write_args.return_consumed_capacity,
            return_item_collection_metrics: write_args.return_item_collection_metrics,
            return_values: write_args.return_values,
            table_name: write_args.table_name,
        })
    }
}

/// apply common write operation settings to a builder
#[macro_export]
macro_rules! apply_write_operation {
    ($builder:expr, $write_operation:expr) => {
        $builder
            .set_condition_expression($write_operation.condition_expression)
            .set_expression_attribute_names($write_operation.expression_attribute_names)
            .set_expression_attribute_values($write_operation.expression_attribute_values)
            .set_return_consumed_capacity($write_operation.return_consumed_capacity)
            .set_return_item_collection_metrics($write_operation.return_item_collection_metrics)
            .set_return_values($write_operation.return_values)
            .set_table_name(::std::option::Option::from($write_operation.table_name))
    };
}
