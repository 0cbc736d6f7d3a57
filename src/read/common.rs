use crate::{Error, Result, common};

use aws_sdk_dynamodb::types;
use serde::{Serialize, de::DeserializeOwned};
use serde_dynamo::{from_items, to_attribute_value};
use std::collections;

/// Pages fetched by a single scan or query before giving up on the cursor.
pub const DEFAULT_MAX_PAGES: usize = 1000;

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SingleReadInput {
    pub(crate) consistent_read: Option<bool>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) projection_expression: Option<String>,
    pub(crate) table_name: String,
}

/// Arguments for single-item read operations (GetItem).
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct SingleReadArgs {
    /// Whether to use a consistent read.
    ///
    /// `true` for strongly consistent reads, `false` or `None` for eventually consistent reads.
    pub consistent_read: Option<bool>,
    /// Which attributes to retrieve; all of them when `None`.
    pub projection: Option<common::projection::Projection>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl TryFrom<SingleReadArgs> for SingleReadInput {
    type Error = Error;

    fn try_from(single_read_args: SingleReadArgs) -> Result<Self> {
        common::validate_table_name(&single_read_args.table_name)?;
        let mut attributes = common::ExpressionAttributes::default();
        let projection_expression = single_read_args
            .projection
            .map(|projection| projection.render(&mut attributes))
            .transpose()?;
        let (expression_attribute_names, _) = attributes.into_parts();
        Ok(Self {
            consistent_read: single_read_args.consistent_read,
            expression_attribute_names,
            projection_expression,
            table_name: single_read_args.table_name,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MultipleReadInput {
    pub(crate) consistent_read: Option<bool>,
    pub(crate) exclusive_start_key: Option<common::Item>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) expression_attribute_values: Option<common::Item>,
    pub(crate) filter_expression: Option<String>,
    pub(crate) index_name: Option<String>,
    pub(crate) limit: Option<i32>,
    pub(crate) projection_expression: Option<String>,
    pub(crate) select: Option<types::Select>,
    pub(crate) table_name: String,
}

/// Arguments for multiple-item read operations (Query, Scan).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultipleReadArgs<T> {
    /// Whether to use a consistent read.
    pub consistent_read: Option<bool>,
    /// Cursor to resume from, as returned in `last_evaluated_key`.
    pub exclusive_start_key: Option<collections::HashMap<String, T>>,
    /// Server-side filter applied to each page after it is read.
    pub filter: Option<common::condition::Filter<T>>,
    /// The name of a global secondary index or local secondary index to read.
    pub index_name: Option<String>,
    /// Page size: the maximum number of items evaluated per request.
    pub limit: Option<i32>,
    /// Upper bound on requests; [`DEFAULT_MAX_PAGES`] when `None`.
    pub max_pages: Option<usize>,
    /// Which attributes to retrieve; all of them when `None`.
    pub projection: Option<common::projection::Projection>,
    /// Which attributes to return, e.g. `Select::Count`.
    pub select: Option<types::Select>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl<T: Serialize> MultipleReadArgs<T> {
    /// Page bound after validation.
    pub(crate) fn max_pages(&self) -> Result<usize> {
        match self.max_pages {
            Some(0) => Err(Error::Validation("max_pages must be at least 1".to_string())),
            Some(max_pages) => Ok(max_pages),
            None => Ok(DEFAULT_MAX_PAGES),
        }
    }

    /// Render filter and projection into `attributes`, which may already hold
    /// the placeholders of a key condition.
    pub(crate) fn into_input(
        self,
        mut attributes: common::ExpressionAttributes,
    ) -> Result<MultipleReadInput> {
        common::validate_table_name(&self.table_name)?;
        let exclusive_start_key = self
            .exclusive_start_key
            .map(|exclusive_start_key| {
                exclusive_start_key
                    .into_iter()
                    .map(|(name, value)| Ok((name, to_attribute_value(value)?)))
                    .collect::<Result<common::Item>>()
            })
            .transpose()?;
        let filter_expression = self
            .filter
            .map(|filter| filter.render(&mut attributes))
            .transpose()?;
        let projection_expression = self
            .projection
            .map(|projection| projection.render(&mut attributes))
            .transpose()?;
        let (expression_attribute_names, expression_attribute_values) = attributes.into_parts();
        Ok(MultipleReadInput {
            consistent_read: self.consistent_read,
            exclusive_start_key,
            expression_attribute_names,
            expression_attribute_values,
            filter_expression,
            index_name: self.index_name,
            limit: self.limit,
            projection_expression,
            select: self.select,
            table_name: self.table_name,
        })
    }
}

/// Drive a scan or query to exhaustion against a store.
///
/// Each request carries the cursor of the previous response; pages are
/// concatenated in arrival order. Fails with `PaginationLimit` once
/// `$max_pages` requests have been made and a cursor is still present.
#[macro_export]
macro_rules! get_paginated_output {
    ($store:expr, $method:ident, $input:expr, $max_pages:expr, $output_type:ty) => {{
        let input = $input;
        let max_pages: usize = $max_pages;
        let mut cursor = input.exclusive_start_key.clone();
        let mut items = Vec::new();
        let mut count = 0;
        let mut scanned_count = 0;
        let mut capacities = Vec::new();
        let mut pages = 0;
        loop {
            if pages == max_pages {
                return Err($crate::Error::PaginationLimit {
                    table_name: input.table_name.clone().unwrap_or_default(),
                    max_pages,
                });
            }
            let mut page_input = input.clone();
            page_input.exclusive_start_key = cursor.take();
            let output = $store.$method(page_input).await?;
            pages += 1;
            let page_items = output.items.unwrap_or_default();
            ::tracing::debug!(page = pages, items = page_items.len(), "fetched page");
            items.extend(page_items);
            count += output.count;
            scanned_count += output.scanned_count;
            capacities.extend(output.consumed_capacity);
            cursor = output.last_evaluated_key.filter(|key| !key.is_empty());
            if cursor.is_none() {
                break;
            }
        }
        let output = <$output_type>::builder()
            .set_items(Some(items))
            .set_count(Some(count))
            .set_scanned_count(Some(scanned_count))
            .set_consumed_capacity($crate::read::common::aggregate_capacity(capacities))
            .build();
        Ok(output)
    }};
}

/// Sum the capacity reported by each page; `None` when no page reported any.
pub(crate) fn aggregate_capacity(
    capacities: Vec<types::ConsumedCapacity>,
) -> Option<types::ConsumedCapacity> {
    if capacities.is_empty() {
        return None;
    }
    let (cap, read, write, table) = capacities.into_iter().fold(
        (0.0, 0.0, 0.0, None),
        |(cap, read, write, table), capacity| {
            (
                cap + capacity.capacity_units.unwrap_or(0.0),
                read + capacity.read_capacity_units.unwrap_or(0.0),
                write + capacity.write_capacity_units.unwrap_or(0.0),
                table.or(capacity.table_name),
            )
        },
    );
    let capacity = types::ConsumedCapacity::builder()
        .set_table_name(table)
        .set_capacity_units(Some(cap))
        .set_read_capacity_units(Some(read))
        .set_write_capacity_units(Some(write))
        .build();
    Some(capacity)
}

/// Deserialize the items of a read into caller-chosen records.
pub(crate) fn deserialize_items<O: DeserializeOwned>(
    items: Option<Vec<common::Item>>,
) -> Result<Vec<O>> {
    Ok(from_items(items.unwrap_or_default())?)
}

/// apply common single read operation settings to a builder
#[macro_export]
macro_rules! apply_single_read_operation {
    ($builder:expr, $single_read_operation:expr) => {
        $builder
            .set_consistent_read($single_read_operation.consistent_read)
            .set_expression_attribute_names($single_read_operation.expression_attribute_names)
            .set_projection_expression($single_read_operation.projection_expression)
            .set_table_name(::std::option::Option::from(
                $single_read_operation.table_name,
            ))
    };
}

/// apply common multiple read operation settings to a builder
#[macro_export]
macro_rules! apply_multiple_read_operation {
    ($builder:expr, $multiple_read_operation:expr) => {
        $builder
            .set_consistent_read($multiple_read_operation.consistent_read)
            .set_exclusive_start_key($multiple_read_operation.exclusive_start_key)
            .set_expression_attribute_names($multiple_read_operation.expression_attribute_names)
            .set_expression_attribute_values($multiple_read_operation.expression_attribute_values)
            .set_filter_expression($multiple_read_operation.filter_expression)
            .set_index_name($multiple_read_operation.index_name)
            .set_limit($multiple_read_operation.limit)
            .set_projection_expression($multiple_read_operation.projection_expression)
            .set_select($multiple_read_operation.select)
            .set_table_name(::std::option::Option::from(
                $multiple_read_operation.table_name,
            ))
    };
}
