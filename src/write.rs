//! Write operations for modifying data in DynamoDB tables.
//!
//! This module provides operations for writing data to DynamoDB:
//! - Putting new items or replacing existing ones, optionally conditioned
//! - Batch putting any number of records in store-sized batches

/// Batch write item operation for efficiently writing multiple items.
pub mod batch_write_item;

/// Common utilities and types for write operations.
pub mod common;

/// Put item operation for creating or replacing items.
pub mod put_item;
