//! Common utilities for DynamoDB operations.
//!
//! This module provides shared types used across read and write operations,
//! including key handling, filter expressions, and attribute projection.

/// Filter and condition expression building.
pub mod condition;

/// Key descriptors identifying items in a table.
pub mod key;

/// Attribute projection for read operations.
pub mod projection;

use crate::{Error, Result};

use aws_sdk_dynamodb::types;
use indexmap::IndexMap;
use std::collections;

/// An item as the store represents it.
pub type Item = collections::HashMap<String, types::AttributeValue>;

/// A record as callers submit it: field names in insertion order.
pub type Record = IndexMap<String, serde_json::Value>;

/// Reject blank table names before anything reaches the store.
pub(crate) fn validate_table_name(table_name: &str) -> Result<()> {
    if table_name.trim().is_empty() {
        return Err(Error::Validation("table name is empty".to_string()));
    }
    Ok(())
}

/// Placeholder allocator for expression attribute names and values.
///
/// One allocator is shared by every expression of a single request (key
/// condition, filter, projection), so placeholders are unique request-wide.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ExpressionAttributes {
    pub(crate) names: collections::HashMap<String, String>,
    pub(crate) values: collections::HashMap<String, types::AttributeValue>,
}

impl ExpressionAttributes {
    /// Placeholder for a top-level attribute name.
    pub(crate) fn attribute(&mut self, name: &str) -> String {
        if let Some((placeholder, _)) = self.names.iter().find(|(_, known)| *known == name) {
            return placeholder.clone();
        }
        let placeholder = format!("#n{}", self.names.len());
        self.names.insert(placeholder.clone(), name.to_string());
        placeholder
    }

    /// Placeholder path for a possibly nested attribute, `a.b` -> `#n0.#n1`.
    pub(crate) fn path(&mut self, path: &str) -> String {
        path.split('.')
            .map(|segment| self.attribute(segment))
            .collect::<Vec<_>>()
            .join(".")
    }

    pub(crate) fn value(&mut self, value: types::AttributeValue) -> String {
        let placeholder = format!(":v{}", self.values.len());
        self.values.insert(placeholder.clone(), value);
        placeholder
    }

    /// Split into the optional maps the SDK expects; empty maps are rejected
    /// by the store, so they become `None`.
    #[allow(clippy::type_complexity)]
    pub(crate) fn into_parts(
        self,
    ) -> (
        Option<collections::HashMap<String, String>>,
        Option<collections::HashMap<String, types::AttributeValue>>,
    ) {
        let names = (!self.names.is_empty()).then_some(self.names);
        let values = (!self.values.is_empty()).then_some(self.values);
        (names, values)
    }
}
