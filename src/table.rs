//! Table management operations.
//!
//! Tables are addressed by their logical name; any namespace prefix is
//! applied by the store.

/// Create table operation.
pub mod create_table;

/// Delete table operation.
pub mod delete_table;
