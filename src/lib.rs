#![deny(missing_docs)]

//! # DynamoDB Gateway
//!
//! An HTTP facade over Amazon DynamoDB tables.
//!
//! ## Overview
//!
//! Operations are plain structs that render themselves into SDK inputs and
//! are sent through a [`store::Store`]:
//! - Batch puts split any number of records into batches of 25, resubmit
//!   entries the store leaves unprocessed and stop at the first failing batch
//! - Scans and queries follow the continuation cursor to the end, bounded by
//!   a page limit that fails with [`Error::PaginationLimit`] rather than
//!   returning a partial result
//! - Key, condition and projection expressions are built from structured
//!   types with generated placeholders
//! - Table names are namespaced by [`store::namespace::Namespaced`]
//!
//! ## Quick Example
//!
//! ```no_run
//! use dynamodb_gateway::{common, read, store};
//! use serde_json::Value;
//!
//! # async fn example() -> dynamodb_gateway::Result<()> {
//! let store = store::namespace::Namespaced::new(
//!     store::dynamodb::DynamoDbStore::connect(Some("http://localhost:8000"), None).await,
//!     store::namespace::DEFAULT_TABLE_PREFIX,
//! );
//! let scan = read::scan::Scan::<Value> {
//!     multiple_read_args: read::common::MultipleReadArgs {
//!         table_name: "movies".to_string(),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//! // reads `Dev.Inkspire..movies` page by page
//! let movies: Vec<common::Record> = scan.fetch(&store).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`mod@common`] - Keys, conditions and projections
//! - [`mod@read`] - GetItem, Query and Scan
//! - [`mod@write`] - PutItem and BatchWriteItem
//! - [`mod@table`] - CreateTable and DeleteTable
//! - [`mod@store`] - The store seam and its implementations

pub mod common;

pub mod error;

pub mod read;

pub mod store;

pub mod table;

pub mod write;

#[cfg(feature = "server")]
pub mod config;

#[cfg(feature = "server")]
pub mod server;

pub use error::{Error, Result};
