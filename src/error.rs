//! Error type shared by every operation.
//!
//! Store failures are classified by the service error code the SDK exposes
//! through `ProvideErrorMetadata`, never by parsing the rendered message.

use aws_sdk_dynamodb::error::{self, ProvideErrorMetadata, SdkError};
use std::fmt;

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced to callers of the gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The store could not be reached or failed while serving the request.
    #[error("store request failed: {0}")]
    Transport(String),

    /// The request was malformed before (or as judged by) the store.
    #[error("invalid request: {0}")]
    Validation(String),

    /// A record or key could not be converted to or from store attributes.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_dynamo::Error),

    /// A point lookup returned no item.
    #[error("no item with the given key in table `{table_name}`")]
    NotFound {
        /// Table the lookup ran against.
        table_name: String,
    },

    /// The table or index addressed by the request does not exist.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// A condition check failed or the resource is already in use.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store kept returning a continuation cursor past the page bound.
    #[error("pagination over `{table_name}` did not finish within {max_pages} pages")]
    PaginationLimit {
        /// Table being scanned or queried.
        table_name: String,
        /// Page bound that was reached.
        max_pages: usize,
    },

    /// Batch entries the store kept reporting as unprocessed.
    #[error("{count} entries still unprocessed after {attempts} attempts")]
    Unprocessed {
        /// Entries left unwritten.
        count: usize,
        /// Submissions made for the failing batch.
        attempts: usize,
    },

    /// A batch write stopped part way; earlier batches remain committed.
    #[error("batch write aborted after {committed_batches} committed batches: {source}")]
    BatchAborted {
        /// Batches fully written before the failure.
        committed_batches: usize,
        /// Failure of the first batch that did not complete.
        source: Box<Error>,
    },
}

impl From<error::BuildError> for Error {
    fn from(err: error::BuildError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl Error {
    /// Classify an SDK failure.
    pub(crate) fn from_sdk<E, R>(err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
        R: fmt::Debug + Send + Sync + 'static,
    {
        match err.as_service_error() {
            Some(service_error) => {
                let meta = ProvideErrorMetadata::meta(service_error);
                let display = error::DisplayErrorContext(service_error).to_string();
                Self::from_service_code(meta.code(), meta.message(), display)
            }
            // dispatch, timeout, construction and response failures
            None => Self::Transport(error::DisplayErrorContext(&err).to_string()),
        }
    }

    fn from_service_code(code: Option<&str>, message: Option<&str>, display: String) -> Self {
        let message = message.map(str::to_string).unwrap_or(display);
        match code {
            Some("ResourceNotFoundException") => Self::ResourceNotFound(message),
            Some("ConditionalCheckFailedException")
            | Some("ResourceInUseException")
            | Some("TransactionConflictException") => Self::Conflict(message),
            Some("ValidationException") => Self::Validation(message),
            _ => Self::Transport(message),
        }
    }

    /// The innermost error, looking through batch abort diagnostics.
    pub fn root(&self) -> &Self {
        match self {
            Self::BatchAborted { source, .. } => source.root(),
            other => other,
        }
    }
}
