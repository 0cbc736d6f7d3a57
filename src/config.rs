//! Runtime configuration, read once at startup from flags or environment.

use crate::{read, store, write};

use clap::Parser;
use std::time;

/// HTTP facade over DynamoDB tables.
#[derive(Clone, Debug, Parser)]
#[command(name = "dynamodb-gateway")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(long, short, default_value_t = 8080, env = "PORT")]
    pub port: u16,

    /// DynamoDB endpoint override, e.g. http://localhost:8000 for DynamoDB Local
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// AWS region; the default provider chain decides when unset
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Prefix joined to every table name
    #[arg(long, default_value = store::namespace::DEFAULT_TABLE_PREFIX, env = "TABLE_PREFIX")]
    pub table_prefix: String,

    /// Pages a scan or query may fetch before failing
    #[arg(long, default_value_t = read::common::DEFAULT_MAX_PAGES, env = "SCAN_MAX_PAGES")]
    pub max_pages: usize,

    /// Resubmissions of unprocessed batch entries per batch
    #[arg(long, default_value_t = 5, env = "BATCH_MAX_RETRIES")]
    pub batch_max_retries: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, env = "REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: u64,
}

impl Config {
    /// Address to bind, `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Unprocessed-entry policy for batch writes.
    pub fn unprocessed_retry(&self) -> write::batch_write_item::UnprocessedRetry {
        write::batch_write_item::UnprocessedRetry {
            max_retries: self.batch_max_retries,
            ..Default::default()
        }
    }

    /// Request timeout as a Duration.
    pub fn request_timeout(&self) -> time::Duration {
        time::Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["dynamodb-gateway"]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.table_prefix, "Dev.Inkspire..");
        assert_eq!(config.max_pages, 1000);
        assert_eq!(config.unprocessed_retry().max_retries, 5);
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = Config::try_parse_from([
            "dynamodb-gateway",
            "--port",
            "9000",
            "--endpoint-url",
            "http://localhost:8000",
            "--table-prefix",
            "",
            "--max-pages",
            "3",
        ])
        .unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.table_prefix, "");
        assert_eq!(config.max_pages, 3);
    }
}
