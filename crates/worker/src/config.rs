use std::time::Duration;

use jobportal_db::DEFAULT_MAX_CONNECTIONS;

/// Default seconds between drain ticks.
const DEFAULT_DRAIN_INTERVAL_SECS: u64 = 60;

/// Default number of queue items claimed per batch.
const DEFAULT_DRAIN_BATCH_SIZE: i64 = 50;

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub drain_interval: Duration,
    pub drain_batch_size: i64,
    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default |
    /// |-----------------------|---------|
    /// | `DATABASE_URL`        | required |
    /// | `DB_MAX_CONNECTIONS`  | `20`    |
    /// | `DRAIN_INTERVAL_SECS` | `60`    |
    /// | `DRAIN_BATCH_SIZE`    | `50`    |
    /// | `LOG_FORMAT`          | text (`json` for JSON) |
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let max_connections = parse_or("DB_MAX_CONNECTIONS", &lookup, DEFAULT_MAX_CONNECTIONS)?;
        let interval_secs = parse_or("DRAIN_INTERVAL_SECS", &lookup, DEFAULT_DRAIN_INTERVAL_SECS)?;
        let drain_batch_size = parse_or("DRAIN_BATCH_SIZE", &lookup, DEFAULT_DRAIN_BATCH_SIZE)?;
        if interval_secs == 0 || drain_batch_size <= 0 {
            anyhow::bail!("DRAIN_INTERVAL_SECS and DRAIN_BATCH_SIZE must be positive");
        }

        Ok(Self {
            database_url,
            max_connections,
            drain_interval: Duration::from_secs(interval_secs),
            drain_batch_size,
            json_logs: lookup("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
        })
    }
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{key} must be a valid number: {e}")),
        None => Ok(default),
    }
}
