use crate::types::{CheckpointPolicy, Horizon};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Locations of the durable stores.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// SQLite file holding the series and instrument tables.
    pub series_db_path: PathBuf,
    /// JSON file holding per-instrument checkpoints.
    pub checkpoint_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            series_db_path: PathBuf::from("data/stock_data.db"),
            checkpoint_path: PathBuf::from("data/last_dates.json"),
        }
    }
}

/// Remote exchange endpoints.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// History page prefix; the instrument code is appended.
    pub base_url: String,
    /// Page listing every instrument code.
    pub discovery_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.mse.mk/mk/stats/symbolhistory/".to_string(),
            discovery_url: "https://www.mse.mk/mk/stats/symbolhistory/avk".to_string(),
        }
    }
}

/// Synchronization pipeline settings.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Width of the per-batch worker pool.
    pub workers: usize,
    /// Maximum calendar days per remote request.
    pub chunk_days: u32,
    /// History depth fetched for an instrument without a checkpoint.
    pub lookback_days: u32,
    /// Per-chunk fetch timeout.
    pub fetch_timeout: Duration,
    /// Delay between periodic runs (zero disables them).
    pub interval: Duration,
    /// Run a batch as soon as the server starts.
    pub on_startup: bool,
    pub checkpoint_policy: CheckpointPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            chunk_days: 365,
            lookback_days: 365 * 10,
            fetch_timeout: Duration::from_secs(30),
            interval: Duration::from_secs(24 * 60 * 60),
            on_startup: true,
            checkpoint_policy: CheckpointPolicy::Contiguous,
        }
    }
}

/// MACD fast/slow/signal periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

/// Window and MACD periods used for one horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HorizonSettings {
    pub window: usize,
    pub macd: MacdParams,
}

/// Indicator engine settings.
#[derive(Debug, Clone)]
pub struct IndicatorConfig {
    pub short: HorizonSettings,
    pub medium: HorizonSettings,
    pub long: HorizonSettings,
    /// How long a computed analysis is served from cache.
    pub cache_ttl: Duration,
}

impl IndicatorConfig {
    pub fn horizon(&self, horizon: Horizon) -> &HorizonSettings {
        match horizon {
            Horizon::Short => &self.short,
            Horizon::Medium => &self.medium,
            Horizon::Long => &self.long,
        }
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            short: HorizonSettings {
                window: 7,
                macd: MacdParams { fast: 6, slow: 13, signal: 5 },
            },
            medium: HorizonSettings {
                window: 14,
                macd: MacdParams { fast: 12, slow: 26, signal: 9 },
            },
            long: HorizonSettings {
                window: 30,
                macd: MacdParams { fast: 24, slow: 52, signal: 18 },
            },
            cache_ttl: Duration::from_secs(30),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    pub storage: StorageConfig,
    pub source: SourceConfig,
    pub sync: SyncConfig,
    pub indicators: IndicatorConfig,
}

/// Read an environment variable, falling back when unset or unparseable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let storage_defaults = StorageConfig::default();
        let source_defaults = SourceConfig::default();
        let sync_defaults = SyncConfig::default();
        let indicator_defaults = IndicatorConfig::default();

        let horizon = |key: &str, settings: HorizonSettings| HorizonSettings {
            window: env_or(key, settings.window).max(1),
            macd: settings.macd,
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_or("PORT", 5000),
            storage: StorageConfig {
                series_db_path: env::var("SERIES_DB_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(storage_defaults.series_db_path),
                checkpoint_path: env::var("CHECKPOINT_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(storage_defaults.checkpoint_path),
            },
            source: SourceConfig {
                base_url: env::var("SOURCE_BASE_URL").unwrap_or(source_defaults.base_url),
                discovery_url: env::var("DISCOVERY_URL").unwrap_or(source_defaults.discovery_url),
            },
            sync: SyncConfig {
                workers: env_or("SYNC_WORKERS", sync_defaults.workers).max(1),
                chunk_days: env_or("SYNC_CHUNK_DAYS", sync_defaults.chunk_days).max(1),
                lookback_days: env_or("SYNC_LOOKBACK_DAYS", sync_defaults.lookback_days),
                fetch_timeout: Duration::from_secs(env_or("FETCH_TIMEOUT_SECS", 30)),
                interval: Duration::from_secs(env_or("SYNC_INTERVAL_SECS", 24 * 60 * 60)),
                on_startup: env_flag("SYNC_ON_STARTUP", sync_defaults.on_startup),
                checkpoint_policy: env::var("CHECKPOINT_POLICY")
                    .ok()
                    .and_then(|v| CheckpointPolicy::from_str(&v))
                    .unwrap_or(sync_defaults.checkpoint_policy),
            },
            indicators: IndicatorConfig {
                short: horizon("HORIZON_SHORT", indicator_defaults.short),
                medium: horizon("HORIZON_MEDIUM", indicator_defaults.medium),
                long: horizon("HORIZON_LONG", indicator_defaults.long),
                cache_ttl: Duration::from_secs(env_or("ANALYSIS_CACHE_SECS", 30)),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            storage: StorageConfig::default(),
            source: SourceConfig::default(),
            sync: SyncConfig::default(),
            indicators: IndicatorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_defaults() {
        let sync = SyncConfig::default();
        assert_eq!(sync.workers, 5);
        assert_eq!(sync.chunk_days, 365);
        assert_eq!(sync.lookback_days, 3650);
        assert_eq!(sync.checkpoint_policy, CheckpointPolicy::Contiguous);
    }

    #[test]
    fn test_horizon_defaults() {
        let indicators = IndicatorConfig::default();
        assert_eq!(indicators.horizon(Horizon::Short).window, 7);
        assert_eq!(indicators.horizon(Horizon::Medium).window, 14);
        assert_eq!(indicators.horizon(Horizon::Long).window, 30);
        assert_eq!(
            indicators.horizon(Horizon::Medium).macd,
            MacdParams { fast: 12, slow: 26, signal: 9 }
        );
        assert_eq!(
            indicators.horizon(Horizon::Long).macd,
            MacdParams { fast: 24, slow: 52, signal: 18 }
        );
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        env::set_var("BOURSE_TEST_WORKERS", "many");
        assert_eq!(env_or("BOURSE_TEST_WORKERS", 5usize), 5);
        env::set_var("BOURSE_TEST_WORKERS", " 8 ");
        assert_eq!(env_or("BOURSE_TEST_WORKERS", 5usize), 8);
        env::remove_var("BOURSE_TEST_WORKERS");
    }

    #[test]
    fn test_default_config_paths() {
        let config = Config::default();
        assert_eq!(config.port, 5000);
        assert!(config.storage.series_db_path.ends_with("stock_data.db"));
        assert!(config.storage.checkpoint_path.ends_with("last_dates.json"));
    }
}
