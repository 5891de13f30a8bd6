use rust_decimal::Decimal;
use std::time::Duration;

/// Engine configuration
///
/// # Environment variables
///
/// Every field can be overridden from the environment (a `.env` file is
/// loaded first by the binary):
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | ENVIRONMENT | development | Runtime environment |
/// | LOG_LEVEL | info | Base log level (`RUST_LOG` wins when set) |
/// | LOG_JSON | false | JSON log output |
/// | LOG_DIR | (unset) | Directory for rolling file logs |
/// | TABLE_TIMER_TICK_SECS | 60 | Occupied-table timer period |
/// | PAYMENT_DELAY_MS | 1500 | Simulated card processing delay |
/// | EXPORT_DELAY_MS | 1000 | Simulated report export delay |
/// | OPENING_FLOAT | 500.00 | Cash in the drawer when the register opens |
/// | CURRENCY_SYMBOL | $ | Money formatting prefix |
/// | LOW_STOCK_RATIO | 1.0 | Multiplier on an item's minimum level |
///
/// # Example
///
/// ```ignore
/// TABLE_TIMER_TICK_SECS=1 LOG_LEVEL=debug cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment: development | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// Seconds between table timer ticks (one tick = one minute on the timer)
    pub table_timer_tick_secs: u64,
    pub payment_delay_ms: u64,
    pub export_delay_ms: u64,
    pub opening_float: Decimal,
    pub currency_symbol: String,
    pub low_stock_ratio: Decimal,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
            table_timer_tick_secs: env_parse("TABLE_TIMER_TICK_SECS", 60),
            payment_delay_ms: env_parse("PAYMENT_DELAY_MS", 1500),
            export_delay_ms: env_parse("EXPORT_DELAY_MS", 1000),
            opening_float: env_parse("OPENING_FLOAT", Decimal::new(50000, 2)),
            currency_symbol: std::env::var("CURRENCY_SYMBOL").unwrap_or_else(|_| "$".into()),
            low_stock_ratio: env_parse("LOW_STOCK_RATIO", Decimal::ONE),
        }
    }

    /// Override the timing knobs
    ///
    /// Used by tests to run the timers quickly
    pub fn with_overrides(
        table_timer_tick_secs: u64,
        payment_delay_ms: u64,
        export_delay_ms: u64,
    ) -> Self {
        let mut config = Self::from_env();
        config.table_timer_tick_secs = table_timer_tick_secs;
        config.payment_delay_ms = payment_delay_ms;
        config.export_delay_ms = export_delay_ms;
        config
    }

    pub fn table_timer_tick(&self) -> Duration {
        Duration::from_secs(self.table_timer_tick_secs.max(1))
    }

    pub fn payment_delay(&self) -> Duration {
        Duration::from_millis(self.payment_delay_ms)
    }

    pub fn export_delay(&self) -> Duration {
        Duration::from_millis(self.export_delay_ms)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
