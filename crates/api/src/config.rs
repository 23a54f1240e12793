//! Application configuration loaded from environment variables.

use domain::{Money, ValidationLimits};

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `MAX_TABLE_CAPACITY`: largest table that can be registered (default: `12`)
/// - `MAX_ITEM_QUANTITY`: largest quantity per order line (default: `10`)
/// - `MAX_CHARGE_CENTS`: upper bound for cover, service and tip (default: `9999`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub max_table_capacity: u32,
    pub max_item_quantity: u32,
    pub max_charge_cents: i64,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    ///
    /// Unparseable values fall back to the default as well.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            max_table_capacity: env_or("MAX_TABLE_CAPACITY", defaults.max_table_capacity),
            max_item_quantity: env_or("MAX_ITEM_QUANTITY", defaults.max_item_quantity),
            max_charge_cents: env_or("MAX_CHARGE_CENTS", defaults.max_charge_cents),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validation bounds for the domain services.
    pub fn limits(&self) -> ValidationLimits {
        ValidationLimits {
            max_table_capacity: self.max_table_capacity,
            max_guests: self.max_table_capacity,
            max_item_quantity: self.max_item_quantity,
            max_charge: Money::from_cents(self.max_charge_cents),
            ..ValidationLimits::default()
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        let limits = ValidationLimits::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            max_table_capacity: limits.max_table_capacity,
            max_item_quantity: limits.max_item_quantity,
            max_charge_cents: limits.max_charge.cents(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.max_table_capacity, 12);
        assert_eq!(config.max_item_quantity, 10);
        assert_eq!(config.max_charge_cents, 9_999);
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_limits_follow_config() {
        let config = Config {
            max_table_capacity: 8,
            max_item_quantity: 5,
            max_charge_cents: 500,
            ..Config::default()
        };
        let limits = config.limits();
        assert_eq!(limits.max_table_capacity, 8);
        assert_eq!(limits.max_guests, 8);
        assert_eq!(limits.max_item_quantity, 5);
        assert_eq!(limits.max_charge, Money::from_cents(500));
        assert_eq!(limits.max_menu_price, ValidationLimits::default().max_menu_price);
    }

    #[test]
    fn test_default_limits_match_domain() {
        assert_eq!(Config::default().limits(), ValidationLimits::default());
    }
}
