use std::env;

use crate::services::FeeSchedule;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// SQLite database path.
    pub database_path: String,
    /// Brokerage rate as a fraction of notional.
    pub fee_brokerage_rate: f64,
    /// Lower clamp on the brokerage fee.
    pub fee_brokerage_min: f64,
    /// Upper clamp on the brokerage fee (0 = no cap).
    pub fee_brokerage_max: f64,
    /// Flat convenience fee per limit/stop order.
    pub fee_convenience_flat: f64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "tally.db".to_string()),
            fee_brokerage_rate: parse_f64("FEE_BROKERAGE_RATE", 0.0),
            fee_brokerage_min: parse_f64("FEE_BROKERAGE_MIN", 0.0),
            fee_brokerage_max: parse_f64("FEE_BROKERAGE_MAX", 0.0),
            fee_convenience_flat: parse_f64("FEE_CONVENIENCE_FLAT", 0.0),
        }
    }

    /// Build the fee schedule from the configured values.
    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule {
            brokerage_rate: self.fee_brokerage_rate,
            brokerage_min: self.fee_brokerage_min,
            brokerage_max: self.fee_brokerage_max,
            convenience_flat: self.fee_convenience_flat,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        // Env vars may leak between tests, so only assert the stable bits
        let config = Config::from_env();
        assert!(!config.host.is_empty());
        assert!(config.port > 0);
        assert!(!config.database_path.is_empty());
    }

    #[test]
    fn test_fee_schedule_mapping() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database_path: ":memory:".to_string(),
            fee_brokerage_rate: 0.001,
            fee_brokerage_min: 1.0,
            fee_brokerage_max: 20.0,
            fee_convenience_flat: 5.0,
        };

        let schedule = config.fee_schedule();
        assert_eq!(schedule.brokerage_rate, 0.001);
        assert_eq!(schedule.convenience_flat, 5.0);
    }
}
