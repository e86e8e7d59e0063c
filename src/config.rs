use std::env;
use std::time::Duration;

use crate::error::AppError;
use crate::models::waypoint::{Warehouse, Waypoint};

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub tick_period_ms: u64,
    pub event_buffer_size: usize,
    pub warehouse_lat: f64,
    pub warehouse_lng: f64,
    pub sim_seed: Option<u64>,
    pub seed_listings: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let config = Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            tick_period_ms: parse_or_default("TICK_PERIOD_MS", 1200)?,
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
            warehouse_lat: parse_or_default("WAREHOUSE_LAT", Warehouse::DEFAULT_LOCATION.lat)?,
            warehouse_lng: parse_or_default("WAREHOUSE_LNG", Warehouse::DEFAULT_LOCATION.lng)?,
            sim_seed: parse_optional("SIM_SEED")?,
            seed_listings: parse_or_default("SEED_LISTINGS", true)?,
        };

        if config.tick_period_ms == 0 {
            return Err(AppError::Config("TICK_PERIOD_MS must be > 0".to_string()));
        }

        if config.event_buffer_size == 0 {
            return Err(AppError::Config("EVENT_BUFFER_SIZE must be > 0".to_string()));
        }

        if !config.warehouse().location.is_finite() {
            return Err(AppError::Config("warehouse coordinates must be finite".to_string()));
        }

        Ok(config)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn warehouse(&self) -> Warehouse {
        Warehouse::new(
            Warehouse::DEFAULT_NAME,
            Waypoint::new(self.warehouse_lat, self.warehouse_lng),
        )
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_optional(key)?.unwrap_or(default))
}

fn parse_optional<T>(key: &str) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|err| AppError::Config(format!("{key}: {err}"))),
        Err(_) => Ok(None),
    }
}
