use std::time::Duration;

use tablebook_core::availability::DEFAULT_SEATING_WINDOW_MINS;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background tasks, in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Load the demo catalogue and accounts on startup (default: `true`).
    pub seed_demo_data: bool,
    /// Interval of the reservation sweeper in seconds (default: `300`).
    pub sweep_interval_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Booking checkout timing and seating rules.
    pub booking: BookingConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `SEED_DEMO_DATA`       | `true`                     |
    /// | `SWEEP_INTERVAL_SECS`  | `300`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let seed_demo_data: bool = std::env::var("SEED_DEMO_DATA")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("SEED_DEMO_DATA must be true or false");

        let sweep_interval_secs: u64 = std::env::var("SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("SWEEP_INTERVAL_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();
        let booking = BookingConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            seed_demo_data,
            sweep_interval_secs,
            jwt,
            booking,
        }
    }
}

/// Default simulated payment processing delay in milliseconds.
const DEFAULT_PROCESSING_DELAY_MS: u64 = 1500;
/// Default upper bound on a payment submission in seconds.
const DEFAULT_PROCESSING_TIMEOUT_SECS: u64 = 10;
/// Default idle time before an unfinished checkout is discarded.
const DEFAULT_FLOW_IDLE_TTL_MINS: i64 = 60;
/// Default time a finished checkout stays readable.
const DEFAULT_COMPLETED_FLOW_TTL_MINS: i64 = 10;

/// Settings for the booking checkout and table assignment.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Simulated payment processing delay.
    pub processing_delay_ms: u64,
    /// A payment submission that takes longer than this fails, and a busy
    /// flag older than this is treated as stale.
    pub processing_timeout_secs: u64,
    /// Minutes a table is held on either side of a reservation start.
    pub seating_window_mins: i64,
    /// Unfinished checkouts untouched for this long are discarded.
    pub flow_idle_ttl_mins: i64,
    /// Completed checkouts are discarded this long after their last step.
    pub completed_flow_ttl_mins: i64,
}

impl BookingConfig {
    /// Load booking settings from environment variables.
    ///
    /// | Env Var                           | Default |
    /// |-----------------------------------|---------|
    /// | `BOOKING_PROCESSING_DELAY_MS`     | `1500`  |
    /// | `BOOKING_PROCESSING_TIMEOUT_SECS` | `10`    |
    /// | `SEATING_WINDOW_MINS`             | `120`   |
    /// | `BOOKING_FLOW_IDLE_TTL_MINS`      | `60`    |
    /// | `BOOKING_FLOW_COMPLETED_TTL_MINS` | `10`    |
    pub fn from_env() -> Self {
        let processing_delay_ms: u64 = std::env::var("BOOKING_PROCESSING_DELAY_MS")
            .unwrap_or_else(|_| DEFAULT_PROCESSING_DELAY_MS.to_string())
            .parse()
            .expect("BOOKING_PROCESSING_DELAY_MS must be a valid u64");

        let processing_timeout_secs: u64 = std::env::var("BOOKING_PROCESSING_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_PROCESSING_TIMEOUT_SECS.to_string())
            .parse()
            .expect("BOOKING_PROCESSING_TIMEOUT_SECS must be a valid u64");

        let seating_window_mins: i64 = std::env::var("SEATING_WINDOW_MINS")
            .unwrap_or_else(|_| DEFAULT_SEATING_WINDOW_MINS.to_string())
            .parse()
            .expect("SEATING_WINDOW_MINS must be a valid i64");

        let flow_idle_ttl_mins: i64 = std::env::var("BOOKING_FLOW_IDLE_TTL_MINS")
            .unwrap_or_else(|_| DEFAULT_FLOW_IDLE_TTL_MINS.to_string())
            .parse()
            .expect("BOOKING_FLOW_IDLE_TTL_MINS must be a valid i64");

        let completed_flow_ttl_mins: i64 = std::env::var("BOOKING_FLOW_COMPLETED_TTL_MINS")
            .unwrap_or_else(|_| DEFAULT_COMPLETED_FLOW_TTL_MINS.to_string())
            .parse()
            .expect("BOOKING_FLOW_COMPLETED_TTL_MINS must be a valid i64");

        Self {
            processing_delay_ms,
            processing_timeout_secs,
            seating_window_mins,
            flow_idle_ttl_mins,
            completed_flow_ttl_mins,
        }
    }

    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    pub fn processing_timeout(&self) -> Duration {
        Duration::from_secs(self.processing_timeout_secs)
    }

    /// Age after which a payment busy flag no longer blocks a new submission.
    pub fn stale_after(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.processing_timeout_secs as i64)
    }

    pub fn flow_idle_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.flow_idle_ttl_mins)
    }

    pub fn completed_flow_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.completed_flow_ttl_mins)
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: DEFAULT_PROCESSING_DELAY_MS,
            processing_timeout_secs: DEFAULT_PROCESSING_TIMEOUT_SECS,
            seating_window_mins: DEFAULT_SEATING_WINDOW_MINS,
            flow_idle_ttl_mins: DEFAULT_FLOW_IDLE_TTL_MINS,
            completed_flow_ttl_mins: DEFAULT_COMPLETED_FLOW_TTL_MINS,
        }
    }
}
