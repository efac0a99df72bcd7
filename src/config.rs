//! Service configuration
//!
//! Every option can come from a flag or an environment variable (which a
//! `.env` file may populate before parsing).

use crate::db::StoreOptions;
use chrono::Duration;
use clap::Parser;
use std::path::PathBuf;

/// Development-only signing secret; startup warns when it is in use.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-in-production-minimum-32-characters";

/// Upper bound on the token lifetime: one year
pub const MAX_TOKEN_TTL_MINUTES: i64 = 525_600;

/// Hospital staff records API server
#[derive(Parser, Debug, Clone)]
#[command(name = "clinic")]
#[command(about = "Hospital staff records API with role-based access")]
pub struct Config {
    /// Address to bind the HTTP server to
    #[arg(long, env = "CLINIC_BIND_ADDR", default_value = "0.0.0.0:3000")]
    pub bind: String,

    /// SQLite database file; relative paths resolve against the crate directory
    #[arg(long, env = "CLINIC_DB_PATH", default_value = "hospital.db")]
    pub db_path: String,

    /// HMAC secret used to sign access tokens
    #[arg(long, env = "JWT_SECRET", default_value = DEV_JWT_SECRET, hide_env_values = true)]
    pub jwt_secret: String,

    /// Access token lifetime in minutes (1 minute up to one year)
    #[arg(
        long,
        env = "JWT_TTL_MINUTES",
        default_value = "15",
        value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_TTL_MINUTES)
    )]
    pub token_ttl_minutes: i64,

    /// Reject patients/treatments/assignments that reference missing rows
    #[arg(
        long,
        env = "CLINIC_ENFORCE_FOREIGN_KEYS",
        action = clap::ArgAction::Set,
        default_value_t = false
    )]
    pub enforce_foreign_keys: bool,
}

impl Config {
    pub fn resolved_db_path(&self) -> String {
        resolve_data_path(&self.db_path)
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::minutes(self.token_ttl_minutes)
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            enforce_foreign_keys: self.enforce_foreign_keys,
        }
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn resolve_data_path(raw: &str) -> String {
    let p = PathBuf::from(raw);
    if p.is_absolute() || raw == ":memory:" {
        return raw.to_string();
    }

    // Treat relative paths as relative to the crate directory, not the caller's cwd.
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join(p)
        .to_string_lossy()
        .to_string()
}
