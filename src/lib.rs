//! Hospital staff records backend
//!
//! Doctors, patients, assistants, and treatments over an axum HTTP API, with
//! role-bearing JWTs and a per-route role policy.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;

pub use api::create_router;
pub use config::Config;
