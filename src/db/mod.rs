//! Persistence layer for hospital records

pub mod store;

pub use store::{HospitalDb, StoreOptions};
