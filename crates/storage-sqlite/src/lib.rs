//! SQLite storage implementation for Fundpulse.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `fundpulse-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for funds, holdings, and NAV history
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. The core crate is database-agnostic and works with traits.
//!
//! Reads go straight to the r2d2 pool; every write runs on the single-writer
//! actor inside an immediate transaction, which is what gives the holdings
//! sync its replace-holdings-and-allocation-atomically guarantee.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod funds;
pub mod holdings;
pub mod nav_history;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};
