//! # foodbase-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port trait defined in `foodbase-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//! - Enforce record constraints a second time through table `CHECK`s
//!
//! ## Dependency rule
//! Depends on `foodbase-app` (for port traits) and `foodbase-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod food_repo;
mod pool;

pub use error::StorageError;
pub use food_repo::SqliteFoodRepository;
pub use pool::{Config, Database};
