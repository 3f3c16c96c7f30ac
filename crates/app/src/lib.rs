//! # foodbase-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `FoodRepository`: create, find, merge-update, delete, remove-all
//! - Define **driving/inbound ports** as use-case structs:
//!   - `FoodService`: list, get, create, update, delete
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `foodbase-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
