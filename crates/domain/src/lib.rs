//! # foodbase-domain
//!
//! Pure domain model for the foodbase nutrition service.
//!
//! ## Responsibilities
//! - Foundational types: the opaque [`FoodId`](id::FoodId), error conventions, timestamps
//! - Define the **Food** record and its field constraints
//! - Define **partial updates** restricted to a fixed allow-list of fields
//! - Read untyped request bodies into validated values
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod fields;
pub mod food;
pub mod id;
pub mod time;
