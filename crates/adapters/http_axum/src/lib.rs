//! # foodbase-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON food API** (`/foods`, `/foods/{id}`)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and errors into HTTP status codes and JSON bodies
//!
//! ## Status mapping
//! - malformed or unknown identifier → `404`
//! - validation failure or unreadable body → `400` with field detail
//! - any other store failure → `400`
//!
//! ## Dependency rule
//! Depends on `foodbase-app` (for port traits and services) and `foodbase-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
