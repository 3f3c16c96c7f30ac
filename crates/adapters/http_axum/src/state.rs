//! Shared application state for axum handlers.

use std::sync::Arc;

use foodbase_app::ports::FoodRepository;
use foodbase_app::services::food_service::FoodService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository type to avoid dynamic dispatch.
/// `Clone` is implemented manually so the repository itself does not
/// need to be `Clone`: only the `Arc` wrapper is cloned.
pub struct AppState<FR> {
    /// Food CRUD service.
    pub food_service: Arc<FoodService<FR>>,
}

impl<FR> Clone for AppState<FR> {
    fn clone(&self) -> Self {
        Self {
            food_service: Arc::clone(&self.food_service),
        }
    }
}

impl<FR> AppState<FR>
where
    FR: FoodRepository + Send + Sync + 'static,
{
    /// Create a new application state from a service instance.
    pub fn new(food_service: FoodService<FR>) -> Self {
        Self {
            food_service: Arc::new(food_service),
        }
    }

    /// Create a new application state from a pre-wrapped `Arc` service.
    ///
    /// Use this when the service is also needed outside the HTTP layer,
    /// e.g. to seed or reset the store.
    pub fn from_arc(food_service: Arc<FoodService<FR>>) -> Self {
        Self { food_service }
    }
}
