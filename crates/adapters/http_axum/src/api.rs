//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod foods;

use axum::Router;
use axum::routing::get;

use foodbase_app::ports::FoodRepository;

use crate::state::AppState;

/// Build the food API sub-router.
pub fn routes<FR>() -> Router<AppState<FR>>
where
    FR: FoodRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/foods", get(foods::list::<FR>).post(foods::create::<FR>))
        .route(
            "/foods/{id}",
            get(foods::get::<FR>)
                .patch(foods::update::<FR>)
                .delete(foods::delete::<FR>),
        )
}
