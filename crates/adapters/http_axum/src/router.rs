//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use foodbase_app::ports::FoodRepository;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Mounts the food API at the root next to a `/health` probe.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<FR>(state: AppState<FR>) -> Router
where
    FR: FoodRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .merge(crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use foodbase_app::services::food_service::FoodService;
    use foodbase_domain::error::FoodbaseError;
    use foodbase_domain::food::{Food, FoodPatch};
    use foodbase_domain::id::FoodId;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    /// Holds at most one food and counts every store call.
    struct StubFoodRepo {
        food: Option<Food>,
        calls: Arc<AtomicUsize>,
    }

    impl StubFoodRepo {
        fn find(&self, id: FoodId) -> Option<Food> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.food.clone().filter(|food| food.id == id)
        }
    }

    impl FoodRepository for StubFoodRepo {
        async fn create(&self, food: Food) -> Result<Food, FoodbaseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(food)
        }
        async fn get_by_id(&self, id: FoodId) -> Result<Option<Food>, FoodbaseError> {
            Ok(self.find(id))
        }
        async fn get_all(&self) -> Result<Vec<Food>, FoodbaseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.food.clone().into_iter().collect())
        }
        async fn update(
            &self,
            id: FoodId,
            patch: FoodPatch,
        ) -> Result<Option<Food>, FoodbaseError> {
            Ok(self.find(id).map(|food| patch.apply_to(food)))
        }
        async fn delete(&self, id: FoodId) -> Result<Option<Food>, FoodbaseError> {
            Ok(self.find(id))
        }
        async fn delete_all(&self) -> Result<u64, FoodbaseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }
    }

    struct BrokenFoodRepo;

    fn broken() -> FoodbaseError {
        FoodbaseError::Storage(Box::new(std::io::Error::other("connection reset")))
    }

    impl FoodRepository for BrokenFoodRepo {
        async fn create(&self, _food: Food) -> Result<Food, FoodbaseError> {
            Err(broken())
        }
        async fn get_by_id(&self, _id: FoodId) -> Result<Option<Food>, FoodbaseError> {
            Err(broken())
        }
        async fn get_all(&self) -> Result<Vec<Food>, FoodbaseError> {
            Err(broken())
        }
        async fn update(
            &self,
            _id: FoodId,
            _patch: FoodPatch,
        ) -> Result<Option<Food>, FoodbaseError> {
            Err(broken())
        }
        async fn delete(&self, _id: FoodId) -> Result<Option<Food>, FoodbaseError> {
            Err(broken())
        }
        async fn delete_all(&self) -> Result<u64, FoodbaseError> {
            Err(broken())
        }
    }

    fn banana() -> Food {
        Food::builder()
            .name("banana")
            .carbs(4.0)
            .prot(0.2)
            .fat(1.0)
            .build()
            .unwrap()
    }

    fn stub_app(food: Option<Food>) -> (Router, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let repo = StubFoodRepo {
            food,
            calls: Arc::clone(&calls),
        };
        (build(AppState::new(FoodService::new(repo))), calls)
    }

    fn broken_app() -> Router {
        build(AppState::new(FoodService::new(BrokenFoodRepo)))
    }

    fn request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let (app, _) = stub_app(None);
        let (status, _) = send(app, request("GET", "/health")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn should_wrap_list_in_foods_key() {
        let food = banana();
        let (app, _) = stub_app(Some(food.clone()));

        let (status, json) = send(app, request("GET", "/foods")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["foods"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["foods"][0]["_id"], json!(food.id.to_string()));
    }

    #[tokio::test]
    async fn should_wrap_single_food_in_food_key() {
        let food = banana();
        let (app, _) = stub_app(Some(food.clone()));

        let (status, json) = send(app, request("GET", &format!("/foods/{}", food.id))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["food"]["_id"], json!(food.id.to_string()));
        assert_eq!(json["food"]["name"], json!("banana"));
    }

    #[tokio::test]
    async fn should_return_not_found_without_store_call_when_id_malformed() {
        for (method, body) in [("GET", None), ("DELETE", None), ("PATCH", Some(json!({ "name": "apple" })))] {
            let (app, calls) = stub_app(Some(banana()));
            let req = match &body {
                Some(body) => json_request(method, "/foods/123", body),
                None => request(method, "/foods/123"),
            };

            let (status, _) = send(app, req).await;

            assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
            assert_eq!(calls.load(Ordering::SeqCst), 0, "{method}");
        }
    }

    #[tokio::test]
    async fn should_return_not_found_when_id_unknown() {
        let (app, _) = stub_app(Some(banana()));
        let (status, json) = send(app, request("DELETE", &format!("/foods/{}", FoodId::new()))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json.get("fields").is_none());
    }

    #[tokio::test]
    async fn should_return_created_food_as_bare_record() {
        let (app, _) = stub_app(None);
        let body = json!({ "name": "  kiwi ", "carbs": 15, "prot": 1.1, "fat": 0.5, "extra": true });

        let (status, json) = send(app, json_request("POST", "/foods", &body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], json!("kiwi"));
        assert_eq!(json["carbs"].as_f64(), Some(15.0));
        assert!(json["_id"].as_str().is_some_and(FoodId::is_valid));
        assert!(json.get("extra").is_none());
    }

    #[tokio::test]
    async fn should_reject_empty_create_body_with_field_detail() {
        let (app, calls) = stub_app(None);

        let (status, json) = send(app, json_request("POST", "/foods", &json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let fields: Vec<&str> = json["fields"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|field| field["field"].as_str())
            .collect();
        assert_eq!(fields, vec!["name", "carbs", "prot", "fat"]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn should_reject_body_that_is_not_a_json_object() {
        let (app, _) = stub_app(None);
        let req = Request::builder()
            .method("POST")
            .uri("/foods")
            .header("content-type", "application/json")
            .body(Body::from("[1, 2, 3]"))
            .unwrap();

        let (status, json) = send(app, req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn should_reject_body_without_json_content_type() {
        let (app, _) = stub_app(None);
        let req = Request::builder()
            .method("POST")
            .uri("/foods")
            .body(Body::from("name=banana"))
            .unwrap();

        let (status, _) = send(app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_ignore_fields_outside_allow_list_when_patching() {
        let food = banana();
        let (app, _) = stub_app(Some(food.clone()));
        let body = json!({ "name": "apple", "_id": "000000000000000000000000", "servingSize": 5 });

        let (status, json) = send(app, json_request("PATCH", &format!("/foods/{}", food.id), &body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["food"]["_id"], json!(food.id.to_string()));
        assert_eq!(json["food"]["name"], json!("apple"));
        assert_eq!(json["food"]["carbs"].as_f64(), Some(4.0));
        assert!(json["food"].get("servingSize").is_none());
    }

    #[tokio::test]
    async fn should_treat_missing_patch_body_as_empty_patch() {
        let food = banana();
        let uri = format!("/foods/{}", food.id);
        let empty_json = Request::builder()
            .method("PATCH")
            .uri(&uri)
            .header("content-type", "application/json")
            .body(Body::empty())
            .unwrap();

        for req in [request("PATCH", &uri), empty_json] {
            let (app, _) = stub_app(Some(food.clone()));
            let (status, json) = send(app, req).await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["food"]["name"], json!("banana"));
            assert_eq!(json["food"]["carbs"].as_f64(), Some(4.0));
        }
    }

    #[tokio::test]
    async fn should_still_reject_malformed_patch_json() {
        let food = banana();
        let (app, _) = stub_app(Some(food.clone()));
        let req = Request::builder()
            .method("PATCH")
            .uri(format!("/foods/{}", food.id))
            .header("content-type", "application/json; charset=utf-8")
            .body(Body::from("{\"name\":"))
            .unwrap();

        let (status, json) = send(app, req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn should_reject_invalid_patch_value() {
        let food = banana();
        let (app, _) = stub_app(Some(food.clone()));
        let body = json!({ "prot": -2 });

        let (status, json) = send(app, json_request("PATCH", &format!("/foods/{}", food.id), &body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["fields"][0]["field"], json!("prot"));
    }

    #[tokio::test]
    async fn should_map_store_failures_to_bad_request() {
        let id = FoodId::new();
        let requests = [
            request("GET", "/foods"),
            request("GET", &format!("/foods/{id}")),
            request("DELETE", &format!("/foods/{id}")),
            json_request("PATCH", &format!("/foods/{id}"), &json!({ "fat": 1 })),
            json_request(
                "POST",
                "/foods",
                &json!({ "name": "banana", "carbs": 4, "prot": 0.2, "fat": 1 }),
            ),
        ];

        for req in requests {
            let uri = req.uri().to_string();
            let (status, json) = send(broken_app(), req).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(json["error"], json!("storage error"), "{uri}");
        }
    }
}
