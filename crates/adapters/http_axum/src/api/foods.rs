//! JSON REST handlers for foods.
//!
//! Identifiers are parsed before the service is called, so a malformed id
//! never reaches the store.
//!
//! A PATCH with no body, or with a body that is not declared as JSON, is an
//! empty patch and answers with the current record.

use std::str::FromStr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Map, Value};

use foodbase_app::ports::FoodRepository;
use foodbase_domain::error::FoodbaseError;
use foodbase_domain::food::{Food, FoodPatch};
use foodbase_domain::id::FoodId;

use crate::error::ApiError;
use crate::state::AppState;

/// Untyped JSON object body; fields are validated by the domain.
type ObjectBody = Result<Json<Map<String, Value>>, JsonRejection>;

/// `{ "foods": [...] }`
#[derive(Serialize)]
pub struct FoodList {
    pub foods: Vec<Food>,
}

/// `{ "food": {...} }`
#[derive(Serialize)]
pub struct FoodEnvelope {
    pub food: Food,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<FoodList>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get, update, and delete endpoints.
pub enum FoodResponse {
    Ok(Json<FoodEnvelope>),
}

impl IntoResponse for FoodResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    /// The bare created record, answered with `200 OK`.
    Created(Json<Food>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => json.into_response(),
        }
    }
}

/// Whether the request declares a JSON body (`application/json` or
/// `application/*+json`).
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence
        .strip_prefix("application/")
        .is_some_and(|subtype| subtype == "json" || subtype.ends_with("+json"))
}

/// Read the fields of a PATCH body, treating a missing body as `{}`.
fn patch_fields(headers: &HeaderMap, body: &Bytes) -> Result<Map<String, Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) || !is_json_content_type(headers) {
        return Ok(Map::new());
    }
    let Json(fields) = Json::<Map<String, Value>>::from_bytes(body)?;
    Ok(fields)
}

fn parse_id(id: &str) -> Result<FoodId, ApiError> {
    FoodId::from_str(id).map_err(|err| ApiError::from(FoodbaseError::from(err)))
}

/// `GET /foods`
pub async fn list<FR>(State(state): State<AppState<FR>>) -> Result<ListResponse, ApiError>
where
    FR: FoodRepository + Send + Sync + 'static,
{
    let foods = state.food_service.list_foods().await?;
    Ok(ListResponse::Ok(Json(FoodList { foods })))
}

/// `GET /foods/{id}`
pub async fn get<FR>(
    State(state): State<AppState<FR>>,
    Path(id): Path<String>,
) -> Result<FoodResponse, ApiError>
where
    FR: FoodRepository + Send + Sync + 'static,
{
    let food_id = parse_id(&id)?;
    let food = state.food_service.get_food(food_id).await?;
    Ok(FoodResponse::Ok(Json(FoodEnvelope { food })))
}

/// `POST /foods`
pub async fn create<FR>(
    State(state): State<AppState<FR>>,
    body: ObjectBody,
) -> Result<CreateResponse, ApiError>
where
    FR: FoodRepository + Send + Sync + 'static,
{
    let Json(fields) = body?;
    let food = Food::from_fields(&fields)?;
    let created = state.food_service.create_food(food).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PATCH /foods/{id}`
pub async fn update<FR>(
    State(state): State<AppState<FR>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<FoodResponse, ApiError>
where
    FR: FoodRepository + Send + Sync + 'static,
{
    let food_id = parse_id(&id)?;
    let fields = patch_fields(&headers, &body)?;
    let patch = FoodPatch::from_fields(&fields)?;
    let food = state.food_service.update_food(food_id, patch).await?;
    Ok(FoodResponse::Ok(Json(FoodEnvelope { food })))
}

/// `DELETE /foods/{id}`
pub async fn delete<FR>(
    State(state): State<AppState<FR>>,
    Path(id): Path<String>,
) -> Result<FoodResponse, ApiError>
where
    FR: FoodRepository + Send + Sync + 'static,
{
    let food_id = parse_id(&id)?;
    let food = state.food_service.delete_food(food_id).await?;
    Ok(FoodResponse::Ok(Json(FoodEnvelope { food })))
}
