use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use super::ApiError;
use crate::{
    adapters::inbound::http::{activity_responses, ActivityResponse},
    app_state::AppState,
    domain::{
        models::{ActivityId, StartActivityRequest},
        ActivityError,
    },
};

/// Carries the id of the activity a request acted on.
const ENTITY_HEADER: &str = "entity";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_activities).post(start_activity))
        .route("/search", get(search_activities))
        .route("/:id", get(get_activity).delete(delete_activity))
        .route("/:id/stop", put(stop_activity))
        .route("/:id/category", put(update_category))
        .route("/:id/description", put(update_description))
}

fn require_category(category: &str) -> Result<(), ActivityError> {
    if category.trim().is_empty() {
        return Err(ActivityError::validation("category must not be blank"));
    }
    Ok(())
}

// ============================================================================
// Start / Stop
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartActivityPayload {
    category: String,
    #[serde(default)]
    description: String,
}

#[instrument(name = "start_activity", skip(app_state))]
async fn start_activity(
    State(app_state): State<AppState>,
    Json(body): Json<StartActivityPayload>,
) -> Result<impl IntoResponse, ApiError> {
    require_category(&body.category)?;

    let request = StartActivityRequest::new(body.category).with_description(body.description);
    let activity = app_state.activity_service.start_activity(&request).await?;
    let location = format!("/activities/{}", activity.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ActivityResponse::from(activity)),
    ))
}

#[instrument(name = "stop_activity", skip(app_state))]
async fn stop_activity(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ActivityResponse>, ApiError> {
    let activity = app_state
        .activity_service
        .stop_activity(&ActivityId::new(id))
        .await?;

    Ok(Json(activity.into()))
}

// ============================================================================
// Updates
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryPayload {
    category: String,
}

#[instrument(name = "update_category", skip(app_state))]
async fn update_category(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCategoryPayload>,
) -> Result<Json<ActivityResponse>, ApiError> {
    require_category(&body.category)?;

    let activity = app_state
        .activity_service
        .update_category(&ActivityId::new(id), &body.category)
        .await?;

    Ok(Json(activity.into()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateDescriptionPayload {
    description: String,
}

#[instrument(name = "update_description", skip(app_state))]
async fn update_description(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateDescriptionPayload>,
) -> Result<Json<ActivityResponse>, ApiError> {
    let activity = app_state
        .activity_service
        .update_description(&ActivityId::new(id), &body.description)
        .await?;

    Ok(Json(activity.into()))
}

// ============================================================================
// Queries
// ============================================================================

#[instrument(name = "get_activity", skip(app_state))]
async fn get_activity(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ActivityResponse>, ApiError> {
    let activity = app_state
        .activity_service
        .get_activity(&ActivityId::new(id))
        .await?;

    Ok(Json(activity.into()))
}

#[instrument(name = "list_activities", skip(app_state))]
async fn list_activities(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<ActivityResponse>>, ApiError> {
    let activities = app_state.activity_service.list_activities().await?;

    Ok(Json(activity_responses(activities)))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    term: String,
}

#[instrument(name = "search_activities", skip(app_state))]
async fn search_activities(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ActivityResponse>>, ApiError> {
    let activities = app_state
        .activity_service
        .search_activities(&query.term)
        .await?;

    Ok(Json(activity_responses(activities)))
}

// ============================================================================
// Delete
// ============================================================================

#[instrument(name = "delete_activity", skip(app_state))]
async fn delete_activity(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = app_state
        .activity_service
        .delete_activity(&ActivityId::new(id))
        .await?;

    Ok((StatusCode::NO_CONTENT, [(ENTITY_HEADER, deleted.to_string())]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{body::Body, http::Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{
        adapters::outbound::mock::MockActivityRepository, domain::services::ActivityServiceImpl,
    };

    fn test_app() -> (Router, AppState) {
        let service = ActivityServiceImpl::new(Arc::new(MockActivityRepository::new()));
        let state = AppState::new(Arc::new(service));
        let app = Router::new()
            .nest("/activities", router())
            .with_state(state.clone());
        (app, state)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn start(app: &Router, category: &str) -> Value {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/activities",
                json!({ "category": category, "description": "from test" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[tokio::test]
    async fn start_returns_created_with_location() {
        let (app, _) = test_app();

        let response = app
            .oneshot(json_request(
                "POST",
                "/activities",
                json!({ "category": "coding" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], "/activities/1");

        let body = body_json(response).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["category"], "coding");
        assert_eq!(body["description"], "");
        assert_eq!(body["status"], "STARTED");
        assert!(body["finished_at"].is_null());
    }

    #[tokio::test]
    async fn blank_category_is_rejected() {
        let (app, _) = test_app();

        let response = app
            .clone()
            .oneshot(json_request("POST", "/activities", json!({ "category": "  " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        start(&app, "coding").await;
        let response = app
            .oneshot(json_request(
                "PUT",
                "/activities/1/category",
                json!({ "category": "" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn starting_again_finishes_previous_activity() {
        let (app, state) = test_app();

        start(&app, "coding").await;
        start(&app, "meeting").await;
        state.activity_service.drain().await;

        let first = body_json(
            app.clone()
                .oneshot(empty_request("GET", "/activities/1"))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(first["status"], "FINISHED");
        assert!(first["finished_at"].is_string());

        let second = body_json(app.oneshot(empty_request("GET", "/activities/2")).await.unwrap()).await;
        assert_eq!(second["status"], "STARTED");
    }

    #[tokio::test]
    async fn stop_finishes_activity() {
        let (app, _) = test_app();
        start(&app, "coding").await;

        let response = app
            .oneshot(empty_request("PUT", "/activities/1/stop"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "FINISHED");
    }

    #[tokio::test]
    async fn unknown_activity_is_not_found() {
        let (app, _) = test_app();

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/activities/99"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "activity not found: 99");

        let response = app
            .oneshot(empty_request("PUT", "/activities/99/stop"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn description_update_is_returned() {
        let (app, _) = test_app();
        start(&app, "coding").await;

        let response = app
            .oneshot(json_request(
                "PUT",
                "/activities/1/description",
                json!({ "description": "pairing on parser" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["description"], "pairing on parser");
    }

    #[tokio::test]
    async fn delete_removes_activity() {
        let (app, _) = test_app();
        start(&app, "coding").await;

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", "/activities/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()["entity"], "1");

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/activities/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(empty_request("DELETE", "/activities/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_and_search() {
        let (app, state) = test_app();
        start(&app, "coding").await;
        start(&app, "Meeting").await;
        state.activity_service.drain().await;

        let all = body_json(app.clone().oneshot(empty_request("GET", "/activities")).await.unwrap()).await;
        assert_eq!(all.as_array().unwrap().len(), 2);

        let found = body_json(
            app.oneshot(empty_request("GET", "/activities/search?term=meet"))
                .await
                .unwrap(),
        )
        .await;
        let found = found.as_array().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["category"], "Meeting");
    }

    #[tokio::test]
    async fn malformed_id_is_rejected() {
        let (app, _) = test_app();

        let response = app
            .oneshot(empty_request("GET", "/activities/abc"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
