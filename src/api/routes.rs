//! HTTP 路由

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};
use super::server::AppState;
use crate::notification::{Channel, CreateNotificationRequest, DeliveryReport, NotificationItem};

/// 创建路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/notifications", post(create_notification))
        .route("/api/notifications", get(list_notifications))
        .route("/api/notifications/{id}/read", post(mark_notification_read))
        .route("/api/health", get(health))
        .with_state(state)
}

// 请求 / 响应

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationResponse {
    pub success: bool,
    pub id: String,
    pub channels: Vec<Channel>,
    pub deliveries: Vec<DeliveryReport>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

// 处理函数

/// `POST /notifications`
pub async fn create_notification(
    State(state): State<AppState>,
    body: Result<Json<CreateNotificationRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreateNotificationResponse>)> {
    let Json(request) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let outcome = state.service.create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateNotificationResponse {
            success: true,
            id: outcome.notification.id.to_string(),
            channels: outcome.channels,
            deliveries: outcome.deliveries,
        }),
    ))
}

/// `GET /api/notifications[?userId=]`
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<NotificationItem>> {
    Json(state.inbox.list(query.user_id.as_deref()).await)
}

/// `POST /api/notifications/{id}/read`
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AckResponse>> {
    state.inbox.mark_read(&id).await?;
    tracing::debug!(id = %id, "Notification marked as read");
    Ok(Json(AckResponse { success: true }))
}

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationBuilder;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn app() -> (Router, AppState) {
        let system = NotificationBuilder::new().build();
        let state = AppState::new(system.service, system.inbox);
        (create_router(state.clone()), state)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_notification_returns_201_with_channels() {
        let (app, _) = app();
        let response = app
            .oneshot(post_json(
                "/notifications",
                serde_json::json!({"userId": "u1", "message": "hi", "importance": "high"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["channels"], serde_json::json!(["sms", "email", "in-app"]));
        assert_eq!(body["deliveries"].as_array().unwrap().len(), 3);
        assert_eq!(body["deliveries"][0]["status"], "sent");
    }

    #[tokio::test]
    async fn test_create_notification_unknown_importance_is_400() {
        let (app, state) = app();
        let response = app
            .oneshot(post_json(
                "/notifications",
                serde_json::json!({"userId": "u1", "message": "hi", "importance": "urgent"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "unknown importance: urgent");
        assert!(state.inbox.list(None).await.is_empty());
    }

    #[tokio::test]
    async fn test_create_notification_malformed_body_is_400() {
        let (app, _) = app();
        let response = app
            .oneshot(post_json("/notifications", serde_json::json!({"userId": "u1"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_list_and_mark_read() {
        let (app, _) = app();
        let response = app
            .clone()
            .oneshot(post_json(
                "/notifications",
                serde_json::json!({"userId": "alice", "message": "hello", "importance": "normal"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let list = |uri: &'static str| {
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .unwrap()
        };

        let response = app
            .clone()
            .oneshot(list("/api/notifications?userId=alice"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let items: Vec<NotificationItem> =
            serde_json::from_value(json_body(response).await).unwrap();
        assert_eq!(items.len(), 1);
        assert!(!items[0].read);

        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/notifications/{}/read", items[0].id),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["success"], true);

        let response = app
            .oneshot(list("/api/notifications?userId=alice"))
            .await
            .unwrap();
        let items: Vec<NotificationItem> =
            serde_json::from_value(json_body(response).await).unwrap();
        assert!(items[0].read);
    }

    #[tokio::test]
    async fn test_mark_unknown_notification_is_404() {
        let (app, _) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/notifications/missing/read")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    struct FailingPreferences;

    #[async_trait::async_trait]
    impl crate::preference::PreferenceStore for FailingPreferences {
        async fn get_by_user_id(
            &self,
            _user_id: &str,
        ) -> anyhow::Result<crate::preference::UserPreference> {
            Err(anyhow::anyhow!("preference backend down"))
        }
    }

    #[tokio::test]
    async fn test_preference_failure_is_500_with_inner_message() {
        let system = NotificationBuilder::new()
            .preferences(std::sync::Arc::new(FailingPreferences))
            .build();
        let app = create_router(AppState::new(system.service, system.inbox));

        let response = app
            .oneshot(post_json(
                "/notifications",
                serde_json::json!({"userId": "u1", "message": "hi", "importance": "low"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "preference backend down");
    }
}
