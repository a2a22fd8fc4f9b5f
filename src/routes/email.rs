use axum::{extract::State, response::Json};

use crate::error::{ApiError, ApiJson};
use crate::mailer;
use crate::models::{BugReportRequest, EmailSendResponse, InviteRequest};
use crate::AppState;

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.is_empty())
}

// POST /api/send-invite - Email a team invitation link
pub async fn send_invite(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<InviteRequest>,
) -> Result<Json<EmailSendResponse>, ApiError> {
    if !present(&req.email)
        || !present(&req.invite_id)
        || !present(&req.role)
        || !present(&req.invited_by_email)
    {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    }

    let message = mailer::invite_email(&req, state.mailer.app_url());
    let message_id = state.mailer.send(&message).await?;

    Ok(Json(EmailSendResponse { success: true, message_id }))
}

// POST /api/send-bug-report - Forward a bug report to the admin inbox
pub async fn send_bug_report(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BugReportRequest>,
) -> Result<Json<EmailSendResponse>, ApiError> {
    if !present(&req.user_email) || !present(&req.bug_description) {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    }

    let message = mailer::bug_report_email(&req);
    let message_id = state.mailer.send(&message).await?;

    Ok(Json(EmailSendResponse { success: true, message_id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiClient;
    use crate::mailer::Mailer;
    use axum::{body::Body, http::{Request, StatusCode}, routing::post, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        // No Resend key configured; delivery fails before any network I/O.
        Router::new()
            .route("/api/send-invite", post(send_invite))
            .route("/api/send-bug-report", post(send_bug_report))
            .with_state(AppState {
                ai: AiClient::new(None, None),
                mailer: Mailer::new(None, None),
            })
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn invite_with_missing_fields_is_rejected() {
        let response = app()
            .oneshot(post_json(
                "/api/send-invite",
                r#"{"email": "player@example.com", "role": "coach"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Missing required fields");
    }

    #[tokio::test]
    async fn invite_with_empty_field_is_rejected() {
        let response = app()
            .oneshot(post_json(
                "/api/send-invite",
                r#"{"email": "", "inviteId": "inv-1", "role": "player",
                    "invitedByEmail": "coach@example.com"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn complete_invite_without_resend_key_is_a_server_error() {
        let response = app()
            .oneshot(post_json(
                "/api/send-invite",
                r#"{"email": "player@example.com", "inviteId": "inv-1",
                    "role": "player", "invitedByEmail": "coach@example.com",
                    "teamName": "Wildcats"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Resend API key not configured");
    }

    #[tokio::test]
    async fn bug_report_without_description_is_rejected() {
        let response = app()
            .oneshot(post_json(
                "/api/send-bug-report",
                r#"{"userEmail": "player@example.com"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Missing required fields");
    }

    #[tokio::test]
    async fn complete_bug_report_without_resend_key_is_a_server_error() {
        let response = app()
            .oneshot(post_json(
                "/api/send-bug-report",
                r#"{"userEmail": "player@example.com", "bugDescription": "Canvas flickers"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
