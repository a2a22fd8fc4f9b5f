use axum::{extract::State, response::Json};

use crate::error::{ApiError, ApiJson};
use crate::models::{GenerateRequest, GenerateResponse};
use crate::AppState;

// POST /api/ai - Forward a prompt to the chosen model provider
pub async fn generate_text(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    if req.prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("Prompt is required".to_string()));
    }

    let text = state.ai.generate(req.provider, &req.prompt).await?;

    Ok(Json(GenerateResponse { text }))
}
