use axum::response::Json;

use crate::ai;
use crate::error::ApiJson;
use crate::models::{AnalyzeRequest, AnalyzeResponse};

// POST /api/analyze-image - Describe the play shown in an uploaded image
//
// Validation of the body shape is handled by the extractor; a malformed
// request never reaches this handler.
pub async fn analyze_image(ApiJson(req): ApiJson<AnalyzeRequest>) -> Json<AnalyzeResponse> {
    // TODO: send the image at req.gcs_path together with this prompt to the
    // vision model, parse its JSON output into AnalyzeResponse, and surface
    // upstream failures as 502 instead of returning the placeholder.
    let prompt = ai::analysis_prompt(&req);
    tracing::debug!(gcs_path = %req.gcs_path, "Analysis prompt pending model integration:\n{}", prompt);

    Json(AnalyzeResponse::placeholder())
}
