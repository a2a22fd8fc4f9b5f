use serde::{Serialize, Deserialize};

/// A pixel coordinate in image space.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Optional hints mapping image pixel space to field measurements.
///
/// Every field is three-state: absent or null means "unknown", which is not
/// the same thing as zero. Keep them as Options end to end.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Calibration {
    pub los_y: Option<f64>,
    pub yard_scale: Option<f64>,
    pub rotation_deg: Option<f64>,
}

/// Reference points describing the field's perspective quadrilateral.
/// No minimum count is enforced; an empty list is accepted.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Perspective {
    pub p: Vec<Point>,
}

/// Request body for POST /api/analyze-image
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Storage locator for the play image (e.g. "gs://bucket/img.png").
    /// Opaque; not validated beyond being a string.
    pub gcs_path: String,
    #[serde(default)]
    pub calibrated: Option<Calibration>,
    #[serde(default)]
    pub perspective: Option<Perspective>,
}

/// A detected player placed at a pixel position.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Token {
    pub id: String,
    pub role: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// A polyline path anchored to a token.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    /// Id of the token this route starts from. Referential integrity against
    /// the response's token list is not enforced on the wire.
    pub token_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub points: Vec<Point>,
}

/// Response body for POST /api/analyze-image
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub formation_guess: String,
    pub coverage_guess: String,
    pub confidence: f64,
    pub tokens: Vec<Token>,
    pub routes: Vec<Route>,
}

impl AnalyzeResponse {
    /// Stand-in analysis returned until the vision model is wired up.
    pub fn placeholder() -> Self {
        AnalyzeResponse {
            formation_guess: "Trips Right".to_string(),
            coverage_guess: "Cover 3".to_string(),
            confidence: 0.77,
            tokens: vec![
                Token { id: "QB".into(), role: "QB".into(), label: "QB".into(), x: 360.0, y: 330.0 },
                Token { id: "WR1".into(), role: "WR".into(), label: "WR1".into(), x: 220.0, y: 220.0 },
                Token { id: "WR2".into(), role: "WR".into(), label: "WR2".into(), x: 480.0, y: 210.0 },
            ],
            routes: vec![
                Route {
                    id: "r1".into(),
                    token_id: "WR1".into(),
                    kind: "route".into(),
                    points: vec![
                        Point { x: 220.0, y: 220.0 },
                        Point { x: 280.0, y: 180.0 },
                        Point { x: 320.0, y: 160.0 },
                    ],
                },
                Route {
                    id: "r2".into(),
                    token_id: "WR2".into(),
                    kind: "route".into(),
                    points: vec![
                        Point { x: 480.0, y: 210.0 },
                        Point { x: 540.0, y: 170.0 },
                    ],
                },
            ],
        }
    }
}

/// Request body for POST /api/ai
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default)]
    pub provider: Provider,
}

/// Which upstream model serves a generate request.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    Anthropic,
}

/// Response body for POST /api/ai
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub text: String,
}

/// Request body for POST /api/send-invite
///
/// Required fields are modelled as Options so the handler can answer a plain
/// 400 "Missing required fields" whether a field is absent or empty.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub invite_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub invited_by_email: Option<String>,
    #[serde(default)]
    pub team_name: Option<String>,
}

/// Request body for POST /api/send-bug-report
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BugReportRequest {
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub bug_description: Option<String>,
    #[serde(default)]
    pub steps_to_reproduce: Option<String>,
    #[serde(default)]
    pub page_location: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// Response body for the email endpoints
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSendResponse {
    pub success: bool,
    pub message_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_request_accepts_minimal_body() {
        let req: AnalyzeRequest =
            serde_json::from_str(r#"{"gcsPath": "gs://bucket/img.png"}"#).unwrap();
        assert_eq!(req.gcs_path, "gs://bucket/img.png");
        assert!(req.calibrated.is_none());
        assert!(req.perspective.is_none());
    }

    #[test]
    fn analyze_request_rejects_missing_gcs_path() {
        let err = serde_json::from_str::<AnalyzeRequest>(r#"{"calibrated": null}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("gcsPath"));
    }

    #[test]
    fn analyze_request_rejects_non_numeric_calibration() {
        let body = r#"{"gcsPath": "g", "calibrated": {"losY": "high"}}"#;
        assert!(serde_json::from_str::<AnalyzeRequest>(body).is_err());
    }

    #[test]
    fn partial_calibration_keeps_absent_fields_unknown() {
        let body = r#"{"gcsPath": "g", "calibrated": {"losY": 330.5}}"#;
        let req: AnalyzeRequest = serde_json::from_str(body).unwrap();
        let cal = req.calibrated.unwrap();
        assert_eq!(cal.los_y, Some(330.5));
        assert!(cal.yard_scale.is_none());
        assert!(cal.rotation_deg.is_none());
    }

    #[test]
    fn empty_perspective_is_accepted() {
        let body = r#"{"gcsPath": "g", "perspective": {"p": []}}"#;
        let req: AnalyzeRequest = serde_json::from_str(body).unwrap();
        assert!(req.perspective.unwrap().p.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let body = r#"{"gcsPath": "g", "somethingElse": 42}"#;
        assert!(serde_json::from_str::<AnalyzeRequest>(body).is_ok());
    }

    #[test]
    fn placeholder_routes_reference_existing_tokens() {
        let resp = AnalyzeResponse::placeholder();
        assert!(!resp.tokens.is_empty());
        assert!(resp.confidence >= 0.0 && resp.confidence <= 1.0);
        for route in &resp.routes {
            assert!(resp.tokens.iter().any(|t| t.id == route.token_id));
        }
    }

    #[test]
    fn route_kind_serializes_as_type() {
        let json = serde_json::to_value(AnalyzeResponse::placeholder()).unwrap();
        assert_eq!(json["routes"][0]["type"], "route");
        assert_eq!(json["routes"][0]["tokenId"], "WR1");
    }

    #[test]
    fn generate_request_defaults_to_gemini() {
        let req: GenerateRequest = serde_json::from_str(r#"{"prompt": "hi"}"#).unwrap();
        assert_eq!(req.provider, Provider::Gemini);

        let req: GenerateRequest =
            serde_json::from_str(r#"{"prompt": "hi", "provider": "anthropic"}"#).unwrap();
        assert_eq!(req.provider, Provider::Anthropic);
    }

    #[test]
    fn generate_request_rejects_unknown_provider() {
        assert!(
            serde_json::from_str::<GenerateRequest>(r#"{"prompt": "hi", "provider": "openai"}"#)
                .is_err()
        );
    }
}
