use std::time::Duration;

use reqwest::Client;
use serde::{Serialize, Deserialize};

use crate::ai::upstream_message;
use crate::error::ApiError;
use crate::models::{BugReportRequest, InviteRequest};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

const INVITE_FROM: &str = "Football Play Designer <noreply@crucibleanalytics.dev>";
const BUG_REPORT_FROM: &str = "GridAIron Bug Reports <noreply@crucibleanalytics.dev>";
const BUG_REPORT_TO: &str = "joseph@crucibleanalytics.dev";

const DEFAULT_APP_URL: &str = "http://localhost:5173";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A composed email ready to hand to the Resend API.
#[derive(Debug)]
pub struct EmailMessage {
    pub from: &'static str,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

/// Client for the Resend transactional email API. Cheap to clone.
#[derive(Clone)]
pub struct Mailer {
    http: Client,
    api_key: Option<String>,
    app_url: String,
}

impl Mailer {
    pub(crate) fn new(api_key: Option<String>, app_url: Option<String>) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Mailer {
            http,
            api_key,
            app_url: app_url.unwrap_or_else(|| DEFAULT_APP_URL.to_string()),
        }
    }

    /// Reads the Resend API key and frontend base URL from the environment.
    /// A missing key is not fatal at startup; email requests fail instead.
    pub fn from_env() -> Self {
        Mailer::new(
            std::env::var("RESEND_API_KEY").ok(),
            std::env::var("APP_URL").ok(),
        )
    }

    pub fn app_url(&self) -> &str {
        &self.app_url
    }

    /// Deliver a message via Resend; returns the provider message id.
    pub async fn send(&self, message: &EmailMessage) -> Result<Option<String>, ApiError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ApiError::MissingApiKey("Resend"))?;

        let request = ResendRequest {
            from: message.from,
            to: [message.to.as_str()],
            subject: &message.subject,
            html: &message.html,
            reply_to: message.reply_to.as_deref(),
        };

        tracing::debug!(to = %message.to, subject = %message.subject, "Sending email via Resend");

        let response = self
            .http
            .post(RESEND_API_URL)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = upstream_message(&response.text().await.unwrap_or_default());
            tracing::error!(%status, "Resend error: {}", message);
            return Err(ApiError::Upstream(format!("Resend {}: {}", status, message)));
        }

        let body: ResendResponse = response.json().await?;
        Ok(body.id)
    }
}

/// Team invitation email. Links to the invite-accept page on the frontend.
pub fn invite_email(req: &InviteRequest, app_url: &str) -> EmailMessage {
    let email = req.email.as_deref().unwrap_or_default();
    let role = req.role.as_deref().unwrap_or_default();
    let invited_by = req.invited_by_email.as_deref().unwrap_or_default();
    let invite_id = req.invite_id.as_deref().unwrap_or_default();
    let team_name = req.team_name.as_deref().unwrap_or("a football team");

    let invite_url = format!("{}/invite/{}", app_url, invite_id);

    let html = format!(
        "<h1>Team Invitation</h1>\
         <p><strong>{invited_by}</strong> has invited you to join their football team as a <strong>{role}</strong>.</p>\
         <p><a href=\"{invite_url}\">Accept Invitation</a></p>\
         <p>This invitation will expire in 7 days. If you don't want to join, you can simply ignore this email.</p>\
         <p>If the link doesn't work, copy and paste this URL: {invite_url}</p>"
    );

    EmailMessage {
        from: INVITE_FROM,
        to: email.to_string(),
        reply_to: None,
        subject: format!("You've been invited to join {}", team_name),
        html,
    }
}

/// Bug report email, delivered to the admin inbox with the reporter on reply-to.
pub fn bug_report_email(req: &BugReportRequest) -> EmailMessage {
    let user_email = req.user_email.as_deref().unwrap_or_default();
    let user_name = req.user_name.as_deref().unwrap_or("Not provided");
    let description = req.bug_description.as_deref().unwrap_or_default();
    let page = req.page_location.as_deref().unwrap_or("Not specified");
    let user_agent = req.user_agent.as_deref().unwrap_or("Not provided");

    let steps = req
        .steps_to_reproduce
        .as_deref()
        .map(|s| format!("<h2>Steps to Reproduce</h2><p>{s}</p>"))
        .unwrap_or_default();

    let html = format!(
        "<h1>Bug Report</h1>\
         <h2>Reporter</h2><p>{user_name} ({user_email})</p>\
         <h2>Description</h2><p>{description}</p>\
         {steps}\
         <h2>Location</h2><p>{page}</p>\
         <p><strong>User Agent:</strong> {user_agent}</p>\
         <p><strong>Timestamp:</strong> {}</p>",
        chrono::Utc::now().to_rfc3339(),
    );

    EmailMessage {
        from: BUG_REPORT_FROM,
        to: BUG_REPORT_TO.to_string(),
        reply_to: Some(user_email.to_string()),
        subject: format!(
            "Bug Report from {}",
            req.user_name.as_deref().unwrap_or(user_email)
        ),
        html,
    }
}

// Resend wire format

#[derive(Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Deserialize)]
struct ResendResponse {
    id: Option<String>,
}
