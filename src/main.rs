use axum::{routing::{get, post}, Router};
use std::net::{Ipv4Addr, SocketAddr};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod ai;
mod error;
mod mailer;
mod models;
mod routes;

use ai::AiClient;
use mailer::Mailer;

/// Shared handler state; both clients are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub ai: AiClient,
    pub mailer: Mailer,
}

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting api server...");

    dotenvy::dotenv().ok();

    // Provider keys are optional; requests needing an absent key fail with 500
    let state = AppState {
        ai: AiClient::from_env(),
        mailer: Mailer::from_env(),
    };

    let host: Ipv4Addr = std::env::var("HOST")
        .expect("HOST is set in .env")
        .parse()
        .expect("HOST is not in the correct format");

    let port: u16 = std::env::var("PORT")
        .expect("PORT must be set in .env")
        .parse()
        .expect("PORT is not the correct format");

    let addr = SocketAddr::from((host, port));

    // CORS configuration for the play-designer frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)  // In production, use specific origins
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // Root and health
        .route("/", get(|| async { "Playbook Vision API - v1.0" }))
        .route("/health", get(routes::health::health_check))

        // Play analysis endpoints
        .route("/api/analyze-image", post(routes::analyze::analyze_image))
        .route("/api/ai", post(routes::generate::generate_text))

        // Email endpoints
        .route("/api/send-invite", post(routes::email::send_invite))
        .route("/api/send-bug-report", post(routes::email::send_bug_report))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server.");
}
