use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vton_api::config::ServerConfig;
use vton_api::router::build_app_router;
use vton_api::state::AppState;
use vton_cloud::{CloudinaryConfig, CloudinaryStorage};
use vton_comfyui::{ComfyUISynthesizer, SynthesisConfig};
use vton_pipeline::TryOnPipeline;
use vton_vision::{GeminiConfig, GeminiFeedbackEngine};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vton_api=debug,vton_pipeline=debug,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let pool = vton_db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    vton_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    vton_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Collaborators ---
    let cloudinary = CloudinaryConfig::from_env();
    tracing::info!(cloud_name = %cloudinary.cloud_name, folder = %cloudinary.folder, "Object storage configured");
    let storage = Arc::new(CloudinaryStorage::new(cloudinary));

    let synthesis = SynthesisConfig::from_env();
    tracing::info!(api_url = %synthesis.api_url, "Synthesis engine configured");
    let synthesizer = Arc::new(
        ComfyUISynthesizer::new(synthesis).expect("Failed to load ComfyUI workflow template"),
    );

    let gemini = GeminiConfig::from_env();
    tracing::info!(model = %gemini.model, "Feedback engine configured");
    let feedback = Arc::new(GeminiFeedbackEngine::new(gemini));

    // --- Pipeline ---
    let pipeline = TryOnPipeline::new(
        pool.clone(),
        storage,
        synthesizer,
        feedback,
        config.scratch_dir.clone(),
    );
    pipeline
        .ensure_scratch_dir()
        .await
        .expect("Failed to create scratch directory");
    tracing::info!(scratch_dir = %config.scratch_dir.display(), "Scratch directory ready");

    // --- App state ---
    let state = AppState {
        pool,
        pipeline,
        config: Arc::new(config.clone()),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
