//! Axum server wiring: shared state, router and the serve loop.

use crate::ai::{
    ChatService, DeepSeekChatClient, FourOImageClient, StockPhotoService, UnsplashClient,
    VendorImageClient,
};
use crate::config::{Config, PollSettings};
use crate::routes;
use crate::store::{InMemoryTaskStore, TaskStore};
use crate::{Error, Result};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Everything the handlers need. Vendor clients are `None` when their key is
/// not configured.
#[derive(Clone)]
pub struct AppState {
    pub chat: Option<Arc<dyn ChatService>>,
    pub images: Option<Arc<dyn VendorImageClient>>,
    pub photos: Option<Arc<dyn StockPhotoService>>,
    pub tasks: Arc<dyn TaskStore>,
    pub settings: Settings,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub callback_url: Option<String>,
    pub poll: PollSettings,
    pub static_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            callback_url: None,
            poll: PollSettings::default(),
            static_dir: "public".to_string(),
        }
    }
}

/// Injectable service bundle used to construct [`AppState`] in tests.
pub struct AppServices {
    pub chat: Option<Arc<dyn ChatService>>,
    pub images: Option<Arc<dyn VendorImageClient>>,
    pub photos: Option<Arc<dyn StockPhotoService>>,
    pub tasks: Arc<dyn TaskStore>,
}

impl AppState {
    pub fn with_services(services: AppServices, settings: Settings) -> Self {
        Self {
            chat: services.chat,
            images: services.images,
            photos: services.photos,
            tasks: services.tasks,
            settings,
        }
    }

    /// Builds vendor clients for every configured key.
    pub fn from_config(config: &Config) -> Self {
        // Reuse one HTTP connection pool across vendor clients.
        let http_client = reqwest::Client::new();

        let chat = match &config.deepseek_api_key {
            Some(key) => {
                info!("Dream analysis provider: DeepSeek (model: {})", config.chat_model);
                Some(Arc::new(
                    DeepSeekChatClient::new_with_client(
                        key.clone(),
                        config.chat_model.clone(),
                        http_client.clone(),
                    )
                    .with_base_url(config.deepseek_base_url.clone()),
                ) as Arc<dyn ChatService>)
            }
            None => {
                warn!("DEEPSEEK_API_KEY not set, dream analysis will fail closed");
                None
            }
        };

        let images = match &config.fouro_image_api_key {
            Some(key) => {
                info!("Image provider: 4oimageapi.io GPT-4o");
                Some(Arc::new(
                    FourOImageClient::new_with_client(
                        key.clone(),
                        http_client.clone(),
                        config.poll.query_timeout,
                    )
                    .with_base_url(config.fouro_image_base_url.clone()),
                ) as Arc<dyn VendorImageClient>)
            }
            None => {
                warn!("FOURO_IMAGE_API_KEY not set, image generation limited to fallback images");
                None
            }
        };

        let photos = config.unsplash_access_key.as_ref().map(|key| {
            info!("Stock photo fallback: Unsplash");
            Arc::new(
                UnsplashClient::new_with_client(
                    key.clone(),
                    http_client.clone(),
                    config.poll.query_timeout,
                )
                .with_base_url(config.unsplash_base_url.clone()),
            ) as Arc<dyn StockPhotoService>
        });

        match config.callback_url() {
            Some(url) => info!("Image callback URL: {}", url),
            None => info!("PUBLIC_URL not set, image results are polled"),
        }

        Self::with_services(
            AppServices {
                chat,
                images,
                photos,
                tasks: Arc::new(InMemoryTaskStore::new()),
            },
            Settings {
                callback_url: config.callback_url(),
                poll: config.poll,
                static_dir: config.static_dir.clone(),
            },
        )
    }
}

/// Build the Axum router.
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.settings.static_dir);

    Router::new()
        .route("/api/analyze-dream", post(routes::analyze_dream))
        .route("/api/generate-image", post(routes::generate_image))
        .route("/api/4oimage-callback", post(routes::image_callback))
        .route("/api/poll-4oimage/:task_id", get(routes::poll_task))
        .route("/api/4oimage-result/:task_id", get(routes::task_result))
        .route("/api/test-callback/:task_id", post(routes::test_callback))
        .route("/api/debug-4oimage", post(routes::debug_image))
        .route("/api/health", get(routes::health))
        .route("/api/translations/:language", get(routes::translations))
        .route("/api/gallery", get(routes::gallery))
        .fallback_service(static_files)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: Config) -> Result<()> {
    let state = AppState::from_config(&config);
    let app = build_router(state);

    let address = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&address).await?;
    info!("Dream interpretation server running on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Generic(format!("Server error: {}", e)))?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
