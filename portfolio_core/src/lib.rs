//! Core library: the portfolio site, the contact inbox admin panel and the
//! store and auth backends behind them.

pub mod admin;
pub mod auth;
pub mod config;
pub mod contact;
pub mod detail;
pub mod error;
pub mod extractors;
pub mod feed;
pub mod format;
pub mod handlers;
pub mod locale;
pub mod middleware;
pub mod models;
pub mod site;
pub mod store;
pub mod websocket;

pub use admin::{AdminContext, AdminRegistry};
pub use auth::{AuthProvider, GoogleOAuth, IdentityToolkitProvider, LocalAuthProvider, SessionManager, SessionTokens};
pub use config::AppConfig;
pub use contact::ContactService;
pub use error::{AppError, Result};
pub use handlers::routes::create_routes;
pub use store::{MemoryStore, MessageStore, RtdbStore};
pub use websocket::{websocket_handler, WebSocketManager};

use axum::Router;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tracing::{error, info};

use config::{AuthBackend, StoreBackend};
use feed::FeedRenderer;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn MessageStore>,
    pub contact: ContactService,
    pub sessions: SessionManager,
    pub admin: AdminRegistry,
    pub websocket_manager: WebSocketManager,
    pub google: Option<GoogleOAuth>,
}

impl AppState {
    /// Wires the shared services around already-built backends.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn MessageStore>,
        provider: Arc<dyn AuthProvider>,
    ) -> Result<Self> {
        let tokens = SessionTokens::new(
            &config.auth.session_secret,
            chrono::Duration::hours(config.auth.session_ttl_hours as i64),
        )?;
        let sessions = SessionManager::new(provider, tokens);
        let websocket_manager = WebSocketManager::new(&config.websocket);
        let admin = AdminRegistry::new(
            store.clone(),
            sessions.clone(),
            FeedRenderer::new(config.site.locale, &config.feed),
            websocket_manager.clone(),
        );

        Ok(Self {
            app_name: "Portfolio".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact: ContactService::new(store.clone()),
            config: Arc::new(config),
            store,
            sessions,
            admin,
            websocket_manager,
            google: None,
        })
    }

    /// Builds the store and auth backends named by the configuration.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.store.request_timeout_seconds);

        let store: Arc<dyn MessageStore> = match config.store.backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::Rtdb => Arc::new(RtdbStore::from_config(&config.store)?),
        };

        let provider: Arc<dyn AuthProvider> = match config.auth.backend {
            AuthBackend::Local => Arc::new(LocalAuthProvider::from_config(&config.auth)?),
            AuthBackend::IdentityToolkit => {
                Arc::new(IdentityToolkitProvider::from_config(&config.auth, timeout)?)
            }
        };

        let google = config
            .auth
            .google
            .as_ref()
            .map(|google| GoogleOAuth::new(google, timeout))
            .transpose()?;

        let mut state = Self::new(config, store, provider)?;
        state.google = google;
        Ok(state)
    }

    pub fn with_google(mut self, google: GoogleOAuth) -> Self {
        self.google = Some(google);
        self
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes(&state.config))
        .layer(middleware::logging::logging_layer())
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
