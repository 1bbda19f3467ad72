//! HTTP server

use axum::{
    http::HeaderMap,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::{
    token_from_headers, AuthError, AuthGate, Claims, Identity, SecretKey, TokenCodec, UserStore,
};
use crate::config::Config;
use crate::error::Result;
use crate::schedule::{generate_sample_data, Schedule};
use crate::ui::Pages;

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub gate: AuthGate,
    pub users: UserStore,
    pub schedule: RwLock<Schedule>,
    pub pages: Pages,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build state around an existing schedule
    pub fn new(config: Config, schedule: Schedule) -> Self {
        let codec = TokenCodec::new(SecretKey::from(config.auth.secret.as_str()));
        let gate = AuthGate::new(codec, config.auth.token_ttl_secs);
        let users = UserStore::new(config.store.users_file.clone(), config.auth.bcrypt_cost);

        Self {
            config,
            gate,
            users,
            schedule: RwLock::new(schedule),
            pages: Pages::new(),
        }
    }

    /// Build state with a schedule seeded per `schedule.sample_classes`
    pub fn seeded(config: Config) -> Self {
        let mut schedule = Schedule::new();
        let count = config.schedule.sample_classes;
        if count > 0 {
            let today = chrono::Local::now().date_naive();
            generate_sample_data(&mut schedule, count, &mut rand::thread_rng(), today);
        }
        Self::new(config, schedule)
    }

    /// Current time in seconds since the epoch
    pub fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    fn token<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        token_from_headers(headers, &self.config.auth.cookie_name)
    }

    /// Who is calling, for pages that only personalize
    pub fn identity(&self, headers: &HeaderMap) -> Identity {
        self.gate.authenticate(self.token(headers), Self::now())
    }

    /// Gate an operation on the caller holding one of `allowed`
    pub fn require(
        &self,
        headers: &HeaderMap,
        allowed: &[&str],
    ) -> std::result::Result<Claims, AuthError> {
        self.gate.require(self.token(headers), Self::now(), allowed)
    }
}

/// Run the HTTP server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::seeded(config));

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    serve(listener, state).await
}

/// Serve `state` on an already bound listener
pub async fn serve(listener: TcpListener, state: SharedState) -> Result<()> {
    let app = create_router(state);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    let static_dir = ServeDir::new(&state.config.server.static_dir);

    Router::new()
        .route("/api/health", get(routes::health))
        // Pages
        .route("/", get(routes::index))
        .route("/login", get(routes::login_form).post(routes::login))
        .route("/register", get(routes::register_form).post(routes::register))
        .route("/logout", post(routes::logout))
        .route("/add_class", get(routes::add_class_form).post(routes::add_class))
        .route("/view_schedule", get(routes::view_schedule))
        .route("/search_class", get(routes::search_class_form).post(routes::search_class))
        .route("/delete_class", post(routes::delete_class))
        .route("/statistics", get(routes::statistics))
        .nest_service("/static", static_dir)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
