use anyhow::Context;
use axum::routing::{delete, get, post, put};
use axum::{middleware as axum_middleware, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use proman_api::config::AppConfig;
use proman_api::handlers::{auth, code, me, option, project, schedule, task, user};
use proman_api::mail::{Mailer, SmtpConfig};
use proman_api::middleware::{require_admin_or_maintainer, require_auth, require_basic_auth};
use proman_api::state::AppState;
use proman_api::{database, filter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "proman_api=debug,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!("Starting proman API in {:?} mode", config.environment);

    let pool = database::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    database::migrate(&pool).await.context("failed to run migrations")?;

    let port = config.server.port;
    let mailer = Mailer::new(SmtpConfig::from_env());
    let state = AppState::new(pool, config, mailer);
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("proman API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(state.clone())
        .merge(public_routes(state.clone()))
        .merge(api_routes(state.clone()))
        .merge(operational_routes(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn public_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/login", post(auth::login))
        .route("/api/register", post(auth::register))
        .route("/api/forgot-password", post(auth::forgot_password))
        .with_state(state)
}

/// Bearer-token group. Destructive routes get an extra role guard.
fn api_routes(state: AppState) -> Router {
    let destructive = Router::new()
        .route("/api/project/:id", delete(project::delete))
        .route("/api/task/:id", delete(task::delete))
        .layer(axum_middleware::from_fn(require_admin_or_maintainer));

    Router::new()
        .route("/api/projects", get(project::list))
        .route("/api/project/:id", get(project::detail))
        .route("/api/project/count", get(project::count))
        .route("/api/project/count/type", get(project::count_by_type))
        .route("/api/project", post(project::create))
        .route("/api/tasks", get(task::list))
        .route("/api/task/:id", get(task::detail).put(task::update))
        .route("/api/task/count", get(task::count))
        .route("/api/task/overview", get(task::overview))
        .route("/api/task/status", get(task::status))
        .route("/api/task", post(task::create))
        .route("/api/schedules", get(schedule::list))
        .route("/api/schedule", post(schedule::create))
        .route("/api/users", get(user::list))
        .route("/api/user/count", get(user::count))
        .route("/api/me", get(me::profile).put(me::update_profile))
        .route("/api/me/password", put(me::update_password))
        .route("/api/me/schedules", get(me::schedules))
        .route("/api/me/projects", get(me::projects))
        .route("/api/me/project/count", get(me::project_count))
        .route("/api/me/project/count/type", get(me::project_count_by_type))
        .route("/api/me/tasks", get(me::tasks))
        .route("/api/me/task/count", get(me::task_count))
        .route("/api/me/task/overview", get(me::task_overview))
        .route("/api/me/task/status", get(me::task_status))
        .merge(destructive)
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}

/// Basic-auth group for options and verification codes.
fn operational_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/verification-code/:email", post(code::create))
        .route("/api/option/type/position", get(option::positions))
        .route("/api/option/type/project", get(option::project_types))
        .route("/api/option/type/schedule", get(option::schedule_types))
        .route("/api/option/user", get(option::users))
        .route("/api/option/project", get(option::projects))
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_basic_auth))
        .with_state(state)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "proman API",
        "version": version,
        "endpoints": {
            "auth": "/api/login, /api/register, /api/forgot-password (public)",
            "projects": "/api/projects, /api/project/:id, /api/project/count[/type] (bearer)",
            "tasks": "/api/tasks, /api/task/:id, /api/task/count, /api/task/overview, /api/task/status (bearer)",
            "schedules": "/api/schedules, /api/schedule (bearer)",
            "users": "/api/users, /api/user/count (bearer)",
            "me": "/api/me/* (bearer)",
            "operational": "/api/option/*, /api/verification-code/:email (basic auth)",
        },
        "page_size": filter::DEFAULT_PAGE_SIZE,
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
