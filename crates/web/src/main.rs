use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use storage::Database;
use storage::feed::LedgerFeed;
use storage::services::admin::AdminPolicy;
use storage::services::proofs::ImageLimits;
use storage::store::{DiskProofStore, HttpIdentity, PgLedger};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod state;

use config::Config;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::auth::handlers::register,
        features::auth::handlers::login,
        features::auth::handlers::logout,
        features::auth::handlers::session,
        features::profile::handlers::get_totals,
        features::profile::handlers::set_team,
        features::profile::handlers::get_history,
        features::profile::handlers::get_streak,
        features::activity::handlers::record_activity,
        features::activity::handlers::delete_entry,
        features::proofs::handlers::attach_latest,
        features::proofs::handlers::attach_to_entry,
        features::proofs::handlers::detach,
        features::proofs::handlers::gallery,
        features::teams::handlers::get_scoreboard,
        features::teams::handlers::get_total,
        features::teams::handlers::team_events,
        features::admin::handlers::list_people,
        features::admin::handlers::randomize_teams,
    ),
    components(
        schemas(
            storage::dto::auth::RegisterRequest,
            storage::dto::auth::LoginRequest,
            storage::dto::auth::RegisterResponse,
            storage::dto::auth::LoginResponse,
            storage::dto::auth::SessionResponse,
            storage::dto::activity::ActivityKind,
            storage::dto::activity::Direction,
            storage::dto::activity::RecordActivityRequest,
            storage::dto::activity::SetTeamRequest,
            storage::dto::activity::ActivityOutcome,
            storage::dto::common::MessageResponse,
            storage::dto::common::PaginationMeta,
            storage::dto::profile::HistoryEntry,
            storage::dto::profile::ProofItem,
            storage::dto::profile::ProofUploadResponse,
            storage::dto::profile::StreakResponse,
            storage::dto::scoreboard::ScoreRow,
            storage::dto::scoreboard::SortField,
            storage::dto::scoreboard::SortOrder,
            storage::dto::admin::RandomizeRequest,
            storage::dto::admin::RandomizeResponse,
            storage::models::Person,
            storage::models::DistanceEntry,
            storage::models::MemberTotal,
            storage::models::TeamTotal,
            storage::models::Team,
            storage::models::TeamSelection,
            storage::services::admin::TeamDraw,
        )
    ),
    tags(
        (name = "auth", description = "Registration and session endpoints"),
        (name = "profile", description = "The caller's totals, history, streak, and team choice"),
        (name = "activity", description = "Distance logging"),
        (name = "proofs", description = "Evidence image lifecycle"),
        (name = "teams", description = "Public leaderboards and change events"),
        (name = "admin", description = "Admin-only team management"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("Session token")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting Paceboard API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let identity = HttpIdentity::new(config.identity_url.clone(), config.identity_api_key.clone())
        .context("Failed to build identity client")?;

    let state = AppState {
        ledger: Arc::new(PgLedger::new(db.pool().clone())),
        proofs: Arc::new(DiskProofStore::new(
            config.proof_storage_root.clone(),
            config.proof_public_base.clone(),
        )),
        identity: Arc::new(identity),
        feed: LedgerFeed::new(),
        admin: Arc::new(AdminPolicy::from_comma_separated(&config.admin_ids)),
        image_limits: ImageLimits::default(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/auth", features::auth::routes(&state))
        .nest("/api/profile", features::profile::routes(&state))
        .nest("/api/activity", features::activity::routes(&state))
        .nest("/api/proofs", features::proofs::routes(&state))
        .nest("/api/teams", features::teams::routes())
        .nest("/api/admin", features::admin::routes(&state))
        .layer(cors)
        .with_state(state);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .context("Failed to bind server address")?;
    axum::serve(listener, app).await?;

    Ok(())
}
