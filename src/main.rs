//! Linkboard backend entry point
//!
//! All operations are exposed via GraphQL at /graphql. GET serves the
//! GraphiQL playground for browsers; POST executes operations.

use std::net::SocketAddr;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::Router;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::response::IntoResponse;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use linkboard::config::Config;
use linkboard::db::{Database, seed};
use linkboard::graphql::{self, LinkboardSchema};
use linkboard::services::{AuthConfig, AuthService};

/// Application state shared across all handlers
#[derive(Clone)]
struct AppState {
    schema: LinkboardSchema,
    auth: AuthService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkboard=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Linkboard backend");

    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Database connected");

    if config.seed_demo_data {
        seed::run_seeds(&db).await?;
    }

    let auth = AuthService::new(db.clone(), AuthConfig::from(&config));
    let schema = graphql::build_schema(db, auth.clone());
    tracing::info!("GraphQL schema built");

    let state = AppState { schema, auth };

    let app = Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);
    tracing::info!("GraphQL playground: http://localhost:{}/graphql", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Extract the raw Authorization header value, if any
fn auth_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok())
}

/// GraphQL query/mutation handler with auth context
///
/// A present-but-unusable Authorization header is logged and the request
/// proceeds anonymously; gated operations then fail with UNAUTHENTICATED.
async fn graphql_handler(
    axum::extract::State(state): axum::extract::State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();

    if let Some(value) = auth_header(&headers) {
        match state.auth.decode_auth_header(value) {
            Ok(user) => request = request.data(user),
            Err(e) => tracing::warn!(error = %e, "Ignoring unusable Authorization header"),
        }
    }

    state.schema.execute(request).await.into()
}

/// GraphiQL interactive playground (only for browsers)
async fn graphiql(headers: HeaderMap) -> impl IntoResponse {
    // Check if this is a browser request (accepts HTML)
    let accepts_html = headers
        .get(axum::http::header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if accepts_html {
        axum::response::Html(GraphiQLSource::build().endpoint("/graphql").finish())
            .into_response()
    } else {
        // Return a helpful JSON error for non-browser requests
        (
            axum::http::StatusCode::METHOD_NOT_ALLOWED,
            axum::Json(serde_json::json!({
                "error": "GET requests are not supported for GraphQL queries. Use POST with Content-Type: application/json"
            })),
        )
            .into_response()
    }
}
