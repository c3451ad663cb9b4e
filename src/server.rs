use crate::config::Config;
use crate::graphql::{create_schema, GraphQLSchema};
use crate::metrics::{self, GraphQLMetrics};
use crate::store::Storage;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse, Json},
    routing::get,
    Extension, Router,
};
use hyper::Server;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{debug, info, warn};

/// Whether `/metrics` should render the recorder
#[derive(Clone, Copy)]
struct MetricsEnabled(bool);

/// Health check endpoint
async fn health(Extension(storage): Extension<Arc<dyn Storage>>) -> impl IntoResponse {
    match storage.stats().await {
        Ok(stats) => Json(serde_json::json!({
            "status": "healthy",
            "service": "wine_graph",
            "version": env!("CARGO_PKG_VERSION"),
            "wines": stats.wines,
            "varietals": stats.varietals,
            "wineries": stats.wineries,
        }))
        .into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "unhealthy",
                "service": "wine_graph",
                "version": env!("CARGO_PKG_VERSION"),
                "error": e.to_string(),
            })),
        )
            .into_response(),
    }
}

/// GraphQL handler (supports GET and POST)
async fn graphql_handler(
    Extension(schema): Extension<GraphQLSchema>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let request = req.into_inner();
    debug!(
        "GraphQL request: {}",
        request.operation_name.as_deref().unwrap_or("<anonymous>")
    );

    let started = Instant::now();
    let response = schema.execute(request).await;
    GraphQLMetrics::record_request(started.elapsed().as_secs_f64(), response.is_err());

    response.into()
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

async fn metrics_handler(Extension(enabled): Extension<MetricsEnabled>) -> impl IntoResponse {
    match (enabled.0, metrics::render()) {
        (true, Some(body)) => (StatusCode::OK, body),
        _ => (StatusCode::NOT_FOUND, "metrics are disabled".to_string()),
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(allowed))
}

/// Create the HTTP router with all routes, including GraphQL
pub fn create_server(storage: Arc<dyn Storage>, config: &Config) -> Router {
    let schema = create_schema(storage.clone(), &config.graphql);

    Router::new()
        .route("/health", get(health))
        .route("/graphql", get(graphql_handler).post(graphql_handler))
        .route("/graphiql", get(graphiql))
        .route("/metrics", get(metrics_handler))
        .layer(Extension(schema))
        .layer(Extension(storage))
        .layer(Extension(MetricsEnabled(config.metrics.enabled)))
        .layer(ServiceBuilder::new().layer(cors_layer(&config.server.cors_origins)))
}

/// Serve on an already bound listener until the future is dropped
pub async fn serve(
    listener: TcpListener,
    storage: Arc<dyn Storage>,
    config: &Config,
) -> anyhow::Result<()> {
    let app = create_server(storage, config);
    listener.set_nonblocking(true)?;
    Server::from_tcp(listener)?
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

/// Start the HTTP server on the configured address
pub async fn start_server(storage: Arc<dyn Storage>, config: &Config) -> anyhow::Result<()> {
    let addr: SocketAddr = config.bind_addr()?;
    let app = create_server(storage, config);
    let port = addr.port();

    info!("HTTP server running on http://{}", addr);
    info!("Health check: http://localhost:{port}/health");
    info!("GraphQL:      http://localhost:{port}/graphql");
    info!("GraphiQL UI:  http://localhost:{port}/graphiql");

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}
