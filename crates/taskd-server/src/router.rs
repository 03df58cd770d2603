use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::{self, AppState};

/// Build the axum router with all taskd endpoints.
pub fn build_router(state: AppState, config: &ServerConfig) -> ServerResult<Router> {
    let router = Router::new()
        .route(
            "/health",
            get(handler::health_handler).options(handler::options_handler),
        )
        .route(
            "/tasks",
            get(handler::list_tasks)
                .post(handler::create_task)
                .delete(handler::delete_all_tasks)
                .options(handler::options_handler),
        )
        .route(
            "/tasks/:id",
            get(handler::get_task)
                .put(handler::update_task)
                .delete(handler::delete_task)
                .options(handler::options_handler),
        )
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.request_body_limit));

    let router = match config.origin_header()? {
        Some(origin) => router.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list([origin]))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        ),
        None => router,
    };

    Ok(router.layer(TraceLayer::new_for_http()))
}
