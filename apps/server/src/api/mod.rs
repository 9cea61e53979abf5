use std::sync::Arc;
use std::time::Instant;

use axum::{
    error_handling::HandleErrorLayer,
    extract::Request,
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    BoxError, Router,
};
use stockdesk_core::errors::Error as CoreError;
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    auth,
    config::Config,
    error::{error_response, ApiError},
    main_lib::AppState,
};

mod health;
mod holdings;
mod market;
mod stocks;

async fn not_found() -> impl IntoResponse {
    ApiError::NotFound
}

/// Turn a request that outlived `request_timeout` into the usual error body.
async fn handle_timeout(err: BoxError) -> Response {
    if err.is::<Elapsed>() {
        ApiError::Core(CoreError::Timeout).into_response()
    } else {
        tracing::error!("Unhandled middleware error: {}", err);
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Internal server error".to_string(),
        )
    }
}

/// Log every request and report its handling time in `X-Process-Time`.
async fn record_process_time(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;

    let elapsed = format!("{:.4}", started.elapsed().as_secs_f64());
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        tracing::warn!("{} {} -> {} in {}s", method, path, status.as_u16(), elapsed);
    } else {
        tracing::info!("{} {} -> {} in {}s", method, path, status.as_u16(), elapsed);
    }
    if let Ok(value) = HeaderValue::from_str(&elapsed) {
        response.headers_mut().insert("x-process-time", value);
    }
    response
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allow.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }
    let origins = config
        .cors_allow
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", o);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let protected = Router::new()
        .merge(stocks::router())
        .merge(market::router())
        .merge(holdings::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    let public = Router::new()
        .merge(health::router())
        .route("/auth/token", get(auth::issue_token));

    Router::new()
        .merge(public)
        .merge(protected)
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(record_process_time))
        .layer(cors_layer(config))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout))
                .timeout(config.request_timeout),
        )
        .layer(TraceLayer::new_for_http())
}
