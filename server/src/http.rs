use std::{
    net::{IpAddr, SocketAddr},
    sync::{Arc, RwLock},
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use entity::{Employee, EmployeeInput, ValidationError};
use platform_store::{Registry, StoreError};
use serde::Serialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::config::AppConfig;

pub type SharedRegistry = Arc<RwLock<Registry>>;

#[derive(Clone)]
pub struct AppState {
    pub registry: SharedRegistry,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            registry: Arc::new(RwLock::new(Registry::new())),
            config,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "registry server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/employees/", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

async fn list_employees(State(state): State<AppState>) -> HttpResult<Json<Vec<Employee>>> {
    let registry = state.registry.read().map_err(|_| HttpError::poisoned())?;
    Ok(Json(registry.list()))
}

async fn create_employee(
    State(state): State<AppState>,
    Json(input): Json<EmployeeInput>,
) -> HttpResult<(StatusCode, Json<Employee>)> {
    let input = input.validate()?;
    let mut registry = state.registry.write().map_err(|_| HttpError::poisoned())?;
    let employee = registry.create(input);
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HttpResult<Json<Employee>> {
    let registry = state.registry.read().map_err(|_| HttpError::poisoned())?;
    Ok(Json(registry.get(&id)?))
}

async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<EmployeeInput>,
) -> HttpResult<Json<Employee>> {
    let input = input.validate()?;
    let mut registry = state.registry.write().map_err(|_| HttpError::poisoned())?;
    Ok(Json(registry.replace(&id, input)?))
}

async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HttpResult<Json<Employee>> {
    let mut registry = state.registry.write().map_err(|_| HttpError::poisoned())?;
    Ok(Json(registry.remove(&id)?))
}

async fn health_handler(State(state): State<AppState>) -> HttpResult<Json<HealthResponse>> {
    let registry = state.registry.read().map_err(|_| HttpError::poisoned())?;
    Ok(Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION"),
        employees: registry.len(),
    }))
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    version: &'static str,
    employees: usize,
}

type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug)]
enum HttpError {
    NotFound,
    Invalid(ValidationError),
    Internal(anyhow::Error),
}

impl HttpError {
    fn poisoned() -> Self {
        Self::Internal(anyhow::anyhow!("registry lock poisoned"))
    }
}

impl From<StoreError> for HttpError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound,
        }
    }
}

impl From<ValidationError> for HttpError {
    fn from(err: ValidationError) -> Self {
        Self::Invalid(err)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "code": "NOT_FOUND", "message": "Employee not found" }),
            ),
            Self::Invalid(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "code": "INVALID_INPUT",
                    "message": err.to_string(),
                    "violations": err.violations,
                }),
            ),
            Self::Internal(err) => {
                error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "code": "INTERNAL", "message": "internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}
