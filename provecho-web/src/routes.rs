//! HTTP surface: a single route answering OPTIONS, GET and POST
//!
//! Upstream failures travel as HTTP 200 with error-shaped payloads; only
//! transport failures become HTTP 500. Bad input is HTTP 400, unknown
//! methods HTTP 405.

use axum::{
    Router,
    extract::State,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use uuid::Uuid;

use provecho_core::{AdviceRequest, Config, ErrorReply, Trace, advise};

/// Shared state for the advice endpoint
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS, Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/",
            get(health)
                .post(advice)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .layer(cors)
        .with_state(state)
}

/// CORS preflight: empty 200, headers added by the CORS layer
async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "Online",
        "message": "Servidor listo (HF Router API)",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn method_not_allowed() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Método no permitido" })),
    )
}

/// Main flow: validate input, run the pipeline, map the outcome to a response
async fn advice(State(state): State<AppState>, body: String) -> Response {
    let request_id = Uuid::new_v4();
    let config = &state.config;
    let mut trace = Trace::new();

    // Lenient body handling: anything unparseable counts as "no food"
    let food = serde_json::from_str::<AdviceRequest>(&body)
        .ok()
        .and_then(|request| request.food)
        .map(|food| food.trim().to_string())
        .filter(|food| !food.is_empty());

    let Some(food) = food else {
        info!(%request_id, "advice request without food");
        trace.log("No food supplied");
        let reply = attach_trace(ErrorReply::new("No se recibió alimento"), trace, config);
        return (StatusCode::BAD_REQUEST, Json(reply)).into_response();
    };

    info!(%request_id, food = %food, "advice request");

    match advise(&food, config, &mut trace).await {
        Ok(reply) => {
            let reply = if config.debug_trace {
                reply.with_debug(trace.into_lines())
            } else {
                reply
            };
            (StatusCode::OK, Json(reply)).into_response()
        }
        Err(err) => {
            error!(%request_id, error = %err, "advice pipeline failed");
            trace.log(format!("Critical error: {}", err));
            let mut reply = ErrorReply::new(format!("Error del servidor: {}", err));
            reply.error_type = Some(err.kind().to_string());
            let reply = attach_trace(reply, trace, config);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(reply)).into_response()
        }
    }
}

fn attach_trace(mut reply: ErrorReply, trace: Trace, config: &Config) -> ErrorReply {
    if config.debug_trace {
        reply.debug = Some(trace.into_lines());
    }
    reply
}
