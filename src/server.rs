//! The HTTP query gateway: one POST endpoint that routes `Action=...` form
//! bodies into the emulator.

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Form, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use log::{debug, info};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::Emulator;
use crate::core::{ApiError, ParamMap};
use crate::web::ApiFailure;

pub struct GatewayServer {
    emulator: Arc<Emulator>,
    host: String,
    port: u16,
}

impl GatewayServer {
    pub fn new(emulator: Arc<Emulator>, host: &str, port: u16) -> Self {
        Self {
            emulator,
            host: host.to_string(),
            port,
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("EC2 emulator listening on {}", addr);
        axum::serve(listener, router(self.emulator.clone())).await?;
        Ok(())
    }
}

pub fn router(emulator: Arc<Emulator>) -> Router {
    Router::new()
        .route("/", post(handle_action))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(emulator)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn handle_action(
    State(emulator): State<Arc<Emulator>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let params = ParamMap::from_pairs(pairs);
    let Some(action) = params.get("Action").map(str::to_string) else {
        return ApiFailure::new(ApiError::MissingParameter("Action".to_string())).into_response();
    };
    debug!("dispatching {}", action);
    match emulator.dispatch(&action, &params) {
        Ok(doc) => {
            let mut envelope = serde_json::Map::new();
            envelope.insert(format!("{action}Response"), doc);
            Json(Value::Object(envelope)).into_response()
        }
        Err(error) => ApiFailure::new(error).into_response(),
    }
}
