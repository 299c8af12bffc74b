//! # JSON-RPC HTTP Server
//!
//! Serves the tools as JSON-RPC 2.0 methods at `POST /jsonrpc`, plus a plain
//! `GET /health` probe. Requests are independent; each one runs on its own task.

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::application::state::AppState;
use crate::infrastructure::rpc::protocol::{self, Request, RequestId, Response, RpcError};
use crate::interface::tools::{self, ToolError};

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/jsonrpc", post(handle_rpc))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("JSON-RPC server listening on http://{}/jsonrpc", addr);
    axum::serve(listener, app(state))
        .await
        .context("JSON-RPC server stopped unexpectedly")
}

// The body is taken as text so malformed JSON still gets a JSON-RPC parse error
// instead of an HTTP rejection.
async fn handle_rpc(State(state): State<Arc<AppState>>, body: String) -> Json<Response> {
    tracing::debug!("Received: {}", body);
    let response = match protocol::parse_request_str(&body) {
        Ok(request) => dispatch(&state, request).await,
        Err(err) => {
            tracing::warn!("Rejected request: {}", err);
            Response::from_error(RequestId::Null, err)
        }
    };
    Json(response)
}

pub async fn dispatch(state: &AppState, request: Request) -> Response {
    let id = request.id.clone();
    match tools::call_tool(state, &request.method, request.params.as_ref()).await {
        Ok(result) => Response::success(id, result),
        Err(err) => {
            tracing::warn!(method = %request.method, "Tool call failed: {}", err);
            Response::from_error(id, to_rpc_error(err))
        }
    }
}

fn to_rpc_error(err: ToolError) -> RpcError {
    match err {
        ToolError::UnknownTool(name) => RpcError::MethodNotFound(name),
        err @ ToolError::MissingArgument { .. } => RpcError::InvalidParams(err.to_string()),
        ToolError::Internal(msg) => RpcError::InternalError(msg),
    }
}
