//! HTTP transport — JSON-RPC over `POST /mcp` with optional bearer auth, plus `/health`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Json as AxumJson, Response},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::protocol::ProtocolHandler;
use crate::types::{mcp_error_codes, McpError, McpResult};

/// Shared server state passed to all handlers via axum State.
pub struct ServerState {
    pub token: Option<String>,
    pub handler: Arc<ProtocolHandler>,
}

/// HTTP transport for web-based MCP clients.
pub struct SseTransport {
    state: Arc<ServerState>,
}

impl SseTransport {
    pub fn new(handler: ProtocolHandler, token: Option<String>) -> Self {
        Self {
            state: Arc::new(ServerState {
                token,
                handler: Arc::new(handler),
            }),
        }
    }

    pub fn router(&self) -> Router {
        let state = self.state.clone();

        Router::new()
            .route("/mcp", post(handle_request))
            .layer(middleware::from_fn_with_state(state.clone(), auth_layer))
            .route("/health", get(handle_health))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Run the HTTP server on the given address.
    pub async fn run(&self, addr: &str) -> McpResult<()> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(McpError::Io)?;

        tracing::info!("HTTP transport listening on {addr}");

        axum::serve(listener, app)
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;

        Ok(())
    }
}

fn rpc_error(status: StatusCode, code: i32, message: &str) -> Response {
    (
        status,
        AxumJson(serde_json::json!({
            "jsonrpc": "2.0",
            "id": null,
            "error": { "code": code, "message": message }
        })),
    )
        .into_response()
}

/// Checks the bearer token when one is configured. `/health` bypasses this layer.
async fn auth_layer(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    request: axum::extract::Request,
    next: middleware::Next,
) -> Response {
    if let Some(expected) = &state.token {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| token == expected);

        if !authorized {
            tracing::warn!("Rejected unauthenticated HTTP request");
            return rpc_error(
                StatusCode::UNAUTHORIZED,
                mcp_error_codes::UNAUTHORIZED,
                "Unauthorized",
            );
        }
    }

    next.run(request).await
}

async fn handle_request(
    State(state): State<Arc<ServerState>>,
    AxumJson(body): AxumJson<serde_json::Value>,
) -> Result<Response, Response> {
    let msg: crate::types::JsonRpcMessage = serde_json::from_value(body).map_err(|_| {
        rpc_error(
            StatusCode::BAD_REQUEST,
            crate::types::error_codes::PARSE_ERROR,
            "Parse error",
        )
    })?;

    match state.handler.handle_message(msg).await {
        Some(response) => Ok(AxumJson(response).into_response()),
        None => Ok(StatusCode::ACCEPTED.into_response()),
    }
}

async fn handle_health(State(state): State<Arc<ServerState>>) -> AxumJson<serde_json::Value> {
    AxumJson(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "api_url": state.handler.client().api_url(),
        "auth": state.token.is_some(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use firecrawl_core::{ClientConfig, FirecrawlClient};
    use tower::ServiceExt;

    fn transport(token: Option<&str>) -> SseTransport {
        let client = FirecrawlClient::new(
            ClientConfig::new("fc-test").with_api_url("http://127.0.0.1:9"),
        )
        .unwrap();
        SseTransport::new(
            ProtocolHandler::new(Arc::new(client)),
            token.map(str::to_string),
        )
    }

    fn ping(auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::post("/mcp").header("content-type", "application/json");
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        builder
            .body(Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
            .unwrap()
    }

    #[tokio::test]
    async fn test_token_required() {
        let app = transport(Some("secret")).router();

        let resp = app.clone().oneshot(ping(None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = app.oneshot(ping(Some("Bearer secret"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_skips_auth() {
        let app = transport(Some("secret")).router();
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["auth"], true);
        assert_eq!(value["api_url"], "http://127.0.0.1:9/");
    }

    #[tokio::test]
    async fn test_notification_is_accepted() {
        let app = transport(None).router();
        let req = Request::post("/mcp")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            ))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
    }
}
