//! HTTP route handlers exposing the wallet to page injectors.
//!
//! - `POST /` — JSON-RPC envelope carrying an EIP-1193 `{method, params}` call.
//! - `GET /info` — EIP-6963 provider info.
//! - `GET /health` — liveness check.
//!
//! Wallet failures keep the provider contract: HTTP 200 with `result: null`.
//! Only undecodable bodies are rejected with HTTP 400.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router, response::IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use crate::announce::ProviderInfo;
use crate::wallet::Wallet;

/// Shared state behind every route.
#[derive(Debug)]
pub struct AppState {
    /// The dispatcher.
    pub wallet: Wallet,
    /// Announcement payload served at `/info`.
    pub info: ProviderInfo,
}

/// Type alias for the shared wallet state used by Axum route handlers.
pub type WalletState = Arc<AppState>;

/// Incoming provider call. `jsonrpc` is accepted and ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcRequest {
    /// Echoed back in the response.
    #[serde(default)]
    pub id: Value,
    /// EIP-1193 method name.
    pub method: String,
    /// Positional parameters.
    #[serde(default)]
    pub params: Option<Vec<Value>>,
}

/// Outgoing JSON-RPC response. `result` is `null` when the call failed.
#[derive(Debug, Clone, Serialize)]
pub struct RpcResponse {
    jsonrpc: &'static str,
    id: Value,
    result: Value,
}

/// Creates the Axum router with all wallet endpoints.
pub fn routes() -> Router<WalletState> {
    Router::new()
        .route("/", post(post_request))
        .route("/info", get(get_info))
        .route("/health", get(get_health))
}

/// `GET /health` — lightweight liveness check.
#[instrument(skip_all)]
async fn get_health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// `GET /info` — EIP-6963 provider info.
#[instrument(skip_all)]
async fn get_info(State(state): State<WalletState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.info.clone()))
}

/// `POST /` — dispatch one provider request.
#[instrument(skip_all)]
async fn post_request(
    State(state): State<WalletState>,
    body: Result<Json<RpcRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(request)) = body else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid request body" })),
        )
            .into_response();
    };
    let result = state.wallet.request(&request.method, request.params).await;
    let response = RpcResponse {
        jsonrpc: "2.0",
        id: request.id,
        result,
    };
    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use alloy_signer_local::PrivateKeySigner;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use tower::ServiceExt;

    use super::*;
    use crate::transport::TransportRegistry;

    fn app() -> Router {
        let state = AppState {
            wallet: Wallet::new(Arc::new(PrivateKeySigner::random()), TransportRegistry::new()),
            info: ProviderInfo::default(),
        };
        routes().with_state(Arc::new(state))
    }

    async fn post_json(app: Router, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::post("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_owned()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn chain_id_over_http() {
        let (status, body) =
            post_json(app(), r#"{"jsonrpc":"2.0","id":7,"method":"eth_chainId"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "jsonrpc": "2.0", "id": 7, "result": "0x1" }));
    }

    #[tokio::test]
    async fn failures_answer_null_result() {
        let (status, body) = post_json(
            app(),
            r#"{"id":"a","method":"eth_sendTransaction","params":[{"from":"0x0000000000000000000000000000000000000001"}]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], Value::Null);
        assert_eq!(body["id"], json!("a"));
    }

    #[tokio::test]
    async fn invalid_body_is_bad_request() {
        let (status, _) = post_json(app(), r#"{"params":[]}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn info_announces_mock_wallet() {
        let response = app()
            .oneshot(Request::get("/info").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let info: ProviderInfo = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(info.name, "Mock Wallet");
    }
}
