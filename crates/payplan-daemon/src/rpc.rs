//! JSON-RPC 2.0 server over a Unix socket.
//!
//! One request per line, one response per line. Display code uses it to
//! push mirrored backend rows in and read computed figures back.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;
use tracing::{debug, error, info, warn};

use crate::commands;
use crate::DaemonState;

/// JSON-RPC request.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    /// JSON-RPC version (must be "2.0").
    pub jsonrpc: String,
    /// Request ID. Absent for notifications.
    #[serde(default)]
    pub id: serde_json::Value,
    /// Method name.
    pub method: String,
    /// Parameters.
    #[serde(default)]
    pub params: serde_json::Value,
}

/// JSON-RPC response.
#[derive(Debug, Serialize)]
pub struct RpcResponse {
    /// JSON-RPC version.
    pub jsonrpc: String,
    /// Request ID.
    pub id: serde_json::Value,
    /// Result or error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RpcError {
    pub code: i32,
    /// Error name.
    pub message: String,
    /// Optional structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcResponse {
    /// Create a success response.
    pub fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: serde_json::Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

impl RpcError {
    /// Parse error (-32700).
    pub fn parse_error() -> Self {
        Self {
            code: -32700,
            message: "PARSE_ERROR".to_string(),
            data: None,
        }
    }

    /// Invalid request (-32600).
    pub fn invalid_request() -> Self {
        Self {
            code: -32600,
            message: "INVALID_REQUEST".to_string(),
            data: None,
        }
    }

    /// Method not found (-32601).
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "METHOD_NOT_FOUND".to_string(),
            data: Some(serde_json::json!({"method": method})),
        }
    }

    /// Invalid params (-32602).
    pub fn invalid_params(detail: &str) -> Self {
        Self {
            code: -32602,
            message: "INVALID_PARAMS".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    /// Internal error (-32603).
    pub fn internal_error(detail: &str) -> Self {
        Self {
            code: -32603,
            message: "INTERNAL_ERROR".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }
}

/// The RPC server.
pub struct RpcServer {
    state: Arc<DaemonState>,
    socket_path: PathBuf,
}

impl RpcServer {
    /// Create a new RPC server.
    pub fn new(state: Arc<DaemonState>, socket_path: PathBuf) -> Self {
        Self { state, socket_path }
    }

    /// Bind the socket and serve connections until the task is dropped.
    pub async fn run(&self) -> anyhow::Result<()> {
        // A previous run may have left the socket file behind.
        let _ = std::fs::remove_file(&self.socket_path);

        let listener = UnixListener::bind(&self.socket_path)?;
        info!(socket = ?self.socket_path, "IPC server listening");

        loop {
            let stream = match listener.accept().await {
                Ok((stream, _addr)) => stream,
                Err(e) => {
                    error!(error = %e, "accept failed");
                    continue;
                }
            };
            let state = self.state.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(state, stream).await {
                    warn!(error = %e, "client connection closed with error");
                }
            });
        }
    }
}

/// Serve newline-delimited requests on one client connection until EOF.
async fn handle_connection(
    state: Arc<DaemonState>,
    stream: tokio::net::UnixStream,
) -> anyhow::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();
    let mut served = 0u64;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(&state, &line).await;
        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
        served += 1;
    }

    debug!(served, "client disconnected");
    Ok(())
}

/// Decode one request line and dispatch it.
pub async fn handle_line(state: &Arc<DaemonState>, line: &str) -> RpcResponse {
    match serde_json::from_str::<RpcRequest>(line) {
        Ok(request) if request.jsonrpc != "2.0" => {
            RpcResponse::error(request.id, RpcError::invalid_request())
        }
        Ok(request) => dispatch_request(state, request).await,
        Err(_) => RpcResponse::error(serde_json::Value::Null, RpcError::parse_error()),
    }
}

/// Dispatch a JSON-RPC request to the appropriate command handler.
async fn dispatch_request(state: &Arc<DaemonState>, request: RpcRequest) -> RpcResponse {
    let id = request.id.clone();
    let method = request.method.as_str();
    let params = &request.params;

    debug!(method, "dispatching RPC request");

    let result = match method {
        // Mirror updates from the backend change feed
        "ingest_settings" => commands::ingest::ingest_settings(state, params).await,
        "ingest_revenue_event" => commands::ingest::ingest_revenue_event(state, params).await,
        "ingest_leg_volumes" => commands::ingest::ingest_leg_volumes(state, params).await,
        "ingest_daily_earnings" => commands::ingest::ingest_daily_earnings(state, params).await,

        // Stateless calculators
        "compute_split" => commands::compute::compute_split(state, params).await,
        "estimate_cycles" => commands::compute::estimate_cycles(state, params).await,
        "get_cap_progress" => commands::compute::get_cap_progress(state, params).await,

        // Read-model
        "get_dashboard" => commands::dashboard::get_dashboard(state, params).await,
        "get_settings_health" => commands::dashboard::get_settings_health(state).await,

        _ => Err(RpcError::method_not_found(method)),
    };

    match result {
        Ok(value) => RpcResponse::success(id, value),
        Err(err) => RpcResponse::error(id, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_codes() {
        assert_eq!(RpcError::parse_error().code, -32700);
        assert_eq!(RpcError::invalid_request().code, -32600);

        let err = RpcError::method_not_found("unknown");
        assert_eq!(err.code, -32601);
        assert_eq!(err.message, "METHOD_NOT_FOUND");

        assert_eq!(RpcError::invalid_params("x").code, -32602);
        assert_eq!(RpcError::internal_error("x").code, -32603);
    }

    #[test]
    fn test_rpc_response_success() {
        let resp = RpcResponse::success(
            serde_json::json!(1),
            serde_json::json!({"total_sales": "1000"}),
        );
        assert!(resp.result.is_some());
        assert!(resp.error.is_none());
    }

    #[test]
    fn test_rpc_response_error_serialization() {
        let resp = RpcResponse::error(
            serde_json::json!(1),
            RpcError::internal_error("test"),
        );
        let json = serde_json::to_value(&resp).expect("serialize");
        assert!(json.get("result").is_none());
        assert_eq!(json["error"]["code"], -32603);
    }

    #[tokio::test]
    async fn test_handle_line_errors() {
        let state = crate::test_state();

        let resp = handle_line(&state, "{not json").await;
        assert_eq!(resp.error.map(|e| e.code), Some(-32700));

        let resp = handle_line(&state, r#"{"jsonrpc":"1.0","id":1,"method":"get_settings_health"}"#).await;
        assert_eq!(resp.error.map(|e| e.code), Some(-32600));

        let resp = handle_line(&state, r#"{"jsonrpc":"2.0","id":2,"method":"nope"}"#).await;
        assert_eq!(resp.error.map(|e| e.code), Some(-32601));
    }

    #[tokio::test]
    async fn test_connection_serves_lines_until_eof() {
        let state = crate::test_state();
        let (client, server) = tokio::net::UnixStream::pair().expect("socket pair");
        let task = tokio::spawn(handle_connection(state, server));

        let (reader, mut writer) = client.into_split();
        writer
            .write_all(b"\n{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"get_settings_health\"}\nnot json\n")
            .await
            .expect("write");
        writer.shutdown().await.expect("shutdown");

        let mut lines = BufReader::new(reader).lines();
        let first: serde_json::Value =
            serde_json::from_str(&lines.next_line().await.expect("read").expect("line")).expect("json");
        assert_eq!(first["id"], 1);
        assert_eq!(first["result"]["balanced"], true);

        let second: serde_json::Value =
            serde_json::from_str(&lines.next_line().await.expect("read").expect("line")).expect("json");
        assert_eq!(second["error"]["code"], -32700);

        assert!(lines.next_line().await.expect("read").is_none());
        task.await.expect("join").expect("connection");
    }

    #[tokio::test]
    async fn test_handle_line_dispatches() {
        let state = crate::test_state();
        let resp = handle_line(
            &state,
            r#"{"jsonrpc":"2.0","id":7,"method":"estimate_cycles","params":{"left_volume":"2500","right_volume":1800,"cycle_volume":"1000"}}"#,
        )
        .await;
        assert_eq!(resp.id, serde_json::json!(7));
        let result = resp.result.expect("result");
        assert_eq!(result["potential_cycles"], 1);
        assert_eq!(result["left_percent"], "100");
    }
}
