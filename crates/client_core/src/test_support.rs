//! Throwaway classifier endpoint for exercising the HTTP transport.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Router,
};
use tokio::{net::TcpListener, sync::Mutex};

use crate::config::{Settings, UploadEndpoint};

#[derive(Debug, Clone)]
pub(crate) struct ReceivedPart {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
struct ServerState {
    reply_status: StatusCode,
    reply_body: &'static str,
    requests: Arc<Mutex<Vec<Vec<ReceivedPart>>>>,
}

pub(crate) struct UploadServer {
    pub url: String,
    requests: Arc<Mutex<Vec<Vec<ReceivedPart>>>>,
}

impl UploadServer {
    pub async fn spawn(reply_status: StatusCode, reply_body: &'static str) -> Self {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            reply_status,
            reply_body,
            requests: requests.clone(),
        };
        let app = Router::new()
            .route("/upload", post(handle_upload))
            .with_state(state);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self {
            url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn endpoint(&self) -> UploadEndpoint {
        Settings {
            server_url: self.url.clone(),
            ..Settings::default()
        }
        .endpoint()
        .expect("endpoint")
    }

    pub async fn requests(&self) -> Vec<Vec<ReceivedPart>> {
        self.requests.lock().await.clone()
    }
}

async fn handle_upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> (StatusCode, String) {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        parts.push(ReceivedPart {
            field: field_name,
            file_name,
            content_type,
            bytes,
        });
    }
    state.requests.lock().await.push(parts);
    (state.reply_status, state.reply_body.to_string())
}

/// Endpoint on a port nothing listens on.
pub(crate) async fn unreachable_endpoint() -> UploadEndpoint {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    Settings {
        server_url: format!("http://{addr}"),
        ..Settings::default()
    }
    .endpoint()
    .expect("endpoint")
}
