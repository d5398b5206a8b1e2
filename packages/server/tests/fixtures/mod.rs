//! Test fixtures shared by the integration tests.
//!
//! The server under test runs in-process on an ephemeral port, wired exactly
//! as the binary wires it, against a fake media origin (another axum app).

#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::{net::TcpStream, sync::Notify, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

use synccinema_server::{
    config::OriginConfig,
    infrastructure::{
        credential::JwtCredentialVerifier, message_pusher::WebSocketMessagePusher,
        origin::JellyfinOrigin, repository::InMemoryRoomRepository,
    },
    ui::Server,
    usecase::{
        BrowseCatalogUseCase, ConnectParticipantUseCase, ControlPlaybackUseCase,
        DisconnectParticipantUseCase, JoinRoomUseCase, RelayStreamUseCase, SendMessageUseCase,
    },
};
use synccinema_shared::time::SystemClock;

pub const JWT_SECRET: &str = "integration-secret";
pub const ORIGIN_API_KEY: &str = "origin-api-key";
pub const ORIGIN_USER_ID: &str = "origin-user";
/// Size of the media file served by the fake origin
pub const MEDIA_LEN: usize = 5_000;
/// Header timeout used by the server under test
pub const RESPONSE_TIMEOUT: Duration = Duration::from_millis(500);
/// Number of chunks the `firehose` item yields at most
pub const FIREHOSE_CHUNKS: usize = 4_096;
static FIREHOSE_CHUNK: [u8; 64 * 1024] = [3u8; 64 * 1024];

const RECV_TIMEOUT: Duration = Duration::from_secs(3);

/// Deterministic media bytes, so that ranges can be compared byte-for-byte
pub fn media_bytes() -> Vec<u8> {
    (0..MEDIA_LEN).map(|i| (i % 251) as u8).collect()
}

async fn spawn_app(app: Router) -> (SocketAddr, JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().expect("Failed to read local addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });
    (addr, handle)
}

/// Address on which nothing listens
pub async fn closed_origin_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().expect("Failed to read local addr");
    drop(listener);
    format!("http://{}", addr)
}

// ========================================
// Server under test
// ========================================

/// Helper struct to manage an in-process server
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
    /// Verifier sharing the server's secret, for issuing tokens
    pub verifier: JwtCredentialVerifier,
}

impl TestServer {
    /// Start a server relaying to `origin_url`
    pub async fn start(origin_url: &str) -> Self {
        Self::start_with_public_url(origin_url, None).await
    }

    pub async fn start_with_public_url(origin_url: &str, public_base_url: Option<&str>) -> Self {
        let origin_config = OriginConfig::new(origin_url, ORIGIN_API_KEY, ORIGIN_USER_ID)
            .expect("Invalid origin config")
            .with_timeouts(Duration::from_secs(2), RESPONSE_TIMEOUT);

        let repository = Arc::new(InMemoryRoomRepository::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let verifier = JwtCredentialVerifier::new(JWT_SECRET);
        let origin = Arc::new(JellyfinOrigin::new(origin_config).expect("Invalid origin client"));
        let clock = Arc::new(SystemClock);

        let server = Server::new(
            Arc::new(ConnectParticipantUseCase::new(
                Arc::new(verifier.clone()),
                message_pusher.clone(),
            )),
            Arc::new(DisconnectParticipantUseCase::new(message_pusher.clone())),
            Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            Arc::new(ControlPlaybackUseCase::new(
                repository,
                message_pusher.clone(),
                clock,
            )),
            Arc::new(SendMessageUseCase::new(message_pusher)),
            Arc::new(RelayStreamUseCase::new(
                origin.clone(),
                public_base_url.map(str::to_string),
            )),
            Arc::new(BrowseCatalogUseCase::new(origin)),
        );

        let (addr, handle) = spawn_app(server.router()).await;
        TestServer {
            addr,
            handle,
            verifier,
        }
    }

    /// Get the HTTP base URL for this server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the WebSocket URL for this server
    pub fn ws_url(&self, token: Option<&str>) -> String {
        match token {
            Some(token) => format!("ws://{}/ws?token={}", self.addr, token),
            None => format!("ws://{}/ws", self.addr),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ========================================
// WebSocket client
// ========================================

/// Helper struct speaking the `{event, data}` envelope
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    pub async fn connect(url: &str) -> Self {
        let (stream, _) = tokio_tungstenite::connect_async(url)
            .await
            .expect("Failed to connect WebSocket");
        WsClient { stream }
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.stream
            .send(Message::text(text.to_string()))
            .await
            .expect("Failed to send frame");
    }

    pub async fn send(&mut self, event: &str, data: Value) {
        let frame = json!({"event": event, "data": data}).to_string();
        self.send_raw(&frame).await;
    }

    pub async fn join(&mut self, room_id: &str) -> Value {
        self.send("join_room", json!(room_id)).await;
        let status = self.recv().await;
        assert_eq!(status["event"], "sync_status", "unexpected frame: {status}");
        status["data"].clone()
    }

    /// Wait for the next text frame and parse it
    pub async fn recv(&mut self) -> Value {
        self.try_recv(RECV_TIMEOUT)
            .await
            .expect("Timed out waiting for a frame")
    }

    /// Next text frame within `wait`, if any
    pub async fn try_recv(&mut self, wait: Duration) -> Option<Value> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let frame = tokio::time::timeout_at(deadline, self.stream.next())
                .await
                .ok()??
                .expect("WebSocket error");
            if let Message::Text(text) = frame {
                return Some(serde_json::from_str(text.as_str()).expect("Frame is not JSON"));
            }
        }
    }

    /// Assert that nothing arrives for a short while
    pub async fn expect_silence(&mut self) {
        if let Some(frame) = self.try_recv(Duration::from_millis(300)).await {
            panic!("expected no frame, got {frame}");
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

// ========================================
// Fake media origin
// ========================================

/// What the fake origin observed
#[derive(Default)]
pub struct OriginLog {
    /// Raw `Range` header values
    pub ranges: Vec<Option<Vec<u8>>>,
    pub tokens: Vec<Option<String>>,
    pub queries: Vec<String>,
}

pub struct FakeOriginState {
    pub log: Mutex<OriginLog>,
    /// Signalled when an endless stream's body is dropped by the server
    pub stream_dropped: Notify,
    /// Chunks of the `firehose` item handed to the server so far
    pub chunks_produced: AtomicUsize,
}

impl FakeOriginState {
    pub fn produced(&self) -> usize {
        self.chunks_produced.load(Ordering::SeqCst)
    }
}

pub struct FakeOrigin {
    addr: SocketAddr,
    handle: JoinHandle<()>,
    pub state: Arc<FakeOriginState>,
}

impl FakeOrigin {
    pub async fn start() -> Self {
        let state = Arc::new(FakeOriginState {
            log: Mutex::new(OriginLog::default()),
            stream_dropped: Notify::new(),
            chunks_produced: AtomicUsize::new(0),
        });
        let app = Router::new()
            .route("/Videos/{item_id}/{file}", get(serve_video))
            .route("/Users/{user_id}/Items", get(serve_library))
            .route("/Shows/{series_id}/Episodes", get(serve_episodes))
            .with_state(state.clone());
        let (addr, handle) = spawn_app(app).await;
        FakeOrigin {
            addr,
            handle,
            state,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for FakeOrigin {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Fires the origin's notification when the streamed body is dropped
struct DropSignal(Arc<FakeOriginState>);

impl Drop for DropSignal {
    fn drop(&mut self) {
        self.0.stream_dropped.notify_one();
    }
}

fn header_string(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Parse `bytes=START-END` or `bytes=START-`
fn parse_range(range: &str, len: usize) -> Option<(usize, usize)> {
    let bounds = range.strip_prefix("bytes=")?;
    let (start, end) = bounds.split_once('-')?;
    let start: usize = start.parse().ok()?;
    let end: usize = if end.is_empty() {
        len - 1
    } else {
        end.parse::<usize>().ok()?.min(len - 1)
    };
    (start <= end).then_some((start, end))
}

async fn serve_video(
    State(state): State<Arc<FakeOriginState>>,
    Path((item_id, _file)): Path<(String, String)>,
    uri: axum::http::Uri,
    headers: HeaderMap,
) -> Response {
    let range = headers.get(header::RANGE).map(|v| v.as_bytes().to_vec());
    {
        let mut log = state.log.lock().unwrap();
        log.ranges.push(range.clone());
        log.tokens.push(
            headers
                .get("X-Emby-Token")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        );
        log.queries.push(uri.query().unwrap_or_default().to_string());
    }

    match item_id.as_str() {
        "missing" => (StatusCode::NOT_FOUND, "no such item").into_response(),
        "stall" => {
            tokio::time::sleep(Duration::from_secs(10)).await;
            StatusCode::OK.into_response()
        }
        "firehose" => {
            // yields as fast as it is polled; counts what has been handed out
            let counter = state.clone();
            let body = futures_util::stream::iter(0..FIREHOSE_CHUNKS).map(move |_| {
                counter.chunks_produced.fetch_add(1, Ordering::SeqCst);
                Ok::<_, std::io::Error>(Bytes::from_static(&FIREHOSE_CHUNK))
            });
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "video/mp4")
                .body(Body::from_stream(body))
                .unwrap()
        }
        "endless" => {
            let guard = DropSignal(state.clone());
            let body = futures_util::stream::unfold(guard, |guard| async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Some((Ok::<_, std::io::Error>(Bytes::from(vec![7u8; 1024])), guard))
            });
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "video/mp4")
                .body(Body::from_stream(body))
                .unwrap()
        }
        _ => {
            let media = media_bytes();
            let bounds = range
                .as_deref()
                .and_then(|r| std::str::from_utf8(r).ok())
                .and_then(|r| parse_range(r, media.len()));
            match bounds {
                Some((start, end)) => Response::builder()
                    .status(StatusCode::PARTIAL_CONTENT)
                    .header(header::CONTENT_TYPE, "video/mp4")
                    .header(header::ACCEPT_RANGES, "bytes")
                    .header(
                        header::CONTENT_RANGE,
                        format!("bytes {}-{}/{}", start, end, media.len()),
                    )
                    .header(header::CONTENT_LENGTH, end - start + 1)
                    .body(Body::from(media[start..=end].to_vec()))
                    .unwrap(),
                // full responses deliberately omit Accept-Ranges
                None => Response::builder()
                    .status(StatusCode::OK)
                    .header(header::CONTENT_TYPE, "video/mp4")
                    .header(header::CONTENT_LENGTH, media.len())
                    .body(Body::from(media))
                    .unwrap(),
            }
        }
    }
}

async fn serve_library(
    headers: HeaderMap,
    Path(_user_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    if header_string(&headers, header::HeaderName::from_static("x-emby-token")).as_deref()
        != Some(ORIGIN_API_KEY)
    {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({
        "Items": [
            {"Id": "m1", "Name": "Movie One", "Type": "Movie", "Overview": "First",
             "ImageTags": {"Primary": "tag1"}},
            {"Id": "s1", "Name": "Show One", "Type": "Series"}
        ],
        "TotalRecordCount": 2
    })))
}

async fn serve_episodes(Path(series_id): Path<String>) -> Result<Json<Value>, StatusCode> {
    if series_id != "s1" {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({
        "Items": [
            {"Id": "e1", "Name": "Pilot", "Type": "Episode", "SeriesName": "Show One",
             "ParentIndexNumber": 1, "IndexNumber": 1}
        ]
    })))
}
