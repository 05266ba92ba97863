//! Integration tests driving a real server instance over WebSocket and
//! HTTP, on an ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use ecrire_server::domain::{ConnectionHub, Identity, MessageStore, PendingMessage, RoomName, Timestamp};
use ecrire_server::infrastructure::{
    ConnectionRegistry, PersistenceConfig, PersistenceWorker, StaticTokenResolver,
    store::InMemoryMessageStore,
};
use ecrire_server::ui::Server;
use ecrire_server::usecase::{
    ConnectSessionUseCase, DisconnectSessionUseCase, GetHistoryUseCase, SendMessageUseCase,
};
use ecrire_shared::time::SystemClock;

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A fully wired server listening on an ephemeral port.
struct TestServer {
    addr: SocketAddr,
    store: Arc<InMemoryMessageStore>,
    registry: Arc<ConnectionRegistry>,
}

impl TestServer {
    /// Start a server whose resolver knows one access token for "alice".
    async fn start() -> Self {
        let store = Arc::new(InMemoryMessageStore::new());
        let resolver = Arc::new(StaticTokenResolver::new().with_access_token(
            "tok-alice",
            Identity::authenticated(Some("u-alice".to_string()), "alice"),
        ));
        let registry = Arc::new(ConnectionRegistry::new());
        let persistence = Arc::new(PersistenceWorker::start(
            store.clone(),
            PersistenceConfig::default(),
        ));
        let clock = Arc::new(SystemClock);

        let server = Server::new(
            Arc::new(ConnectSessionUseCase::new(registry.clone(), clock.clone())),
            Arc::new(DisconnectSessionUseCase::new(
                registry.clone(),
                clock.clone(),
            )),
            Arc::new(SendMessageUseCase::new(
                registry.clone(),
                persistence,
                clock.clone(),
            )),
            Arc::new(GetHistoryUseCase::new(store.clone())),
            resolver,
        );
        let router = server.router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("server task");
        });

        TestServer {
            addr,
            store,
            registry,
        }
    }

    fn ws_url(&self, query: &str) -> String {
        format!("ws://{}/ws{}", self.addr, query)
    }

    fn http_url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }

    /// Connect a plain (anonymous or query-authenticated) client.
    async fn connect(&self, query: &str) -> WsClient {
        let (ws, _response) = tokio_tungstenite::connect_async(self.ws_url(query))
            .await
            .expect("websocket connect");
        ws
    }

    /// Connect a client carrying a cookie header on the handshake.
    async fn connect_with_cookie(&self, cookie: &str) -> WsClient {
        let mut request = self
            .ws_url("")
            .into_client_request()
            .expect("client request");
        request
            .headers_mut()
            .insert("Cookie", cookie.parse().expect("cookie header"));
        let (ws, _response) = tokio_tungstenite::connect_async(request)
            .await
            .expect("websocket connect");
        ws
    }

    /// Wait until the registry sees the expected number of connections.
    async fn wait_for_connections(&self, expected: usize) {
        timeout(Duration::from_secs(5), async {
            while self.registry.connection_count().await != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("registry never reached {} connection(s)", expected));
    }
}

async fn send_frame(ws: &mut WsClient, json: serde_json::Value) {
    ws.send(WsMessage::Text(json.to_string().into()))
        .await
        .expect("send frame");
}

async fn recv_json(ws: &mut WsClient) -> serde_json::Value {
    let msg = timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timed out waiting for a frame")
        .expect("connection closed while waiting for a frame")
        .expect("websocket error while waiting for a frame");
    let text = msg.into_text().expect("text frame");
    serde_json::from_str(&text).expect("json frame")
}

async fn assert_silent(ws: &mut WsClient, wait: Duration) {
    match timeout(wait, ws.next()).await {
        Err(_) => {}
        Ok(Some(Ok(msg))) => panic!("expected no frame, got {:?}", msg),
        Ok(Some(Err(e))) => panic!("websocket error while expecting silence: {}", e),
        Ok(None) => panic!("connection closed while expecting silence"),
    }
}

fn stored(room: &str, text: &str, millis: i64) -> PendingMessage {
    PendingMessage {
        user_id: None,
        username: "alice".to_string(),
        room: RoomName::new(room),
        text: text.to_string(),
        timestamp: Timestamp::new(millis),
    }
}

#[tokio::test]
async fn test_join_announcement_reaches_existing_connections_only() {
    // テスト項目: 入室アナウンスが既存接続にだけ届き、本人には届かない
    // given (前提条件): 匿名の bob が接続済み
    let server = TestServer::start().await;
    let mut bob = server.connect("").await;
    server.wait_for_connections(1).await;

    // when (操作): alice がクエリトークンで接続する
    let mut alice = server.connect("?token=tok-alice").await;
    server.wait_for_connections(2).await;

    // then (期待する結果): bob にだけ "Serveur" 発のアナウンスが届く
    let frame = recv_json(&mut bob).await;
    assert_eq!(frame["username"], "Serveur");
    assert_eq!(frame["text"], "alice a rejoint le salon.");
    assert_eq!(frame["room"], "general");
    assert_silent(&mut alice, Duration::from_millis(300)).await;
}

#[tokio::test]
async fn test_message_broadcast_excludes_sender() {
    // テスト項目: 送信メッセージが他の接続に届き、送信者にはエコーされない
    // given (前提条件): 匿名の bob と認証済みの alice が接続済み
    let server = TestServer::start().await;
    let mut bob = server.connect("").await;
    server.wait_for_connections(1).await;
    let mut alice = server.connect("?token=tok-alice").await;
    server.wait_for_connections(2).await;
    // bob へ届いた入室アナウンスを読み捨てる
    let _ = recv_json(&mut bob).await;

    // when (操作): alice がメッセージを送信する
    send_frame(&mut alice, serde_json::json!({"text": "hi", "room": "general"})).await;

    // then (期待する結果): bob には alice 名義の完全なフレームが届く
    let frame = recv_json(&mut bob).await;
    assert_eq!(frame["username"], "alice");
    assert_eq!(frame["text"], "hi");
    assert_eq!(frame["room"], "general");
    let timestamp = frame["timestamp"].as_str().expect("timestamp string");
    assert!(timestamp.ends_with('Z'), "timestamp should be UTC: {}", timestamp);
    // 送信者自身は何も受信しない
    assert_silent(&mut alice, Duration::from_millis(300)).await;
}

#[tokio::test]
async fn test_abrupt_disconnect_announces_leave_exactly_once() {
    // テスト項目: 突然の切断で退室アナウンスがちょうど 1 回流れる
    // given (前提条件): bob と alice が接続済み、入室アナウンスは読み捨て済み
    let server = TestServer::start().await;
    let mut bob = server.connect("").await;
    server.wait_for_connections(1).await;
    let alice = server.connect("?token=tok-alice").await;
    server.wait_for_connections(2).await;
    let _ = recv_json(&mut bob).await;

    // when (操作): alice の接続を唐突に破棄する
    drop(alice);
    server.wait_for_connections(1).await;

    // then (期待する結果): bob に退室アナウンスが 1 回だけ届く
    let frame = recv_json(&mut bob).await;
    assert_eq!(frame["username"], "Serveur");
    assert_eq!(frame["text"], "alice a quitté le salon.");
    assert_silent(&mut bob, Duration::from_millis(300)).await;
}

#[tokio::test]
async fn test_cookie_credential_authenticates_session() {
    // テスト項目: クッキーで渡したアクセストークンでもセッションが認証される
    // given (前提条件): 匿名の観測者が接続済み
    let server = TestServer::start().await;
    let mut observer = server.connect("").await;
    server.wait_for_connections(1).await;

    // when (操作): alice がクッキー付きハンドシェイクで接続する
    let _alice = server.connect_with_cookie("access_token=tok-alice").await;
    server.wait_for_connections(2).await;

    // then (期待する結果): アナウンスが alice 名義になっている
    let frame = recv_json(&mut observer).await;
    assert_eq!(frame["text"], "alice a rejoint le salon.");
}

#[tokio::test]
async fn test_history_returns_oldest_first_with_limit() {
    // テスト項目: 5 件のレコードに対し limit 3 で古い順の 3 件が返る
    // given (前提条件): general に 5 件、別 room に 1 件のレコード
    let server = TestServer::start().await;
    for (text, millis) in [
        ("m1", 1000),
        ("m2", 2000),
        ("m3", 3000),
        ("m4", 4000),
        ("m5", 5000),
    ] {
        server
            .store
            .append(&stored("general", text, millis))
            .await
            .expect("seed record");
    }
    server
        .store
        .append(&stored("random", "other", 1500))
        .await
        .expect("seed record");

    // when (操作):
    let response = reqwest::get(server.http_url("/api/messages?room=general&limit=3"))
        .await
        .expect("history request");
    assert_eq!(response.status(), 200);
    let records: Vec<serde_json::Value> = response.json().await.expect("history json");

    // then (期待する結果):
    let texts: Vec<&str> = records
        .iter()
        .map(|record| record["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["m1", "m2", "m3"]);
    assert_eq!(records[0]["username"], "alice");
    assert_eq!(records[0]["room"], "general");
    assert_eq!(records[0]["timestamp"], "1970-01-01T00:00:01Z");
    assert!(records[0]["id"].is_string());
}

#[tokio::test]
async fn test_sent_message_eventually_reaches_history() {
    // テスト項目: 送信されたメッセージが永続化パイプラインを経て履歴に現れる
    // given (前提条件): alice と観測者が接続済み
    let server = TestServer::start().await;
    let mut observer = server.connect("").await;
    server.wait_for_connections(1).await;
    let mut alice = server.connect("?token=tok-alice").await;
    server.wait_for_connections(2).await;
    let _ = recv_json(&mut observer).await;

    // when (操作):
    send_frame(
        &mut alice,
        serde_json::json!({"text": "pour l'histoire", "room": "general"}),
    )
    .await;
    let _ = recv_json(&mut observer).await;

    // then (期待する結果): 履歴エンドポイントにレコードが現れる
    let records = timeout(Duration::from_secs(5), async {
        loop {
            let response = reqwest::get(server.http_url("/api/messages"))
                .await
                .expect("history request");
            let records: Vec<serde_json::Value> = response.json().await.expect("history json");
            if !records.is_empty() {
                break records;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("message should be persisted");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["username"], "alice");
    assert_eq!(records[0]["text"], "pour l'histoire");
    assert_eq!(records[0]["room"], "general");
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックエンドポイントが ok を返す
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let response = reqwest::get(server.http_url("/api/health"))
        .await
        .expect("health request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("health json");
    assert_eq!(body, serde_json::json!({"status": "ok"}));
}
