use std::time::Duration;

use canvas::engine::EngineConfig;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use super::*;
use crate::net::backoff::Backoff;
use crate::net::sync_client::spawn_sync_client;

const STEP: Duration = Duration::from_secs(5);

fn session() -> (Session, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Session::new(EngineCore::new(EngineConfig::default()), tx), rx)
}

fn text(raw: &str) -> NetEvent {
    NetEvent::Text(raw.to_owned())
}

fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<Message> {
    let mut out = Vec::new();
    while let Ok(raw) = rx.try_recv() {
        out.push(frames::decode(&raw).unwrap());
    }
    out
}

fn options() -> RunOptions {
    RunOptions { frame_interval: Duration::from_millis(5), linger: Duration::ZERO }
}

#[test]
fn nothing_is_sent_before_identity() {
    let (mut session, mut rx) = session();
    assert_eq!(session.handle_ui(UiEvent::Down { x: 10.0, y: 10.0 }), 0);
    assert_eq!(session.handle_ui(UiEvent::Move { x: 20.0, y: 10.0 }), 0);
    assert_eq!(session.handle_ui(UiEvent::Clear), 0);
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn drawing_after_init_sends_cursor_then_draw() {
    let (mut session, mut rx) = session();
    session.handle_net(NetEvent::Status(ConnectionStatus::Connected), std::time::Instant::now());
    session.handle_net(text(r#"{"type":"init","id":"me"}"#), std::time::Instant::now());
    assert!(session.engine().is_initialized());

    session.handle_ui(UiEvent::Down { x: 10.0, y: 10.0 });
    assert_eq!(session.handle_ui(UiEvent::Move { x: 20.0, y: 10.0 }), 2);

    let sent = drain(&mut rx);
    assert!(matches!(&sent[0], Message::Cursor(c) if c.id == "me" && c.x == 20.0));
    assert!(matches!(&sent[1], Message::Draw(d) if d.last_x == 10.0 && d.x == 20.0));
    assert!(!session.engine().surface.is_blank());
}

#[test]
fn tool_changes_apply_to_later_emissions() {
    let (mut session, mut rx) = session();
    session.handle_net(text(r#"{"type":"init","id":"me"}"#), std::time::Instant::now());
    session.handle_ui(UiEvent::Color { value: "#00ff00".into() });
    session.handle_ui(UiEvent::Size { value: 9.0 });
    assert_eq!(session.handle_ui(UiEvent::Username { name: "ana".into() }), 1);
    session.handle_ui(UiEvent::Move { x: 5.0, y: 5.0 });

    let sent = drain(&mut rx);
    assert_eq!(sent[0], Message::ChangeUsername { name: "ana".into() });
    let Message::Cursor(cursor) = &sent[1] else { panic!("expected cursor, got {:?}", sent[1]) };
    assert_eq!(cursor.color, "#00ff00");
    assert_eq!(cursor.size, 9.0);
    assert_eq!(cursor.username.as_deref(), Some("ana"));
}

#[test]
fn disconnect_drops_identity_and_presence() {
    let (mut session, mut rx) = session();
    let now = std::time::Instant::now();
    session.handle_net(NetEvent::Status(ConnectionStatus::Connected), now);
    session.handle_net(text(r#"{"type":"init","id":"me"}"#), now);
    session.handle_net(text(r##"{"type":"cursor","id":"p","x":1,"y":1,"color":"#000","size":3}"##), now);
    assert_eq!(session.engine().presence.len(), 1);

    session.handle_net(NetEvent::Status(ConnectionStatus::Disconnected), now);
    assert_eq!(session.status(), ConnectionStatus::Disconnected);
    assert!(!session.engine().is_initialized());
    assert!(session.engine().presence.is_empty());

    session.handle_ui(UiEvent::Move { x: 5.0, y: 5.0 });
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn inbound_traffic_updates_surface_and_roster() {
    let (mut session, _rx) = session();
    let now = std::time::Instant::now();
    session.handle_net(
        text(r##"{"type":"draw","lastX":0,"lastY":0,"x":30,"y":30,"color":"#f00","size":4}"##),
        now,
    );
    session.handle_net(text(r#"{"type":"users_update","users":["ana","bo"]}"#), now);
    session.handle_net(text("not json"), now);

    assert!(!session.engine().surface.is_blank());
    assert_eq!(session.engine().roster, vec!["ana".to_owned(), "bo".to_owned()]);
}

#[test]
fn closed_outbound_counts_nothing() {
    let (mut session, rx) = session();
    drop(rx);
    session.handle_net(text(r#"{"type":"init","id":"me"}"#), std::time::Instant::now());
    assert_eq!(session.handle_ui(UiEvent::Clear), 0);
}

#[tokio::test]
async fn run_applies_net_events_until_shutdown() {
    let (session, _outbound) = session();
    let (net_tx, net_rx) = mpsc::unbounded_channel();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    net_tx.send(NetEvent::Status(ConnectionStatus::Connected)).unwrap();
    net_tx.send(text(r#"{"type":"init","id":"me"}"#)).unwrap();
    net_tx.send(text(r##"{"type":"cursor","id":"p","x":40,"y":40,"color":"#00f","size":6}"##)).unwrap();

    let handle = tokio::spawn(run(session, net_rx, None, options(), async move {
        stop_rx.await.ok();
    }));
    tokio::time::sleep(Duration::from_millis(50)).await;
    stop_tx.send(()).unwrap();

    let session = timeout(STEP, handle).await.unwrap().unwrap();
    let engine = session.into_engine();
    assert_eq!(engine.identity.as_deref(), Some("me"));
    assert!(!engine.frame_loop.is_running());
    assert!(engine.frame_loop.frames() > 0);
    assert!(!engine.overlay.layer().is_blank());
}

#[tokio::test]
async fn run_ends_after_ui_source_and_linger() {
    let (session, _outbound) = session();
    let (_net_tx, net_rx) = mpsc::unbounded_channel();
    let (ui_tx, ui_rx) = mpsc::unbounded_channel();
    ui_tx.send(UiEvent::Color { value: "#123456".into() }).unwrap();
    drop(ui_tx);

    let options = RunOptions { linger: Duration::from_millis(30), ..options() };
    let started = Instant::now();
    let session = timeout(STEP, run(session, net_rx, Some(ui_rx), options, std::future::pending())).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(30));
    assert_eq!(session.engine().tools.color, "#123456");
}

#[tokio::test]
async fn run_ends_when_sync_client_stops() {
    let (session, _outbound) = session();
    let (net_tx, net_rx) = mpsc::unbounded_channel();
    drop(net_tx);
    timeout(STEP, run(session, net_rx, None, options(), std::future::pending())).await.unwrap();
}

/// Full path: script events through the session and sync client to a hub,
/// and the hub's broadcast back onto the surface.
#[tokio::test]
async fn strokes_reach_the_hub_and_broadcasts_reach_the_surface() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let (joined_tx, joined_rx) = oneshot::channel();
    let (seen_tx, mut seen_rx) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.send(WsMessage::Text(r#"{"type":"init","id":"me"}"#.into())).await.unwrap();
        ws.send(WsMessage::Text(
            r##"{"type":"draw","lastX":100,"lastY":100,"x":120,"y":100,"color":"#0000ff","size":6}"##.into(),
        ))
        .await
        .unwrap();
        joined_tx.send(()).unwrap();
        while let Some(Ok(message)) = ws.next().await {
            if let WsMessage::Text(raw) = message {
                seen_tx.send(raw.as_str().to_owned()).unwrap();
            }
        }
    });

    let sync = spawn_sync_client(url, Backoff::new(Duration::from_millis(10), Duration::from_millis(20)));
    let (ui_tx, ui_rx) = mpsc::unbounded_channel();
    let session = Session::new(EngineCore::new(EngineConfig::default()), sync.outbound.clone());
    let runner = tokio::spawn(run(
        session,
        sync.events,
        Some(ui_rx),
        RunOptions { frame_interval: Duration::from_millis(5), linger: Duration::from_millis(100) },
        std::future::pending(),
    ));

    timeout(STEP, joined_rx).await.unwrap().unwrap();
    // Let the session take the identity before the pointer moves.
    tokio::time::sleep(Duration::from_millis(100)).await;
    ui_tx.send(UiEvent::Down { x: 10.0, y: 10.0 }).unwrap();
    ui_tx.send(UiEvent::Move { x: 30.0, y: 10.0 }).unwrap();
    ui_tx.send(UiEvent::Up).unwrap();

    let first = frames::decode(&timeout(STEP, seen_rx.recv()).await.unwrap().unwrap()).unwrap();
    let second = frames::decode(&timeout(STEP, seen_rx.recv()).await.unwrap().unwrap()).unwrap();
    assert!(matches!(first, Message::Cursor(ref c) if c.id == "me"));
    assert!(matches!(second, Message::Draw(ref d) if d.last_x == 10.0 && d.x == 30.0));

    drop(ui_tx);
    let session = timeout(STEP, runner).await.unwrap().unwrap();
    let surface = session.engine().surface.raster();
    assert!(surface.pixel(110, 100).is_some_and(|p| !p.is_transparent()));
    assert!(surface.pixel(20, 10).is_some_and(|p| !p.is_transparent()));
}
