//! End-to-end test: a probe against a scripted tokio-tungstenite server on
//! a loopback port.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tileprobe::prelude::*;
use tileprobe::{Seat, SessionEnd};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

type ServerWs = tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

async fn next_json(ws: &mut ServerWs) -> Value {
    loop {
        let msg = ws
            .next()
            .await
            .expect("client should still be connected")
            .expect("frame should be readable");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).expect("client sends JSON");
        }
    }
}

async fn push(ws: &mut ServerWs, value: Value) {
    ws.send(Message::text(value.to_string()))
        .await
        .expect("server send should succeed");
}

/// One short round: seat the probe, give it the turn, confirm its discard,
/// end the round, hang up. Returns every frame the probe sent.
async fn scripted_round(listener: TcpListener) -> Vec<Value> {
    let (stream, _) = listener.accept().await.expect("should accept");
    let mut ws = tokio_tungstenite::accept_async(stream)
        .await
        .expect("handshake should succeed");

    let mut seen = vec![next_json(&mut ws).await];
    push(
        &mut ws,
        json!({"type": "room_info", "roomId": "room_e2e",
               "players": [{"seat": 0, "playerId": "bot", "nickname": "Bot"}]}),
    )
    .await;
    push(
        &mut ws,
        json!({"type": "game_start", "bankerUser": 0, "currentUser": 0,
               "cards": [17, 33, 49], "leftCardCount": 80}),
    )
    .await;

    let play = next_json(&mut ws).await;
    let card = play["card"].clone();
    seen.push(play);
    push(&mut ws, json!({"type": "player_play_card", "seat": 0, "card": card})).await;
    push(
        &mut ws,
        json!({"type": "round_result", "winnerSeat": 0, "scores": [8]}),
    )
    .await;
    ws.close(None).await.expect("close should succeed");
    seen
}

#[tokio::test]
async fn test_probe_plays_a_round_against_websocket_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let server = tokio::spawn(scripted_round(listener));

    let client = ProbeClient::builder()
        .url(&url)
        .player("bot")
        .nickname("Bot")
        .room("room_e2e")
        .reaction_delay(Duration::from_millis(10))
        .connect(ProbePolicy::default())
        .await
        .expect("probe should connect");

    let report = tokio::time::timeout(Duration::from_secs(10), client.run())
        .await
        .expect("session should finish")
        .expect("session should end cleanly");
    let seen = server.await.unwrap();

    assert_eq!(
        seen,
        vec![
            json!({"type": "join_room", "roomId": "room_e2e", "playerId": "bot", "nickname": "Bot"}),
            json!({"type": "play_card", "card": 17}),
        ]
    );
    assert_eq!(report.end, SessionEnd::ServerClosed);
    assert_eq!(report.seat, Some(Seat(0)));
    assert_eq!(report.total_score(), 8);
    assert_eq!(report.dispatch.desyncs, 0);
}

#[tokio::test]
async fn test_connect_to_closed_port_fails() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    drop(listener);

    let result = ProbeClient::builder()
        .url(&url)
        .connect(ProbePolicy::default())
        .await;
    assert!(matches!(result, Err(ProbeError::Transport(_))));
}
