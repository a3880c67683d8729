//! Integration tests for the WebSocket client connection.
//!
//! Each test binds a throwaway tokio-tungstenite server on a loopback
//! port chosen by the OS and connects the probe's client to it.

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::Message;
    use tileprobe_transport::{
        Connection, TransportError, WebSocketConnection,
    };

    type ServerWs = tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

    /// Binds a listener and returns its `ws://` URL plus a task that
    /// yields the accepted server-side socket.
    async fn start_server() -> (String, tokio::task::JoinHandle<ServerWs>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("should accept");
            tokio_tungstenite::accept_async(stream)
                .await
                .expect("handshake should succeed")
        });
        (format!("ws://{addr}"), handle)
    }

    #[tokio::test]
    async fn test_client_sends_text_and_receives_frames() {
        let (url, server) = start_server().await;
        let client = WebSocketConnection::connect(&url)
            .await
            .expect("client should connect");
        let mut server_ws = server.await.unwrap();

        assert!(client.id().into_inner() > 0);

        // Client → server: JSON goes out as a text frame.
        client
            .send(br#"{"type":"play_card","card":5}"#)
            .await
            .expect("send should succeed");
        let msg = server_ws.next().await.unwrap().unwrap();
        assert!(msg.is_text(), "JSON should travel as a text frame");
        assert_eq!(msg.into_text().unwrap().as_str(), r#"{"type":"play_card","card":5}"#);

        // Server → client: both text and binary frames are delivered.
        server_ws
            .send(Message::text(r#"{"type":"your_turn"}"#))
            .await
            .unwrap();
        server_ws
            .send(Message::binary(b"raw".to_vec()))
            .await
            .unwrap();

        let first = client.recv().await.unwrap().unwrap();
        assert_eq!(first, br#"{"type":"your_turn"}"#);
        let second = client.recv().await.unwrap().unwrap();
        assert_eq!(second, b"raw");

        client.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_recv_returns_none_when_server_closes() {
        let (url, server) = start_server().await;
        let client = WebSocketConnection::connect(&url).await.unwrap();
        let mut server_ws = server.await.unwrap();

        server_ws.send(Message::Close(None)).await.unwrap();

        let result = client.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on server close");
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_fails() {
        // Bind and immediately drop to get a port nobody listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = WebSocketConnection::connect(&format!("ws://{addr}"))
            .await
            .err()
            .expect("connect should fail");
        assert!(matches!(err, TransportError::ConnectFailed { .. }));
    }
}
