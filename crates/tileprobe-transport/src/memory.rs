//! In-process connection pair.
//!
//! [`MemoryConnection::pair`] returns the client half (which implements
//! [`Connection`]) and a [`MemoryPeer`] that plays the server. Frames are
//! delivered in order over unbounded channels.

use tokio::sync::{mpsc, Mutex};

use crate::{Connection, ConnectionId, TransportError};

/// Client half of an in-memory connection.
pub struct MemoryConnection {
    id: ConnectionId,
    outbound: Mutex<Option<mpsc::UnboundedSender<Vec<u8>>>>,
    inbound: Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
}

/// Server half of an in-memory connection.
pub struct MemoryPeer {
    outbound: Option<mpsc::UnboundedSender<Vec<u8>>>,
    inbound: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl MemoryConnection {
    /// Creates a connected client/peer pair.
    pub fn pair() -> (MemoryConnection, MemoryPeer) {
        let (to_peer, from_client) = mpsc::unbounded_channel();
        let (to_client, from_peer) = mpsc::unbounded_channel();
        let conn = MemoryConnection {
            id: ConnectionId::next(),
            outbound: Mutex::new(Some(to_peer)),
            inbound: Mutex::new(from_peer),
        };
        let peer = MemoryPeer {
            outbound: Some(to_client),
            inbound: from_client,
        };
        (conn, peer)
    }
}

impl Connection for MemoryConnection {
    type Error = TransportError;

    async fn send(&self, data: &[u8]) -> Result<(), Self::Error> {
        let guard = self.outbound.lock().await;
        let Some(tx) = guard.as_ref() else {
            return Err(TransportError::ConnectionClosed(
                "closed locally".into(),
            ));
        };
        tx.send(data.to_vec()).map_err(|_| {
            TransportError::ConnectionClosed("peer dropped".into())
        })
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.inbound.lock().await.recv().await)
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.outbound.lock().await.take();
        Ok(())
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}

impl MemoryPeer {
    /// Delivers a frame to the client. Returns `false` once the client
    /// half has been dropped.
    pub fn send(&self, data: impl Into<Vec<u8>>) -> bool {
        self.outbound
            .as_ref()
            .is_some_and(|tx| tx.send(data.into()).is_ok())
    }

    /// Waits for the next frame the client sent. `None` once the client
    /// closed or dropped its half.
    pub async fn recv(&mut self) -> Option<Vec<u8>> {
        self.inbound.recv().await
    }

    /// Returns a frame if one is already queued.
    pub fn try_recv(&mut self) -> Option<Vec<u8>> {
        self.inbound.try_recv().ok()
    }

    /// Closes the server side; the client's next `recv` returns `None`.
    pub fn close(&mut self) {
        self.outbound.take();
    }
}
