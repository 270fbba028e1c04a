//! Relay session running beside the frame loop
//!
//! The window owns the main thread, so the socket lives on a background
//! thread with its own single-threaded tokio runtime. The frame loop talks to
//! it through two unbounded channels and never blocks on the network.

use log::{debug, error, info, warn};
use shared::{read_frame, write_frame, ClientMessage, FrameError, ServerMessage};
use std::thread;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// What the session thread reports back to the frame loop
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionEvent {
    Message(ServerMessage),
    /// The relay went away or could not be reached. Always the last event.
    Closed,
}

/// Handle to one relay session. Dropping it closes the socket.
pub struct Connection {
    outbox: mpsc::UnboundedSender<ClientMessage>,
    inbox: mpsc::UnboundedReceiver<ConnectionEvent>,
    closed: bool,
}

impl Connection {
    /// Connects to `server` on a new thread and introduces the player by name
    pub fn open(server: String, name: Option<String>) -> std::io::Result<Self> {
        let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("relay-session".to_string())
            .spawn(move || runtime.block_on(connect(server, name, outbox_rx, inbox_tx)))?;

        Ok(Connection {
            outbox: outbox_tx,
            inbox: inbox_rx,
            closed: false,
        })
    }

    pub fn send(&self, message: ClientMessage) {
        if self.outbox.send(message).is_err() {
            debug!("Session already closed, dropping outgoing message");
        }
    }

    /// Drains everything received since the last call
    pub fn poll(&mut self) -> Vec<ConnectionEvent> {
        let mut events = Vec::new();
        if self.closed {
            return events;
        }

        loop {
            match self.inbox.try_recv() {
                Ok(ConnectionEvent::Closed) | Err(TryRecvError::Disconnected) => {
                    self.closed = true;
                    events.push(ConnectionEvent::Closed);
                    break;
                }
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
            }
        }

        events
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

async fn connect(
    server: String,
    name: Option<String>,
    outbox: mpsc::UnboundedReceiver<ClientMessage>,
    inbox: mpsc::UnboundedSender<ConnectionEvent>,
) {
    match TcpStream::connect(&server).await {
        Ok(stream) => {
            if let Err(e) = stream.set_nodelay(true) {
                warn!("Could not disable Nagle: {}", e);
            }
            info!("Connected to relay at {}", server);

            match session(stream, name, outbox, &inbox).await {
                Ok(()) => info!("Session with {} ended", server),
                Err(e) => error!("Session with {} failed: {}", server, e),
            }
        }
        Err(e) => error!("Could not reach relay at {}: {}", server, e),
    }

    let _ = inbox.send(ConnectionEvent::Closed);
}

/// Runs one session over `stream` until either side hangs up
///
/// The name introduction is always the first frame written. Closing the
/// outbox shuts the write half down, which the relay sees as a disconnect.
async fn session<S>(
    stream: S,
    name: Option<String>,
    mut outbox: mpsc::UnboundedReceiver<ClientMessage>,
    inbox: &mpsc::UnboundedSender<ConnectionEvent>,
) -> Result<(), FrameError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (mut reader, mut writer) = tokio::io::split(stream);
    write_frame(&mut writer, &ClientMessage::Name { name }).await?;

    let send = async move {
        while let Some(message) = outbox.recv().await {
            write_frame(&mut writer, &message).await?;
        }
        writer.shutdown().await?;
        Ok::<(), FrameError>(())
    };

    let receive = async {
        while let Some(message) = read_frame::<_, ServerMessage>(&mut reader).await? {
            if inbox.send(ConnectionEvent::Message(message)).is_err() {
                break;
            }
        }
        Ok::<(), FrameError>(())
    };

    tokio::select! {
        result = send => result,
        result = receive => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_session_introduces_itself_and_relays_both_ways() {
        let (client_side, mut relay_side) = tokio::io::duplex(4096);
        let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
        let (inbox_tx, mut inbox_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            session(client_side, Some("Alice".to_string()), outbox_rx, &inbox_tx)
                .await
                .map_err(|e| e.to_string())
        });

        let hello: Option<ClientMessage> = read_frame(&mut relay_side).await.unwrap();
        assert_eq!(
            hello,
            Some(ClientMessage::Name {
                name: Some("Alice".to_string())
            })
        );

        outbox_tx.send(ClientMessage::Rotate { rotation: 1.5 }).unwrap();
        let rotate: Option<ClientMessage> = read_frame(&mut relay_side).await.unwrap();
        assert_eq!(rotate, Some(ClientMessage::Rotate { rotation: 1.5 }));

        write_frame(&mut relay_side, &ServerMessage::PlayerShoot { id: 4 })
            .await
            .unwrap();
        assert_eq!(
            inbox_rx.recv().await,
            Some(ConnectionEvent::Message(ServerMessage::PlayerShoot { id: 4 }))
        );

        drop(relay_side);
        assert_eq!(handle.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn test_closing_outbox_hangs_up() {
        let (client_side, mut relay_side) = tokio::io::duplex(4096);
        let (outbox_tx, outbox_rx) = mpsc::unbounded_channel::<ClientMessage>();
        let (inbox_tx, _inbox_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            session(client_side, None, outbox_rx, &inbox_tx)
                .await
                .map_err(|e| e.to_string())
        });

        let hello: Option<ClientMessage> = read_frame(&mut relay_side).await.unwrap();
        assert_eq!(hello, Some(ClientMessage::Name { name: None }));

        drop(outbox_tx);

        let next: Option<ClientMessage> = read_frame(&mut relay_side).await.unwrap();
        assert_eq!(next, None);
        assert_eq!(handle.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn test_connection_reports_messages_then_close() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut connection = Connection::open(addr.to_string(), None).unwrap();
        let (mut stream, _) = listener.accept().await.unwrap();

        let hello: Option<ClientMessage> = read_frame(&mut stream).await.unwrap();
        assert_eq!(hello, Some(ClientMessage::Name { name: None }));

        write_frame(&mut stream, &ServerMessage::PlayerLeave { id: 3 })
            .await
            .unwrap();
        drop(stream);

        let mut events = Vec::new();
        for _ in 0..200 {
            events.extend(connection.poll());
            if connection.is_closed() {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(
            events,
            vec![
                ConnectionEvent::Message(ServerMessage::PlayerLeave { id: 3 }),
                ConnectionEvent::Closed,
            ]
        );
        assert!(connection.poll().is_empty());
    }
}
