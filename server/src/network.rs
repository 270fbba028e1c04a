//! Relay network layer: TCP connections feeding a single event loop

use crate::maps::MapCatalog;
use crate::registry::{Outgoing, Registry, Target};
use log::{debug, error, info, warn};
use shared::{read_frame, write_frame, ClientMessage, ServerMessage};
use std::collections::HashMap;
use std::net::SocketAddr;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Messages sent from connection tasks to the main relay loop
#[derive(Debug)]
pub enum RelayEvent {
    MessageReceived { id: u32, message: ClientMessage },
    Disconnected { id: u32 },
}

/// Relay server owning the registry and every connection's outbox
pub struct Server {
    listener: TcpListener,
    registry: Registry,
    connections: HashMap<u32, mpsc::UnboundedSender<ServerMessage>>,
    next_connection_id: u32,

    event_tx: mpsc::UnboundedSender<RelayEvent>,
    event_rx: mpsc::UnboundedReceiver<RelayEvent>,
}

impl Server {
    pub async fn new(addr: &str, maps: MapCatalog) -> Result<Self, Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(addr).await?;
        info!("Relay listening on {}", listener.local_addr()?);

        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Ok(Server {
            listener,
            registry: Registry::new(maps),
            connections: HashMap::new(),
            next_connection_id: 1,
            event_tx,
            event_rx,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Registers a new connection and spawns its reader and writer tasks
    fn accept_connection(&mut self, stream: TcpStream, addr: SocketAddr) {
        let id = self.next_connection_id;
        self.next_connection_id += 1;

        if let Err(e) = stream.set_nodelay(true) {
            warn!("Could not disable Nagle for {}: {}", addr, e);
        }

        let (reader, writer) = stream.into_split();
        let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
        self.connections.insert(id, outbox_tx);

        info!("Connection {} opened from {}", id, addr);

        tokio::spawn(Self::write_loop(id, writer, outbox_rx));
        tokio::spawn(Self::read_loop(id, reader, self.event_tx.clone()));
    }

    /// Forwards decoded frames to the relay loop until the peer goes away
    async fn read_loop(id: u32, mut reader: OwnedReadHalf, events: mpsc::UnboundedSender<RelayEvent>) {
        loop {
            match read_frame::<_, ClientMessage>(&mut reader).await {
                Ok(Some(message)) => {
                    if events
                        .send(RelayEvent::MessageReceived { id, message })
                        .is_err()
                    {
                        return;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Dropping connection {}: {}", id, e);
                    break;
                }
            }
        }

        let _ = events.send(RelayEvent::Disconnected { id });
    }

    /// Drains one connection's outbox onto its socket
    async fn write_loop(
        id: u32,
        mut writer: OwnedWriteHalf,
        mut outbox: mpsc::UnboundedReceiver<ServerMessage>,
    ) {
        while let Some(message) = outbox.recv().await {
            if let Err(e) = write_frame(&mut writer, &message).await {
                error!("Failed to send to connection {}: {}", id, e);
                break;
            }
        }
    }

    fn handle_event(&mut self, event: RelayEvent) {
        match event {
            RelayEvent::MessageReceived { id, message } => {
                debug!("Connection {} sent {:?}", id, message);
                let outgoing = self.registry.handle_message(id, message);
                self.dispatch(outgoing);
            }
            RelayEvent::Disconnected { id } => {
                if self.connections.remove(&id).is_some() {
                    info!("Connection {} closed", id);
                    let outgoing = self.registry.disconnect(id);
                    self.dispatch(outgoing);
                }
            }
        }
    }

    fn dispatch(&self, outgoing: Vec<Outgoing>) {
        for Outgoing { target, message } in outgoing {
            match target {
                Target::Only(id) => self.send_to(id, message),
                Target::AllExcept(sender) => {
                    for (&id, outbox) in &self.connections {
                        if id == sender {
                            continue;
                        }
                        if outbox.send(message.clone()).is_err() {
                            debug!("Outbox of connection {} already closed", id);
                        }
                    }
                }
            }
        }
    }

    fn send_to(&self, id: u32, message: ServerMessage) {
        match self.connections.get(&id) {
            Some(outbox) => {
                if outbox.send(message).is_err() {
                    debug!("Outbox of connection {} already closed", id);
                }
            }
            None => warn!("No live connection {} for {:?}", id, message),
        }
    }

    /// Main relay loop. Events are handled one at a time, so every registry
    /// update and its broadcast happen together.
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        info!("Relay started");

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, addr)) => self.accept_connection(stream, addr),
                        Err(e) => error!("Failed to accept connection: {}", e),
                    }
                },

                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                },
            }
        }
    }
}
