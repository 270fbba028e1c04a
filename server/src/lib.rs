//! # Relay Server Library
//!
//! The relay keeps track of who is connected and passes every player's
//! reported state on to everyone else. It runs no simulation of its own:
//! positions, rotations, shots and kills are decided by the clients, and the
//! relay only records the latest reported pose so that late joiners can be
//! shown where everyone currently is.
//!
//! ## Module Organization
//!
//! ### Registry (`registry`)
//! One player per named connection, the current map, and the routing rules
//! for every client message. Each operation returns the messages to deliver
//! instead of sending them itself.
//!
//! ### Maps (`maps`)
//! The fixed catalog of arenas and the cursor that advances after every win.
//!
//! ### Network (`network`)
//! TCP accept loop, per-connection reader and writer tasks, and the single
//! event loop that owns the registry. Events are applied one at a time, so a
//! registry update and the broadcast it causes are never interleaved with
//! another event.
//!
//! ### Config (`config`)
//! Command line flags; the port can also come from the `PORT` variable.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::maps::MapCatalog;
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::new("0.0.0.0:4000", MapCatalog::builtin()).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod maps;
pub mod network;
pub mod registry;
