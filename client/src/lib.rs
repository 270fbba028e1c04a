//! # Arena Shooter Client Library
//!
//! Everything a player's machine runs: keyboard sampling, the local copy of
//! the match, the relay session, and the first-person view.
//!
//! ## Architecture Overview
//!
//! The client is authoritative for its own player. It moves, turns and fires
//! immediately and reports the result to the relay. Other players are mirrors
//! that snap to whatever the relay forwards last; nothing about them is
//! predicted or interpolated.
//!
//! Bullets are simulated locally on every client, including bullets fired by
//! others. Each client therefore decides for itself when it has been hit, and
//! the shooter's client decides which kills count towards its score.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! The match as this client sees it. Server messages and frame input go in,
//! [`game::Effect`] values come out: messages to send, banners to show, or a
//! request to start a fresh session.
//!
//! ### Timers Module (`timers`)
//! Cancellable deferred tasks for respawn, win announcement and reload. All of
//! them are dropped together when a new map arrives.
//!
//! ### Input Module (`input`)
//! Held-key sampling, one [`input::FrameInput`] per rendered frame.
//!
//! ### Network Module (`network`)
//! The relay session on a background thread, reached through channels so the
//! frame loop never blocks.
//!
//! ### Rendering Module (`rendering`)
//! First-person 3D view and HUD.
//!
//! ### Config Module (`config`)
//! Command line flags.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::game::{ClientGameState, Effect};
//! use client::input::FrameInput;
//! use client::network::{Connection, ConnectionEvent};
//!
//! let mut connection = Connection::open("127.0.0.1:4000".to_string(), None).unwrap();
//! let mut state = ClientGameState::new();
//! let mut now = 0.0;
//!
//! loop {
//!     let mut effects = Vec::new();
//!     for event in connection.poll() {
//!         if let ConnectionEvent::Message(message) = event {
//!             effects.extend(state.apply_server_message(message, now));
//!         }
//!     }
//!     effects.extend(state.update(&FrameInput::default(), 1.0 / 60.0, now));
//!
//!     for effect in effects {
//!         if let Effect::Send(message) = effect {
//!             connection.send(message);
//!         }
//!     }
//!     now += 1.0 / 60.0;
//! }
//! ```

pub mod config;
pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
pub mod timers;
