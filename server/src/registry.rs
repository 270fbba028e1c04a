//! Relay-side bookkeeping of named players and routing of their events
//!
//! The registry is the only server state that outlives a single message:
//! - The list of players, one per named connection
//! - The map catalog and which map new joiners receive
//!
//! It never simulates anything. Positions and rotations are whatever the
//! owning client last reported. Every operation returns the messages that
//! should go out, leaving delivery to the network layer.

use crate::maps::MapCatalog;
use log::{debug, info, warn};
use shared::{ClientMessage, Player, ServerMessage, SPAWN_ROTATION};

/// Who an outgoing message is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Just this connection.
    Only(u32),
    /// Every live connection except this one, named or not.
    AllExcept(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outgoing {
    pub target: Target,
    pub message: ServerMessage,
}

impl Outgoing {
    fn only(id: u32, message: ServerMessage) -> Self {
        Self {
            target: Target::Only(id),
            message,
        }
    }

    fn others(id: u32, message: ServerMessage) -> Self {
        Self {
            target: Target::AllExcept(id),
            message,
        }
    }
}

/// Players known to the relay plus the map rotation
pub struct Registry {
    players: Vec<Player>,
    maps: MapCatalog,
}

impl Registry {
    pub fn new(maps: MapCatalog) -> Self {
        Self {
            players: Vec::new(),
            maps,
        }
    }

    /// Dispatches one message received from connection `sender`
    pub fn handle_message(&mut self, sender: u32, message: ClientMessage) -> Vec<Outgoing> {
        match message {
            ClientMessage::Name { name } => self.join(sender, name),
            ClientMessage::Shoot => {
                vec![Outgoing::others(sender, ServerMessage::PlayerShoot { id: sender })]
            }
            ClientMessage::Die => {
                vec![Outgoing::others(sender, ServerMessage::PlayerDie { id: sender })]
            }
            ClientMessage::Kill { id } => {
                debug!("Player {} reports killing {}", sender, id);
                Vec::new()
            }
            ClientMessage::Win => self.win(sender),
            ClientMessage::Move { x, y } => self.move_player(sender, x, y),
            ClientMessage::Rotate { rotation } => self.rotate_player(sender, rotation),
        }
    }

    /// Registers the player behind connection `sender`
    ///
    /// The newcomer gets the current map and a snapshot of everyone who
    /// joined before it; everybody else learns about the newcomer. A missing
    /// or empty name falls back to the connection id.
    pub fn join(&mut self, sender: u32, name: Option<String>) -> Vec<Outgoing> {
        if self.player(sender).is_some() {
            warn!("Connection {} sent its name twice, ignoring", sender);
            return Vec::new();
        }

        let name = name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| sender.to_string());
        let map = self.maps.current();
        let player = Player::new(
            sender,
            name,
            map.spawn_position.x,
            map.spawn_position.y,
            SPAWN_ROTATION,
        );

        let init = ServerMessage::Init {
            player: player.clone(),
            players: self.players.clone(),
            map_walls: map.walls.clone(),
            spawn_position: map.spawn_position,
        };
        let join = ServerMessage::PlayerJoin {
            id: player.id,
            x: player.x,
            y: player.y,
            rotation: player.rotation,
            name: player.name.clone(),
        };

        info!(
            "Player {} joined as {:?} on map {}",
            sender,
            player.name,
            self.maps.index()
        );
        self.players.push(player);

        vec![Outgoing::only(sender, init), Outgoing::others(sender, join)]
    }

    /// Forgets connection `sender`
    ///
    /// The leave notice goes out even if the connection never named itself.
    pub fn disconnect(&mut self, sender: u32) -> Vec<Outgoing> {
        if let Some(index) = self.players.iter().position(|p| p.id == sender) {
            let player = self.players.remove(index);
            info!("Player {} ({:?}) left", sender, player.name);
        }

        vec![Outgoing::others(
            sender,
            ServerMessage::PlayerLeave { id: sender },
        )]
    }

    fn win(&mut self, sender: u32) -> Vec<Outgoing> {
        let next = self.maps.advance();
        info!("Player {} won, next joiners get map {}", sender, next);
        vec![Outgoing::others(sender, ServerMessage::PlayerWin { id: sender })]
    }

    fn move_player(&mut self, sender: u32, x: f32, y: f32) -> Vec<Outgoing> {
        if let Some(player) = self.player_mut(sender) {
            player.x = x;
            player.y = y;
        }
        vec![Outgoing::others(
            sender,
            ServerMessage::PlayerUpdatePosition { id: sender, x, y },
        )]
    }

    fn rotate_player(&mut self, sender: u32, rotation: f32) -> Vec<Outgoing> {
        if let Some(player) = self.player_mut(sender) {
            player.rotation = rotation;
        }
        vec![Outgoing::others(
            sender,
            ServerMessage::PlayerUpdateRotation {
                id: sender,
                rotation,
            },
        )]
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn player_mut(&mut self, id: u32) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn map_index(&self) -> usize {
        self.maps.index()
    }

    pub fn map_count(&self) -> usize {
        self.maps.len()
    }

    /// Returns the number of registered players
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(MapCatalog::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Map;

    fn named(name: &str) -> ClientMessage {
        ClientMessage::Name {
            name: Some(name.to_string()),
        }
    }

    fn small_catalog() -> MapCatalog {
        MapCatalog::new(vec![
            Map::new(&["###", "# #", "###"], [1.0, 1.0]),
            Map::new(&["#####", "#   #", "#####"], [2.0, 1.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_join_sends_init_then_broadcasts() {
        let mut registry = Registry::new(small_catalog());
        registry.handle_message(1, named("Alice"));

        let out = registry.handle_message(2, named("Bob"));

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].target, Target::Only(2));
        match &out[0].message {
            ServerMessage::Init {
                player,
                players,
                map_walls,
                spawn_position,
            } => {
                assert_eq!(player.id, 2);
                assert_eq!(player.name, "Bob");
                assert_eq!((player.x, player.y), (1.0, 1.0));
                assert_eq!(player.rotation, SPAWN_ROTATION);
                // Snapshot taken before the newcomer is appended.
                assert_eq!(players.len(), 1);
                assert_eq!(players[0].name, "Alice");
                assert_eq!(map_walls, &vec!["###", "# #", "###"]);
                assert_eq!((spawn_position.x, spawn_position.y), (1.0, 1.0));
            }
            other => panic!("Expected init, got {:?}", other),
        }

        assert_eq!(out[1].target, Target::AllExcept(2));
        assert_eq!(
            out[1].message,
            ServerMessage::PlayerJoin {
                id: 2,
                x: 1.0,
                y: 1.0,
                rotation: SPAWN_ROTATION,
                name: "Bob".to_string(),
            }
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_missing_or_empty_name_falls_back_to_id() {
        let mut registry = Registry::default();
        registry.handle_message(7, ClientMessage::Name { name: None });
        registry.handle_message(8, named(""));

        assert_eq!(registry.player(7).unwrap().name, "7");
        assert_eq!(registry.player(8).unwrap().name, "8");
    }

    #[test]
    fn test_second_name_is_ignored() {
        let mut registry = Registry::default();
        registry.handle_message(1, named("Alice"));

        let out = registry.handle_message(1, named("Mallory"));

        assert!(out.is_empty());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.player(1).unwrap().name, "Alice");
    }

    #[test]
    fn test_disconnect_restores_player_count() {
        let mut registry = Registry::default();
        registry.handle_message(1, named("Bob"));
        let before = registry.len();

        registry.handle_message(2, named("Alice"));
        assert_eq!(registry.len(), before + 1);

        let out = registry.disconnect(2);
        assert_eq!(registry.len(), before);
        assert!(registry.player(2).is_none());
        assert_eq!(
            out,
            vec![Outgoing {
                target: Target::AllExcept(2),
                message: ServerMessage::PlayerLeave { id: 2 },
            }]
        );
    }

    #[test]
    fn test_disconnect_of_unknown_connection_keeps_others() {
        let mut registry = Registry::default();
        registry.handle_message(1, named("Alice"));

        let out = registry.disconnect(99);

        assert_eq!(registry.len(), 1);
        assert_eq!(out[0].message, ServerMessage::PlayerLeave { id: 99 });
    }

    #[test]
    fn test_move_updates_position_and_excludes_sender() {
        let mut registry = Registry::default();
        registry.handle_message(1, named("Alice"));

        let out = registry.handle_message(1, ClientMessage::Move { x: 5.0, y: 5.0 });

        let player = registry.player(1).unwrap();
        assert_eq!((player.x, player.y), (5.0, 5.0));
        assert_eq!(
            out,
            vec![Outgoing {
                target: Target::AllExcept(1),
                message: ServerMessage::PlayerUpdatePosition {
                    id: 1,
                    x: 5.0,
                    y: 5.0
                },
            }]
        );
    }

    #[test]
    fn test_rotate_updates_rotation() {
        let mut registry = Registry::default();
        registry.handle_message(1, named("Alice"));

        let out = registry.handle_message(1, ClientMessage::Rotate { rotation: 17.25 });

        assert_eq!(registry.player(1).unwrap().rotation, 17.25);
        assert_eq!(out[0].target, Target::AllExcept(1));
    }

    #[test]
    fn test_updates_for_unnamed_connection_are_still_relayed() {
        let mut registry = Registry::default();

        let moved = registry.handle_message(3, ClientMessage::Move { x: 1.0, y: 2.0 });
        let rotated = registry.handle_message(3, ClientMessage::Rotate { rotation: 1.0 });

        assert!(registry.is_empty());
        assert_eq!(moved.len(), 1);
        assert_eq!(rotated.len(), 1);
    }

    #[test]
    fn test_shoot_and_die_are_forwarded_without_state_change() {
        let mut registry = Registry::default();
        registry.handle_message(1, named("Alice"));
        let before = registry.players().to_vec();

        let shot = registry.handle_message(1, ClientMessage::Shoot);
        let died = registry.handle_message(1, ClientMessage::Die);

        assert_eq!(shot[0].message, ServerMessage::PlayerShoot { id: 1 });
        assert_eq!(died[0].message, ServerMessage::PlayerDie { id: 1 });
        assert_eq!(shot[0].target, Target::AllExcept(1));
        assert_eq!(registry.players(), before.as_slice());
    }

    #[test]
    fn test_kill_is_discarded() {
        let mut registry = Registry::default();
        registry.handle_message(1, named("Alice"));

        let out = registry.handle_message(1, ClientMessage::Kill { id: 2 });

        assert!(out.is_empty());
        assert_eq!(registry.map_index(), 0);
    }

    #[test]
    fn test_win_advances_map_for_next_joiner_only() {
        let mut registry = Registry::new(small_catalog());
        registry.handle_message(1, named("Alice"));

        let out = registry.handle_message(1, ClientMessage::Win);
        assert_eq!(
            out,
            vec![Outgoing {
                target: Target::AllExcept(1),
                message: ServerMessage::PlayerWin { id: 1 },
            }]
        );
        assert_eq!(registry.map_index(), 1);

        let out = registry.handle_message(2, named("Bob"));
        match &out[0].message {
            ServerMessage::Init {
                map_walls,
                spawn_position,
                ..
            } => {
                assert_eq!(map_walls[1], "#   #");
                assert_eq!(spawn_position.x, 2.0);
            }
            other => panic!("Expected init, got {:?}", other),
        }
    }

    #[test]
    fn test_map_index_wraps_after_catalog_length_wins() {
        let mut registry = Registry::default();
        registry.handle_message(1, named("Alice"));

        for _ in 0..registry.map_count() {
            registry.handle_message(1, ClientMessage::Win);
        }

        assert_eq!(registry.map_index(), 0);
    }
}
