//! Client-side world: the local player, mirrors of everyone else, bullets and walls
//!
//! Remote players are never simulated here. Their mirrors snap to whatever
//! the relay last forwarded. Bullets and hit detection are purely local: the
//! shooter's client decides kills and tells the others about them.

use crate::input::FrameInput;
use crate::timers::Scheduler;
use log::{debug, info, warn};
use shared::map::wall_bodies;
use shared::{
    resolve_collision, Body, ClientMessage, Mover, Player, ServerMessage, Vector2,
    BULLET_SIZE, BULLET_SPEED, BULLET_TTL_SECS, DEATH_LOCKOUT_SECS, KILL_COOLDOWN_SECS,
    PLAYER_ROTATION_SPEED, PLAYER_SPEED, PLAYER_WIDTH, RELOAD_DELAY_SECS, SHOT_COOLDOWN_SECS,
    WIN_ANNOUNCE_DELAY_SECS, WIN_SCORE,
};

/// Something the frame loop has to do on behalf of the game state
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Send(ClientMessage),
    /// Banner text for the player
    Announce(String),
    /// Throw the session away and join again from scratch
    Reload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    Respawn,
    AnnounceWin,
    Reload,
}

fn player_body(x: f32, y: f32) -> Body {
    Body::rectangle(PLAYER_WIDTH, PLAYER_WIDTH).with_position(x, y)
}

/// The player driven by this client's keyboard
#[derive(Debug, Clone)]
pub struct LocalPlayer {
    pub id: u32,
    pub name: String,
    pub rotation: f32,
    pub body: Body,
}

impl LocalPlayer {
    fn from_player(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            rotation: player.rotation,
            body: player_body(player.x, player.y),
        }
    }

    pub fn position(&self) -> Vector2 {
        self.body.position
    }

    pub fn look_at(&self) -> Vector2 {
        Vector2::look_at(self.rotation)
    }
}

/// Mirror of a player controlled by another client
#[derive(Debug, Clone)]
pub struct RemotePlayer {
    pub id: u32,
    pub name: String,
    pub rotation: f32,
    pub body: Body,
    last_killed_at: Option<f64>,
}

impl RemotePlayer {
    fn new(id: u32, name: String, x: f32, y: f32, rotation: f32) -> Self {
        Self {
            id,
            name,
            rotation,
            body: player_body(x, y),
            last_killed_at: None,
        }
    }

    fn from_player(player: &Player) -> Self {
        Self::new(
            player.id,
            player.name.clone(),
            player.x,
            player.y,
            player.rotation,
        )
    }

    pub fn position(&self) -> Vector2 {
        self.body.position
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletOwner {
    Local,
    Remote(u32),
}

#[derive(Debug, Clone)]
pub struct Bullet {
    pub body: Body,
    /// Heading of the shooter when fired, kept for drawing
    pub rotation: f32,
    pub fired_at: f64,
    pub owner: BulletOwner,
}

impl Bullet {
    fn new(origin: Vector2, rotation: f32, fired_at: f64, owner: BulletOwner) -> Self {
        let velocity = Vector2::look_at(rotation).scale(BULLET_SPEED);
        let body = Body::rectangle(BULLET_SIZE, BULLET_SIZE)
            .with_position(origin.x, origin.y)
            .with_velocity(velocity.x, velocity.y);
        Self {
            body,
            rotation,
            fired_at,
            owner,
        }
    }

    /// Bullets stop dead on walls and linger until they expire
    pub fn is_frozen(&self) -> bool {
        self.body.velocity == Vector2::ZERO
    }
}

/// Everything one client knows about the match
pub struct ClientGameState {
    local: Option<LocalPlayer>,
    remotes: Vec<RemotePlayer>,
    bullets: Vec<Bullet>,
    walls: Vec<Body>,
    spawn_position: Vector2,
    score: u32,
    dead: bool,
    last_shot_at: Option<f64>,
    map_generation: u32,
    timers: Scheduler<Timer>,
}

impl ClientGameState {
    pub fn new() -> Self {
        Self {
            local: None,
            remotes: Vec::new(),
            bullets: Vec::new(),
            walls: Vec::new(),
            spawn_position: Vector2::ZERO,
            score: 0,
            dead: false,
            last_shot_at: None,
            map_generation: 0,
            timers: Scheduler::new(),
        }
    }

    /// Applies one relay message. Positions and rotations snap immediately.
    pub fn apply_server_message(&mut self, message: ServerMessage, now: f64) -> Vec<Effect> {
        let mut effects = Vec::new();

        match message {
            ServerMessage::Init {
                player,
                players,
                map_walls,
                spawn_position,
            } => {
                self.timers.cancel_all();
                self.bullets.clear();
                self.walls = wall_bodies(&map_walls);
                self.spawn_position = spawn_position;
                self.local = Some(LocalPlayer::from_player(&player));
                self.remotes = players.iter().map(RemotePlayer::from_player).collect();
                self.dead = false;
                self.map_generation += 1;

                info!(
                    "Joined as {} ({:?}) with {} other players and {} walls",
                    player.id,
                    player.name,
                    self.remotes.len(),
                    self.walls.len()
                );
            }

            ServerMessage::PlayerJoin {
                id,
                x,
                y,
                rotation,
                name,
            } => {
                info!("{} joined", name);
                self.remotes.push(RemotePlayer::new(id, name, x, y, rotation));
            }

            ServerMessage::PlayerLeave { id } => {
                match self.remotes.iter().position(|remote| remote.id == id) {
                    Some(index) => {
                        let remote = self.remotes.remove(index);
                        info!("{} left", remote.name);
                    }
                    None => {
                        warn!("Leave for unknown player {}, state is out of sync", id);
                        effects.push(Effect::Reload);
                    }
                }
            }

            ServerMessage::PlayerShoot { id } => {
                if let Some(remote) = self.remote(id) {
                    let bullet =
                        Bullet::new(remote.position(), remote.rotation, now, BulletOwner::Remote(id));
                    self.bullets.push(bullet);
                }
            }

            ServerMessage::PlayerDie { id } => {
                debug!("Player {} died", id);
            }

            ServerMessage::PlayerWin { id } => {
                let winner = self
                    .remote(id)
                    .map(|remote| remote.name.clone())
                    .unwrap_or_else(|| id.to_string());
                info!("{} won the round", winner);

                effects.push(Effect::Announce(format!("{} wins!", winner)));
                self.score = 0;
                self.respawn(&mut effects);
                self.schedule_reload(now);
            }

            ServerMessage::PlayerUpdatePosition { id, x, y } => {
                if let Some(remote) = self.remote_mut(id) {
                    remote.body.position = Vector2::new(x, y);
                }
            }

            ServerMessage::PlayerUpdateRotation { id, rotation } => {
                if let Some(remote) = self.remote_mut(id) {
                    remote.rotation = rotation;
                }
            }
        }

        effects
    }

    /// Advances one rendered frame of `dt` seconds ending at `now`
    pub fn update(&mut self, input: &FrameInput, dt: f32, now: f64) -> Vec<Effect> {
        let mut effects = Vec::new();

        self.run_timers(now, &mut effects);

        if self.local.is_none() {
            return effects;
        }

        if !self.dead {
            self.update_player(input, dt, now, &mut effects);
        }

        for bullet in &mut self.bullets {
            bullet.body.integrate(dt);
        }
        self.bullets
            .retain(|bullet| now - bullet.fired_at <= BULLET_TTL_SECS);

        self.handle_collisions(now, &mut effects);

        effects
    }

    fn run_timers(&mut self, now: f64, effects: &mut Vec<Effect>) {
        for timer in self.timers.take_due(now) {
            match timer {
                Timer::Respawn => {
                    effects.push(Effect::Send(ClientMessage::Die));
                    self.dead = false;
                    self.respawn(effects);
                }
                Timer::AnnounceWin => {
                    effects.push(Effect::Announce("You win!".to_string()));
                    self.respawn(effects);
                    self.schedule_reload(now);
                }
                Timer::Reload => effects.push(Effect::Reload),
            }
        }
    }

    fn update_player(&mut self, input: &FrameInput, dt: f32, now: f64, effects: &mut Vec<Effect>) {
        if input.fire {
            self.shoot(now, effects);
        }

        let Some(local) = self.local.as_mut() else {
            return;
        };

        local.body.velocity = Vector2::ZERO;
        if input.moving() {
            local.body.velocity = local.look_at().scale(input.direction() * PLAYER_SPEED);
        }

        if local.body.velocity.magnitude() != 0.0 {
            local.body.integrate(dt);
            effects.push(Effect::Send(ClientMessage::Move {
                x: local.body.position.x,
                y: local.body.position.y,
            }));
        }

        if input.turning() {
            local.rotation += input.turn() * PLAYER_ROTATION_SPEED * dt;
            effects.push(Effect::Send(ClientMessage::Rotate {
                rotation: local.rotation,
            }));
        }
    }

    fn shoot(&mut self, now: f64, effects: &mut Vec<Effect>) {
        if let Some(last) = self.last_shot_at {
            if now - last < SHOT_COOLDOWN_SECS {
                return;
            }
        }
        let Some(local) = &self.local else {
            return;
        };

        let bullet = Bullet::new(local.position(), local.rotation, now, BulletOwner::Local);
        self.last_shot_at = Some(now);
        self.bullets.push(bullet);
        effects.push(Effect::Send(ClientMessage::Shoot));
    }

    fn handle_collisions(&mut self, now: f64, effects: &mut Vec<Effect>) {
        let Some(local_body) = self.local.as_ref().map(|local| local.body) else {
            return;
        };

        let mut hit = false;
        for bullet in &mut self.bullets {
            if bullet.owner != BulletOwner::Local && bullet.body.overlaps(&local_body) {
                hit = true;
            }
            if self.walls.iter().any(|wall| bullet.body.overlaps(wall)) {
                bullet.body.velocity = Vector2::ZERO;
            }
        }
        if hit {
            self.die(now);
        }

        let hits: Vec<(usize, usize)> = self
            .bullets
            .iter()
            .enumerate()
            .filter(|(_, bullet)| bullet.owner == BulletOwner::Local)
            .filter_map(|(index, bullet)| {
                self.remotes
                    .iter()
                    .position(|remote| bullet.body.overlaps(&remote.body))
                    .map(|victim| (index, victim))
            })
            .collect();

        let mut spent = Vec::new();
        for (bullet_index, victim) in hits {
            if self.register_kill(victim, now, effects) {
                spent.push(bullet_index);
            }
        }
        if !spent.is_empty() {
            let mut index = 0;
            self.bullets.retain(|_| {
                let keep = !spent.contains(&index);
                index += 1;
                keep
            });
        }

        if let Some(local) = self.local.as_mut() {
            for wall in &self.walls {
                if !local.body.overlaps(wall) {
                    continue;
                }
                if let Some(resolution) = resolve_collision(&local.body, wall) {
                    if resolution.mover == Mover::First {
                        local.body.position = resolution.position;
                        local.body.velocity = resolution.velocity;
                    }
                }
            }
        }
    }

    /// Starts the death lockout unless one is already running
    fn die(&mut self, now: f64) {
        if self.dead || self.timers.is_pending(|timer| *timer == Timer::Respawn) {
            return;
        }
        info!("Killed, respawning in {}s", DEATH_LOCKOUT_SECS);
        self.dead = true;
        self.timers.schedule(now + DEATH_LOCKOUT_SECS, Timer::Respawn);
    }

    /// Returns false when the victim is still inside its kill cooldown
    fn register_kill(&mut self, victim: usize, now: f64, effects: &mut Vec<Effect>) -> bool {
        let remote = &mut self.remotes[victim];
        if let Some(last) = remote.last_killed_at {
            if now - last < KILL_COOLDOWN_SECS {
                return false;
            }
        }
        remote.last_killed_at = Some(now);
        let id = remote.id;

        self.score += 1;
        info!("Hit player {}, score {}", id, self.score);
        effects.push(Effect::Send(ClientMessage::Kill { id }));

        if self.score >= WIN_SCORE {
            self.score = 0;
            effects.push(Effect::Send(ClientMessage::Win));
            self.timers
                .schedule(now + WIN_ANNOUNCE_DELAY_SECS, Timer::AnnounceWin);
        }
        true
    }

    fn respawn(&mut self, effects: &mut Vec<Effect>) {
        let spawn = self.spawn_position;
        if let Some(local) = self.local.as_mut() {
            local.body.position = spawn;
            local.body.velocity = Vector2::ZERO;
            effects.push(Effect::Send(ClientMessage::Move {
                x: spawn.x,
                y: spawn.y,
            }));
        }
    }

    fn schedule_reload(&mut self, now: f64) {
        if !self.timers.is_pending(|timer| *timer == Timer::Reload) {
            self.timers.schedule(now + RELOAD_DELAY_SECS, Timer::Reload);
        }
    }

    pub fn local(&self) -> Option<&LocalPlayer> {
        self.local.as_ref()
    }

    pub fn remotes(&self) -> &[RemotePlayer] {
        &self.remotes
    }

    pub fn remote(&self, id: u32) -> Option<&RemotePlayer> {
        self.remotes.iter().find(|remote| remote.id == id)
    }

    fn remote_mut(&mut self, id: u32) -> Option<&mut RemotePlayer> {
        self.remotes.iter_mut().find(|remote| remote.id == id)
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn walls(&self) -> &[Body] {
        &self.walls
    }

    pub fn spawn_position(&self) -> Vector2 {
        self.spawn_position
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Bumped on every init so the renderer knows the walls changed
    pub fn map_generation(&self) -> u32 {
        self.map_generation
    }
}

impl Default for ClientGameState {
    fn default() -> Self {
        Self::new()
    }
}
