use clap::Parser;
use client::config::Config;
use client::game::{ClientGameState, Effect};
use client::input::InputManager;
use client::network::{Connection, ConnectionEvent};
use client::rendering::Renderer;
use log::{error, info, warn};
use macroquad::prelude::*;

fn window_conf() -> Conf {
    let config = Config::parse();
    Conf {
        window_title: "Arena Shooter".to_string(),
        window_width: config.width,
        window_height: config.height,
        ..Default::default()
    }
}

fn open_session(config: &Config) -> Option<Connection> {
    info!("Connecting to: {}", config.server);
    match Connection::open(config.server.clone(), config.name.clone()) {
        Ok(connection) => Some(connection),
        Err(e) => {
            error!("Could not start relay session: {}", e);
            None
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let config = Config::parse();

    info!("Starting client...");
    info!("Controls: arrows or WASD to move and turn, Space to fire");

    let input_manager = InputManager::new();
    let mut renderer = Renderer::new();
    let mut state = ClientGameState::new();
    let mut connection = open_session(&config);

    loop {
        let now = get_time();
        let mut effects = Vec::new();

        if let Some(session) = connection.as_mut() {
            for event in session.poll() {
                match event {
                    ConnectionEvent::Message(message) => {
                        effects.extend(state.apply_server_message(message, now));
                    }
                    ConnectionEvent::Closed => warn!("Relay connection closed"),
                }
            }
        }

        let input = input_manager.sample();
        effects.extend(state.update(&input, get_frame_time(), now));

        let mut reload = false;
        for effect in effects {
            match effect {
                Effect::Send(message) => {
                    if let Some(session) = &connection {
                        session.send(message);
                    }
                }
                Effect::Announce(text) => {
                    info!("{}", text);
                    renderer.announce(text, now);
                }
                Effect::Reload => reload = true,
            }
        }

        if reload {
            info!("Reloading session");
            drop(connection.take());
            state = ClientGameState::new();
            connection = open_session(&config);
        }

        let connected = connection
            .as_ref()
            .map(|session| !session.is_closed())
            .unwrap_or(false);
        renderer.render(&state, connected, now);

        next_frame().await
    }
}
