//! Command line and environment configuration for the relay

use clap::Parser;
use shared::DEFAULT_PORT;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Relay server for the arena shooter", long_about = None)]
pub struct Config {
    /// Address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

impl Config {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
