use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "First-person arena shooter client", long_about = None)]
pub struct Config {
    /// Relay address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:4000")]
    pub server: String,

    /// Display name; the relay picks one when omitted
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Window width
    #[arg(short = 'w', long, default_value = "800")]
    pub width: i32,

    /// Window height (no short flag to avoid conflict with --help)
    #[arg(long, default_value = "600")]
    pub height: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse_from(["client"]);
        assert_eq!(config.server, "127.0.0.1:4000");
        assert_eq!(config.name, None);
        assert_eq!((config.width, config.height), (800, 600));
    }

    #[test]
    fn test_name_and_server() {
        let config = Config::parse_from(["client", "-s", "10.0.0.2:4000", "--name", "Alice"]);
        assert_eq!(config.server, "10.0.0.2:4000");
        assert_eq!(config.name.as_deref(), Some("Alice"));
    }
}
