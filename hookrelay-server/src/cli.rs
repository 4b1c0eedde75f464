use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hookrelay",
    about = "Hook Relay - forward hook triggers to a URL while the switch is on",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(
        short,
        long,
        global = true,
        env = "HOOKRELAY_CONFIG",
        help = "Config file (default: ./config.json)"
    )]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Start the relay listener (default if no command specified)")]
    Serve,

    #[command(about = "Show relay state")]
    Status {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Flip the relay on/off")]
    Toggle,

    #[command(about = "Turn the relay on")]
    Enable,

    #[command(about = "Turn the relay off")]
    Disable,

    #[command(subcommand, about = "View and modify configuration")]
    Config(ConfigCommands),

    #[command(about = "Send a trigger to the local relay, as a hook runner would")]
    Trigger,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    #[command(about = "Show current configuration")]
    Show {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Get a specific configuration value")]
    Get {
        #[arg(help = "Configuration key (enabled, port, target_url)")]
        key: String,
    },

    #[command(about = "Set a configuration value")]
    Set {
        #[arg(help = "Configuration key")]
        key: String,

        #[arg(help = "New value")]
        value: String,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["hookrelay"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_config_set_parses() {
        let cli = Cli::try_parse_from([
            "hookrelay",
            "--config",
            "/tmp/relay.json",
            "config",
            "set",
            "target_url",
            "https://hooks.local/ping",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/relay.json")));
        assert_eq!(
            cli.command,
            Some(Commands::Config(ConfigCommands::Set {
                key: "target_url".to_string(),
                value: "https://hooks.local/ping".to_string(),
            }))
        );
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["hookrelay", "status", "--json", "-c", "x.json"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Status { json: true }));
        assert_eq!(cli.config, Some(PathBuf::from("x.json")));
    }
}
