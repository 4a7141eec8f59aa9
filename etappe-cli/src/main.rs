//! Etappe CLI - Command-line interface
//!
//! Plans routes split into stages of about equal driving distance, with
//! elevation statistics per stage, on top of the etappe library.

mod commands;
mod error;
mod output;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::cache::CacheAction;
use commands::config::ConfigCommands;
use commands::trip::{RouteArgs, StagesArgs};
use output::Output;

#[derive(Parser)]
#[command(name = "etappe")]
#[command(version = etappe::VERSION)]
#[command(about = "Plan routes in stages with elevation statistics", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.etappe/config.ini
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the route between two or more waypoints
    ///
    /// Waypoints are place names or "lat,lon" coordinates.
    Route(RouteArgs),

    /// Split the route into stages and summarize their elevation
    Stages(StagesArgs),

    /// Look up the best matching place for a name
    Geocode {
        /// Place name or address
        text: String,
    },

    /// Name the place nearest to a coordinate
    Reverse {
        /// Coordinate as "lat,lon"
        #[arg(allow_hyphen_values = true)]
        coordinate: String,
    },

    /// Suggest places for partial input
    Autocomplete {
        /// Partial place name (at least 2 characters)
        text: String,
    },

    /// Cache management
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    let out = Output::new(cli.json);
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Route(args) => commands::trip::run_route(config_path, &out, args),
        Commands::Stages(args) => commands::trip::run_stages(config_path, &out, args),
        Commands::Geocode { text } => commands::geocode::run_geocode(config_path, &out, &text),
        Commands::Reverse { coordinate } => {
            commands::geocode::run_reverse(config_path, &out, &coordinate)
        }
        Commands::Autocomplete { text } => {
            commands::geocode::run_autocomplete(config_path, &out, &text)
        }
        Commands::Cache { action } => commands::cache::run(config_path, &out, action),
        Commands::Config { command } => commands::config::run(config_path, command),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_with_stops() {
        let cli = Cli::try_parse_from([
            "etappe", "route", "Berlin", "Munich", "--via", "Leipzig", "--via", "50.9,11.6",
        ])
        .unwrap();

        match cli.command {
            Commands::Route(args) => {
                assert_eq!(args.waypoints.from, "Berlin");
                assert_eq!(args.waypoints.to, "Munich");
                assert_eq!(args.waypoints.via, vec!["Leipzig", "50.9,11.6"]);
                assert!(!args.polyline);
            }
            _ => panic!("expected route"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "etappe", "stages", "A", "B", "--length", "250", "--json", "--config", "/tmp/c.ini",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.ini")));
        match cli.command {
            Commands::Stages(args) => assert_eq!(args.length, Some(250.0)),
            _ => panic!("expected stages"),
        }
    }

    #[test]
    fn test_negative_coordinates_are_positional() {
        let cli = Cli::try_parse_from(["etappe", "reverse", "-33.92,18.42"]).unwrap();
        match cli.command {
            Commands::Reverse { coordinate } => assert_eq!(coordinate, "-33.92,18.42"),
            _ => panic!("expected reverse"),
        }
    }

    #[test]
    fn test_zero_and_negative_stage_length_parse() {
        for (flag, expected) in [("0", 0.0), ("-5", -5.0)] {
            let cli = Cli::try_parse_from(["etappe", "stages", "A", "B", "--length", flag]).unwrap();
            match cli.command {
                Commands::Stages(args) => assert_eq!(args.length, Some(expected)),
                _ => panic!("expected stages"),
            }
        }
    }

    #[test]
    fn test_cache_and_config_subcommands() {
        assert!(Cli::try_parse_from(["etappe", "cache", "stats"]).is_ok());
        assert!(Cli::try_parse_from(["etappe", "cache", "cleanup"]).is_ok());
        assert!(Cli::try_parse_from(["etappe", "cache", "clear"]).is_ok());
        assert!(Cli::try_parse_from(["etappe", "config", "init", "--force"]).is_ok());
        assert!(Cli::try_parse_from(["etappe", "config", "show"]).is_ok());
        assert!(Cli::try_parse_from(["etappe", "cache", "migrate"]).is_err());
    }
}
