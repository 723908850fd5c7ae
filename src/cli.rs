use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::rating::CompetitiveMode;

#[derive(Parser, Debug)]
#[command(author, version, about = "roomscore rating and tournament backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Recalculate every rating of an activity from its match history
    Rebuild {
        activity: String,
    },
    /// Load matches from a JSON array and rebuild the activity
    Import {
        activity: String,
        file: PathBuf,
    },
    /// Register or update a venue profile
    Venue {
        id: String,
        name: String,
        #[arg(short, long, default_value = "office", value_parser = parse_mode)]
        mode: CompetitiveMode,
        /// Base K factor for venue ratings (defaults to the configured one)
        #[arg(short, long)]
        k_factor: Option<f64>,
    },
    /// Close the running season of a venue
    FinalizeSeason {
        venue: String,
    },
    /// Print the standings of a tournament
    Standings {
        tournament: String,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

fn parse_mode(value: &str) -> Result<CompetitiveMode, String> {
    CompetitiveMode::from_str_name(value)
        .ok_or_else(|| format!("unknown mode '{value}', expected office, professional or arcade"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from(["roomscore", "finalize-season", "v1"]).unwrap();
        assert_eq!(cli.command, Command::FinalizeSeason { venue: "v1".to_string() });

        let args = ["roomscore", "venue", "v2", "Corner Bar", "--mode", "professional"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(
            cli.command,
            Command::Venue {
                id: "v2".to_string(),
                name: "Corner Bar".to_string(),
                mode: CompetitiveMode::Professional,
                k_factor: None,
            }
        );

        let args = ["roomscore", "venue", "v3", "X", "--mode", "casual"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
