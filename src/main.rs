use anyhow::Result;

use roomscore::cli::Command;
use roomscore::{
    handle_completions, handle_finalize_season, handle_import, handle_rebuild, handle_serve,
    handle_standings, handle_venue, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Rebuild { activity } => handle_rebuild(activity),
        Command::Import { activity, file } => handle_import(activity, file),
        Command::Venue {
            id,
            name,
            mode,
            k_factor,
        } => handle_venue(id, name, *mode, *k_factor),
        Command::FinalizeSeason { venue } => handle_finalize_season(venue),
        Command::Standings { tournament } => handle_standings(tournament),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
