pub mod api;
pub mod bracket;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod gateway;
pub mod rating;
pub mod replay;
pub mod season;
pub mod services;

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use colored::Colorize;

use crate::bracket::Bracket;
use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::database::SqliteGateway;
use crate::domain::VenueProfile;
use crate::gateway::{Gateway, WriteOp};
use crate::rating::CompetitiveMode;
use crate::services::import::ImportService;
use crate::services::rebuild::{RebuildReport, RebuildService};
use crate::services::season::SeasonService;
use crate::services::server::ServerService;
use crate::services::tournament::TournamentService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

fn open_store(config: &AppConfig) -> Result<SqliteGateway> {
    SqliteGateway::open(&config.storage.database_path)
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_rebuild(activity: &str) -> Result<()> {
    let config = AppConfig::from_env();
    let gateway = open_store(&config)?;
    let report = RebuildService::new(&gateway, &config).run(activity)?;
    print_rebuild_report(activity, &report);
    Ok(())
}

pub fn handle_import(activity: &str, file: &Path) -> Result<()> {
    let config = AppConfig::from_env();
    let gateway = open_store(&config)?;

    let imported = ImportService::new(&gateway, &config).run(activity, file)?;
    println!(
        "{} {} matches stored, {} rejected",
        "Import:".bold(),
        imported.stored.to_string().green(),
        imported.rejected.to_string().yellow()
    );

    let report = RebuildService::new(&gateway, &config).run(activity)?;
    print_rebuild_report(activity, &report);
    Ok(())
}

pub fn handle_venue(
    id: &str,
    name: &str,
    mode: CompetitiveMode,
    k_factor: Option<f64>,
) -> Result<()> {
    let config = AppConfig::from_env();
    let gateway = open_store(&config)?;

    let profile = VenueProfile {
        id: id.to_string(),
        name: name.to_string(),
        mode,
        k_factor,
    };
    gateway.commit_batch(vec![WriteOp::UpsertVenue(profile)])?;

    println!(
        "{} {} ({}, K {})",
        "Venue saved:".bold(),
        name.green(),
        mode.as_str(),
        k_factor.unwrap_or(config.rating.default_venue_k)
    );
    Ok(())
}

pub fn handle_finalize_season(venue: &str) -> Result<()> {
    let config = AppConfig::from_env();
    let gateway = open_store(&config)?;

    let Some(record) = SeasonService::new(&gateway, &config).finalize(venue, Utc::now())? else {
        println!("{}", format!("Venue {venue} has no matches in the running season").yellow());
        return Ok(());
    };

    println!("{} {} of {}", "Season".bold(), record.season_index, venue.green());
    for row in &record.rows {
        println!(
            "{:>3}. {:<24} {:>8.2}  {}W {}L  streak {}",
            row.place, row.name, row.final_score, row.wins, row.losses, row.longest_win_streak
        );
    }
    Ok(())
}

pub fn handle_standings(tournament: &str) -> Result<()> {
    let config = AppConfig::from_env();
    let gateway = open_store(&config)?;
    let bracket = TournamentService::new(&gateway, &config).load(tournament)?;
    print_standings(&bracket);
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

fn print_rebuild_report(activity: &str, report: &RebuildReport) {
    println!(
        "{} {}: {} participants, {} batches ({})",
        "Rebuilt".bold(),
        activity.green(),
        report.participants,
        report.batches,
        report.summary
    );
    if report.summary.skipped > 0 {
        println!("{}", format!("{} matches skipped, see log", report.summary.skipped).yellow());
    }
}

fn print_standings(bracket: &Bracket) {
    println!("{} {} ({:?})", "Tournament".bold(), bracket.tournament_id.green(), bracket.stage);

    if bracket.is_completed() {
        for s in &bracket.standings {
            println!(
                "{:>3}. {:<24} {}W {}L  {:.0}:{:.0}",
                s.place, s.name, s.wins, s.losses, s.points_for, s.points_against
            );
        }
        return;
    }

    if let Some(round) = bracket.current_round() {
        println!(
            "Current round {} ({:?}, {:?})",
            round.round_index, round.round_type, round.status
        );
    }
    for row in bracket.round_robin_table() {
        println!(
            "{:>3}. {:<24} {}W {}L {}D  {:+.0}",
            row.rank,
            row.name,
            row.wins,
            row.losses,
            row.draws,
            row.point_difference()
        );
    }
}
