use anyhow::{Context, Result};
use log::info;

use crate::bracket::{Bracket, Entrant, RoundTransition};
use crate::config::settings::AppConfig;
use crate::errors::{store_context, AlreadyExists, NotFound};
use crate::gateway::{Gateway, WriteOp};

/// Loads a bracket, applies one transition and writes it back.
///
/// Brackets have a single writer; concurrent updates resolve as last write
/// wins.
pub struct TournamentService<'a> {
    gateway: &'a dyn Gateway,
    config: &'a AppConfig,
}

impl<'a> TournamentService<'a> {
    pub fn new(gateway: &'a dyn Gateway, config: &'a AppConfig) -> Self {
        Self { gateway, config }
    }

    pub fn load(&self, tournament_id: &str) -> Result<Bracket> {
        self.gateway
            .bracket(tournament_id)
            .with_context(|| store_context("load bracket", tournament_id))?
            .ok_or_else(|| NotFound::new("tournament", tournament_id).into())
    }

    /// Opens a tournament with a round-robin pool over `entrants`.
    pub fn create(
        &self,
        tournament_id: &str,
        venue_id: Option<String>,
        entrants: Vec<Entrant>,
    ) -> Result<Bracket> {
        if self.gateway.bracket(tournament_id)?.is_some() {
            return Err(AlreadyExists::new("tournament", tournament_id).into());
        }

        let mut bracket = Bracket::start(tournament_id, entrants, &self.config.bracket)?;
        bracket.venue_id = venue_id;
        self.save(&bracket)?;
        Ok(bracket)
    }

    pub fn record_score(
        &self,
        tournament_id: &str,
        match_id: &str,
        score_player1: f64,
        score_player2: f64,
    ) -> Result<Bracket> {
        let mut bracket = self.load(tournament_id)?;
        bracket.record_score(match_id, score_player1, score_player2)?;
        self.save(&bracket)?;
        Ok(bracket)
    }

    pub fn finish_round(
        &self,
        tournament_id: &str,
        round_index: usize,
    ) -> Result<(Bracket, RoundTransition)> {
        let mut bracket = self.load(tournament_id)?;
        let transition = bracket.finish_round(round_index)?;
        self.save(&bracket)?;

        info!("Tournament {} round {} finished: {:?}", tournament_id, round_index, transition);
        Ok((bracket, transition))
    }

    fn save(&self, bracket: &Bracket) -> Result<()> {
        self.gateway
            .commit_batch(vec![WriteOp::UpsertBracket(bracket.clone())])
            .with_context(|| store_context("store bracket", &bracket.tournament_id))
    }
}
