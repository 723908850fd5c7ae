use log::{debug, info};

use crate::config::settings::BracketSettings;
use crate::domain::validate_score;
use crate::errors::{BracketError, ValidationError};

use super::seeding::{self, knockout_size, knockout_slots, pair_sequentially};
use super::standings::{compute_round_robin_table, tally, TableRow};
use super::types::{
    Bracket, BracketFormat, BracketMatch, BracketStage, Entrant, MatchStatus, Round, RoundStatus,
    RoundType, TournamentStanding,
};

/// What finishing a round led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundTransition {
    /// A new round was seeded at this index
    Seeded(usize),
    /// The round finished but the tournament is waiting on another round
    Finished,
    /// Every terminal round is finished
    Completed,
}

#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error(transparent)]
    Bracket(#[from] BracketError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

const MIN_ENTRANTS: usize = 2;

impl Bracket {
    /// Opens a tournament with a single all-play-all pool.
    pub fn start(
        tournament_id: &str,
        entrants: Vec<Entrant>,
        settings: &BracketSettings,
    ) -> Result<Self, BracketError> {
        check_field(&entrants)?;

        let matches = seeding::round_robin_pairings(&entrants)
            .into_iter()
            .enumerate()
            .map(|(idx, (a, b))| BracketMatch::new(seeding::match_id(0, idx), Some(a), Some(b)))
            .collect();

        info!(
            "Starting tournament {} with {} entrants in a round-robin pool",
            tournament_id,
            entrants.len()
        );

        Ok(Self {
            tournament_id: tournament_id.to_string(),
            venue_id: None,
            stage: BracketStage::RoundRobin,
            current_round_index: 0,
            format: BracketFormat {
                knockout_size: knockout_size(entrants.len(), settings.knockout_size),
                bronze_match: settings.bronze_match,
            },
            entrants,
            rounds: vec![Round {
                round_index: 0,
                round_type: RoundType::RoundRobin,
                status: RoundStatus::NotStarted,
                matches,
            }],
            standings: Vec::new(),
        })
    }

    /// Opens a tournament directly in the knockout stage; entrants are
    /// paired in the order given.
    pub fn start_knockout(
        tournament_id: &str,
        entrants: Vec<Entrant>,
        settings: &BracketSettings,
    ) -> Result<Self, BracketError> {
        check_field(&entrants)?;

        let slots: Vec<Option<Entrant>> = entrants.iter().cloned().map(Some).collect();
        let matches = pair_sequentially(0, slots);

        Ok(Self {
            tournament_id: tournament_id.to_string(),
            venue_id: None,
            stage: BracketStage::Knockout,
            current_round_index: 0,
            format: BracketFormat {
                knockout_size: entrants.len(),
                bronze_match: settings.bronze_match,
            },
            entrants,
            rounds: vec![Round {
                round_index: 0,
                round_type: RoundType::for_knockout(matches.len()),
                status: RoundStatus::NotStarted,
                matches,
            }],
            standings: Vec::new(),
        })
    }

    /// Stores both scores of a match. The match itself stays unfinished
    /// until its round is finished.
    pub fn record_score(
        &mut self,
        match_id: &str,
        score_player1: f64,
        score_player2: f64,
    ) -> Result<(), ScoreError> {
        if self.is_completed() {
            return Err(BracketError::AlreadyCompleted.into());
        }
        let score_player1 = validate_score("player1", score_player1)?;
        let score_player2 = validate_score("player2", score_player2)?;

        let round = self
            .rounds
            .iter_mut()
            .find(|r| r.matches.iter().any(|m| m.match_id == match_id))
            .ok_or_else(|| BracketError::UnknownMatch(match_id.to_string()))?;

        if round.status == RoundStatus::Finished {
            return Err(BracketError::RoundAlreadyFinished(round.round_index).into());
        }

        let m = round
            .matches
            .iter_mut()
            .find(|m| m.match_id == match_id && !m.is_bye())
            .ok_or_else(|| BracketError::UnknownMatch(match_id.to_string()))?;

        m.score_player1 = Some(score_player1);
        m.score_player2 = Some(score_player2);
        round.status = RoundStatus::InProgress;

        debug!("Recorded {}: {} - {}", match_id, score_player1, score_player2);
        Ok(())
    }

    /// Finishes a round, seeding whatever depends on it.
    pub fn finish_round(&mut self, round_index: usize) -> Result<RoundTransition, BracketError> {
        if self.is_completed() {
            return Err(BracketError::AlreadyCompleted);
        }

        let round = self
            .rounds
            .iter_mut()
            .find(|r| r.round_index == round_index)
            .ok_or(BracketError::UnknownRound(round_index))?;

        if round.status == RoundStatus::Finished {
            return Err(BracketError::RoundAlreadyFinished(round_index));
        }
        if !can_finish_round(round) {
            return Err(BracketError::RoundIncomplete(round_index));
        }

        for m in &mut round.matches {
            decide(m);
        }
        round.status = RoundStatus::Finished;
        let round_type = round.round_type;
        let finished = round.matches.clone();

        info!(
            "Tournament {}: finished round {} ({:?})",
            self.tournament_id, round_index, round_type
        );

        Ok(self.after_finish(round_type, &finished))
    }

    /// Pairs the winners of `finished_matches` sequentially into a new round
    /// one index above the highest existing round. Returns its index.
    pub fn seed_next_round(&mut self, finished_matches: &[BracketMatch]) -> usize {
        let slots: Vec<Option<Entrant>> = finished_matches
            .iter()
            .map(|m| m.winner().cloned())
            .collect();
        self.push_knockout_round(slots, None)
    }

    fn after_finish(
        &mut self,
        round_type: RoundType,
        finished: &[BracketMatch],
    ) -> RoundTransition {
        match round_type {
            RoundType::RoundRobin => {
                let next = self.seed_knockout_from_table(finished);
                self.advance(next)
            }
            RoundType::KnockoutSemis => {
                let next = self.seed_next_round(finished);
                if self.format.bronze_match {
                    self.seed_bronze_round(finished);
                }
                self.advance(next)
            }
            RoundType::KnockoutQuarters => {
                let next = self.seed_next_round(finished);
                self.advance(next)
            }
            RoundType::KnockoutFinal | RoundType::KnockoutBronze => self.try_complete(),
        }
    }

    /// A freshly seeded round made only of byes finishes on its own and
    /// passes its entrants on.
    fn advance(&mut self, round_index: usize) -> RoundTransition {
        let Some(round) = self.rounds.iter_mut().find(|r| r.round_index == round_index) else {
            return RoundTransition::Seeded(round_index);
        };
        if !round.matches.iter().all(BracketMatch::is_bye) {
            return RoundTransition::Seeded(round_index);
        }

        round.status = RoundStatus::Finished;
        let round_type = round.round_type;
        let finished = round.matches.clone();

        debug!(
            "Tournament {}: round {} ({:?}) holds only byes, finished without play",
            self.tournament_id, round_index, round_type
        );
        self.after_finish(round_type, &finished)
    }

    fn seed_knockout_from_table(&mut self, finished: &[BracketMatch]) -> usize {
        let table = compute_round_robin_table(finished);
        let slots = knockout_slots(&table, self.format.knockout_size);
        self.stage = BracketStage::Knockout;
        self.push_knockout_round(slots, None)
    }

    /// The bronze match is only seeded when both semis produced a loser.
    fn seed_bronze_round(&mut self, semis: &[BracketMatch]) {
        let losers: Vec<Option<Entrant>> = semis.iter().map(|m| m.loser().cloned()).collect();
        if losers.len() != 2 || losers.iter().any(Option::is_none) {
            debug!("Tournament {}: no bronze match, a semi has no loser", self.tournament_id);
            return;
        }
        self.push_knockout_round(losers, Some(RoundType::KnockoutBronze));
    }

    fn push_knockout_round(
        &mut self,
        slots: Vec<Option<Entrant>>,
        round_type: Option<RoundType>,
    ) -> usize {
        let round_index = self.next_round_index();
        let matches = pair_sequentially(round_index, slots);
        let round_type = round_type.unwrap_or_else(|| RoundType::for_knockout(matches.len()));

        debug!(
            "Tournament {}: seeded round {} ({:?}) with {} matches",
            self.tournament_id,
            round_index,
            round_type,
            matches.len()
        );

        self.rounds.push(Round {
            round_index,
            round_type,
            status: RoundStatus::NotStarted,
            matches,
        });

        if round_type != RoundType::KnockoutBronze {
            self.current_round_index = round_index;
        }
        round_index
    }

    fn next_round_index(&self) -> usize {
        self.rounds
            .iter()
            .map(|r| r.round_index + 1)
            .max()
            .unwrap_or(0)
    }

    fn try_complete(&mut self) -> RoundTransition {
        let terminal_done = self
            .rounds
            .iter()
            .filter(|r| r.round_type.is_terminal())
            .all(|r| r.status == RoundStatus::Finished);

        if !terminal_done {
            return RoundTransition::Finished;
        }

        self.stage = BracketStage::Completed;
        self.standings = self.final_standings();
        info!("Tournament {} completed", self.tournament_id);
        RoundTransition::Completed
    }

    /// Champion, runner-up, then the bronze match, then everyone else by
    /// round-robin table position (or entry order without a pool).
    pub fn final_standings(&self) -> Vec<TournamentStanding> {
        let mut order: Vec<Entrant> = Vec::new();
        let mut push = |entrant: Option<&Entrant>| {
            if let Some(e) = entrant {
                if !order.iter().any(|o| o.participant_id == e.participant_id) {
                    order.push(e.clone());
                }
            }
        };

        for round_type in [RoundType::KnockoutFinal, RoundType::KnockoutBronze] {
            for m in self.rounds_of(round_type).flat_map(|r| r.matches.iter()) {
                push(m.winner());
                push(m.loser());
            }
        }

        let pool: Vec<BracketMatch> = self
            .rounds_of(RoundType::RoundRobin)
            .flat_map(|r| r.matches.iter().cloned())
            .collect();
        for row in compute_round_robin_table(&pool) {
            push(self.entrant(&row.participant_id));
        }
        for entrant in &self.entrants {
            push(Some(entrant));
        }

        let all_matches: Vec<BracketMatch> = self
            .rounds
            .iter()
            .flat_map(|r| r.matches.iter().cloned())
            .collect();
        let totals = tally(&all_matches);

        order
            .into_iter()
            .enumerate()
            .map(|(idx, entrant)| standing(idx + 1, entrant, &totals))
            .collect()
    }

    /// Current round-robin table; empty before any pool match is scored.
    pub fn round_robin_table(&self) -> Vec<TableRow> {
        let pool: Vec<BracketMatch> = self
            .rounds_of(RoundType::RoundRobin)
            .flat_map(|r| r.matches.iter().cloned())
            .collect();
        compute_round_robin_table(&pool)
    }

    fn rounds_of(&self, round_type: RoundType) -> impl Iterator<Item = &Round> {
        self.rounds.iter().filter(move |r| r.round_type == round_type)
    }

    fn entrant(&self, participant_id: &str) -> Option<&Entrant> {
        self.entrants.iter().find(|e| e.participant_id == participant_id)
    }
}

/// True when every played match has both scores; byes never block a round.
pub fn can_finish_round(round: &Round) -> bool {
    round.matches.iter().all(|m| m.is_bye() || m.has_scores())
}

fn check_field(entrants: &[Entrant]) -> Result<(), BracketError> {
    if entrants.len() < MIN_ENTRANTS {
        return Err(BracketError::NotEnoughParticipants {
            required: MIN_ENTRANTS,
            actual: entrants.len(),
        });
    }
    Ok(())
}

/// Higher score wins; a level score leaves the winner empty.
fn decide(m: &mut BracketMatch) {
    if m.is_bye() {
        seeding::settle_bye(m);
        return;
    }

    let (Some(s1), Some(s2)) = (m.score_player1, m.score_player2) else {
        return;
    };
    let winner = if s1 > s2 {
        m.player1.as_ref()
    } else if s2 > s1 {
        m.player2.as_ref()
    } else {
        None
    };

    m.winner_id = winner.map(|e| e.participant_id.clone());
    m.match_status = MatchStatus::Finished;
}

fn standing(place: usize, entrant: Entrant, totals: &[TableRow]) -> TournamentStanding {
    let row = totals.iter().find(|r| r.participant_id == entrant.participant_id);

    TournamentStanding {
        participant_id: entrant.participant_id,
        name: entrant.name,
        place,
        matches_played: row.map(|r| r.played).unwrap_or(0),
        wins: row.map(|r| r.wins).unwrap_or(0),
        losses: row.map(|r| r.losses).unwrap_or(0),
        points_for: row.map(|r| r.points_for).unwrap_or(0.0),
        points_against: row.map(|r| r.points_against).unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(ids: &[&str]) -> Vec<Entrant> {
        ids.iter().map(|id| Entrant::new(id, &id.to_uppercase())).collect()
    }

    fn settings(knockout_size: Option<usize>, bronze_match: bool) -> BracketSettings {
        BracketSettings {
            knockout_size,
            bronze_match,
        }
    }

    fn pool(ids: &[&str], settings: BracketSettings) -> Bracket {
        Bracket::start("t", field(ids), &settings).unwrap()
    }

    fn knockout(ids: &[&str], settings: BracketSettings) -> Bracket {
        Bracket::start_knockout("t", field(ids), &settings).unwrap()
    }

    /// Scores every unplayed match of a round so that the entrant listed
    /// earlier in `strength` wins.
    fn play_round(bracket: &mut Bracket, round_index: usize, strength: &[&str]) {
        let pending: Vec<(String, String, String)> = bracket
            .round(round_index)
            .unwrap()
            .matches
            .iter()
            .filter(|m| !m.is_bye())
            .map(|m| {
                (
                    m.match_id.clone(),
                    m.player1.as_ref().unwrap().participant_id.clone(),
                    m.player2.as_ref().unwrap().participant_id.clone(),
                )
            })
            .collect();

        for (id, p1, p2) in pending {
            let rank = |p: &str| strength.iter().position(|s| *s == p).unwrap();
            let (s1, s2) = if rank(&p1) < rank(&p2) { (5.0, 2.0) } else { (1.0, 5.0) };
            bracket.record_score(&id, s1, s2).unwrap();
        }
    }

    #[test]
    fn test_start_requires_two_entrants() {
        let err = Bracket::start("t", field(&["a"]), &BracketSettings::default()).unwrap_err();
        assert_eq!(err, BracketError::NotEnoughParticipants { required: 2, actual: 1 });
    }

    #[test]
    fn test_round_cannot_finish_until_scored() {
        let mut bracket = pool(&["a", "b", "c", "d"], BracketSettings::default());
        bracket.record_score("r0-m1", 5.0, 3.0).unwrap();

        let round = bracket.round(0).unwrap();
        assert_eq!(round.status, RoundStatus::InProgress);
        assert_eq!(round.matches[0].match_status, MatchStatus::NotStarted);
        assert!(!can_finish_round(round));
        assert_eq!(bracket.finish_round(0), Err(BracketError::RoundIncomplete(0)));
    }

    #[test]
    fn test_record_score_rejects_unknown_match_and_bad_scores() {
        let mut bracket = pool(&["a", "b"], BracketSettings::default());
        assert!(matches!(
            bracket.record_score("nope", 1.0, 0.0),
            Err(ScoreError::Bracket(BracketError::UnknownMatch(_)))
        ));
        assert!(matches!(
            bracket.record_score("r0-m1", f64::NAN, 0.0),
            Err(ScoreError::Validation(_))
        ));
    }

    #[test]
    fn test_round_robin_seeds_semis_by_rank() {
        let strength = ["a", "b", "c", "d", "e"];
        let mut bracket = pool(&["e", "d", "c", "b", "a"], settings(Some(4), true));
        play_round(&mut bracket, 0, &strength);

        assert_eq!(bracket.finish_round(0), Ok(RoundTransition::Seeded(1)));
        assert_eq!(bracket.stage, BracketStage::Knockout);
        assert_eq!(bracket.current_round_index, 1);

        let semis = bracket.round(1).unwrap();
        assert_eq!(semis.round_type, RoundType::KnockoutSemis);
        let pairs: Vec<(&str, &str)> = semis
            .matches
            .iter()
            .map(|m| {
                (
                    m.player1.as_ref().unwrap().participant_id.as_str(),
                    m.player2.as_ref().unwrap().participant_id.as_str(),
                )
            })
            .collect();
        assert_eq!(pairs, vec![("a", "d"), ("b", "c")]);
        assert_eq!(semis.matches[0].player1.as_ref().unwrap().seed, Some(1));
    }

    #[test]
    fn test_full_tournament_reaches_completion() {
        let strength = ["a", "b", "c", "d"];
        let mut bracket = pool(&["a", "b", "c", "d"], settings(None, true));

        play_round(&mut bracket, 0, &strength);
        assert_eq!(bracket.finish_round(0), Ok(RoundTransition::Seeded(1)));

        play_round(&mut bracket, 1, &strength);
        assert_eq!(bracket.finish_round(1), Ok(RoundTransition::Seeded(2)));
        assert_eq!(bracket.round(2).unwrap().round_type, RoundType::KnockoutFinal);
        assert_eq!(bracket.round(3).unwrap().round_type, RoundType::KnockoutBronze);
        assert_eq!(bracket.current_round_index, 2);

        play_round(&mut bracket, 2, &strength);
        assert_eq!(bracket.finish_round(2), Ok(RoundTransition::Finished));
        assert!(!bracket.is_completed());

        play_round(&mut bracket, 3, &strength);
        assert_eq!(bracket.finish_round(3), Ok(RoundTransition::Completed));
        assert_eq!(bracket.stage, BracketStage::Completed);
        assert_eq!(bracket.rounds.len(), 4);

        let places: Vec<(&str, usize)> = bracket
            .standings
            .iter()
            .map(|s| (s.participant_id.as_str(), s.place))
            .collect();
        assert_eq!(places, vec![("a", 1), ("b", 2), ("c", 3), ("d", 4)]);
        assert_eq!(bracket.standings[0].wins, 5);
        assert_eq!(bracket.standings[3].losses, 5);
    }

    #[test]
    fn test_final_without_bronze_completes_immediately() {
        let strength = ["a", "b", "c"];
        let mut bracket = pool(&["a", "b", "c"], settings(None, false));

        play_round(&mut bracket, 0, &strength);
        assert_eq!(bracket.finish_round(0), Ok(RoundTransition::Seeded(1)));
        assert_eq!(bracket.round(1).unwrap().round_type, RoundType::KnockoutFinal);

        play_round(&mut bracket, 1, &strength);
        assert_eq!(bracket.finish_round(1), Ok(RoundTransition::Completed));
        assert_eq!(bracket.rounds.len(), 2);
        assert_eq!(bracket.finish_round(1), Err(BracketError::AlreadyCompleted));
        assert!(matches!(
            bracket.record_score("r1-m1", 1.0, 0.0),
            Err(ScoreError::Bracket(BracketError::AlreadyCompleted))
        ));
        assert_eq!(bracket.standings.len(), 3);
        assert_eq!(bracket.standings[2].participant_id, "c");
    }

    #[test]
    fn test_knockout_bye_advances_lone_entrant() {
        let strength = ["a", "b", "c"];
        let mut bracket = knockout(&["a", "b", "c"], settings(None, false));

        let first = bracket.round(0).unwrap();
        assert_eq!(first.round_type, RoundType::KnockoutSemis);
        assert!(first.matches[1].is_bye());
        assert_eq!(first.matches[1].winner_id.as_deref(), Some("c"));

        play_round(&mut bracket, 0, &strength);
        assert_eq!(bracket.finish_round(0), Ok(RoundTransition::Seeded(1)));

        let final_round = bracket.round(1).unwrap();
        let finalists: Vec<&str> = final_round.matches[0]
            .player1
            .iter()
            .chain(final_round.matches[0].player2.iter())
            .map(|e| e.participant_id.as_str())
            .collect();
        assert_eq!(finalists, vec!["a", "c"]);
    }

    #[test]
    fn test_tied_semi_gives_walkover_final() {
        let mut bracket = knockout(&["a", "b", "c", "d"], settings(None, true));
        bracket.record_score("r0-m1", 3.0, 3.0).unwrap();
        bracket.record_score("r0-m2", 5.0, 1.0).unwrap();

        assert_eq!(bracket.finish_round(0), Ok(RoundTransition::Completed));
        assert_eq!(bracket.stage, BracketStage::Completed);
        assert_eq!(bracket.rounds.len(), 2);

        let final_round = bracket.round(1).unwrap();
        assert_eq!(final_round.round_type, RoundType::KnockoutFinal);
        assert_eq!(final_round.status, RoundStatus::Finished);
        assert!(final_round.matches[0].player1.is_none());
        assert_eq!(final_round.matches[0].winner_id.as_deref(), Some("c"));
        assert_eq!(bracket.standings[0].participant_id, "c");
        assert_eq!(bracket.standings.len(), 4);
    }

    #[test]
    fn test_bye_semi_skips_bronze_and_final_completes() {
        let strength = ["a", "b", "c"];
        let mut bracket = knockout(&["a", "b", "c"], settings(None, true));

        play_round(&mut bracket, 0, &strength);
        assert_eq!(bracket.finish_round(0), Ok(RoundTransition::Seeded(1)));
        assert_eq!(bracket.rounds.len(), 2);
        assert_eq!(bracket.rounds_of(RoundType::KnockoutBronze).count(), 0);

        play_round(&mut bracket, 1, &strength);
        assert_eq!(bracket.finish_round(1), Ok(RoundTransition::Completed));

        let places: Vec<&str> = bracket
            .standings
            .iter()
            .map(|s| s.participant_id.as_str())
            .collect();
        assert_eq!(places, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_bye_only_round_seeds_onward() {
        let eight = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let mut bracket = knockout(&eight, settings(None, false));
        bracket.record_score("r0-m1", 2.0, 2.0).unwrap();
        bracket.record_score("r0-m2", 4.0, 1.0).unwrap();
        bracket.record_score("r0-m3", 2.0, 2.0).unwrap();
        bracket.record_score("r0-m4", 1.0, 4.0).unwrap();

        // Semis are (None, c) and (None, h): both walkovers, so the final
        // between c and h is seeded straight away.
        assert_eq!(bracket.finish_round(0), Ok(RoundTransition::Seeded(2)));
        assert_eq!(bracket.round(1).unwrap().status, RoundStatus::Finished);
        assert_eq!(bracket.current_round_index, 2);

        let final_match = &bracket.round(2).unwrap().matches[0];
        assert!(!final_match.is_bye());
        assert_eq!(final_match.player1.as_ref().unwrap().participant_id, "c");
        assert_eq!(final_match.player2.as_ref().unwrap().participant_id, "h");
    }
}
