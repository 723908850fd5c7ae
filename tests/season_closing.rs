use chrono::{DateTime, TimeZone, Utc};

use roomscore::config::settings::AppConfig;
use roomscore::domain::{MatchRecord, MatchSide, RawTimestamp, Side};
use roomscore::gateway::{Gateway, MemoryGateway};
use roomscore::services::recording::RecordingService;
use roomscore::services::season::SeasonService;

fn at(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, 20, 0, 0).unwrap()
}

fn game(id: &str, when: DateTime<Utc>, home: (&str, f64), away: (&str, f64)) -> MatchRecord {
    MatchRecord {
        id: id.to_string(),
        activity: "darts".to_string(),
        timestamp: Some(RawTimestamp::from_datetime(when)),
        venue_id: Some("v1".to_string()),
        home: MatchSide::new(home.0, &home.0.to_uppercase(), home.1, Side::Home),
        away: MatchSide::new(away.0, &away.0.to_uppercase(), away.1, Side::Away),
        is_ranked: None,
        winner_name: None,
        winner_id: None,
    }
}

#[test]
fn seasons_close_in_sequence() {
    let gateway = MemoryGateway::new();
    let config = AppConfig::new();
    let recorder = RecordingService::new(&gateway, &config);
    let seasons = SeasonService::new(&gateway, &config);

    recorder.record_match(game("m1", at(3, 1), ("a", 3.0), ("b", 1.0))).unwrap();
    recorder.record_match(game("m2", at(3, 2), ("a", 3.0), ("c", 2.0))).unwrap();
    recorder.record_match(game("m3", at(3, 3), ("b", 3.0), ("c", 0.0))).unwrap();

    let first = seasons.finalize("v1", at(4, 1)).unwrap().unwrap();
    assert_eq!(first.season_index, 1);
    assert_eq!(first.rows.len(), 3);
    assert_eq!(first.rows[0].participant_id, "a");
    assert_eq!(first.rows[0].place, 1);
    assert_eq!(first.rows[0].longest_win_streak, 2);
    assert_eq!(first.rows[2].participant_id, "c");

    // stored venue rating feeds the composite score
    let a = gateway.participant("darts", "a").unwrap().unwrap();
    let expected = 2.0 * 2.0 + a.venue_ratings["v1"] * 0.1 + first.rows[0].total_added_points;
    assert!((first.rows[0].final_score - expected).abs() < 1e-9);

    // nothing new since the closing
    assert!(seasons.finalize("v1", at(5, 1)).unwrap().is_none());

    recorder.record_match(game("m4", at(5, 10), ("c", 3.0), ("a", 0.0))).unwrap();
    let second = seasons.finalize("v1", at(6, 1)).unwrap().unwrap();
    assert_eq!(second.season_index, 2);
    assert_eq!(second.rows.len(), 2);
    assert_eq!(second.rows[0].participant_id, "c");

    assert_eq!(gateway.seasons("v1").unwrap(), vec![first, second]);

    let achievements = gateway.achievements("a").unwrap();
    assert_eq!(achievements.len(), 2);
    assert_eq!((achievements[0].season_index, achievements[0].place), (1, 1));
    assert_eq!((achievements[1].season_index, achievements[1].place), (2, 2));
}

#[test]
fn late_entry_counts_in_running_season() {
    let gateway = MemoryGateway::new();
    let config = AppConfig::new();
    let recorder = RecordingService::new(&gateway, &config);
    let seasons = SeasonService::new(&gateway, &config);

    recorder.record_match(game("m1", at(3, 1), ("a", 3.0), ("b", 1.0))).unwrap();
    let first = seasons.finalize("v1", at(4, 1)).unwrap().unwrap();
    assert_eq!(first.match_ids, vec!["m1".to_string()]);

    // played in March, entered after the April closing
    recorder.record_match(game("m2", at(3, 20), ("b", 3.0), ("a", 0.0))).unwrap();

    let second = seasons.finalize("v1", at(5, 1)).unwrap().unwrap();
    assert_eq!(second.season_index, 2);
    assert_eq!(second.match_ids, vec!["m2".to_string()]);
    assert_eq!(second.rows[0].participant_id, "b");
    assert_eq!(second.rows[0].wins, 1);

    assert!(seasons.finalize("v1", at(6, 1)).unwrap().is_none());
}

#[test]
fn empty_venue_is_a_no_op() {
    let gateway = MemoryGateway::new();
    let config = AppConfig::new();

    let closed = SeasonService::new(&gateway, &config).finalize("nowhere", at(1, 1)).unwrap();

    assert!(closed.is_none());
    assert_eq!(gateway.commit_count(), 0);
}
