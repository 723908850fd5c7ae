use super::types::{CompetitiveMode, RatingPolicy, RatingScope, RatingValue};

/// Signed, whole-valued rating change. Kept as `f64` so that NaN input
/// surfaces as NaN output instead of collapsing to zero.
pub type RatingDelta = f64;

/// Rating delta for side A of a match, using the default policy.
///
/// Call again with the arguments swapped to get side B's delta; the two are
/// not mirror images when office damping applies.
pub fn compute_delta(
    rating_a: RatingValue,
    rating_b: RatingValue,
    score_a: f64,
    score_b: f64,
    scope: RatingScope,
    k_factor: f64,
) -> RatingDelta {
    compute_delta_with(
        &RatingPolicy::default(),
        rating_a,
        rating_b,
        score_a,
        score_b,
        scope,
        k_factor,
    )
}

pub fn compute_delta_with(
    policy: &RatingPolicy,
    rating_a: RatingValue,
    rating_b: RatingValue,
    score_a: f64,
    score_b: f64,
    scope: RatingScope,
    k_factor: f64,
) -> RatingDelta {
    let k = effective_k(policy, scope, k_factor);

    if scope == RatingScope::Venue(CompetitiveMode::Arcade) {
        return 0.0;
    }

    let expected = expected_score(rating_a, rating_b);
    let result = match_result(score_a, score_b);
    let delta = round_half_up(k * (result - expected));

    apply_loss_damping(policy, scope, delta)
}

/// K-factor adjusted for placement volatility.
pub fn dynamic_k(base_k: f64, matches_played: u32, mode: CompetitiveMode) -> f64 {
    dynamic_k_with(&RatingPolicy::default(), base_k, matches_played, mode)
}

pub fn dynamic_k_with(
    policy: &RatingPolicy,
    base_k: f64,
    matches_played: u32,
    mode: CompetitiveMode,
) -> f64 {
    match mode {
        CompetitiveMode::Professional if matches_played < policy.placement_matches => {
            base_k * policy.placement_multiplier
        }
        CompetitiveMode::Professional | CompetitiveMode::Office | CompetitiveMode::Arcade => base_k,
    }
}

/// Logistic expectation of side A beating side B.
pub fn expected_score(rating_a: RatingValue, rating_b: RatingValue) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((rating_b - rating_a) / 400.0))
}

fn effective_k(policy: &RatingPolicy, scope: RatingScope, k_factor: f64) -> f64 {
    match scope {
        RatingScope::Global => policy.global_k,
        RatingScope::Venue(_) => k_factor,
    }
}

fn match_result(score_a: f64, score_b: f64) -> f64 {
    if score_a > score_b { 1.0 } else { 0.0 }
}

fn apply_loss_damping(
    policy: &RatingPolicy,
    scope: RatingScope,
    delta: RatingDelta,
) -> RatingDelta {
    match scope {
        RatingScope::Venue(CompetitiveMode::Office) if delta < 0.0 => {
            round_half_up(delta * policy.office_loss_damping)
        }
        _ => delta,
    }
}

/// Rounds to the nearest integer, halves toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFICE: RatingScope = RatingScope::Venue(CompetitiveMode::Office);
    const PRO: RatingScope = RatingScope::Venue(CompetitiveMode::Professional);
    const ARCADE: RatingScope = RatingScope::Venue(CompetitiveMode::Arcade);

    #[test]
    fn test_equal_ratings_global_win() {
        let delta = compute_delta(1000.0, 1000.0, 11.0, 5.0, RatingScope::Global, 32.0);
        assert_eq!(delta, 16.0);
    }

    #[test]
    fn test_global_ignores_caller_k() {
        let delta = compute_delta(1000.0, 1000.0, 11.0, 5.0, RatingScope::Global, 100.0);
        assert_eq!(delta, 16.0);
    }

    #[test]
    fn test_global_win_never_negative() {
        for gap in [-800.0, -200.0, 0.0, 200.0, 800.0, 2000.0] {
            let delta = compute_delta(1000.0 + gap, 1000.0, 3.0, 1.0, RatingScope::Global, 32.0);
            assert!(delta >= 0.0, "gap {gap} produced {delta}");
        }
    }

    #[test]
    fn test_global_win_decays_with_favouring_gap() {
        let mut previous = f64::MAX;
        for gap in [0.0, 100.0, 200.0, 400.0, 800.0] {
            let delta = compute_delta(1000.0 + gap, 1000.0, 3.0, 1.0, RatingScope::Global, 32.0);
            assert!(delta <= previous);
            previous = delta;
        }
    }

    #[test]
    fn test_arcade_is_always_zero() {
        assert_eq!(compute_delta(1000.0, 1500.0, 10.0, 0.0, ARCADE, 32.0), 0.0);
        assert_eq!(compute_delta(1500.0, 1000.0, 0.0, 10.0, ARCADE, 64.0), 0.0);
    }

    #[test]
    fn test_arcade_does_not_apply_globally() {
        let delta = compute_delta(1000.0, 1000.0, 0.0, 10.0, RatingScope::Global, 32.0);
        assert_eq!(delta, -16.0);
    }

    #[test]
    fn test_office_dampens_losses() {
        let raw = compute_delta(1000.0, 1000.0, 2.0, 5.0, PRO, 32.0);
        let damped = compute_delta(1000.0, 1000.0, 2.0, 5.0, OFFICE, 32.0);
        assert_eq!(raw, -16.0);
        assert_eq!(damped, round_half_up(raw * 0.8));
        assert_eq!(damped, -13.0);
    }

    #[test]
    fn test_office_keeps_wins() {
        let raw = compute_delta(1100.0, 1000.0, 5.0, 2.0, PRO, 32.0);
        let office = compute_delta(1100.0, 1000.0, 5.0, 2.0, OFFICE, 32.0);
        assert_eq!(raw, office);
    }

    #[test]
    fn test_office_deltas_are_asymmetric() {
        let winner = compute_delta(1000.0, 1000.0, 5.0, 2.0, OFFICE, 32.0);
        let loser = compute_delta(1000.0, 1000.0, 2.0, 5.0, OFFICE, 32.0);
        assert_eq!(winner, 16.0);
        assert_eq!(loser, -13.0);
    }

    #[test]
    fn test_venue_uses_caller_k() {
        let delta = compute_delta(1000.0, 1000.0, 5.0, 2.0, PRO, 64.0);
        assert_eq!(delta, 32.0);
    }

    #[test]
    fn test_nan_propagates() {
        let delta = compute_delta(f64::NAN, 1000.0, 5.0, 2.0, RatingScope::Global, 32.0);
        assert!(delta.is_nan());
    }

    #[test]
    fn test_dynamic_k_professional_placement() {
        assert_eq!(dynamic_k(32.0, 0, CompetitiveMode::Professional), 64.0);
        assert_eq!(dynamic_k(32.0, 9, CompetitiveMode::Professional), 64.0);
        assert_eq!(dynamic_k(32.0, 10, CompetitiveMode::Professional), 32.0);
        assert_eq!(dynamic_k(32.0, 250, CompetitiveMode::Professional), 32.0);
    }

    #[test]
    fn test_dynamic_k_other_modes() {
        for matches in [0, 5, 10, 100] {
            assert_eq!(dynamic_k(32.0, matches, CompetitiveMode::Office), 32.0);
            assert_eq!(dynamic_k(32.0, matches, CompetitiveMode::Arcade), 32.0);
        }
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-12.8), -13.0);
    }
}
