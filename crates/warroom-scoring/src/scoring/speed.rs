use super::config::SpeedTier;

/// Convert elapsed time into the tiered speed score.
///
/// The fallback past the last tier rescales the remaining time budget and
/// ignores the tier scale entirely, so a large total budget can land above
/// the slowest tier. Kept exactly as shipped; see DESIGN.md.
pub(crate) fn speed_score(
    time_taken_seconds: u64,
    total_time_seconds: u64,
    tiers: &[SpeedTier],
) -> f64 {
    let time_taken_minutes = time_taken_seconds as f64 / 60.0;

    for tier in tiers {
        if time_taken_minutes <= tier.max_minutes {
            return tier.score;
        }
    }

    let time_left_ratio =
        (total_time_seconds as f64 - time_taken_seconds as f64) / total_time_seconds as f64;
    time_left_ratio.max(0.0) * 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::config::ScoringConfig;

    fn tiers() -> Vec<SpeedTier> {
        ScoringConfig::default().speed_tiers
    }

    #[test]
    fn fast_submissions_take_the_top_tier() {
        assert_eq!(speed_score(300, 3600, &tiers()), 10.0);
    }

    #[test]
    fn mid_range_lands_in_the_matching_tier() {
        assert_eq!(speed_score(1500, 3600, &tiers()), 6.0);
        assert_eq!(speed_score(3300, 3600, &tiers()), 1.0);
    }

    #[test]
    fn tier_bounds_are_inclusive() {
        // 600s is exactly 10 minutes.
        assert_eq!(speed_score(600, 3600, &tiers()), 10.0);
        assert_eq!(speed_score(601, 3600, &tiers()), 8.0);
    }

    #[test]
    fn past_the_last_tier_falls_back_to_the_time_left_ratio() {
        // 65 minutes against a 60-minute budget: no time left.
        assert_eq!(speed_score(3900, 3600, &tiers()), 0.0);
        // A larger budget can outscore the slowest tier.
        let score = speed_score(3900, 14400, &tiers());
        assert!((score - 7.291_666_666_666_667).abs() < 1e-9);
    }

    #[test]
    fn zero_budget_never_panics() {
        assert_eq!(speed_score(3900, 0, &tiers()), 0.0);
    }
}
