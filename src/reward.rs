/// Tiered reward shaping evaluated on the board after an action: a base
/// tier from the largest tile, a bracket adjustment from the running score,
/// and a flat 50 off for losing. Winning earns no bonus in this variant.
pub fn compute_reward(position: &[u32], current_score: u32, lost: bool, _won: bool) -> f64 {
    let max_value = position.iter().copied().max().unwrap_or(0);

    let mut reward: f64 = if max_value >= 2048 {
        100.0
    } else if max_value >= 1024 {
        80.0
    } else if max_value >= 512 {
        60.0
    } else if max_value >= 256 {
        40.0
    } else if max_value >= 128 {
        20.0
    } else {
        5.0
    };

    if current_score < 100 {
        reward -= 10.0;
    } else if current_score < 200 {
        reward += 10.0;
    } else if current_score < 300 {
        reward += 20.0;
    } else {
        reward += 40.0;
    }

    if lost {
        reward -= 50.0;
    }

    reward
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_with_low_score_penalty() {
        // 128 tier (20) minus the score<100 penalty (10).
        let position = [2, 4, 128, 0];
        assert_eq!(compute_reward(&position, 50, false, false), 10.0);
    }

    #[test]
    fn test_winning_board_after_loss() {
        // 2048 tier (100) plus score>=300 (40) minus the loss penalty (50).
        let position = [2048, 4, 2, 2];
        assert_eq!(compute_reward(&position, 350, true, true), 90.0);
    }

    #[test]
    fn test_all_tile_tiers() {
        assert_eq!(compute_reward(&[64], 150, false, false), 15.0);
        assert_eq!(compute_reward(&[128], 150, false, false), 30.0);
        assert_eq!(compute_reward(&[256], 150, false, false), 50.0);
        assert_eq!(compute_reward(&[512], 150, false, false), 70.0);
        assert_eq!(compute_reward(&[1024], 150, false, false), 90.0);
        assert_eq!(compute_reward(&[2048], 150, false, false), 110.0);
    }

    #[test]
    fn test_between_tier_values_fall_through() {
        // 96 sits between 64 and 128 and lands in the lowest bucket.
        assert_eq!(compute_reward(&[96], 150, false, false), 15.0);
    }

    #[test]
    fn test_score_brackets() {
        let position = [256];
        assert_eq!(compute_reward(&position, 0, false, false), 30.0);
        assert_eq!(compute_reward(&position, 100, false, false), 50.0);
        assert_eq!(compute_reward(&position, 200, false, false), 60.0);
        assert_eq!(compute_reward(&position, 300, false, false), 80.0);
    }

    #[test]
    fn test_no_win_bonus() {
        let position = [512];
        let won = compute_reward(&position, 150, false, true);
        let not_won = compute_reward(&position, 150, false, false);
        assert_eq!(won, not_won);
    }

    #[test]
    fn test_empty_board() {
        assert_eq!(compute_reward(&[], 0, false, false), -5.0);
    }
}
