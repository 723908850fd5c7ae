/// Longest run of consecutive wins in chronologically ordered results.
pub fn longest_win_streak(results: &[bool]) -> u32 {
    let mut current = 0;
    let mut longest = 0;

    for &won in results {
        if won {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }

    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_win_streak() {
        assert_eq!(longest_win_streak(&[]), 0);
        assert_eq!(longest_win_streak(&[false, false]), 0);
        assert_eq!(longest_win_streak(&[true, true, false, true, true, true, false]), 3);
        assert_eq!(longest_win_streak(&[false, true, true, true, true]), 4);
    }
}
