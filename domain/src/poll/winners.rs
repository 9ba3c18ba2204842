//! Winner computation
//!
//! Pure functions over a counts snapshot — no tally access, no I/O.

/// 1-based numbers of every option whose count equals the maximum.
///
/// Ties are not broken: all max-count options are winners. A maximum of
/// zero yields no winners at all.
///
/// # Examples
///
/// ```
/// use tally_domain::winning_options;
///
/// assert_eq!(winning_options(&[2, 5, 5, 1]), vec![2, 3]);
/// assert_eq!(winning_options(&[0, 0, 0]), Vec::<usize>::new());
/// ```
pub fn winning_options(counts: &[usize]) -> Vec<usize> {
    let max = counts.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return Vec::new();
    }
    counts
        .iter()
        .enumerate()
        .filter(|&(_, &c)| c == max)
        .map(|(i, _)| i + 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_winner() {
        assert_eq!(winning_options(&[1, 4, 2]), vec![2]);
    }

    #[test]
    fn test_tied_winners_all_highlighted() {
        assert_eq!(winning_options(&[3, 3, 1, 3]), vec![1, 2, 4]);
    }

    #[test]
    fn test_zero_max_highlights_nothing() {
        assert_eq!(winning_options(&[0, 0]), Vec::<usize>::new());
        assert_eq!(winning_options(&[]), Vec::<usize>::new());
    }
}
