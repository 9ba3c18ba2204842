//! Selection mining from chat messages
//!
//! Extracts candidate option numbers from free-form chat text. This is
//! pure domain logic — no tally access, no range checks (the store owns
//! those), just text pattern matching.

use regex::Regex;
use std::sync::LazyLock;

static DIGIT_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digit-run pattern is valid"));

/// Every maximal run of digits in `text`, parsed as an option number.
///
/// Tokens that do not fit in `usize` are dropped; malformed tokens never
/// fail the message, so other valid tokens are still returned. Range
/// filtering against the option count happens at recording time.
///
/// # Examples
///
/// ```
/// use tally_domain::extract_selections;
///
/// assert_eq!(extract_selections("I vote 1 and 3"), vec![1, 3]);
/// assert_eq!(extract_selections("no numbers here"), Vec::<usize>::new());
/// assert_eq!(extract_selections("opt12!"), vec![12]);
/// ```
pub fn extract_selections(text: &str) -> Vec<usize> {
    DIGIT_RUNS
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<usize>().ok())
        .collect()
}
