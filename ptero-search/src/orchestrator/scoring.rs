//! Fuzzy similarity scoring between a query and one candidate value.
//!
//! Combines two signals with a small prefix/substring bonus:
//!
//! ```text
//! score = 0.55 * ratio + 0.45 * token_score + bonus     (clamped to 0..=100)
//! ratio       = 100 * max(sim(q_norm, c_norm), sim(q_comp, c_comp))
//! token_score = 100 * hits / query_tokens
//! bonus       = 12 (candidate starts with query)
//!             |  8 (candidate contains query)
//!             |  6 (query starts with candidate)
//! ```
//!
//! `sim` is the character-sequence similarity `2 * M / T`, where `M` is the
//! number of matched characters and `T` the combined length. `M` comes from
//! an optimal character diff (longest common subsequence), not a greedy
//! longest-block matcher, so on scrambled input the ratio can be higher than
//! a Ratcliff/Obershelp ratio would be. For example "prisonmc" against
//! "john smith" scores about 19 here where the greedy ratio gives about 6.
//! Scoring is not symmetric: swapping query and candidate changes the token
//! and bonus terms.

use super::normalize::{compact, normalize};

/// Weight of the whole-string similarity ratio.
const RATIO_WEIGHT: f64 = 0.55;

/// Weight of the token-overlap score.
const TOKEN_WEIGHT: f64 = 0.45;

/// Bonus when the compact candidate starts with the compact query.
const PREFIX_BONUS: f64 = 12.0;

/// Bonus when the compact candidate contains the compact query.
const SUBSTRING_BONUS: f64 = 8.0;

/// Bonus when the compact query starts with the compact candidate.
const REVERSE_PREFIX_BONUS: f64 = 6.0;

/// Highest possible score.
pub const MAX_SCORE: f64 = 100.0;

/// Score how well `candidate` matches `query`, in `0.0..=100.0`.
///
/// Returns 0 when either side normalises to an empty string and 100 on
/// an exact normalised or compact match.
///
/// ```
/// use ptero_search::orchestrator::scoring::score;
///
/// assert_eq!(score("jsmith", "JSmith"), 100.0);
/// assert!(score("john", "John Smith") > 55.0);
/// assert_eq!(score("", "anything"), 0.0);
/// ```
pub fn score(query: &str, candidate: &str) -> f64 {
    let q_norm = normalize(query);
    let c_norm = normalize(candidate);
    if q_norm.is_empty() || c_norm.is_empty() {
        return 0.0;
    }

    let q_comp = compact(query);
    let c_comp = compact(candidate);
    if q_norm == c_norm || (!q_comp.is_empty() && q_comp == c_comp) {
        return MAX_SCORE;
    }

    let mut ratio = sequence_ratio(&q_norm, &c_norm);
    if !q_comp.is_empty() && !c_comp.is_empty() {
        ratio = ratio.max(sequence_ratio(&q_comp, &c_comp));
    }
    let ratio = ratio * 100.0;

    let token = token_score(&q_norm, &c_norm);
    let bonus = match_bonus(&q_comp, &c_comp);

    (RATIO_WEIGHT * ratio + TOKEN_WEIGHT * token + bonus).clamp(0.0, MAX_SCORE)
}

/// Character-sequence similarity of two strings in `0.0..=1.0`, from an
/// LCS-based character diff.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    f64::from(similar::TextDiff::from_chars(a, b).ratio())
}

/// Percentage of query tokens found in the candidate's tokens.
///
/// A query token is a hit when any candidate token starts with it or
/// contains it. Both inputs are split on whitespace; callers pass
/// normalised text.
pub fn token_score(query: &str, candidate: &str) -> f64 {
    let q_tokens: Vec<&str> = query.split_whitespace().collect();
    let c_tokens: Vec<&str> = candidate.split_whitespace().collect();
    if q_tokens.is_empty() || c_tokens.is_empty() {
        return 0.0;
    }

    let hits = q_tokens
        .iter()
        .filter(|qt| {
            c_tokens
                .iter()
                .any(|ct| ct.starts_with(*qt) || ct.contains(*qt))
        })
        .count();

    hits as f64 / q_tokens.len() as f64 * 100.0
}

/// Prefix/substring bonus on compact forms. The first matching rule wins.
pub fn match_bonus(q_comp: &str, c_comp: &str) -> f64 {
    if q_comp.is_empty() || c_comp.is_empty() {
        0.0
    } else if c_comp.starts_with(q_comp) {
        PREFIX_BONUS
    } else if c_comp.contains(q_comp) {
        SUBSTRING_BONUS
    } else if q_comp.starts_with(c_comp) {
        REVERSE_PREFIX_BONUS
    } else {
        0.0
    }
}
