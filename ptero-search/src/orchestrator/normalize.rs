//! Canonical text forms used for comparison.
//!
//! Two forms feed two independent similarity signals:
//!
//! - [`normalize`]: lower-cased, every run of characters other than ASCII
//!   letters and digits collapsed to a single space, trimmed. Token-aware.
//! - [`compact`]: lower-cased with every character other than ASCII letters
//!   and digits removed. Character-sequence-aware with punctuation ignored.

/// Returns true for the characters that survive normalisation.
fn is_kept(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

/// Lower-case `text` and collapse non-alphanumeric runs into single spaces.
///
/// ```
/// use ptero_search::orchestrator::normalize::normalize;
///
/// assert_eq!(normalize("  Smith, John!! "), "smith john");
/// assert_eq!(normalize("---"), "");
/// ```
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if is_kept(c) {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }

    out
}

/// Lower-case `text` and drop every non-alphanumeric character.
///
/// ```
/// use ptero_search::orchestrator::normalize::compact;
///
/// assert_eq!(compact("J.Smith-01"), "jsmith01");
/// ```
pub fn compact(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| is_kept(*c))
        .collect()
}
