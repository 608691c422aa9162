//! Loose comparison of human-entered labels.
//!
//! Term names typed into a spreadsheet rarely match the stored label byte for
//! byte. Two labels are treated as the same when they agree after case folding,
//! punctuation removal and whitespace collapsing.

/// Returns true if `known` and `unknown` name the same thing.
///
/// Both strings are lowercased, stripped of everything that is not
/// alphanumeric or whitespace, and have whitespace runs collapsed to a single
/// space. Two strings that normalize to nothing (e.g. `""` and `"#~^."`)
/// compare equal; an empty normalized string never equals a non-empty one.
///
/// ```
/// use fieldcheck::compare_strings;
///
/// assert!(compare_strings("foo", "Foo#~^."));
/// assert!(!compare_strings("foo", "foot"));
/// ```
pub fn compare_strings(known: &str, unknown: &str) -> bool {
    normalize(known) == normalize(unknown)
}

/// Normalize a label for comparison.
pub fn normalize(value: &str) -> String {
    let stripped: String = value
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
