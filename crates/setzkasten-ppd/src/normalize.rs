// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// String normalization helpers for PPD header values.
//
// PPD files are written by printer vendors, which means every convention
// that could possibly vary does: quoting, bracketing, stray whitespace,
// vendor names spelled three different ways. These helpers are small pure
// functions so the cleanup rules stay independently testable.

/// Characters treated as whitespace by the PPD cleanup rules.
const WHITESPACE: &str = " \t\n\r";

/// Separators at which a vendor/model string is cut to its first word.
const FIRST_WORD_SEPS: &str = " -/";

/// ASCII uppercase.
pub fn strupper(s: &str) -> String {
    s.to_ascii_uppercase()
}

/// Remove every occurrence of the given characters.
pub fn killchars(s: &str, chars: &str) -> String {
    s.chars().filter(|c| !chars.contains(*c)).collect()
}

/// Strip parentheses, brackets, braces, and double quotes.
pub fn killbraces(s: &str) -> String {
    killchars(s, "()[]{}\"")
}

/// Trim leading and trailing whitespace.
pub fn killspaces(s: &str) -> &str {
    s.trim_matches(|c| WHITESPACE.contains(c))
}

/// The prefix of `s` up to (not including) the first separator character.
///
/// "HEWLETT-PACKARD" → "HEWLETT", "OKI DATA" → "OKI", "A/B" → "A".
pub fn first_word(s: &str) -> &str {
    match s.find(|c| FIRST_WORD_SEPS.contains(c)) {
        Some(idx) => &s[..idx],
        None => s,
    }
}

/// Extract a usable value from the text after a PPD keyword's colon:
/// trim whitespace, then drop one surrounding pair of double quotes,
/// then trim again.
///
/// `  "Super 9000" ` → `Super 9000`. A lone or unbalanced quote is left
/// alone rather than guessed at.
pub fn clean(s: &str) -> String {
    let trimmed = killspaces(s);
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed);
    killspaces(unquoted).to_string()
}
