//! Title sanitation for mirror entry names.
//!
//! # Responsibility
//! - Turn display titles into filesystem-safe entry name fragments.
//! - Signal titles that cannot name a mirror entry at all.
//!
//! # Invariants
//! - Pure text transformation; no filesystem access.
//! - Returned names are non-empty and free of path separators.

use once_cell::sync::Lazy;
use regex::Regex;

static UNSAFE_CHAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[/<>|:&]").expect("valid unsafe char regex"));
static STATS_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" \[[^\]]*\]$").expect("valid stats suffix regex"));
static LINK_WITH_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[[^\]\[]*\]\[([^\]\[]*)\]\]").expect("valid labeled link regex"));
static LINK_PLAIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\]\[]*)\]\]").expect("valid plain link regex"));

/// Sanitizes a display title into a mirror entry name.
///
/// Applied in order: risky path characters (`/ < > | : &`) become `-`, a
/// trailing bracketed statistics annotation is stripped, link markup
/// collapses to its visible text. Returns `None` when nothing displayable
/// remains; such nodes are excluded from mirroring entirely.
pub fn sanitize_title(title: &str) -> Option<String> {
    let replaced = UNSAFE_CHAR_RE.replace_all(title, "-");
    let stripped = STATS_SUFFIX_RE.replace(&replaced, "");
    let labeled = LINK_WITH_LABEL_RE.replace_all(&stripped, "$1");
    let collapsed = LINK_PLAIN_RE.replace_all(&labeled, "$1");

    let trimmed = collapsed.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
