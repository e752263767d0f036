//! Heuristic cleanup of model reasoning preambles
//!
//! Small instruction-tuned models often narrate before answering ("Okay, the
//! user wants...", "Vamos a ver..."). The structured prompt style promises a
//! bare numbered list, so leading narration is stripped with ordered pattern
//! heuristics. The heuristic is pattern-based: unusual phrasings slip
//! through, and a legitimate long introduction before the list is treated as
//! narration too.

use regex::Regex;
use std::sync::LazyLock;

/// Character offset past which a leading non-list block counts as narration
const PREAMBLE_OFFSET_LIMIT: usize = 50;

/// Leading filler phrases that mark a reasoning preamble, in match order.
/// At most one opener is applied per text.
static PREAMBLE_OPENERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^(?:okay|ok)\b",
        r"(?i)^let(?:'s| me) (?:think|see)\b",
        r"(?i)^(?:alright|well|hmm+)\b",
        r"(?i)^the user (?:wants|asked|is asking)\b",
        r"(?i)^vamos a ver\b",
        r"(?i)^a ver\b",
        r"(?i)^d[ée]jame pensar\b",
        r"(?i)^veamos\b",
        r"(?i)^bueno\b",
        r"(?i)^el usuario (?:quiere|pide|pregunta)\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid preamble opener"))
    .collect()
});

/// Numbered-list item at a line start ("1." or "1)")
static NUMBERED_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+[.)]\s").expect("Invalid NUMBERED_ITEM_RE"));

/// Numbered item or dash bullet at a line start
static LIST_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(?:\d+[.)]|-)\s").expect("Invalid LIST_MARKER_RE"));

/// Blank line separating narration from the answer
static BLANK_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("Invalid BLANK_LINE_RE"));

/// Strip a leading chain-of-thought preamble from model output.
///
/// Two passes over the trimmed text:
/// 1. If the text starts with a known filler phrase, cut everything up
///    through the first boundary: a blank line (cut past it), a bold marker
///    (cut before it) or a numbered item (cut before it). With no boundary
///    after the opener nothing is cut.
/// 2. If the first list marker (numbered or dash bullet) sits more than 50
///    characters in, everything before it is discarded.
///
/// Idempotent: already-cleaned text passes through unchanged.
#[must_use]
pub fn strip_reasoning(text: &str) -> String {
    let mut text = text.trim();

    if PREAMBLE_OPENERS.iter().any(|opener| opener.is_match(text)) {
        if let Some(cut) = preamble_boundary(text) {
            text = text[cut..].trim_start();
        }
    }

    cut_late_list(text).trim().to_string()
}

/// Earliest boundary ending a filler preamble, as a byte offset to cut at
fn preamble_boundary(text: &str) -> Option<usize> {
    let mut cut: Option<usize> = None;

    // The blank line itself belongs to the preamble, so cut past it
    if let Some(m) = BLANK_LINE_RE.find(text) {
        cut = Some(m.end());
    }
    if let Some(idx) = text.find("**") {
        cut = Some(cut.map_or(idx, |c| c.min(idx)));
    }
    // (?m)^ also matches offset 0, but an opener matched there already,
    // so any numbered item found sits strictly after the filler
    if let Some(m) = NUMBERED_ITEM_RE.find(text) {
        cut = Some(cut.map_or(m.start(), |c| c.min(m.start())));
    }

    cut
}

/// Discard a long leading block when the answer list starts late.
///
/// The 50-character window is measured in characters, not bytes, so accented
/// Spanish text is not penalized.
fn cut_late_list(text: &str) -> &str {
    if let Some(m) = LIST_MARKER_RE.find(text) {
        let char_offset = text[..m.start()].chars().count();
        if char_offset > PREAMBLE_OFFSET_LIMIT {
            return &text[m.start()..];
        }
    }
    text
}
