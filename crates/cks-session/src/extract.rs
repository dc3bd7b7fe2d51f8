//! Tree extraction from free-text model replies.
//!
//! Matchers run in a fixed priority order and the first non-empty match
//! wins; the order is a contract, not an accident of the array:
//!
//! 1. a fenced block tagged `tree`
//! 2. an untagged fenced block (a language-tagged fence does not count)
//! 3. the first run of consecutive lines starting with a connector glyph
//!
//! When nothing matches, the input is returned unchanged.

use regex::Regex;
use std::sync::LazyLock;

/// Glyphs a tree line may start with.
const CONNECTOR_GLYPHS: [char; 5] = ['\u{251c}', '\u{2514}', '\u{2502}', '\u{2500}', '\u{250c}'];

static TREE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```tree[ \t]*\n(.*?)\n```").unwrap());

static ANY_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[ \t]*\n(.*?)\n```").unwrap());

type Matcher = fn(&str) -> Option<String>;

/// Priority order contract: tagged fence, then generic fence, then glyph run.
const MATCHERS: [Matcher; 3] = [match_tagged_fence, match_untagged_fence, match_glyph_run];

/// Extract the architecture tree from a model reply.
///
/// Returns the first matcher's first match, trimmed; only that one match is
/// used even when a later matcher (or a later occurrence) would yield more
/// text. Falls back to the unmodified input.
pub fn extract_tree(text: &str) -> String {
    for matcher in MATCHERS {
        if let Some(found) = matcher(text) {
            let trimmed = found.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }
    text.to_string()
}

fn match_tagged_fence(text: &str) -> Option<String> {
    TREE_FENCE_RE
        .captures(text)
        .map(|caps| caps[1].to_string())
}

fn match_untagged_fence(text: &str) -> Option<String> {
    ANY_FENCE_RE.captures(text).map(|caps| caps[1].to_string())
}

/// First contiguous run of lines whose first non-blank character is a
/// connector glyph.
fn match_glyph_run(text: &str) -> Option<String> {
    let mut run: Vec<&str> = Vec::new();
    for line in text.lines() {
        if is_glyph_line(line) {
            run.push(line);
        } else if !run.is_empty() {
            break;
        }
    }
    if run.is_empty() {
        None
    } else {
        Some(run.join("\n"))
    }
}

fn is_glyph_line(line: &str) -> bool {
    line.trim_start()
        .chars()
        .next()
        .is_some_and(|c| CONNECTOR_GLYPHS.contains(&c))
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
