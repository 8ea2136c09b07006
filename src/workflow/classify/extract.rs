//! Recovery of a JSON object from free-form model output.
//!
//! Model replies often wrap the object in prose or markdown fences. The
//! strategies below are tried in order and the first hit wins:
//!
//! | Strategy | Picks |
//! |----------|-------|
//! | [`Extraction::Fenced`] | `{...}` inside a triple-backtick fence, optionally tagged `json` |
//! | [`Extraction::BraceSpan`] | first `{` through last `}` of the whole text |
//! | [`Extraction::Verbatim`] | the trimmed text itself |
//!
//! Every strategy is a linear scan; nothing here backtracks.

use serde_json::Value;

const FENCE: &str = "```";
const FENCE_TAG: &str = "json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    Fenced,
    BraceSpan,
    Verbatim,
}

impl Extraction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Extraction::Fenced => "fenced",
            Extraction::BraceSpan => "brace_span",
            Extraction::Verbatim => "verbatim",
        }
    }
}

type Strategy = fn(&str) -> Option<&str>;

const STRATEGIES: [(Extraction, Strategy); 2] = [
    (Extraction::Fenced, fenced_block),
    (Extraction::BraceSpan, brace_span),
];

/// Return the most likely JSON object substring of `raw`, and which
/// strategy found it.
pub fn extract(raw: &str) -> (Extraction, &str) {
    STRATEGIES
        .iter()
        .find_map(|(kind, strategy)| strategy(raw).map(|span| (*kind, span)))
        .unwrap_or((Extraction::Verbatim, raw.trim()))
}

pub fn extract_json_payload(raw: &str) -> &str {
    extract(raw).1
}

/// Extract and strictly parse the payload of `raw`.
pub fn parse_payload(raw: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(extract_json_payload(raw))
}

/// `{...}` wrapped in a fence. The span is greedy: it ends at the last `}`
/// that is followed only by whitespace and a closing fence.
fn fenced_block(text: &str) -> Option<&str> {
    let close = last_fenced_close(text)?;

    for open in fence_positions(text) {
        let rest = &text[open + FENCE.len()..];
        let rest = rest.strip_prefix(FENCE_TAG).unwrap_or(rest);
        let body = rest.trim_start();
        if !body.starts_with('{') {
            continue;
        }
        let start = text.len() - body.len();
        if start > close {
            // Every later opening starts even further right.
            return None;
        }
        return Some(text[start..=close].trim());
    }

    None
}

/// Byte offsets of every fence, overlapping runs included (a run of four
/// backticks holds fences at two offsets).
fn fence_positions(text: &str) -> impl Iterator<Item = usize> + '_ {
    text.as_bytes()
        .windows(FENCE.len())
        .enumerate()
        .filter(|(_, window)| *window == FENCE.as_bytes())
        .map(|(index, _)| index)
}

fn last_fenced_close(text: &str) -> Option<usize> {
    text.rmatch_indices('}')
        .map(|(index, _)| index)
        .find(|&index| text[index + 1..].trim_start().starts_with(FENCE))
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(text[start..=end].trim())
}
