/*
    ALICE-FIX-Lens
    Copyright (C) 2026 Moroya Sakamoto
*/

//! Format-detecting FIX tokenizer.
//!
//! Turns pasted or logged FIX text into an ordered list of [`FieldPair`]s.
//!
//! ## Detection Order
//!
//! The first heuristic that matches wins, even if a later one would also
//! match:
//!
//! 1. Bracketed log lines: `<35> MsgType = D`.
//! 2. Columnar dumps: `MsgType 35 D`, one field per line.
//! 3. `|` and `^A` are normalized to SOH (`0x01`).
//! 4. Inline `tag=value` runs with no separator at all. A lone
//!    `tag=value` token keeps everything after its first `=`.
//! 5. SOH-delimited wire format (fallback).
//!
//! Tokenizing never fails. Input that matches nothing yields an empty or
//! partial list.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::message::FieldPair;

/// SOH byte — the FIX field delimiter (ASCII 0x01).
pub const SOH: char = '\u{1}';

static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<([0-9]+)>[^=]*=\s*(.*)").expect("valid regex"));

static COLUMNAR_PROBE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+\s+[0-9]+\s+").expect("valid regex"));

static COLUMNAR_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_\s&.]+\s+([0-9]+)\s+(.*)$").expect("valid regex"));

static INLINE_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)=([^=\s\x01]+)").expect("valid regex"));

/// Which encoding heuristic recognized the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// Blank input.
    Empty,
    /// `<tag> label = value` lines.
    Bracketed,
    /// `label tag value` lines.
    Columnar,
    /// Space-separated `tag=value` tokens without any field separator.
    Inline,
    /// SOH, pipe or `^A` separated `tag=value` fields.
    Delimited,
}

/// Tokenize `raw` into field pairs, auto-detecting the encoding.
pub fn tokenize(raw: &str) -> Vec<FieldPair> {
    tokenize_detected(raw).1
}

/// Report which heuristic [`tokenize`] would apply to `raw`.
pub fn detect_format(raw: &str) -> InputFormat {
    tokenize_detected(raw).0
}

/// Tokenize `raw`, also returning the detected encoding.
pub fn tokenize_detected(raw: &str) -> (InputFormat, Vec<FieldPair>) {
    if raw.trim().is_empty() {
        return (InputFormat::Empty, Vec::new());
    }

    if BRACKETED.is_match(raw) {
        let pairs = BRACKETED
            .captures_iter(raw)
            .filter_map(|c| pair_from(&c[1], c[2].trim()))
            .collect();
        log::debug!("tokenizer: bracketed input");
        return (InputFormat::Bracketed, pairs);
    }

    let lines: Vec<&str> = raw.lines().collect();
    if lines.iter().any(|l| COLUMNAR_PROBE.is_match(l.trim())) {
        let pairs = lines
            .iter()
            .filter_map(|l| COLUMNAR_LINE.captures(l.trim()))
            .filter_map(|c| pair_from(&c[1], c[2].trim()))
            .collect();
        log::debug!("tokenizer: columnar input");
        return (InputFormat::Columnar, pairs);
    }

    let clean = normalize_delimiters(raw);

    if !clean.contains(SOH) && clean.contains('=') {
        let token = clean.trim();
        if !token.contains(char::is_whitespace) {
            if let Some(pair) = split_field(token) {
                log::debug!("tokenizer: single field");
                return (InputFormat::Inline, vec![pair]);
            }
        }

        let pairs: Vec<FieldPair> = INLINE_PAIR
            .captures_iter(&clean)
            .filter_map(|c| pair_from(&c[1], &c[2]))
            .collect();
        if !pairs.is_empty() {
            log::debug!("tokenizer: inline input");
            return (InputFormat::Inline, pairs);
        }
    }

    let pairs = clean.split(SOH).filter_map(split_field).collect();
    (InputFormat::Delimited, pairs)
}

/// Replace `|` and the two-character `^A` with SOH.
pub fn normalize_delimiters(raw: &str) -> String {
    raw.replace('|', "\u{1}").replace("^A", "\u{1}")
}

/// Split one `tag=value` token at its first `=`.
///
/// Everything after the first `=` is the value, so values may contain `=`.
/// Tokens without `=` or with a non-numeric tag are dropped.
fn split_field(field: &str) -> Option<FieldPair> {
    let (key, value) = field.split_once('=')?;
    let tag = parse_tag_number(key.trim().as_bytes())?;
    Some(FieldPair::new(tag, value))
}

fn pair_from(tag: &str, value: &str) -> Option<FieldPair> {
    match parse_tag_number(tag.as_bytes()) {
        Some(tag) => Some(FieldPair::new(tag, value)),
        None => {
            log::debug!("tokenizer: dropping out-of-range tag {tag}");
            None
        }
    }
}

/// Parse a decimal `u32` from a byte slice of ASCII digits.
///
/// Returns `None` if the slice is empty, contains non-digit bytes, or would
/// overflow `u32`.
#[inline(always)]
pub(crate) fn parse_tag_number(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() {
        return None;
    }
    let mut n: u32 = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        n = n.checked_mul(10)?.checked_add((b - b'0') as u32)?;
    }
    Some(n)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
