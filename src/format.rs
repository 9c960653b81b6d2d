/*
    ALICE-FIX-Lens
    Copyright (C) 2026 Moroya Sakamoto
*/

//! Wire-style serializers for field pair lists.
//!
//! Only the delimited encodings live here. Both re-tokenize to the pairs
//! they were rendered from. No framing is added: BodyLength and CheckSum
//! are written exactly as they appear in the pair list, never recomputed.

use crate::message::FieldPair;
use crate::tokenizer::SOH;

/// Separator placed between rendered fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// `|`, the usual log and clipboard form.
    #[default]
    Pipe,
    /// SOH (`0x01`), the on-the-wire form.
    Soh,
}

impl Delimiter {
    #[inline(always)]
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Pipe => '|',
            Delimiter::Soh => SOH,
        }
    }
}

/// Render `pairs` as `tag=value` fields joined by `delimiter`.
///
/// No trailing delimiter is written.
pub fn render(pairs: &[FieldPair], delimiter: Delimiter) -> String {
    let sep = delimiter.as_char();
    let mut out = String::with_capacity(pairs.len() * 8);
    for (index, pair) in pairs.iter().enumerate() {
        if index > 0 {
            out.push(sep);
        }
        out.push_str(&pair.tag.to_string());
        out.push('=');
        out.push_str(&pair.value);
    }
    out
}

#[inline(always)]
pub fn to_pipe(pairs: &[FieldPair]) -> String {
    render(pairs, Delimiter::Pipe)
}

#[inline(always)]
pub fn to_soh(pairs: &[FieldPair]) -> String {
    render(pairs, Delimiter::Soh)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn sample() -> Vec<FieldPair> {
        vec![
            FieldPair::new(8, "FIX.4.4"),
            FieldPair::new(35, "D"),
            FieldPair::new(58, "a=b"),
        ]
    }

    #[test]
    fn test_render_pipe() {
        assert_eq!(to_pipe(&sample()), "8=FIX.4.4|35=D|58=a=b");
    }

    #[test]
    fn test_render_soh() {
        assert_eq!(to_soh(&sample()), "8=FIX.4.4\u{1}35=D\u{1}58=a=b");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(to_pipe(&[]), "");
    }

    #[test]
    fn test_pipe_and_soh_retokenize() {
        let pairs = sample();
        assert_eq!(tokenize(&to_pipe(&pairs)), pairs);
        assert_eq!(tokenize(&to_soh(&pairs)), pairs);
    }

    #[test]
    fn test_default_delimiter_is_pipe() {
        assert_eq!(Delimiter::default().as_char(), '|');
    }
}
