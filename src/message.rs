/*
    ALICE-FIX-Lens
    Copyright (C) 2026 Moroya Sakamoto
*/

//! FIX message representation.
//!
//! A message is kept as the ordered list of [`FieldPair`]s the tokenizer
//! produced. Order is significant: repeating groups are only recoverable
//! from the position of each tag, and duplicate tags are legal.
//!
//! Unlike a session-layer message, no tag is special-cased or removed here:
//! BeginString, BodyLength and CheckSum stay in the sequence exactly where
//! they appeared in the input.

use serde::Serialize;

use crate::tag;

/// One `tag=value` field.
///
/// Values are kept as strings even when they look numeric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldPair {
    pub tag: u32,
    pub value: String,
}

impl FieldPair {
    #[inline(always)]
    pub fn new(tag: u32, value: impl Into<String>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }
}

/// An ordered tag/value sequence with lookup helpers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Message {
    pairs: Vec<FieldPair>,
}

impl Message {
    /// Wrap an already tokenized sequence.
    #[inline(always)]
    pub fn new(pairs: Vec<FieldPair>) -> Self {
        Self { pairs }
    }

    /// Tokenize `raw` (any supported encoding) into a message.
    pub fn parse(raw: &str) -> Self {
        Self::new(crate::tokenizer::tokenize(raw))
    }

    /// Append a field, returning `&mut self` for chaining.
    #[inline(always)]
    pub fn push(&mut self, tag: u32, value: &str) -> &mut Self {
        self.pairs.push(FieldPair::new(tag, value));
        self
    }

    #[inline(always)]
    pub fn pairs(&self) -> &[FieldPair] {
        &self.pairs
    }

    #[inline(always)]
    pub fn into_pairs(self) -> Vec<FieldPair> {
        self.pairs
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Value of the first occurrence of `tag`, or `None` if absent.
    #[inline(always)]
    pub fn get(&self, tag: u32) -> Option<&str> {
        first_value(&self.pairs, tag)
    }

    /// Parse the first occurrence of `tag` as a `u64`.
    #[inline(always)]
    pub fn get_u64(&self, tag: u32) -> Option<u64> {
        self.get(tag)?.parse().ok()
    }

    /// MsgType (tag 35), if present.
    #[inline(always)]
    pub fn msg_type(&self) -> Option<&str> {
        self.get(tag::MSG_TYPE)
    }

    /// BeginString (tag 8), if present.
    #[inline(always)]
    pub fn begin_string(&self) -> Option<&str> {
        self.get(tag::BEGIN_STRING)
    }
}

impl From<Vec<FieldPair>> for Message {
    fn from(pairs: Vec<FieldPair>) -> Self {
        Self::new(pairs)
    }
}

/// Value of the first pair carrying `tag`.
pub fn first_value(pairs: &[FieldPair], tag: u32) -> Option<&str> {
    pairs
        .iter()
        .find(|p| p.tag == tag)
        .map(|p| p.value.as_str())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag;

    #[test]
    fn test_push_and_get() {
        let mut msg = Message::default();
        msg.push(tag::BEGIN_STRING, "FIX.4.4")
            .push(tag::MSG_TYPE, "D")
            .push(tag::CL_ORD_ID, "ORDER1")
            .push(tag::SYMBOL, "BTCUSD");

        assert_eq!(msg.len(), 4);
        assert_eq!(msg.get(tag::CL_ORD_ID), Some("ORDER1"));
        assert_eq!(msg.begin_string(), Some("FIX.4.4"));
        assert_eq!(msg.msg_type(), Some("D"));
        assert_eq!(msg.get(tag::SYMBOL), Some("BTCUSD"));
    }

    #[test]
    fn test_get_returns_first_duplicate() {
        let mut msg = Message::default();
        msg.push(tag::TEXT, "first").push(tag::TEXT, "second");
        assert_eq!(msg.get(tag::TEXT), Some("first"));
        assert_eq!(msg.len(), 2);
    }

    #[test]
    fn test_get_missing_tag() {
        let msg = Message::default();
        assert!(msg.is_empty());
        assert_eq!(msg.get(tag::SYMBOL), None);
        assert_eq!(msg.msg_type(), None);
        assert_eq!(msg.get_u64(tag::BODY_LENGTH), None);
    }

    #[test]
    fn test_get_u64() {
        let mut msg = Message::default();
        msg.push(tag::BODY_LENGTH, "196").push(tag::CHECKSUM, "abc");
        assert_eq!(msg.get_u64(tag::BODY_LENGTH), Some(196));
        assert_eq!(msg.get_u64(tag::CHECKSUM), None);
    }

    #[test]
    fn test_numeric_looking_values_stay_strings() {
        let msg = Message::parse("8=FIX.4.4|38=0100|44=1.50");
        assert_eq!(msg.get(38), Some("0100"));
        assert_eq!(msg.get(44), Some("1.50"));
    }

    #[test]
    fn test_order_preserved() {
        let msg = Message::parse("8=FIX.4.4|35=D|11=A|55=X");
        let tags: Vec<u32> = msg.pairs().iter().map(|p| p.tag).collect();
        assert_eq!(tags, vec![8, 35, 11, 55]);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let msg = Message::new(vec![FieldPair::new(35, "D")]);
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"[{"tag":35,"value":"D"}]"#);
    }
}
