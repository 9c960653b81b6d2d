/*
    ALICE-FIX-Lens
    Copyright (C) 2026 Moroya Sakamoto
*/

//! Repeating-group reconstruction.
//!
//! FIX carries repeating groups as a flat run of fields: a count field
//! (`453=2`) followed by that many instances, each opened by the group's
//! delimiter tag. [`structure`] rebuilds the tree from the flat sequence
//! using the [`GroupSchema`]s of a [`Dictionary`].
//!
//! ## Leniency
//!
//! Real captures are often truncated or non-conforming, so nothing here
//! fails:
//!
//! - an instance that does not start with the delimiter ends the group, even
//!   when fewer than `count` instances were read;
//! - a tag outside the group's field set ends the current instance and is
//!   handed back to the enclosing level;
//! - a non-numeric count reads as zero instances.
//!
//! Every input pair ends up somewhere in the output tree, in input order.

use serde::Serialize;

use crate::dictionary::{Dictionary, GroupSchema, SchemaMap};
use crate::message::{first_value, FieldPair};
use crate::tag;

/// Maximum group nesting followed before the remainder is kept flat.
pub const MAX_NESTING_DEPTH: usize = 64;

/// One element of a structured message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// A plain field.
    Leaf(FieldPair),
    /// A repeating group: its count field plus the instances that followed.
    Group(GroupNode),
}

impl Node {
    #[inline(always)]
    pub fn tag(&self) -> u32 {
        match self {
            Node::Leaf(pair) => pair.tag,
            Node::Group(group) => group.tag,
        }
    }

    /// Value of the field, or the declared count for a group.
    #[inline(always)]
    pub fn value(&self) -> &str {
        match self {
            Node::Leaf(pair) => &pair.value,
            Node::Group(group) => &group.count,
        }
    }
}

/// A repeating group.
///
/// `instances.len()` normally equals the declared count, but is smaller
/// when the data stopped conforming to the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupNode {
    /// The count tag (e.g. 453 NoPartyIDs).
    pub tag: u32,
    /// The count value exactly as it appeared on the wire.
    pub count: String,
    pub instances: Vec<Vec<Node>>,
}

impl GroupNode {
    /// Count as declared on the wire, read leniently.
    pub fn declared_count(&self) -> usize {
        parse_count(&self.count)
    }

    /// Whether fewer instances were found than were declared.
    pub fn is_truncated(&self) -> bool {
        self.instances.len() < self.declared_count()
    }
}

/// Structure `pairs` using the schemas that `dict` holds for its MsgType.
///
/// The message type comes from the first tag 35 in `pairs`; without one, or
/// without a schema for it, the dictionary's global schemas apply.
pub fn structure(pairs: &[FieldPair], dict: &Dictionary) -> Vec<Node> {
    let schemas = dict.schemas_for(first_value(pairs, tag::MSG_TYPE));
    structure_with(pairs, schemas)
}

/// Structure `pairs` against an already selected schema map.
pub fn structure_with(pairs: &[FieldPair], schemas: &SchemaMap) -> Vec<Node> {
    build(pairs, schemas, 0)
}

fn build(pairs: &[FieldPair], schemas: &SchemaMap, depth: usize) -> Vec<Node> {
    if depth > MAX_NESTING_DEPTH {
        log::warn!("group: nesting deeper than {MAX_NESTING_DEPTH}, keeping fields flat");
        return pairs.iter().cloned().map(Node::Leaf).collect();
    }

    let mut out = Vec::new();
    let mut i = 0;

    while i < pairs.len() {
        let pair = &pairs[i];
        let Some(schema) = schemas.get(&pair.tag) else {
            out.push(Node::Leaf(pair.clone()));
            i += 1;
            continue;
        };

        let count = parse_count(&pair.value);
        i += 1;

        let mut instances = Vec::new();
        while i < pairs.len() && instances.len() < count {
            if pairs[i].tag != schema.delimiter {
                log::warn!(
                    "group: {} break: expected delimiter {}, found {}",
                    pair.tag,
                    schema.delimiter,
                    pairs[i].tag
                );
                break;
            }
            let start = i;
            i = instance_end(pairs, i, schema, schemas, depth);
            instances.push(build(&pairs[start..i], schemas, depth + 1));
        }

        out.push(Node::Group(GroupNode {
            tag: pair.tag,
            count: pair.value.clone(),
            instances,
        }));
    }
    out
}

/// Index one past the instance whose delimiter sits at `start`.
///
/// A delimiter that is itself a nested count tag brings its whole group
/// along before the rest of the body is read.
fn instance_end(
    pairs: &[FieldPair],
    start: usize,
    schema: &GroupSchema,
    schemas: &SchemaMap,
    depth: usize,
) -> usize {
    let mut i = start + 1;
    if let Some(nested) = schemas.get(&schema.delimiter) {
        i = skip_group(pairs, i, nested, schemas, depth + 1);
    }
    body_end(pairs, i, schema, schemas, depth)
}

/// Index one past the body of the instance whose delimiter precedes `i`.
///
/// Nested groups are skipped whole so their fields never end the
/// enclosing instance early.
fn body_end(
    pairs: &[FieldPair],
    mut i: usize,
    schema: &GroupSchema,
    schemas: &SchemaMap,
    depth: usize,
) -> usize {
    while i < pairs.len() {
        let tag = pairs[i].tag;
        if tag == schema.delimiter || !schema.contains(tag) {
            break;
        }
        i += 1;
        if let Some(nested) = schemas.get(&tag) {
            i = skip_group(pairs, i, nested, schemas, depth + 1);
        }
    }
    i
}

/// Advance past every instance of the group whose count field is at
/// `start - 1`.
fn skip_group(
    pairs: &[FieldPair],
    start: usize,
    schema: &GroupSchema,
    schemas: &SchemaMap,
    depth: usize,
) -> usize {
    if depth > MAX_NESTING_DEPTH {
        log::warn!("group: nesting deeper than {MAX_NESTING_DEPTH}, not skipping");
        return start;
    }
    let count = parse_count(&pairs[start - 1].value);

    let mut i = start;
    let mut seen = 0;
    while i < pairs.len() && seen < count {
        if pairs[i].tag != schema.delimiter {
            break;
        }
        i = instance_end(pairs, i, schema, schemas, depth);
        seen += 1;
    }
    i
}

/// Read a group count the way FIX tooling does: an optional `+`, then
/// leading digits only. Anything else is zero.
fn parse_count(value: &str) -> usize {
    let digits: &str = {
        let s = value.trim_start();
        let s = s.strip_prefix('+').unwrap_or(s);
        let end = s
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(s.len());
        &s[..end]
    };
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(usize::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
