/*
    ALICE-FIX-Lens
    Copyright (C) 2026 Moroya Sakamoto
*/

//! Structural alignment of two structured messages.
//!
//! Both trees are first flattened into path-keyed entries. A path names
//! where a field sits: `453[1].448` is PartyID in the second Parties
//! instance. The two entry lists are then merged into one ordered list of
//! [`UnifiedEntry`] rows carrying the value from each side.
//!
//! ## Merge
//!
//! Two cursors walk the flattened lists. Equal paths are matched. Otherwise
//! each side's current path is looked up in the unconsumed rest of the other
//! side:
//!
//! | left path ahead in right | right path ahead in left | emit  |
//! |--------------------------|--------------------------|-------|
//! | no                       | no                       | left  |
//! | no                       | yes                      | left  |
//! | yes                      | no                       | right |
//! | yes (distance `da`)      | yes (distance `db`)      | right if `da < db`, else left |
//!
//! A path is emitted at most once. When a reordered path was already
//! emitted, the cursor that later reaches it moves on silently.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::group::Node;

/// One node of a flattened tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatEntry {
    /// Alignment key; unique within one flattened tree.
    pub path: String,
    pub tag: u32,
    /// Field value, or the declared count for a group header.
    pub value: String,
    pub depth: usize,
    pub is_group_header: bool,
}

/// How the two sides of a [`UnifiedEntry`] compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Same,
    Changed,
    LeftOnly,
    RightOnly,
}

/// One row of an alignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnifiedEntry {
    pub path: String,
    pub tag: u32,
    pub depth: usize,
    pub is_group_header: bool,
    /// `None` when the path does not exist in the left message.
    pub left: Option<String>,
    /// `None` when the path does not exist in the right message.
    pub right: Option<String>,
}

impl UnifiedEntry {
    pub fn status(&self) -> EntryStatus {
        match (&self.left, &self.right) {
            (Some(l), Some(r)) if l == r => EntryStatus::Same,
            (Some(_), Some(_)) => EntryStatus::Changed,
            (Some(_), None) => EntryStatus::LeftOnly,
            (None, _) => EntryStatus::RightOnly,
        }
    }

    /// True unless both sides are present and equal.
    #[inline(always)]
    pub fn is_changed(&self) -> bool {
        self.status() != EntryStatus::Same
    }
}

// ---------------------------------------------------------------------------
// Flattening
// ---------------------------------------------------------------------------

/// Flatten a structured message depth-first into path-keyed entries.
///
/// A repeated tag at one level gets `_2`, `_3`, … appended to its path.
pub fn flatten(nodes: &[Node]) -> Vec<FlatEntry> {
    let mut out = Vec::new();
    flatten_into(nodes, "", 0, &mut out);
    out
}

fn flatten_into(nodes: &[Node], prefix: &str, depth: usize, out: &mut Vec<FlatEntry>) {
    let mut seen: HashMap<u32, usize> = HashMap::new();

    for node in nodes {
        let occurrence = seen.entry(node.tag()).or_insert(0);
        *occurrence += 1;
        let path = match *occurrence {
            1 => format!("{prefix}{}", node.tag()),
            n => format!("{prefix}{}_{n}", node.tag()),
        };

        match node {
            Node::Leaf(pair) => out.push(FlatEntry {
                path,
                tag: pair.tag,
                value: pair.value.clone(),
                depth,
                is_group_header: false,
            }),
            Node::Group(group) => {
                out.push(FlatEntry {
                    path: path.clone(),
                    tag: group.tag,
                    value: group.count.clone(),
                    depth,
                    is_group_header: true,
                });
                for (index, instance) in group.instances.iter().enumerate() {
                    flatten_into(instance, &format!("{path}[{index}]."), depth + 1, out);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Align two structured messages into one ordered list of rows.
pub fn align(left: &[Node], right: &[Node]) -> Vec<UnifiedEntry> {
    align_flat(&flatten(left), &flatten(right))
}

/// Align two already flattened messages.
pub fn align_flat(left: &[FlatEntry], right: &[FlatEntry]) -> Vec<UnifiedEntry> {
    let left_by_path: HashMap<&str, &FlatEntry> =
        left.iter().map(|e| (e.path.as_str(), e)).collect();
    let right_by_path: HashMap<&str, &FlatEntry> =
        right.iter().map(|e| (e.path.as_str(), e)).collect();

    let mut emitted: HashSet<&str> = HashSet::new();
    let mut out = Vec::with_capacity(left.len().max(right.len()));
    let (mut i, mut j) = (0, 0);

    while i < left.len() || j < right.len() {
        let path = match (left.get(i), right.get(j)) {
            (Some(a), Some(b)) if a.path == b.path => {
                i += 1;
                j += 1;
                a.path.as_str()
            }
            (Some(a), Some(b)) => {
                let a_ahead = right[j..].iter().position(|e| e.path == a.path);
                let b_ahead = left[i..].iter().position(|e| e.path == b.path);
                let take_right = match (a_ahead, b_ahead) {
                    (None, _) => false,
                    (Some(_), None) => true,
                    // Ties keep the left side.
                    (Some(da), Some(db)) => da < db,
                };
                if take_right {
                    j += 1;
                    b.path.as_str()
                } else {
                    i += 1;
                    a.path.as_str()
                }
            }
            (Some(a), None) => {
                i += 1;
                a.path.as_str()
            }
            (None, Some(b)) => {
                j += 1;
                b.path.as_str()
            }
            (None, None) => break,
        };

        if !emitted.insert(path) {
            continue;
        }
        let l = left_by_path.get(path).copied();
        let r = right_by_path.get(path).copied();
        let Some(shape) = l.or(r) else {
            continue;
        };
        out.push(UnifiedEntry {
            path: path.to_string(),
            tag: shape.tag,
            depth: shape.depth,
            is_group_header: l.is_some_and(|e| e.is_group_header)
                || r.is_some_and(|e| e.is_group_header),
            left: l.map(|e| e.value.clone()),
            right: r.map(|e| e.value.clone()),
        });
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
