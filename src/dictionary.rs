/*
    ALICE-FIX-Lens
    Copyright (C) 2026 Moroya Sakamoto
*/

//! Compiled FIX dictionary.
//!
//! A [`Dictionary`] maps tags to names, enumerated values to descriptions,
//! and group count tags to the [`GroupSchema`] that describes one instance of
//! the repeating group. It is produced by [`crate::compiler::compile`] (or
//! [`Dictionary::builtin`]) and is read-only afterwards, so a single value can
//! be shared across threads behind an `Arc`.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::tag::{DEFAULT_ENUMS, DEFAULT_TAG_NAMES};

/// Group schemas keyed by the group's count tag.
pub type SchemaMap = HashMap<u32, GroupSchema>;

/// Structure of one repeating group instance.
///
/// Invariant: `delimiter` is always a member of `fields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSchema {
    /// Tag that opens every instance (first field declared in the group).
    pub delimiter: u32,
    /// Tags allowed inside one instance, nested count tags included.
    pub fields: BTreeSet<u32>,
}

impl GroupSchema {
    /// Build a schema from the group's declared field order.
    ///
    /// Returns `None` for an empty declaration, which cannot delimit
    /// instances.
    pub fn from_declared(fields: &[u32]) -> Option<Self> {
        let delimiter = *fields.first()?;
        Some(Self {
            delimiter,
            fields: fields.iter().copied().collect(),
        })
    }

    #[inline(always)]
    pub fn contains(&self, tag: u32) -> bool {
        self.fields.contains(&tag)
    }

    /// Union `other`'s fields into this schema, keeping this delimiter.
    pub fn merge(&mut self, other: &GroupSchema) {
        self.fields.extend(other.fields.iter().copied());
    }
}

/// Group schemas, either flat or keyed by MsgType with a global fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupSchemaSet {
    Flat(SchemaMap),
    ByMessageType {
        per_message_type: HashMap<String, SchemaMap>,
        /// Union of every per-type schema, by group tag.
        global: SchemaMap,
    },
}

impl Default for GroupSchemaSet {
    fn default() -> Self {
        GroupSchemaSet::Flat(SchemaMap::new())
    }
}

impl GroupSchemaSet {
    /// Pick the schemas that apply to a message of type `msg_type`.
    ///
    /// A type with its own entry uses it; anything else uses the global
    /// union. A flat set is returned as-is.
    pub fn select(&self, msg_type: Option<&str>) -> &SchemaMap {
        match self {
            GroupSchemaSet::Flat(map) => map,
            GroupSchemaSet::ByMessageType {
                per_message_type,
                global,
            } => match msg_type.and_then(|t| per_message_type.get(t)) {
                Some(map) => {
                    log::debug!("dictionary: schema for MsgType {msg_type:?}");
                    map
                }
                None => global,
            },
        }
    }

    /// Number of distinct group schemas in the fallback map.
    pub fn global_len(&self) -> usize {
        match self {
            GroupSchemaSet::Flat(map) => map.len(),
            GroupSchemaSet::ByMessageType { global, .. } => global.len(),
        }
    }
}

/// Merge `schema` into `map` under `tag`, unioning field sets on collision.
pub(crate) fn fold_schema(map: &mut SchemaMap, tag: u32, schema: &GroupSchema) {
    match map.get_mut(&tag) {
        Some(existing) => existing.merge(schema),
        None => {
            map.insert(tag, schema.clone());
        }
    }
}

/// Human-readable value: the raw value plus its enum description, if known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanValue<'a> {
    pub value: &'a str,
    pub description: Option<&'a str>,
}

/// Tag names, enum descriptions and group schemas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dictionary {
    pub tag_names: HashMap<u32, String>,
    pub enums: HashMap<u32, HashMap<String, String>>,
    pub group_schemas: GroupSchemaSet,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Dictionary {
    /// Dictionary with the default tag names and enums and no group schemas.
    pub fn builtin() -> Self {
        let tag_names = DEFAULT_TAG_NAMES
            .iter()
            .map(|(tag, name)| (*tag, (*name).to_string()))
            .collect();
        let enums = DEFAULT_ENUMS
            .iter()
            .map(|(tag, values)| {
                let values = values
                    .iter()
                    .map(|(v, d)| ((*v).to_string(), (*d).to_string()))
                    .collect();
                (*tag, values)
            })
            .collect();
        Self {
            tag_names,
            enums,
            group_schemas: GroupSchemaSet::default(),
        }
    }

    /// Name of `tag`, or its decimal form when unknown.
    pub fn tag_name(&self, tag: u32) -> String {
        self.tag_names
            .get(&tag)
            .cloned()
            .unwrap_or_else(|| tag.to_string())
    }

    /// Pair `value` with its enum description for `tag`, if one exists.
    pub fn describe_value<'a>(&'a self, tag: u32, value: &'a str) -> HumanValue<'a> {
        let description = self
            .enums
            .get(&tag)
            .and_then(|values| values.get(value))
            .map(String::as_str);
        HumanValue { value, description }
    }

    /// Group schemas that apply to a message of type `msg_type`.
    #[inline(always)]
    pub fn schemas_for(&self, msg_type: Option<&str>) -> &SchemaMap {
        self.group_schemas.select(msg_type)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
