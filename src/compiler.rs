/*
    ALICE-FIX-Lens
    Copyright (C) 2026 Moroya Sakamoto
*/

//! QuickFIX XML dictionary compiler.
//!
//! Compiles a QuickFIX-style data dictionary (`FIX44.xml` and friends) into a
//! [`Dictionary`].
//!
//! ## Compile Flow
//!
//! 1. Every `<field number=".." name="..">` anywhere in the document adds a tag
//!    name and its `<value enum=".." description="..">` children. The
//!    resulting name index starts from the built-in tag names, so references
//!    that only carry a `name` still resolve for well-known fields.
//! 2. `<component>` definitions are indexed by name from the first
//!    `<components>` block only; `<component>` elements elsewhere are references.
//! 3. Each `<message msgtype="..">` is resolved into its group schemas. Each
//!    schema is also folded into the global fallback set, unioning field
//!    sets of groups that share a count tag.
//! 4. Without any message definitions, every `<group>` in the document is
//!    folded straight into the global set.
//!
//! Unknown elements are ignored. Unresolvable names, missing components and
//! reference cycles are logged and skipped. The only error is a source
//! that is not XML at all.

use std::collections::HashMap;
use std::ptr;

use thiserror::Error;
use xmltree::{Element, XMLNode};

use crate::dictionary::{fold_schema, Dictionary, GroupSchema, GroupSchemaSet, SchemaMap};
use crate::tag::DEFAULT_TAG_NAMES;
use crate::tokenizer::parse_tag_number;

/// Maximum nesting of groups and component references followed while
/// resolving one message.
pub const MAX_RESOLVE_DEPTH: usize = 64;

/// The dictionary source could not be compiled.
///
/// Callers should keep using their previous dictionary (or
/// [`Dictionary::builtin`]) when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaParseError {
    /// Blank input.
    #[error("empty dictionary source")]
    EmptySource,
    /// The source is not well-formed XML.
    #[error("malformed dictionary XML: {0}")]
    Malformed(String),
}

/// Field name to tag number, built while reading field definitions.
type NameIndex = HashMap<String, u32>;

/// Compile a QuickFIX XML dictionary.
///
/// Tag names and enums are merged over the built-in defaults: entries from
/// `source` add to or replace the defaults, nothing is removed.
pub fn compile(source: &str) -> Result<Dictionary, SchemaParseError> {
    if source.trim().is_empty() {
        return Err(SchemaParseError::EmptySource);
    }
    let root = Element::parse(source.as_bytes())
        .map_err(|e| SchemaParseError::Malformed(e.to_string()))?;

    let mut dict = Dictionary::builtin();
    let names = collect_fields(&root, &mut dict);
    let resolver = Resolver {
        names: &names,
        components: index_components(&root),
    };
    dict.group_schemas = resolver.group_schemas(&root);

    log::debug!(
        "compiler: {} tag names, {} enum tables, {} global group schemas",
        dict.tag_names.len(),
        dict.enums.len(),
        dict.group_schemas.global_len()
    );
    Ok(dict)
}

// ---------------------------------------------------------------------------
// XML helpers
// ---------------------------------------------------------------------------

#[inline(always)]
fn attr<'a>(element: &'a Element, name: &str) -> Option<&'a str> {
    element.attributes.get(name).map(String::as_str)
}

fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(XMLNode::as_element)
}

/// All elements named `name` in document order, `root` included.
fn descendants<'a>(root: &'a Element, name: &str) -> Vec<&'a Element> {
    fn walk<'a>(element: &'a Element, name: &str, out: &mut Vec<&'a Element>) {
        if element.name == name {
            out.push(element);
        }
        for child in child_elements(element) {
            walk(child, name, out);
        }
    }
    let mut out = Vec::new();
    walk(root, name, &mut out);
    out
}

fn first_descendant<'a>(root: &'a Element, name: &str) -> Option<&'a Element> {
    if root.name == name {
        return Some(root);
    }
    child_elements(root).find_map(|child| first_descendant(child, name))
}

/// Parse a `number` attribute; zero counts as absent.
fn number_attr(element: &Element) -> Option<u32> {
    let raw = attr(element, "number")?;
    parse_tag_number(raw.trim().as_bytes()).filter(|n| *n != 0)
}

// ---------------------------------------------------------------------------
// Fields and components
// ---------------------------------------------------------------------------

/// Record tag names and enums from every numbered field definition.
fn collect_fields(root: &Element, dict: &mut Dictionary) -> NameIndex {
    let mut names: NameIndex = DEFAULT_TAG_NAMES
        .iter()
        .map(|(tag, name)| ((*name).to_string(), *tag))
        .collect();

    for field in descendants(root, "field") {
        let (Some(number), Some(name)) = (number_attr(field), attr(field, "name")) else {
            continue;
        };
        dict.tag_names.insert(number, name.to_string());
        names.insert(name.to_string(), number);

        let values: Vec<&Element> = child_elements(field)
            .flat_map(|child| descendants(child, "value"))
            .collect();
        if values.is_empty() {
            continue;
        }
        let table = dict.enums.entry(number).or_default();
        for value in values {
            if let Some(code) = attr(value, "enum").filter(|c| !c.is_empty()) {
                let description = attr(value, "description").unwrap_or_default();
                table.insert(code.to_string(), description.to_string());
            }
        }
    }
    names
}

/// Component definitions from the first `<components>` block.
fn index_components(root: &Element) -> HashMap<&str, &Element> {
    let Some(block) = first_descendant(root, "components") else {
        return HashMap::new();
    };
    child_elements(block)
        .filter(|e| e.name == "component")
        .filter_map(|e| attr(e, "name").map(|name| (name, e)))
        .collect()
}

// ---------------------------------------------------------------------------
// Structure resolution
// ---------------------------------------------------------------------------

/// Fields declared by a container, in declaration order, plus every group
/// schema found at or below it.
#[derive(Debug, Default)]
struct Resolved {
    fields: Vec<u32>,
    groups: SchemaMap,
}

/// The chain of containers being resolved, innermost first.
///
/// Each recursive call links a new frame onto its own parent chain, so
/// sibling branches never see each other's visits.
struct Branch<'p, 'x> {
    node: &'x Element,
    parent: Option<&'p Branch<'p, 'x>>,
    depth: usize,
}

impl<'p, 'x> Branch<'p, 'x> {
    fn contains(&self, node: &Element) -> bool {
        let mut frame = Some(self);
        while let Some(f) = frame {
            if ptr::eq(f.node, node) {
                return true;
            }
            frame = f.parent;
        }
        false
    }
}

struct Resolver<'x, 'n> {
    names: &'n NameIndex,
    components: HashMap<&'x str, &'x Element>,
}

impl<'x, 'n> Resolver<'x, 'n> {
    /// Tag of a field or group reference: its `number`, else its `name`.
    fn tag_of(&self, element: &Element) -> Option<u32> {
        number_attr(element).or_else(|| {
            let name = attr(element, "name")?;
            self.names.get(name).copied().filter(|n| *n != 0)
        })
    }

    fn group_schemas(&self, root: &'x Element) -> GroupSchemaSet {
        let mut per_message_type: HashMap<String, SchemaMap> = HashMap::new();
        let mut global = SchemaMap::new();

        if let Some(messages) = first_descendant(root, "messages") {
            for message in child_elements(messages).filter(|e| e.name == "message") {
                let Some(msg_type) = attr(message, "msgtype").filter(|t| !t.is_empty()) else {
                    continue;
                };
                let groups = self.resolve(message, None).groups;
                for (tag, schema) in &groups {
                    fold_schema(&mut global, *tag, schema);
                }
                per_message_type.insert(msg_type.to_string(), groups);
            }
        }

        if per_message_type.is_empty() {
            log::debug!("compiler: no message definitions, scanning all groups");
            for group in descendants(root, "group") {
                let Some(tag) = self.tag_of(group) else {
                    continue;
                };
                let inner = self.resolve(group, None);
                if let Some(schema) = GroupSchema::from_declared(&inner.fields) {
                    fold_schema(&mut global, tag, &schema);
                }
                global.extend(inner.groups);
            }
        }

        GroupSchemaSet::ByMessageType {
            per_message_type,
            global,
        }
    }

    /// Resolve the immediate children of a message, group or component.
    fn resolve(&self, node: &'x Element, parent: Option<&Branch<'_, 'x>>) -> Resolved {
        let mut out = Resolved::default();

        if parent.is_some_and(|p| p.contains(node)) {
            log::warn!(
                "compiler: cycle through <{} name={:?}>, not expanding again",
                node.name,
                attr(node, "name")
            );
            return out;
        }
        let depth = parent.map_or(0, |p| p.depth + 1);
        if depth > MAX_RESOLVE_DEPTH {
            log::warn!("compiler: nesting deeper than {MAX_RESOLVE_DEPTH}, truncating");
            return out;
        }
        let branch = Branch {
            node,
            parent,
            depth,
        };

        for child in child_elements(node) {
            match child.name.as_str() {
                "field" => {
                    if let Some(tag) = self.tag_of(child) {
                        out.fields.push(tag);
                    }
                }
                "group" => {
                    let Some(tag) = self.tag_of(child) else {
                        continue;
                    };
                    out.fields.push(tag);
                    let inner = self.resolve(child, Some(&branch));
                    if let Some(schema) = GroupSchema::from_declared(&inner.fields) {
                        out.groups.insert(tag, schema);
                    }
                    out.groups.extend(inner.groups);
                }
                "component" => {
                    let name = attr(child, "name").unwrap_or_default();
                    match self.components.get(name).copied() {
                        Some(definition) => {
                            let inner = self.resolve(definition, Some(&branch));
                            out.fields.extend(inner.fields);
                            out.groups.extend(inner.groups);
                        }
                        None => log::warn!("compiler: component '{name}' referenced but not found"),
                    }
                }
                _ => {}
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag;

    const FIX44_SUBSET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<fix major="4" minor="4">
  <header>
    <field name="BeginString" required="Y"/>
    <field name="MsgType" required="Y"/>
  </header>
  <messages>
    <message name="NewOrderSingle" msgtype="D" msgcat="app">
      <field name="ClOrdID" required="Y"/>
      <component name="Parties" required="N"/>
      <field name="Symbol" required="Y"/>
    </message>
    <message name="ExecutionReport" msgtype="8" msgcat="app">
      <field name="OrderID" required="Y"/>
      <group name="NoPartyIDs" required="N">
        <field name="PartyID" required="N"/>
        <field name="PartyRole" required="N"/>
        <field name="PartyCapacity" required="N"/>
      </group>
    </message>
  </messages>
  <components>
    <component name="Parties">
      <group name="NoPartyIDs" required="N">
        <field name="PartyID" required="N"/>
        <field name="PartyIDSource" required="N"/>
        <field name="PartyRole" required="N"/>
        <component name="PtysSubGrp" required="N"/>
      </group>
    </component>
    <component name="PtysSubGrp">
      <group name="NoPartySubIDs" required="N">
        <field name="PartySubID" required="N"/>
        <field name="PartySubIDType" required="N"/>
      </group>
    </component>
  </components>
  <fields>
    <field number="54" name="Side" type="CHAR">
      <value enum="1" description="BUY"/>
      <value enum="9" description="CROSS"/>
    </field>
    <field number="55" name="Ticker" type="STRING"/>
    <field number="20000" name="PartyCapacity" type="INT">
      <value enum="A" description="AGENCY"/>
    </field>
  </fields>
</fix>"#;

    fn global(dict: &Dictionary) -> &SchemaMap {
        dict.schemas_for(None)
    }

    fn fields(schema: &GroupSchema) -> Vec<u32> {
        schema.fields.iter().copied().collect()
    }

    #[test]
    fn test_compile_tag_names_merge_with_defaults() {
        let dict = compile(FIX44_SUBSET).expect("should compile");
        assert_eq!(dict.tag_name(tag::SYMBOL), "Ticker");
        assert_eq!(dict.tag_name(20000), "PartyCapacity");
        // Defaults survive.
        assert_eq!(dict.tag_name(tag::MSG_TYPE), "MsgType");
    }

    #[test]
    fn test_compile_enums_union_with_defaults() {
        let dict = compile(FIX44_SUBSET).unwrap();
        assert_eq!(dict.describe_value(tag::SIDE, "1").description, Some("BUY"));
        assert_eq!(dict.describe_value(tag::SIDE, "9").description, Some("CROSS"));
        assert_eq!(
            dict.describe_value(tag::SIDE, "2").description,
            Some("Sell")
        );
        assert_eq!(dict.describe_value(20000, "A").description, Some("AGENCY"));
    }

    #[test]
    fn test_compile_per_message_type_with_nested_component_group() {
        let dict = compile(FIX44_SUBSET).unwrap();
        let d = dict.schemas_for(Some("D"));

        let parties = &d[&tag::NO_PARTY_IDS];
        assert_eq!(parties.delimiter, tag::PARTY_ID);
        assert_eq!(fields(parties), vec![447, 448, 452, 802]);

        let subs = &d[&tag::NO_PARTY_SUB_IDS];
        assert_eq!(subs.delimiter, tag::PARTY_SUB_ID);
        assert_eq!(fields(subs), vec![523, 803]);
    }

    #[test]
    fn test_compile_global_unions_across_message_types() {
        let dict = compile(FIX44_SUBSET).unwrap();

        let exec = &dict.schemas_for(Some("8"))[&tag::NO_PARTY_IDS];
        assert_eq!(fields(exec), vec![448, 452, 20000]);

        let merged = &global(&dict)[&tag::NO_PARTY_IDS];
        assert_eq!(merged.delimiter, tag::PARTY_ID);
        assert_eq!(fields(merged), vec![447, 448, 452, 802, 20000]);
        assert!(global(&dict).contains_key(&tag::NO_PARTY_SUB_IDS));
    }

    #[test]
    fn test_compile_unknown_message_type_falls_back_to_global() {
        let dict = compile(FIX44_SUBSET).unwrap();
        assert_eq!(dict.schemas_for(Some("Z")), global(&dict));
    }

    #[test]
    fn test_compile_without_messages_scans_groups() {
        let xml = r#"<fix>
          <components>
            <component name="Legs">
              <group name="NoLegs" number="555">
                <field name="LegSymbol" number="600"/>
                <field name="LegSide" number="624"/>
              </group>
            </component>
          </components>
        </fix>"#;
        let dict = compile(xml).unwrap();
        match &dict.group_schemas {
            GroupSchemaSet::ByMessageType {
                per_message_type,
                global,
            } => {
                assert!(per_message_type.is_empty());
                assert_eq!(global[&555].delimiter, 600);
                assert_eq!(fields(&global[&555]), vec![600, 624]);
            }
            other => panic!("unexpected schema set {other:?}"),
        }
    }

    #[test]
    fn test_compile_self_referencing_component_terminates() {
        let xml = r#"<fix>
          <messages>
            <message name="Loopy" msgtype="U1">
              <group name="NoLoops" number="9000">
                <field name="LoopID" number="9001"/>
                <component name="Loop"/>
              </group>
            </message>
          </messages>
          <components>
            <component name="Loop">
              <field name="LoopVal" number="9002"/>
              <component name="Loop"/>
            </component>
          </components>
        </fix>"#;
        let dict = compile(xml).unwrap();
        let schema = &dict.schemas_for(Some("U1"))[&9000];
        assert_eq!(schema.delimiter, 9001);
        assert_eq!(fields(schema), vec![9001, 9002]);
    }

    #[test]
    fn test_compile_mutual_component_cycle_terminates() {
        let xml = r#"<fix>
          <messages>
            <message name="Ping" msgtype="U2">
              <group name="NoPings" number="9100">
                <component name="A"/>
              </group>
            </message>
          </messages>
          <components>
            <component name="A">
              <field name="AField" number="9101"/>
              <component name="B"/>
            </component>
            <component name="B">
              <field name="BField" number="9102"/>
              <component name="A"/>
            </component>
          </components>
        </fix>"#;
        let dict = compile(xml).unwrap();
        let schema = &dict.schemas_for(Some("U2"))[&9100];
        assert_eq!(schema.delimiter, 9101);
        assert_eq!(fields(schema), vec![9101, 9102]);
    }

    #[test]
    fn test_compile_diamond_component_resolved_on_both_paths() {
        let xml = r#"<fix>
          <messages>
            <message name="Diamond" msgtype="U3">
              <group name="NoLeft" number="7100">
                <field name="LeftID" number="7101"/>
                <component name="Left"/>
              </group>
              <group name="NoRight" number="7200">
                <field name="RightID" number="7201"/>
                <component name="Right"/>
              </group>
            </message>
          </messages>
          <components>
            <component name="Left"><component name="Shared"/></component>
            <component name="Right"><component name="Shared"/></component>
            <component name="Shared">
              <field name="SharedA" number="7001"/>
              <field name="SharedB" number="7002"/>
            </component>
          </components>
        </fix>"#;
        let dict = compile(xml).unwrap();
        let schemas = dict.schemas_for(Some("U3"));
        assert_eq!(fields(&schemas[&7100]), vec![7001, 7002, 7101]);
        assert_eq!(fields(&schemas[&7200]), vec![7001, 7002, 7201]);
    }

    #[test]
    fn test_compile_missing_component_and_unknown_names_skipped() {
        let xml = r#"<fix>
          <messages>
            <message name="Sparse" msgtype="U4">
              <group name="NoThings" number="9300">
                <field name="NeverDefined"/>
                <field name="Symbol"/>
                <component name="Nowhere"/>
              </group>
              <widget name="ignored"/>
            </message>
          </messages>
        </fix>"#;
        let dict = compile(xml).unwrap();
        let schema = &dict.schemas_for(Some("U4"))[&9300];
        assert_eq!(schema.delimiter, tag::SYMBOL);
        assert_eq!(fields(schema), vec![tag::SYMBOL]);
    }

    #[test]
    fn test_compile_empty_group_has_no_schema() {
        let xml = r#"<fix><messages>
            <message name="Hollow" msgtype="U5">
              <group name="NoNothing" number="9400"/>
            </message>
        </messages></fix>"#;
        let dict = compile(xml).unwrap();
        assert!(dict.schemas_for(Some("U5")).is_empty());
    }

    #[test]
    fn test_compile_rejects_malformed_xml() {
        let result = compile("<fix><messages></fix>");
        assert!(matches!(result, Err(SchemaParseError::Malformed(_))));
        assert!(matches!(
            compile("8=FIX.4.4|35=D"),
            Err(SchemaParseError::Malformed(_))
        ));
    }

    #[test]
    fn test_compile_rejects_empty_source() {
        assert_eq!(compile("  \n"), Err(SchemaParseError::EmptySource));
    }

    #[test]
    fn test_compile_does_not_touch_previous_dictionary() {
        let first = compile(FIX44_SUBSET).unwrap();
        let snapshot = first.clone();
        let _second = compile(r#"<fix><fields><field number="55" name="Other"/></fields></fix>"#)
            .unwrap();
        assert_eq!(first, snapshot);
        assert_eq!(first.tag_name(tag::SYMBOL), "Ticker");
    }
}
