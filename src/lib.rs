/*
    ALICE-FIX-Lens
    Copyright (C) 2026 Moroya Sakamoto
*/

//! # ALICE-FIX-Lens
//!
//! FIX message inspection for the ALICE financial system. It tokenizes
//! messages in any common textual encoding, compiles QuickFIX XML
//! dictionaries, rebuilds repeating groups, and aligns two messages
//! field by field.
//!
//! ## Modules
//!
//! - [`tag`]        — Well-known tag constants and the built-in name/enum tables
//! - [`message`]    — [`FieldPair`] and the ordered [`Message`] sequence
//! - [`tokenizer`]  — Format-detecting tokenizer (SOH, pipe, `^A`, bracketed, columnar)
//! - [`dictionary`] — [`Dictionary`] and [`GroupSchema`] lookup tables
//! - [`compiler`]   — QuickFIX XML → [`Dictionary`]
//! - [`group`]      — Flat pairs → [`Node`] tree of repeating groups
//! - [`align`]      — Path-keyed structural diff of two trees
//! - [`format`]     — Pipe / SOH rendering of pair lists
//! - [`store`]      — Dictionary selection, auto-detection and reload
//!
//! ## Example
//!
//! ```rust
//! use alice_fix_lens::{align, compiler, group, tokenizer};
//!
//! let dict = compiler::compile(r#"<fix><messages>
//!     <message name="NewOrderSingle" msgtype="D">
//!       <group name="NoPartyIDs" number="453">
//!         <field name="PartyID" number="448"/>
//!         <field name="PartyRole" number="452"/>
//!       </group>
//!     </message>
//! </messages></fix>"#).unwrap();
//!
//! let left = tokenizer::tokenize("35=D|453=1|448=BANKA|452=1");
//! let right = tokenizer::tokenize("35=D|453=1|448=BANKB|452=1");
//!
//! let rows = align::align(
//!     &group::structure(&left, &dict),
//!     &group::structure(&right, &dict),
//! );
//! let changed: Vec<_> = rows.iter().filter(|r| r.is_changed()).collect();
//! assert_eq!(changed.len(), 1);
//! assert_eq!(changed[0].path, "453[0].448");
//! ```

pub mod align;
pub mod compiler;
pub mod dictionary;
pub mod format;
pub mod group;
pub mod message;
pub mod store;
pub mod tag;
pub mod tokenizer;

// Re-export the most commonly used types at the crate root.
pub use align::{align, EntryStatus, FlatEntry, UnifiedEntry};
pub use compiler::{compile, SchemaParseError};
pub use dictionary::{Dictionary, GroupSchema, GroupSchemaSet};
pub use group::{structure, GroupNode, Node};
pub use message::{FieldPair, Message};
pub use store::{DictionaryStore, Selection};
pub use tokenizer::tokenize;

/// ALICE-FIX-Lens crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
