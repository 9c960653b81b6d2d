/*
    ALICE-FIX-Lens
    Copyright (C) 2026 Moroya Sakamoto
*/

//! Dictionary selection and reload.
//!
//! [`DictionaryStore`] owns every compiled dictionary a front end can switch
//! between and decides which one applies to a given message.
//!
//! ## Resolution Order
//!
//! ```text
//! custom dictionary loaded?         → custom
//! Manual(version) and registered?   → that version
//! Auto and BeginString registered?  → that version
//! otherwise                         → built-in defaults
//! ```
//!
//! Dictionaries are handed out as `Arc<Dictionary>` and never mutated. A
//! reload compiles a fresh value and swaps the pointer, so readers holding
//! the previous dictionary are unaffected.

use std::collections::HashMap;
use std::sync::Arc;

use crate::compiler::{compile, SchemaParseError};
use crate::dictionary::Dictionary;
use crate::message::{first_value, FieldPair};
use crate::tag;

/// How the store picks among its standard dictionaries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Follow each message's BeginString (tag 8).
    #[default]
    Auto,
    /// Always use the named version (e.g. `FIX44`).
    Manual(String),
}

/// Registry of compiled dictionaries plus the active selection.
#[derive(Debug, Clone)]
pub struct DictionaryStore {
    builtin: Arc<Dictionary>,
    standard: HashMap<String, Arc<Dictionary>>,
    custom: Option<(String, Arc<Dictionary>)>,
    selection: Selection,
}

impl Default for DictionaryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryStore {
    /// Empty store in [`Selection::Auto`] with only the built-in dictionary.
    pub fn new() -> Self {
        Self {
            builtin: Arc::new(Dictionary::builtin()),
            standard: HashMap::new(),
            custom: None,
            selection: Selection::Auto,
        }
    }

    #[inline(always)]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn select(&mut self, selection: Selection) {
        self.selection = match selection {
            Selection::Manual(version) => Selection::Manual(version_key(&version)),
            Selection::Auto => Selection::Auto,
        };
    }

    /// Compile and register a standard dictionary under `version`.
    ///
    /// `version` may be given as a key (`FIX44`) or a BeginString
    /// (`FIX.4.4`). On error the store is left unchanged.
    pub fn register(
        &mut self,
        version: &str,
        source: &str,
    ) -> Result<Arc<Dictionary>, SchemaParseError> {
        let dict = Arc::new(compile(source)?);
        let key = version_key(version);
        log::debug!("store: registered {key}");
        self.standard.insert(key, Arc::clone(&dict));
        Ok(dict)
    }

    /// Compile `source` and make it override every standard dictionary.
    ///
    /// On error the previously active dictionary stays in effect and the
    /// error is returned.
    pub fn load_custom(
        &mut self,
        name: &str,
        source: &str,
    ) -> Result<Arc<Dictionary>, SchemaParseError> {
        match compile(source) {
            Ok(dict) => {
                let dict = Arc::new(dict);
                self.custom = Some((name.to_string(), Arc::clone(&dict)));
                Ok(dict)
            }
            Err(e) => {
                log::warn!("store: keeping previous dictionary, '{name}' rejected: {e}");
                Err(e)
            }
        }
    }

    /// Drop the custom dictionary, falling back to the selection.
    pub fn clear_custom(&mut self) {
        self.custom = None;
    }

    pub fn custom_name(&self) -> Option<&str> {
        self.custom.as_ref().map(|(name, _)| name.as_str())
    }

    #[inline(always)]
    pub fn is_registered(&self, version: &str) -> bool {
        self.standard.contains_key(&version_key(version))
    }

    /// Dictionary in effect without looking at any message.
    pub fn active(&self) -> Arc<Dictionary> {
        self.pick(None)
    }

    /// Dictionary to use for the message `pairs`.
    pub fn resolve(&self, pairs: &[FieldPair]) -> Arc<Dictionary> {
        self.pick(first_value(pairs, tag::BEGIN_STRING))
    }

    fn pick(&self, begin_string: Option<&str>) -> Arc<Dictionary> {
        if let Some((_, dict)) = &self.custom {
            return Arc::clone(dict);
        }
        let key = match &self.selection {
            Selection::Manual(version) => Some(version.clone()),
            Selection::Auto => begin_string.map(version_key),
        };
        match key.as_deref().and_then(|k| self.standard.get(k)) {
            Some(dict) => Arc::clone(dict),
            None => {
                if let Some(k) = &key {
                    log::debug!("store: no dictionary for {k}, using built-in");
                }
                Arc::clone(&self.builtin)
            }
        }
    }
}

/// Registry key for a version or BeginString: `FIX.4.4` → `FIX44`.
pub fn version_key(begin_string: &str) -> String {
    begin_string
        .trim()
        .chars()
        .filter(|c| *c != '.')
        .collect::<String>()
        .to_ascii_uppercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
