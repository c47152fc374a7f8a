use crate::errors::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// The section names that collect bare lines instead of key/value pairs.
pub const DEFAULT_LIST_SECTIONS: &[&str] = &["extensions", "ignore", "include"];

/// The reserved section holding the token -> replacement mapping.
pub const TOKENS_SECTION: &str = "tokens";

/// A single configuration section's key/value pairs.
pub type SectionMap = BTreeMap<String, String>;

/// The parsed contents of a sync configuration file.
///
/// `sections` maps each section name to its key/value pairs; `lists` maps
/// each reserved list section to the bare lines it accumulated. Both use
/// `BTreeMap` so iteration (and thus token application order and the verbose
/// JSON dump) is deterministic.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SyncConfig {
    /// Section name -> (key -> value). Last write wins on duplicate keys.
    pub sections: BTreeMap<String, SectionMap>,
    /// List section name -> ordered raw lines.
    pub lists: BTreeMap<String, Vec<String>>,
}

impl SyncConfig {
    /// The trivial configuration: a single empty-string section and no lists.
    ///
    /// Used when no configuration path was supplied, and as the fallback when
    /// the configured path cannot be read.
    pub fn trivial() -> Self {
        let mut sections = BTreeMap::new();
        sections.insert(String::new(), SectionMap::new());
        Self {
            sections,
            lists: BTreeMap::new(),
        }
    }

    /// The token -> replacement mapping, if a `[tokens]` section was present.
    pub fn tokens(&self) -> Option<&SectionMap> {
        self.sections.get(TOKENS_SECTION)
    }

    /// The accepted file extensions (dotted, e.g. `.py`). Empty means all.
    pub fn extensions(&self) -> &[String] {
        self.lists.get("extensions").map(Vec::as_slice).unwrap_or(&[])
    }

    /// File and directory names excluded from selection.
    pub fn ignored(&self) -> &[String] {
        self.lists.get("ignore").map(Vec::as_slice).unwrap_or(&[])
    }

    /// The explicit include list. `Some` (even when empty) fully replaces
    /// directory traversal.
    pub fn includes(&self) -> Option<&Vec<String>> {
        self.lists.get("include")
    }
}

/// Parser for the line-oriented sync configuration format.
///
/// The format has no comments, quoting, or escaping. A trimmed `[name]` line
/// starts a section; a line containing `=` is split on the first `=` into a
/// trimmed key/value pair; any other non-empty line is a list entry when the
/// current section is one of the reserved list sections, and is ignored
/// otherwise. Lines before the first header belong to the empty-string
/// section.
///
/// When `invert` is set, key/value pairs are stored value-first, which turns
/// a sync mapping into its unsync counterpart. List sections are exempt: their
/// occasional `=` lines are singleton data, not reversible pairs.
pub struct ConfigParser {
    invert: bool,
    list_sections: Vec<String>,
}

impl ConfigParser {
    /// Creates a parser using the standard reserved list sections.
    pub fn new(invert: bool) -> Self {
        Self::with_list_sections(invert, DEFAULT_LIST_SECTIONS)
    }

    /// Creates a parser with a custom set of reserved list-section names.
    pub fn with_list_sections(invert: bool, list_sections: &[&str]) -> Self {
        Self {
            invert,
            list_sections: list_sections.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Parses the configuration at `path`.
    ///
    /// `None` yields the trivial configuration. A path that cannot be opened
    /// is an error; the caller decides whether to absorb it.
    pub fn parse(&self, path: Option<&Path>) -> Result<SyncConfig> {
        let Some(path) = path else {
            return Ok(SyncConfig::trivial());
        };
        let file = File::open(path)?;
        self.parse_reader(BufReader::new(file))
    }

    /// Parses configuration lines from any buffered reader.
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<SyncConfig> {
        let mut config = SyncConfig::trivial();
        let mut current = String::new();

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();

            if trimmed.len() >= 2 && trimmed.starts_with('[') && trimmed.ends_with(']') {
                current = trimmed[1..trimmed.len() - 1].trim().to_string();
                if self.is_list_section(&current) {
                    config.lists.entry(current.clone()).or_default();
                } else {
                    // A repeated header discards the section's prior pairs.
                    config.sections.insert(current.clone(), SectionMap::new());
                }
            } else if let Some((left, right)) = line.split_once('=') {
                let key = left.trim().to_string();
                let value = right.trim().to_string();
                let section = config.sections.entry(current.clone()).or_default();
                if self.is_list_section(&current) || !self.invert {
                    section.insert(key, value);
                } else {
                    section.insert(value, key);
                }
            } else if !line.is_empty() && self.is_list_section(&current) {
                config.lists.entry(current.clone()).or_default().push(line);
            }
        }

        Ok(config)
    }

    fn is_list_section(&self, name: &str) -> bool {
        self.list_sections.iter().any(|s| s == name)
    }
}
