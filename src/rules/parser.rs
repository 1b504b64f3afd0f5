use crate::error::{AntError, Result};
use crate::lattice::Lattice;
use crate::rules::table::{RuleSpec, RuleTable};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Contents of a rule file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    lattice: Option<Lattice>,
    steps: Option<u64>,
    #[serde(default)]
    rule: Vec<RuleSpec>,
}

/// A loaded rule set plus the run settings that travel with it
#[derive(Clone, Debug)]
pub struct RuleSet {
    pub table: RuleTable,
    pub lattice: Option<Lattice>,
    pub steps: Option<u64>,
}

/// Parse a rule set from a TOML file path
pub fn parse_rules(path: impl AsRef<Path>) -> Result<RuleSet> {
    let src = fs::read_to_string(path)?;
    parse_rules_from_str(&src)
}

/// Parse a rule set from in-memory TOML
pub fn parse_rules_from_str(src: &str) -> Result<RuleSet> {
    let file: RuleFile = toml::from_str(src)?;
    Ok(RuleSet {
        table: RuleTable::new(&file.rule)?,
        lattice: file.lattice,
        steps: file.steps,
    })
}

/// Parse a compact rule string such as `white:black:r,black:white:l:2`.
///
/// Each comma-separated entry is `on:next:rotation[:steps]`.
pub fn parse_compact(src: &str) -> Result<RuleTable> {
    let mut specs = Vec::new();
    for entry in src.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let parts: Vec<&str> = entry.split(':').collect();
        let steps = match parts.as_slice() {
            [_, _, _] => 1,
            [_, _, _, steps] => steps.parse().map_err(|_| {
                AntError::InvalidRuleTable(format!("bad step count in {:?}", entry))
            })?,
            _ => {
                return Err(AntError::InvalidRuleTable(format!(
                    "expected on:next:rotation[:steps], got {:?}",
                    entry
                )))
            }
        };
        specs.push(RuleSpec::new(parts[0], parts[1], parts[2], steps));
    }
    RuleTable::new(&specs)
}

/// Named rule sets
pub mod presets {
    use super::*;

    pub const NAMES: [&str; 4] = ["langton", "llrr", "lrrl", "hex-default"];

    /// Look up a preset by name
    pub fn by_name(name: &str) -> Result<RuleTable> {
        let src = match name {
            "langton" => "white:black:r,black:white:l",
            "llrr" => "white:red:l,red:green:l,green:blue:r,blue:white:r",
            "lrrl" => "white:red:l,red:green:r,green:blue:r,blue:white:l",
            "hex-default" => "white:black:l2,black:red:r,red:white:u",
            _ => {
                return Err(AntError::InvalidRuleTable(format!(
                    "unknown preset {:?} (expected one of {})",
                    name,
                    NAMES.join(", ")
                )))
            }
        };
        parse_compact(src)
    }
}
