pub mod generate;
pub mod parser;
pub mod table;

pub use parser::{parse_compact, parse_rules, parse_rules_from_str, presets, RuleSet};
pub use table::{Color, Rule, RuleSpec, RuleTable, FALLBACK_COLOR};
