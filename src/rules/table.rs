use crate::error::{AntError, Result};
use crate::rotation::{Rotation, RotationCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Opaque cell color; only compared for equality.
///
/// Shared string so grid entries clone by reference count.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color(Arc<str>);

impl Color {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        Color(Arc::from(s))
    }
}

impl From<String> for Color {
    fn from(s: String) -> Self {
        Color(Arc::from(s))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Color written by the fallback rule
pub const FALLBACK_COLOR: &str = "aqua";

/// What the ant does while standing on a given color
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub next_color: Color,
    pub rotation: RotationCode,
    pub steps: u32,
}

impl Rule {
    /// Rule used when the table has no entry for the current color
    pub fn fallback() -> Self {
        Self {
            next_color: Color::from(FALLBACK_COLOR),
            rotation: RotationCode::Known(Rotation::Right),
            steps: 1,
        }
    }
}

fn default_steps() -> u32 {
    1
}

/// One declared rule, as supplied by a caller or a rule file
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RuleSpec {
    pub on: String,
    pub next: String,
    pub rotation: String,
    #[serde(default = "default_steps")]
    pub steps: u32,
}

impl RuleSpec {
    pub fn new(on: &str, next: &str, rotation: &str, steps: u32) -> Self {
        Self {
            on: on.to_string(),
            next: next.to_string(),
            rotation: rotation.to_string(),
            steps,
        }
    }
}

/// Immutable color -> rule lookup built once per run.
///
/// Declaration order matters: the first declared color is the primary
/// color every unvisited cell is treated as.
#[derive(Clone, Debug)]
pub struct RuleTable {
    primary: Color,
    order: Vec<Color>,
    rules: HashMap<Color, Rule>,
}

impl RuleTable {
    /// Build a table from declared rules.
    ///
    /// Unknown rotation codes are accepted here and surface when a step
    /// applies them. Later duplicates of an `on` color are ignored.
    pub fn new(specs: &[RuleSpec]) -> Result<Self> {
        let first = specs
            .first()
            .ok_or_else(|| AntError::InvalidRuleTable("rule table has no entries".to_string()))?;

        let mut order = Vec::with_capacity(specs.len());
        let mut rules = HashMap::with_capacity(specs.len());
        for spec in specs {
            if spec.steps == 0 {
                return Err(AntError::InvalidRuleTable(format!(
                    "rule on {:?} moves zero steps",
                    spec.on
                )));
            }
            let on = Color::from(spec.on.as_str());
            if rules.contains_key(&on) {
                warn!(color = %on, "duplicate rule color ignored");
                continue;
            }
            order.push(on.clone());
            rules.insert(
                on,
                Rule {
                    next_color: Color::from(spec.next.as_str()),
                    rotation: RotationCode::parse(&spec.rotation),
                    steps: spec.steps,
                },
            );
        }

        let table = Self {
            primary: Color::from(first.on.as_str()),
            order,
            rules,
        };
        debug!(colors = table.len(), primary = %table.primary, "rule table built");
        Ok(table)
    }

    /// Build a table whose next colors cycle through the declared colors.
    ///
    /// Each rule's next color becomes the `on` color of the rule after it,
    /// wrapping at the end.
    pub fn cyclic(specs: &[RuleSpec]) -> Result<Self> {
        let count = specs.len();
        let normalised: Vec<RuleSpec> = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| RuleSpec {
                next: specs[(i + 1) % count].on.clone(),
                ..spec.clone()
            })
            .collect();
        Self::new(&normalised)
    }

    /// Background color for cells never visited
    #[inline]
    pub fn primary_color(&self) -> &Color {
        &self.primary
    }

    #[inline]
    pub fn lookup(&self, color: &Color) -> Option<&Rule> {
        self.rules.get(color)
    }

    /// Colors in declaration order
    pub fn colors(&self) -> &[Color] {
        &self.order
    }

    /// Rules in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&Color, &Rule)> + '_ {
        self.order.iter().map(move |c| (c, &self.rules[c]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Strict check that every rotation code is understood
    pub fn validate(&self) -> Result<()> {
        for (_, rule) in self.iter() {
            rule.rotation.resolve()?;
        }
        Ok(())
    }

    /// Declared rules back out as specs
    pub fn to_specs(&self) -> Vec<RuleSpec> {
        self.iter()
            .map(|(on, rule)| {
                RuleSpec::new(on.as_str(), rule.next_color.as_str(), rule.rotation.as_str(), rule.steps)
            })
            .collect()
    }
}
