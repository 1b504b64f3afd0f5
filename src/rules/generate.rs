use crate::error::{AntError, Result};
use crate::rotation::Rotation;
use crate::rules::table::{RuleSpec, RuleTable};
use std::collections::HashSet;

/// Primary color of every generated table
pub const BACKGROUND: &str = "#ffffff";

/// Distinct `#rrggbb` values available
pub const MAX_COLORS: usize = 1 << 24;

/// Random `#rrggbb` color
pub fn random_color(rng: &mut fastrand::Rng) -> String {
    format!("#{:06x}", rng.u32(..0x100_0000))
}

/// Random cyclic rule table with `count` distinct colors.
///
/// The first color is always white so blank space keeps a stable
/// background; every rule moves one cell.
pub fn random_table(count: usize, rng: &mut fastrand::Rng) -> Result<RuleTable> {
    if count == 0 {
        return Err(AntError::InvalidRuleTable(
            "random rule table needs at least one color".to_string(),
        ));
    }
    if count > MAX_COLORS {
        return Err(AntError::InvalidRuleTable(format!(
            "random rule table asks for {} colors but only {} exist",
            count, MAX_COLORS
        )));
    }

    let mut seen: HashSet<String> = HashSet::with_capacity(count);
    seen.insert(BACKGROUND.to_string());
    let mut colors = vec![BACKGROUND.to_string()];
    while colors.len() < count {
        let color = random_color(rng);
        if seen.insert(color.clone()) {
            colors.push(color);
        }
    }

    let specs: Vec<RuleSpec> = colors
        .iter()
        .map(|on| {
            let rotation = Rotation::ALL[rng.usize(..Rotation::ALL.len())];
            RuleSpec::new(on, on, rotation.as_str(), 1)
        })
        .collect();
    RuleTable::cyclic(&specs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_color_format() {
        let mut rng = fastrand::Rng::with_seed(1);
        for _ in 0..100 {
            let color = random_color(&mut rng);
            assert_eq!(color.len(), 7);
            assert!(color.starts_with('#'));
            assert!(color[1..].chars().all(|ch| ch.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_random_table_is_cyclic_and_valid() {
        let mut rng = fastrand::Rng::with_seed(42);
        let table = random_table(5, &mut rng).unwrap();
        table.validate().unwrap();

        assert_eq!(table.len(), 5);
        assert_eq!(table.primary_color().as_str(), BACKGROUND);
        let colors = table.colors().to_vec();
        for (i, (_, rule)) in table.iter().enumerate() {
            assert_eq!(rule.next_color, colors[(i + 1) % colors.len()]);
        }
    }

    #[test]
    fn test_random_table_is_seeded() {
        let a = random_table(4, &mut fastrand::Rng::with_seed(9)).unwrap();
        let b = random_table(4, &mut fastrand::Rng::with_seed(9)).unwrap();
        assert_eq!(a.to_specs(), b.to_specs());
    }

    #[test]
    fn test_random_table_needs_colors() {
        let mut rng = fastrand::Rng::with_seed(0);
        assert!(random_table(0, &mut rng).is_err());
    }

    #[test]
    fn test_random_table_rejects_more_colors_than_exist() {
        let mut rng = fastrand::Rng::with_seed(0);
        let err = random_table(MAX_COLORS + 2, &mut rng).unwrap_err();
        assert!(matches!(err, AntError::InvalidRuleTable(ref msg) if msg.contains("16777218")));
    }
}
