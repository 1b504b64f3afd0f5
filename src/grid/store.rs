use crate::grid::position::Position;
use crate::rules::Color;
use std::collections::HashMap;

/// One recoloured cell, as reported to a renderer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellChange {
    pub pos: Position,
    pub color: Color,
}

impl CellChange {
    pub fn new(pos: Position, color: Color) -> Self {
        Self { pos, color }
    }
}

/// Inclusive lattice-space box around every recorded cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Bounds {
    fn around(pos: Position) -> Self {
        Self {
            min_x: pos.x,
            max_x: pos.x,
            min_y: pos.y,
            max_y: pos.y,
        }
    }

    #[inline]
    fn include(&mut self, pos: Position) {
        self.min_x = self.min_x.min(pos.x);
        self.max_x = self.max_x.max(pos.x);
        self.min_y = self.min_y.min(pos.y);
        self.max_y = self.max_y.max(pos.y);
    }

    pub fn contains(&self, pos: Position) -> bool {
        (self.min_x..=self.max_x).contains(&pos.x) && (self.min_y..=self.max_y).contains(&pos.y)
    }

    /// Width in cells
    pub fn width(&self) -> u64 {
        (i64::from(self.max_x) - i64::from(self.min_x) + 1) as u64
    }

    /// Height in cells
    pub fn height(&self) -> u64 {
        (i64::from(self.max_y) - i64::from(self.min_y) + 1) as u64
    }
}

/// Sparse color map over visited cells.
///
/// Absent cells are implicitly the rule table's primary color. Entries are
/// only ever added or overwritten; the store empties on [`GridStore::clear`].
#[derive(Clone, Debug, Default)]
pub struct GridStore {
    cells: HashMap<u64, Color>,
    bounds: Option<Bounds>,
}

impl GridStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded color, if the cell was ever left behind
    #[inline]
    pub fn get(&self, pos: Position) -> Option<&Color> {
        self.cells.get(&pos.key())
    }

    /// Record or overwrite a cell's color
    #[inline]
    pub fn set(&mut self, pos: Position, color: Color) {
        self.cells.insert(pos.key(), color);
        match self.bounds.as_mut() {
            Some(bounds) => bounds.include(pos),
            None => self.bounds = Some(Bounds::around(pos)),
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains_key(&pos.key())
    }

    /// Number of distinct recorded cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.bounds = None;
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// All recorded cells, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Color)> + '_ {
        self.cells
            .iter()
            .map(|(&key, color)| (Position::from_key(key), color))
    }

    /// Copy of the store as a change list, sorted by position
    pub fn snapshot(&self) -> Vec<CellChange> {
        let mut cells: Vec<CellChange> = self
            .iter()
            .map(|(pos, color)| CellChange::new(pos, color.clone()))
            .collect();
        cells.sort_by_key(|c| c.pos);
        cells
    }

    /// Recorded cell count per color, most frequent first (ties by name)
    pub fn color_counts(&self) -> Vec<(Color, usize)> {
        let mut counts: HashMap<&Color, usize> = HashMap::new();
        for color in self.cells.values() {
            *counts.entry(color).or_insert(0) += 1;
        }
        let mut counts: Vec<(Color, usize)> = counts
            .into_iter()
            .map(|(color, n)| (color.clone(), n))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }

    /// Group a change list by color for batched drawing.
    ///
    /// Only the last change per position survives. Colors appear in the
    /// order their first surviving change does; positions keep change order.
    pub fn group_by_color(changes: &[CellChange]) -> Vec<(Color, Vec<Position>)> {
        let mut last: HashMap<u64, usize> = HashMap::with_capacity(changes.len());
        for (i, change) in changes.iter().enumerate() {
            last.insert(change.pos.key(), i);
        }

        let mut groups: Vec<(Color, Vec<Position>)> = Vec::new();
        let mut slot: HashMap<&Color, usize> = HashMap::new();
        for (i, change) in changes.iter().enumerate() {
            if last[&change.pos.key()] != i {
                continue;
            }
            let idx = *slot.entry(&change.color).or_insert_with(|| {
                groups.push((change.color.clone(), Vec::new()));
                groups.len() - 1
            });
            groups[idx].1.push(change.pos);
        }
        groups
    }
}
