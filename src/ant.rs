use crate::grid::Position;
use crate::lattice::Lattice;

/// Ant position and heading
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AntState {
    pub pos: Position,
    /// Index into the lattice's direction list
    pub dir: usize,
}

impl AntState {
    /// Create an ant at the given position and heading
    pub fn new(pos: Position, dir: usize) -> Self {
        Self { pos, dir }
    }

    /// Starting state of every run: origin, direction 0
    pub const fn initial() -> Self {
        Self {
            pos: Position::ORIGIN,
            dir: 0,
        }
    }

    /// Unit vector the ant is facing
    #[inline]
    pub fn heading(&self, lattice: Lattice) -> (i32, i32) {
        lattice.vector(self.dir)
    }
}
