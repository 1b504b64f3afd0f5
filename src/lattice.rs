use crate::error::{AntError, Result};
use crate::rotation::RotationCode;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Right, down, left, up
const SQUARE_DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// Axial hex coordinates, 60° apart
const HEX_DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Grid topology the ant walks on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lattice {
    #[default]
    Square,
    Hex,
}

impl FromStr for Lattice {
    type Err = AntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.as_bytes() {
            b"square" => Ok(Lattice::Square),
            b"hex" => Ok(Lattice::Hex),
            _ => Err(AntError::InvalidLattice(s.to_string())),
        }
    }
}

impl Lattice {
    pub const ALL: [Lattice; 2] = [Lattice::Square, Lattice::Hex];

    /// Ordered unit movement vectors; a direction index points into this
    #[inline]
    pub const fn directions(self) -> &'static [(i32, i32)] {
        match self {
            Lattice::Square => &SQUARE_DIRECTIONS,
            Lattice::Hex => &HEX_DIRECTIONS,
        }
    }

    /// Number of headings (D)
    #[inline]
    pub const fn direction_count(self) -> usize {
        self.directions().len()
    }

    /// Unit vector for a direction index
    #[inline]
    pub fn vector(self, dir: usize) -> (i32, i32) {
        self.directions()[dir % self.direction_count()]
    }

    /// Apply a rotation code to a direction index.
    ///
    /// The result is always in `[0, D)`; negative offsets wrap with
    /// Euclidean modulo.
    #[inline]
    pub fn rotate(self, dir: usize, code: &RotationCode) -> Result<usize> {
        let count = self.direction_count();
        let offset = code.resolve()?.offset(count);
        Ok((dir as isize + offset).rem_euclid(count as isize) as usize)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Lattice::Square => "square",
            Lattice::Hex => "hex",
        }
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
