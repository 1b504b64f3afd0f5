use std::fmt;

/// Integer cell address on either lattice
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Pack into a single map key: high half is `x`, low half is `y`,
    /// both as their two's-complement bit patterns.
    #[inline]
    pub const fn key(self) -> u64 {
        ((self.x as u32 as u64) << 32) | (self.y as u32 as u64)
    }

    /// Inverse of [`Position::key`]
    #[inline]
    pub const fn from_key(key: u64) -> Self {
        Self {
            x: (key >> 32) as u32 as i32,
            y: key as u32 as i32,
        }
    }

    /// Move `steps` times along `vector`; `None` if a coordinate leaves `i32`
    #[inline]
    pub fn offset(self, vector: (i32, i32), steps: u32) -> Option<Self> {
        let dx = i64::from(vector.0) * i64::from(steps);
        let dy = i64::from(vector.1) * i64::from(steps);
        let x = i32::try_from(i64::from(self.x) + dx).ok()?;
        let y = i32::try_from(i64::from(self.y) + dy).ok()?;
        Some(Self { x, y })
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
