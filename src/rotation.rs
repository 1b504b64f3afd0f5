use crate::error::AntError;
use std::fmt;
use std::str::FromStr;

/// Turn applied to the ant's heading before it moves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rotation {
    NoTurn,
    Right,
    Right2,
    Left,
    Left2,
    Reverse,
}

impl FromStr for Rotation {
    type Err = AntError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.as_bytes() {
            b"n" => Ok(Rotation::NoTurn),
            b"r" => Ok(Rotation::Right),
            b"r2" => Ok(Rotation::Right2),
            b"l" => Ok(Rotation::Left),
            b"l2" => Ok(Rotation::Left2),
            b"u" => Ok(Rotation::Reverse),
            _ => Err(AntError::InvalidRule {
                code: s.to_string(),
            }),
        }
    }
}

impl Rotation {
    /// All rotations, in menu order
    pub const ALL: [Rotation; 6] = [
        Rotation::Left,
        Rotation::Left2,
        Rotation::Right,
        Rotation::Right2,
        Rotation::NoTurn,
        Rotation::Reverse,
    ];

    /// Short code used in rule files
    pub const fn as_str(self) -> &'static str {
        match self {
            Rotation::NoTurn => "n",
            Rotation::Right => "r",
            Rotation::Right2 => "r2",
            Rotation::Left => "l",
            Rotation::Left2 => "l2",
            Rotation::Reverse => "u",
        }
    }

    /// Signed index offset for a lattice with `count` directions.
    /// Left turns count up, right turns count down.
    #[inline]
    pub const fn offset(self, count: usize) -> isize {
        match self {
            Rotation::NoTurn => 0,
            Rotation::Right => -1,
            Rotation::Right2 => -2,
            Rotation::Left => 1,
            Rotation::Left2 => 2,
            Rotation::Reverse => (count / 2) as isize,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rotation code as written in a rule.
///
/// Rule tables may be partially edited, so a code that does not name a
/// [`Rotation`] is kept verbatim and only rejected when a step applies it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RotationCode {
    Known(Rotation),
    Unknown(String),
}

impl RotationCode {
    /// Parse leniently; never fails
    pub fn parse(code: &str) -> Self {
        match code.parse() {
            Ok(rotation) => RotationCode::Known(rotation),
            Err(_) => RotationCode::Unknown(code.to_string()),
        }
    }

    /// Resolve to a concrete rotation or fail naming the offending code
    #[inline]
    pub fn resolve(&self) -> Result<Rotation, AntError> {
        match self {
            RotationCode::Known(rotation) => Ok(*rotation),
            RotationCode::Unknown(code) => Err(AntError::InvalidRule { code: code.clone() }),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RotationCode::Known(rotation) => rotation.as_str(),
            RotationCode::Unknown(code) => code,
        }
    }
}

impl From<Rotation> for RotationCode {
    fn from(rotation: Rotation) -> Self {
        RotationCode::Known(rotation)
    }
}

impl fmt::Display for RotationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
