use serde::{Deserialize, Serialize};

use crate::InvalidPlayerIdError;

/// Identifier of one of the two players.
///
/// Player [`PlayerId::Zero`] always moves first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
pub enum PlayerId {
    #[display("0")]
    Zero,
    #[display("1")]
    One,
}

impl PlayerId {
    pub const ALL: [Self; 2] = [Self::Zero, Self::One];

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Zero => Self::One,
            Self::One => Self::Zero,
        }
    }

    /// Returns `0` or `1`, usable as an index into per-player arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }

    pub(crate) const fn symbol(self) -> char {
        match self {
            Self::Zero => '0',
            Self::One => '1',
        }
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = InvalidPlayerIdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Zero),
            1 => Ok(Self::One),
            _ => Err(InvalidPlayerIdError { value }),
        }
    }
}
