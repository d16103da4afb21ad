use serde::{Deserialize, Serialize};

/// The board edge a picked-up piece is pushed to.
///
/// Declaration order is the enumeration order used for tie-breaking everywhere
/// moves are listed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[repr(u8)]
pub enum SlideDirection {
    #[display("TOP")]
    Top,
    #[display("BOTTOM")]
    Bottom,
    #[display("LEFT")]
    Left,
    #[display("RIGHT")]
    Right,
}

impl SlideDirection {
    pub const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];
}
