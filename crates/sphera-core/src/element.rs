//! The closed set of element categories used for gameplay filtering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five element categories a collectible sphere can carry.
///
/// The set is closed and process-wide constant; gameplay only ever
/// compares elements for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Water,
    Earth,
    Metal,
    Wood,
}

impl Element {
    /// All five elements, in canonical order.
    pub const ALL: [Element; 5] = [
        Element::Fire,
        Element::Water,
        Element::Earth,
        Element::Metal,
        Element::Wood,
    ];

    /// Human-readable name shown in the caption overlay.
    pub fn display_name(self) -> &'static str {
        match self {
            Element::Fire => "Fire",
            Element::Water => "Water",
            Element::Earth => "Earth",
            Element::Metal => "Metal",
            Element::Wood => "Wood",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
