//! Position types carried by movement events

use serde::{Deserialize, Serialize};

/// World position reported by the positional event (event code 3)
///
/// Both axes arrive as little-endian `f64` values packed into a byte array
/// parameter rather than as regular typed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: f64,
    pub y: f64,
}

impl WorldPosition {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for WorldPosition {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}
