//! Photon Core - Error type and shared value types

mod error;
mod types;
mod positions;

pub use error::*;
pub use types::*;
pub use positions::*;
