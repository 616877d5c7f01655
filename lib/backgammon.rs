mod analyzer;
mod board;
mod color;
mod face;
mod r#move;
mod origin;
mod point;
mod position;

pub use analyzer::*;
pub use board::*;
pub use color::*;
pub use face::*;
pub use origin::*;
pub use point::*;
pub use position::*;
pub use r#move::*;

/// The number of pieces each color plays with.
pub const CHECKERS: u8 = 15;
