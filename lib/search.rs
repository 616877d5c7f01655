mod expander;
mod options;
mod sequence;

pub use expander::*;
pub use options::*;
pub use sequence::*;
