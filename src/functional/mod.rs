//! Decoding machinery for elements and primitive values held in memory.

mod buf;
mod coding;

pub use buf::*;
pub use coding::*;
