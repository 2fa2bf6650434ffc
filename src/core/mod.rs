// Shared protocol primitives

mod types;
mod block;
mod hash;
pub mod serialize;

pub use types::*;
pub use block::*;
pub use hash::*;
pub use serialize::{write_varint, WireReader};
