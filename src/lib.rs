mod allocator;
mod error;
mod id;
mod time;

pub use crate::allocator::*;
pub use crate::error::*;
pub use crate::id::*;
pub use crate::time::*;
