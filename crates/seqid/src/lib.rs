#![doc = include_str!("../README.md")]

mod allocator;
mod error;
mod fallback;
mod format;
mod kind;
mod memory;
mod rand;
mod registrar;
mod scan;
#[cfg(feature = "serde")]
mod serde;
mod store;
mod time;

pub use crate::allocator::*;
pub use crate::error::*;
pub use crate::fallback::*;
pub use crate::format::*;
pub use crate::kind::*;
pub use crate::memory::*;
pub use crate::rand::*;
pub use crate::registrar::*;
pub use crate::scan::*;
pub use crate::store::*;
pub use crate::time::*;
