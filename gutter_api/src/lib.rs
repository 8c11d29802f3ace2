//! Shared git-gutter data models consumed by the core library and host crates.

pub mod diff;
pub mod region;
pub mod revision;
pub mod target;

pub use diff::*;
pub use region::*;
pub use revision::*;
pub use target::*;
