//! Common module - host capability interface and its implementations
//!
//! Everything that touches the operating system during credential resolution
//! lives here, so the registry module itself stays free of direct I/O.

pub mod traits;
pub mod utils;

pub use traits::*;
pub use utils::*;
