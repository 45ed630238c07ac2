//! Route handlers, one file per area.

pub mod products;
pub mod system;
