//! Data types for the table engine.

mod column;
mod config;
mod row;

pub use column::*;
pub use config::*;
pub use row::*;
