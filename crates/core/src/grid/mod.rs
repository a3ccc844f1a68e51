//! Map grid modules: point grid, text parser and named map storage

pub mod heightmap;
pub mod parser;
pub mod source;

// Re-export main types
pub use heightmap::*;
pub use parser::*;
pub use source::*;
