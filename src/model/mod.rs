//! Result tables and drawing structures shared by the scanners.
//!
//! The element table is the sheet inventory, the keyword table extends it
//! with per-keyword counts, and [`Shape`] is the tree a drawing session
//! hands to the shape scanner.

mod element;
mod keyword;
mod shape;

pub use element::*;
pub use keyword::*;
pub use shape::*;
