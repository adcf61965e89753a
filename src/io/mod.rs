//! Output helpers.
//!
//! - flat CSV artifacts (`export`)
//! - dual-axis SVG chart (`chart`)

pub mod chart;
pub mod export;

pub use chart::*;
pub use export::*;
