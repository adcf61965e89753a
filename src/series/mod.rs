//! Canonical-series pipeline.
//!
//! - ordered-candidate column resolution (`schema`)
//! - raw record normalization into two-column series (`normalize`)
//! - exact-timestamp inner join (`join`)

pub mod join;
pub mod normalize;
pub mod schema;

pub use join::*;
pub use normalize::*;
pub use schema::*;
