//! Upstream and synthetic data sources.
//!
//! - trailing query window derivation (`window`)
//! - Energi Data Service REST client (`eds`)
//! - deterministic demo revenue/users table (`demo`)

pub mod demo;
pub mod eds;
pub mod window;

pub use demo::*;
pub use eds::*;
pub use window::*;
