//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - query bounds (`TimeWindow`) and the price-area selector (`PriceArea`)
//! - normalized series shapes (`CanonicalPoint`, `CanonicalSeries`)
//! - join output rows (`JoinedObservation`)
//! - run configuration (`PipelineConfig`)

pub mod types;

pub use types::*;
