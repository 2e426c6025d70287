//! # gogaku-algo - core study scheduling algorithms
//!
//! Pure-Rust implementations of the two algorithms that drive review
//! scheduling:
//!
//! - **SRS (Spaced Repetition Scheduling)** - discrete interval ladder:
//!   each correct answer climbs one level, each miss drops one, and the
//!   level indexes a fixed per-family wait-duration table.
//! - **BKT (Bayesian Knowledge Tracing)** - two-state Bayesian model
//!   maintaining a continuous mastery probability per item, updated from
//!   each observed answer using calibrated learning/slip/guess rates.
//!
//! Design goals:
//! - **Pure** - no I/O, no clock reads; callers pass timestamps in
//! - **Reusable** - independent of any storage or transport layer
//! - **Fully tested** - every transition has unit tests
//!
//! ## Modules
//!
//! - [`srs`] - level transitions, interval tables, response-time average
//! - [`bkt`] - the mastery posterior/learning-transition update
//! - [`types`] - shared parameter types and constants

pub mod bkt;
pub mod srs;
pub mod types;

pub use bkt::update_mastery;
pub use srs::{advance_level, updated_average_response_time, IntervalTable};
pub use types::{BktParams, SRS_MAX_LEVEL, SRS_MIN_LEVEL};
