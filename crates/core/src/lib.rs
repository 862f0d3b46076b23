//! Domain model for permit-test practice: question banks, training progress,
//! practice-test attempts and the rules that gate them.

#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod policy;
pub mod time;
pub mod tracker;

pub use error::Error;
pub use policy::{PassProbabilityPolicy, PolicyError, ProgressPolicy};
pub use time::Clock;
pub use tracker::{CategoryProgress, ProgressTracker};
