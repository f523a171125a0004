#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Update service client for drvup
//!
//! This crate provides a strongly-typed client for platform update
//! services:
//! - The fixed driver-update search filter
//! - Handle accounting for every service-side resource a run acquires
//! - The `UpdateService` / `UpdateSession` traits the pipeline drives
//! - A catalog-driven simulated backend used as the shipped reference
//!   implementation and as the test double for the whole pipeline
//!
//! Stage methods return errors only for catastrophic failures that abort
//! the run. Per-item shortfalls travel as data inside the returned
//! outputs so the pipeline can keep going.

pub mod filter;
pub mod handle;
pub mod implementations;
pub mod service;

pub use filter::UpdateFilter;
pub use handle::{HandleKind, ServiceHandle};
pub use implementations::sim::SimService;
pub use service::{
    DownloadOutput, InstallOutput, SearchOutput, SessionLease, UpdateService, UpdateSession,
};
