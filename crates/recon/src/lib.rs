//! `flexitrack-recon`: flexi officer reconciliation engine.
//!
//! Pure engine crate: receives parsed employment and roster tables, returns
//! a status report. The current time is always passed in, never read here.

pub mod classify;
pub mod config;
pub mod dates;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod export;
pub mod model;
pub mod schema;
pub mod summary;

pub use config::{ReconOptions, RosterTieBreak, RunConfig};
pub use engine::{reconcile, reconcile_with, run};
pub use error::ReconError;
pub use model::{
    EmploymentRecord, LastDeployed, ReconInput, RosterRecord, StaffStatus, StatusReport,
    StatusRow, Table,
};
