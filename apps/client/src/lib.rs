//! Client for a remote ATS résumé scoring service.
//!
//! The interesting part is `session`: two independent request lifecycles
//! (scan and AI suggestions) over one set of staged inputs, plus a history
//! cache whose entries can replace the live result.

pub mod config;
pub mod errors;
pub mod models;
pub mod render;
pub mod service;
pub mod session;

pub use errors::{ClientError, Operation};
pub use service::{HttpScanService, ScanService};
pub use session::{Session, SessionDriver, SessionFeatures};
