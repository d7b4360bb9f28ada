//! Acquisition lifecycle management.
//!
//! The controller wraps the external detector's asynchronous init and
//! detection callbacks into a resilient lifecycle: start, classified
//! failure, exponential-backoff retry, recovery, and teardown. The state
//! machine itself is pure ([`session`]); the controller is the I/O adapter
//! that feeds it events and executes its effects.

mod controller;
mod retry;
mod session;

pub use controller::{
    AcquisitionConfig, AcquisitionController, AcquisitionControllerBuilder, BeepSettings,
};
pub use retry::RetryPolicy;
pub use session::{AcquisitionSession, AcquisitionState, SessionEffect, SessionEvent};
