//! Public house and part operations.
//!
//! ## Logging Ownership
//!
//! Every public operation logs its own boundary:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! The scanner and the store below use plain `tracing` events only.

pub mod house;
pub mod part;
