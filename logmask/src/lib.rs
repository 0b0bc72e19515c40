// logmask/src/lib.rs
//! # logmask CLI Application
//!
//! Command-line host for `logmask-core`: masks log streams and shows the
//! masking configuration in effect.

pub mod cli;
pub mod commands;
pub mod logger;
