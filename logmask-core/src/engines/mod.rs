// logmask-core/src/engines/mod.rs
//! Redaction engine implementations.
//!
//! `mask_engine` holds the span resolution and in-place masking algorithm and
//! the `MaskingEngine` that applies it to a shared rule store.

pub mod mask_engine;
