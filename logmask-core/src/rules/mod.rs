//! Masking rules: validation, compilation and the shared rule store.
//!
//! `compiler` turns raw two-group patterns into a single combined matcher.
//! `store` owns the active rule set and serializes every change to it so the
//! redaction path always reads a consistent snapshot.

pub mod compiler;
pub mod store;
