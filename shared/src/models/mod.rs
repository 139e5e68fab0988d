//! Data models
//!
//! Wire shapes of the external record store. Field names on the wire are
//! fixed by the backend and kept verbatim through serde renames.

pub mod approval;
pub mod employee;
pub mod evaluation;
pub mod profile;

// Re-exports
pub use approval::*;
pub use employee::*;
pub use evaluation::*;
pub use profile::*;
