//! # silverhome-shared
//!
//! Vocabulary shared between the SilverHome data layer and the UI shell:
//! role and lifecycle enums, identifier generation, and the names of the
//! persisted storage entries.

pub mod constants;
pub mod ids;
pub mod types;

pub use types::*;
