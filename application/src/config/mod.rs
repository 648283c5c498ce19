//! Application-level configuration.
//!
//! - [`CouncilDefaults`] - default council, chairman, and stage sampling parameters

pub mod council_defaults;

pub use council_defaults::CouncilDefaults;
