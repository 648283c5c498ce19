//! Deliberation: independent opinions, anonymous cross-review, chairman verdict.
//!
//! - [`entities`] - the [`Stage`](entities::Stage) enum
//! - [`value_objects`] - opinions, reviews and the final trace
//! - [`request`] - inbound request and its bounds
//! - [`defaults`] - built-in council and chairman
//! - [`fallback`] - failure-marker policy shared by every layer
//! - [`anonymizer`] - identity-free rendering for reviewers
//! - [`parsing`] - reviewer JSON decoding

pub mod anonymizer;
pub mod defaults;
pub mod entities;
pub mod fallback;
pub mod parsing;
pub mod request;
pub mod value_objects;
