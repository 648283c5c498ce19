//! Use cases for the application layer
//!
//! Each stage is its own use case; [`run_deliberation`] sequences them.

pub mod conduct_reviews;
pub mod generate_opinions;
pub mod run_deliberation;
pub mod scatter;
pub mod synthesize_verdict;

#[cfg(test)]
pub(crate) mod test_support;
