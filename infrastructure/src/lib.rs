//! Infrastructure layer for llm-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: HTTP provider clients, the provider router,
//! and configuration file loading.

pub mod config;
pub mod providers;

// Re-export commonly used types
pub use config::{ColorSetting, ConfigLoader, FileConfig, FileOutputConfig};
pub use providers::{
    ChatProvider,
    error::CallError,
    resilient::ResilientProviderClient,
    retry::RetryPolicy,
    router::{ProviderRouter, ProviderSlot},
    settings::{ClientTimeouts, ProviderSettings},
};
