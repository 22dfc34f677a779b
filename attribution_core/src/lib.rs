//! # Attribution Core (Epitaph)
//!
//! The brain of the death pipeline. This crate consumes `engine_surface`,
//! buffers damage signals in bounded per-victim ring buffers, resolves every
//! death to a killer through a staged cascade, classifies the death location
//! against celestial bodies, and renders a templated narrative with rolling
//! session statistics.
//!
//! ## Core Components
//!
//! - **capture**: pre-damage ring buffers and the short-lived type cache
//! - **resolver**: the killer-resolution cascade (total: always yields a
//!   [`KillerInfo`])
//! - **location**: spatial-zone classification for death positions
//! - **narrative**: death-type classification, message templates, statistics
//! - **pipeline**: the long-lived orchestrator wired to the host hooks
//!
//! ## Design Philosophy
//!
//! - **Signal-driven**: the pipeline reacts to host notifications, it never
//!   drives the game loop
//! - **Total**: every death resolves; "Environment" is a valid answer, not
//!   an error
//! - **Host-safe**: no fault in any stage escapes into the host callback

pub mod capture;
pub mod config;
pub mod events;
pub mod location;
pub mod narrative;
pub mod pipeline;
pub mod resolver;

pub use capture::*;
pub use config::*;
pub use events::*;
pub use location::*;
pub use narrative::*;
pub use pipeline::*;
pub use resolver::*;

use thiserror::Error;

/// Faults the pipeline surfaces to the embedding plugin layer.
///
/// Transient resolution failures never show up here; they are absorbed
/// inside the cascade. What remains is the startup surface: configuration
/// and hook registration.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("hook registration failed: {0}")]
    Hook(#[from] engine_surface::HookError),
}
